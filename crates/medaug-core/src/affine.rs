//! Affine matrix construction.
//!
//! Homogeneous (D+1)x(D+1) matrices for rotation, shear, translation and
//! scaling in 2D and 3D, and their composition for a randomized draw.
//! Matrices are kept in f64 so parameter math does not lose precision
//! before tensors are built.

use nalgebra::DMatrix;

/// Create a rotation matrix.
///
/// 2D: a single angle. 3D: one angle per axis, applied in axis order
/// (axis 0 first); absent angles contribute identity.
pub fn create_rotation(sd: usize, radians: &[f64]) -> DMatrix<f64> {
    let mut affine = DMatrix::identity(sd + 1, sd + 1);
    if sd == 2 {
        let (s, c) = radians[0].sin_cos();
        affine[(0, 0)] = c;
        affine[(0, 1)] = -s;
        affine[(1, 0)] = s;
        affine[(1, 1)] = c;
        return affine;
    }

    // Axis pairs rotated by each successive angle in 3D.
    let planes = [(1, 2), (0, 2), (0, 1)];
    for (axis, &r) in radians.iter().enumerate().take(3) {
        let (s, c) = r.sin_cos();
        let (i, j) = planes[axis];
        let mut m = DMatrix::identity(4, 4);
        m[(i, i)] = c;
        m[(j, j)] = c;
        if axis == 1 {
            // Middle axis uses the opposite off-diagonal sign convention.
            m[(i, j)] = s;
            m[(j, i)] = -s;
        } else {
            m[(i, j)] = -s;
            m[(j, i)] = s;
        }
        affine = &affine * &m;
    }
    affine
}

/// Create a shearing matrix.
///
/// Coefficients fill the off-diagonal entries row-major; missing
/// coefficients are zero.
pub fn create_shear(sd: usize, coefs: &[f64]) -> DMatrix<f64> {
    let mut padded = [0.0; 6];
    for (slot, &c) in padded.iter_mut().zip(coefs.iter()) {
        *slot = c;
    }
    let mut m = DMatrix::identity(sd + 1, sd + 1);
    if sd == 2 {
        m[(0, 1)] = padded[0];
        m[(1, 0)] = padded[1];
    } else {
        m[(0, 1)] = padded[0];
        m[(0, 2)] = padded[1];
        m[(1, 0)] = padded[2];
        m[(1, 2)] = padded[3];
        m[(2, 0)] = padded[4];
        m[(2, 1)] = padded[5];
    }
    m
}

/// Create a translation matrix. Missing shifts are zero.
pub fn create_translation(sd: usize, shifts: &[f64]) -> DMatrix<f64> {
    let mut m = DMatrix::identity(sd + 1, sd + 1);
    for (i, &s) in shifts.iter().enumerate().take(sd) {
        m[(i, sd)] = s;
    }
    m
}

/// Create a scaling matrix. Missing factors are one.
pub fn create_scale(sd: usize, factors: &[f64]) -> DMatrix<f64> {
    let mut m = DMatrix::identity(sd + 1, sd + 1);
    for (i, &f) in factors.iter().enumerate().take(sd) {
        m[(i, i)] = f;
    }
    m
}

/// Compose a full affine from parameter groups.
///
/// Factors are multiplied in the order rotation, shear, translation, scale;
/// empty groups are skipped entirely. This ordering is part of the
/// augmentation contract: the pinned reference outputs depend on it.
pub fn compose(
    sd: usize,
    rotate: &[f64],
    shear: &[f64],
    translate: &[f64],
    scale: &[f64],
) -> DMatrix<f64> {
    let mut affine = DMatrix::identity(sd + 1, sd + 1);
    if !rotate.is_empty() {
        affine = &affine * &create_rotation(sd, rotate);
    }
    if !shear.is_empty() {
        affine = &affine * &create_shear(sd, shear);
    }
    if !translate.is_empty() {
        affine = &affine * &create_translation(sd, translate);
    }
    if !scale.is_empty() {
        affine = &affine * &create_scale(sd, scale);
    }
    affine
}
