//! Linear interpolation implementation.
//!
//! This module provides linear interpolation for 2D and 3D data.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use super::trait_::Interpolator;
use super::PaddingMode;

/// Linear Interpolator.
///
/// Performs linear interpolation (bilinear for 2D, trilinear for 3D).
/// Under [`PaddingMode::Zeros`] every corner that falls outside the input
/// extent contributes exactly zero; under [`PaddingMode::Border`] corners
/// clamp to the nearest edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate<const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        match D {
            3 => self.interpolate_3d(data, indices, padding),
            2 => self.interpolate_2d(data, indices, padding),
            _ => panic!("LinearInterpolator only supports 2D and 3D tensors"),
        }
    }
}

/// In-bounds mask for one corner coordinate, computed before clamping.
fn bounds_mask<B: Backend>(coord: &Tensor<B, 1>, size: usize, padding: PaddingMode) -> Tensor<B, 1> {
    match padding {
        PaddingMode::Border => Tensor::ones([coord.dims()[0]], &coord.device()),
        PaddingMode::Zeros => {
            let ge = coord.clone().greater_equal_elem(0.0).float();
            let le = coord.clone().lower_equal_elem((size - 1) as f64).float();
            ge * le
        }
    }
}

impl LinearInterpolator {
    fn interpolate_2d<B: Backend, const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        let shape = data.shape();
        let d0 = shape.dims[0];
        let d1 = shape.dims[1];
        let batch_size = indices.dims()[0];
        let device = indices.device();

        // indices: [N, 2] -> (i0, i1) in axis order
        let c0 = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let c1 = indices.narrow(1, 1, 1).squeeze::<1>(1);

        // Floor coordinates and interpolation weights
        let f0 = c0.clone().floor();
        let f1 = c1.clone().floor();
        let w0 = c0 - f0.clone();
        let w1 = c1 - f1.clone();

        let g0 = f0.clone() + 1.0;
        let g1 = f1.clone() + 1.0;

        // Per-corner in-bounds masks (before clamping)
        let m_f0 = bounds_mask(&f0, d0, padding);
        let m_g0 = bounds_mask(&g0, d0, padding);
        let m_f1 = bounds_mask(&f1, d1, padding);
        let m_g1 = bounds_mask(&g1, d1, padding);

        // Clamp indices to valid range for gathering
        let f0_i = f0.clamp(0.0, (d0 - 1) as f64).int();
        let f1_i = f1.clamp(0.0, (d1 - 1) as f64).int();
        let g0_i = g0.clamp(0.0, (d0 - 1) as f64).int();
        let g1_i = g1.clamp(0.0, (d1 - 1) as f64).int();

        // Stride for [d0, d1] layout
        let stride0 = d1 as i32;

        let flat_data = data.clone().reshape([d0 * d1]);

        // Gather the 4 corner values, masked
        let v00 = Self::gather_2d(&flat_data, &f0_i, &f1_i, stride0) * m_f0.clone() * m_f1.clone();
        let v01 = Self::gather_2d(&flat_data, &f0_i, &g1_i, stride0) * m_f0 * m_g1.clone();
        let v10 = Self::gather_2d(&flat_data, &g0_i, &f1_i, stride0) * m_g0.clone() * m_f1;
        let v11 = Self::gather_2d(&flat_data, &g0_i, &g1_i, stride0) * m_g0 * m_g1;

        let one = Tensor::<B, 1>::ones([batch_size], &device);
        let one_minus_w0 = one.clone() - w0.clone();
        let one_minus_w1 = one - w1.clone();

        // Interpolate along axis 1, then axis 0
        let lo = v00 * one_minus_w1.clone() + v01 * w1.clone();
        let hi = v10 * one_minus_w1 + v11 * w1;
        lo * one_minus_w0 + hi * w0
    }

    #[inline]
    fn gather_2d<B: Backend>(
        flat_data: &Tensor<B, 1>,
        i0: &Tensor<B, 1, Int>,
        i1: &Tensor<B, 1, Int>,
        stride0: i32,
    ) -> Tensor<B, 1> {
        let idx = i0.clone() * stride0 + i1.clone();
        flat_data.clone().gather(0, idx)
    }

    fn interpolate_3d<B: Backend, const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        let shape = data.shape();
        let d0 = shape.dims[0];
        let d1 = shape.dims[1];
        let d2 = shape.dims[2];
        let batch_size = indices.dims()[0];
        let device = indices.device();

        // indices: [N, 3] -> (i0, i1, i2) in axis order
        let c0 = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let c1 = indices.clone().narrow(1, 1, 1).squeeze::<1>(1);
        let c2 = indices.narrow(1, 2, 1).squeeze::<1>(1);

        let f0 = c0.clone().floor();
        let f1 = c1.clone().floor();
        let f2 = c2.clone().floor();
        let w0 = c0 - f0.clone();
        let w1 = c1 - f1.clone();
        let w2 = c2 - f2.clone();

        let g0 = f0.clone() + 1.0;
        let g1 = f1.clone() + 1.0;
        let g2 = f2.clone() + 1.0;

        let m_f0 = bounds_mask(&f0, d0, padding);
        let m_g0 = bounds_mask(&g0, d0, padding);
        let m_f1 = bounds_mask(&f1, d1, padding);
        let m_g1 = bounds_mask(&g1, d1, padding);
        let m_f2 = bounds_mask(&f2, d2, padding);
        let m_g2 = bounds_mask(&g2, d2, padding);

        let f0_i = f0.clamp(0.0, (d0 - 1) as f64).int();
        let f1_i = f1.clamp(0.0, (d1 - 1) as f64).int();
        let f2_i = f2.clamp(0.0, (d2 - 1) as f64).int();
        let g0_i = g0.clamp(0.0, (d0 - 1) as f64).int();
        let g1_i = g1.clamp(0.0, (d1 - 1) as f64).int();
        let g2_i = g2.clamp(0.0, (d2 - 1) as f64).int();

        // Strides for [d0, d1, d2] layout
        let stride0 = (d1 * d2) as i32;
        let stride1 = d2 as i32;

        let flat_data = data.clone().reshape([d0 * d1 * d2]);

        // Gather all 8 corner values, masked
        let v000 = Self::gather_3d(&flat_data, &f0_i, &f1_i, &f2_i, stride0, stride1)
            * m_f0.clone() * m_f1.clone() * m_f2.clone();
        let v001 = Self::gather_3d(&flat_data, &f0_i, &f1_i, &g2_i, stride0, stride1)
            * m_f0.clone() * m_f1.clone() * m_g2.clone();
        let v010 = Self::gather_3d(&flat_data, &f0_i, &g1_i, &f2_i, stride0, stride1)
            * m_f0.clone() * m_g1.clone() * m_f2.clone();
        let v011 = Self::gather_3d(&flat_data, &f0_i, &g1_i, &g2_i, stride0, stride1)
            * m_f0 * m_g1.clone() * m_g2.clone();
        let v100 = Self::gather_3d(&flat_data, &g0_i, &f1_i, &f2_i, stride0, stride1)
            * m_g0.clone() * m_f1.clone() * m_f2.clone();
        let v101 = Self::gather_3d(&flat_data, &g0_i, &f1_i, &g2_i, stride0, stride1)
            * m_g0.clone() * m_f1 * m_g2.clone();
        let v110 = Self::gather_3d(&flat_data, &g0_i, &g1_i, &f2_i, stride0, stride1)
            * m_g0.clone() * m_g1.clone() * m_f2;
        let v111 = Self::gather_3d(&flat_data, &g0_i, &g1_i, &g2_i, stride0, stride1)
            * m_g0 * m_g1 * m_g2;

        let one = Tensor::<B, 1>::ones([batch_size], &device);
        let one_minus_w0 = one.clone() - w0.clone();
        let one_minus_w1 = one.clone() - w1.clone();
        let one_minus_w2 = one - w2.clone();

        // Interpolate along axis 2
        let c00 = v000 * one_minus_w2.clone() + v001 * w2.clone();
        let c01 = v010 * one_minus_w2.clone() + v011 * w2.clone();
        let c10 = v100 * one_minus_w2.clone() + v101 * w2.clone();
        let c11 = v110 * one_minus_w2 + v111 * w2;

        // Interpolate along axis 1
        let c0 = c00 * one_minus_w1.clone() + c01 * w1.clone();
        let c1 = c10 * one_minus_w1 + c11 * w1;

        // Interpolate along axis 0
        c0 * one_minus_w0 + c1 * w0
    }

    #[inline]
    fn gather_3d<B: Backend>(
        flat_data: &Tensor<B, 1>,
        i0: &Tensor<B, 1, Int>,
        i1: &Tensor<B, 1, Int>,
        i2: &Tensor<B, 1, Int>,
        stride0: i32,
        stride1: i32,
    ) -> Tensor<B, 1> {
        let idx = i0.clone() * stride0 + i1.clone() * stride1 + i2.clone();
        flat_data.clone().gather(0, idx)
    }
}
