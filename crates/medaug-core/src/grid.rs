//! Sampling grid construction.
//!
//! A sampling grid is a `[N, D+1]` tensor of homogeneous, pixel-centered
//! output coordinates: axis `i` of a `spatial_size` of `s_i` spans
//! `-(s_i-1)/2 ..= (s_i-1)/2`, one row per output voxel in row-major order,
//! with a trailing homogeneous 1.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Shape, Tensor, TensorData};
use nalgebra::DMatrix;

/// Create the identity sampling grid for the given output size.
///
/// Supports 2D and 3D spatial sizes.
pub fn create_grid<B: Backend>(spatial_size: &[usize], device: &B::Device) -> Tensor<B, 2> {
    match *spatial_size {
        [h, w] => {
            let n = h * w;
            let r0 = Tensor::<B, 1, Int>::arange(0..h as i64, device);
            let r1 = Tensor::<B, 1, Int>::arange(0..w as i64, device);

            // Row-major meshgrid: axis 0 varies slowest.
            let g0 = r0.reshape([h, 1]).repeat(&[1, w]).reshape([n]).float()
                - (h as f64 - 1.0) / 2.0;
            let g1 = r1.reshape([1, w]).repeat(&[h, 1]).reshape([n]).float()
                - (w as f64 - 1.0) / 2.0;
            let ones = Tensor::<B, 1>::ones([n], device);

            Tensor::cat(
                vec![g0.unsqueeze_dim(1), g1.unsqueeze_dim(1), ones.unsqueeze_dim(1)],
                1,
            )
        }
        [d, h, w] => {
            let n = d * h * w;
            let r0 = Tensor::<B, 1, Int>::arange(0..d as i64, device);
            let r1 = Tensor::<B, 1, Int>::arange(0..h as i64, device);
            let r2 = Tensor::<B, 1, Int>::arange(0..w as i64, device);

            let g0 = r0.reshape([d, 1, 1]).repeat(&[1, h, w]).reshape([n]).float()
                - (d as f64 - 1.0) / 2.0;
            let g1 = r1.reshape([1, h, 1]).repeat(&[d, 1, w]).reshape([n]).float()
                - (h as f64 - 1.0) / 2.0;
            let g2 = r2.reshape([1, 1, w]).repeat(&[d, h, 1]).reshape([n]).float()
                - (w as f64 - 1.0) / 2.0;
            let ones = Tensor::<B, 1>::ones([n], device);

            Tensor::cat(
                vec![
                    g0.unsqueeze_dim(1),
                    g1.unsqueeze_dim(1),
                    g2.unsqueeze_dim(1),
                    ones.unsqueeze_dim(1),
                ],
                1,
            )
        }
        _ => panic!("create_grid supports 2D and 3D spatial sizes"),
    }
}

/// Apply a homogeneous affine to every grid point.
///
/// `grid` is `[N, D+1]` row points; the result is `grid` mapped through
/// `affine`, still homogeneous.
pub fn transform_grid<B: Backend>(grid: Tensor<B, 2>, affine: &DMatrix<f64>) -> Tensor<B, 2> {
    let dh = affine.nrows();
    let device = grid.device();

    let mut data = Vec::with_capacity(dh * dh);
    for r in 0..dh {
        for c in 0..dh {
            data.push(affine[(r, c)] as f32);
        }
    }
    let m = Tensor::<B, 2>::from_data(TensorData::new(data, Shape::new([dh, dh])), &device);

    // Row-vector convention: y = x @ A^T.
    grid.matmul(m.transpose())
}
