//! Grid resampling filter.
//!
//! This module provides [`GridResampler`], which evaluates a channel-first
//! tensor at the positions of a sampling grid (see [`crate::grid`]) and
//! produces a channel-first output of the grid's spatial size.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};

use crate::interpolation::{Interpolator, PaddingMode};

/// Grid resampler.
///
/// Maps homogeneous grid coordinates into continuous input indices and
/// interpolates each channel. Grid coordinates are pixel-centered output
/// coordinates; the mapping into input index space normalizes each axis by
/// `2/(n-1)` and unnormalizes as `((x+1)*n - 1)/2`, so a unit of grid space
/// spans the input extent edge-to-edge.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `I` - The interpolator type
pub struct GridResampler<B, I>
where
    B: Backend,
    I: Interpolator<B>,
{
    interpolator: I,
    padding: PaddingMode,
    _phantom: PhantomData<B>,
}

impl<B, I> GridResampler<B, I>
where
    B: Backend,
    I: Interpolator<B>,
{
    /// Create a new resampler with zeros padding.
    pub fn new(interpolator: I) -> Self {
        Self {
            interpolator,
            padding: PaddingMode::Zeros,
            _phantom: PhantomData,
        }
    }

    /// Set the padding mode for out-of-bounds samples.
    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    /// Resample a 2D channel-first tensor `[C, H, W]` against a grid of
    /// `spatial_size` output voxels.
    pub fn resample_2d(
        &self,
        data: &Tensor<B, 3>,
        grid: &Tensor<B, 2>,
        spatial_size: [usize; 2],
    ) -> Tensor<B, 3> {
        let [c, h, w] = data.dims();
        let indices = self.grid_to_indices(grid, &[h, w]);
        let n = spatial_size[0] * spatial_size[1];

        let mut channels = Vec::with_capacity(c);
        for ch in 0..c {
            let plane = data.clone().narrow(0, ch, 1).squeeze::<2>(0);
            let flat = self
                .interpolator
                .interpolate(&plane, indices.clone(), self.padding);
            channels.push(flat.reshape([1, n]));
        }
        Tensor::cat(channels, 0).reshape([c, spatial_size[0], spatial_size[1]])
    }

    /// Resample a 3D channel-first tensor `[C, D, H, W]`.
    pub fn resample_3d(
        &self,
        data: &Tensor<B, 4>,
        grid: &Tensor<B, 2>,
        spatial_size: [usize; 3],
    ) -> Tensor<B, 4> {
        let [c, d, h, w] = data.dims();
        let indices = self.grid_to_indices(grid, &[d, h, w]);
        let n = spatial_size[0] * spatial_size[1] * spatial_size[2];

        let mut channels = Vec::with_capacity(c);
        for ch in 0..c {
            let volume = data.clone().narrow(0, ch, 1).squeeze::<3>(0);
            let flat = self
                .interpolator
                .interpolate(&volume, indices.clone(), self.padding);
            channels.push(flat.reshape([1, n]));
        }
        Tensor::cat(channels, 0).reshape([c, spatial_size[0], spatial_size[1], spatial_size[2]])
    }

    /// Convert homogeneous grid coordinates `[N, D+1]` into continuous input
    /// indices `[N, D]` for an input of the given spatial extent.
    fn grid_to_indices(&self, grid: &Tensor<B, 2>, in_spatial: &[usize]) -> Tensor<B, 2> {
        let sd = in_spatial.len();
        let device = grid.device();

        let w = grid.clone().narrow(1, sd, 1);
        let points = grid.clone().narrow(1, 0, sd) / w;

        let norm: Vec<f32> = in_spatial
            .iter()
            .map(|&n| 2.0 / (n as f32 - 1.0))
            .collect();
        let half: Vec<f32> = in_spatial.iter().map(|&n| n as f32 / 2.0).collect();
        let norm_row =
            Tensor::<B, 2>::from_data(TensorData::new(norm, Shape::new([1, sd])), &device);
        let half_row =
            Tensor::<B, 2>::from_data(TensorData::new(half, Shape::new([1, sd])), &device);

        // Normalize to [-1, 1] over the input extent, then unnormalize into
        // continuous indices: ix = ((x + 1) * n - 1) / 2.
        let x = points * norm_row;
        (x + 1.0) * half_row - 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::create_translation;
    use crate::grid::{create_grid, transform_grid};
    use crate::interpolation::{LinearInterpolator, NearestInterpolator};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_resample_ones_center_crop_2d() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 3>::ones([3, 3, 3], &device);
        let grid = create_grid::<TestBackend>(&[2, 2], &device);

        let resampler = GridResampler::new(LinearInterpolator::new());
        let out = resampler.resample_2d(&data, &grid, [2, 2]);

        assert_eq!(out.dims(), [3, 2, 2]);
        let out_data = out.into_data();
        for v in out_data.as_slice::<f32>().unwrap() {
            assert!((v - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_resample_ones_center_crop_3d() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 4>::ones([1, 3, 3, 3], &device);
        let grid = create_grid::<TestBackend>(&[2, 2, 2], &device);

        let resampler = GridResampler::new(LinearInterpolator::new());
        let out = resampler.resample_3d(&data, &grid, [2, 2, 2]);

        assert_eq!(out.dims(), [1, 2, 2, 2]);
        let out_data = out.into_data();
        for v in out_data.as_slice::<f32>().unwrap() {
            assert!((v - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_resample_same_size_fades_border() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 3>::ones([1, 3, 3], &device);
        let grid = create_grid::<TestBackend>(&[3, 3], &device);

        let resampler = GridResampler::new(LinearInterpolator::new());
        let out = resampler.resample_2d(&data, &grid, [3, 3]);

        // Edge samples sit half a voxel outside; zeros padding halves them,
        // corners quarter.
        let expected = [
            0.25, 0.5, 0.25, //
            0.5, 1.0, 0.5, //
            0.25, 0.5, 0.25,
        ];
        let out_data = out.into_data();
        let slice = out_data.as_slice::<f32>().unwrap();
        for (v, e) in slice.iter().zip(expected.iter()) {
            assert!((v - e).abs() < 1e-6, "got {v}, expected {e}");
        }
    }

    #[test]
    fn test_resample_translated_grid_nearest() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 3>::from_data(
            TensorData::new((0..64).map(|v| v as f32).collect::<Vec<_>>(), Shape::new([1, 8, 8])),
            &device,
        );

        let grid = transform_grid(
            create_grid::<TestBackend>(&[3, 3], &device),
            &create_translation(2, &[2.0, 1.0]),
        );

        let resampler = GridResampler::new(NearestInterpolator::new());
        let out = resampler.resample_2d(&data, &grid, [3, 3]);

        // Shifted sample positions round to rows 5..7, columns 4..6.
        let expected = [
            44.0, 45.0, 46.0, //
            52.0, 53.0, 54.0, //
            60.0, 61.0, 62.0,
        ];
        let out_data = out.into_data();
        let slice = out_data.as_slice::<f32>().unwrap();
        for (v, e) in slice.iter().zip(expected.iter()) {
            assert_eq!(v, e);
        }
    }
}
