//! Nearest neighbor interpolation implementation.
//!
//! This module provides nearest neighbor interpolation for 2D and 3D data.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::trait_::Interpolator;
use super::PaddingMode;

/// Nearest Neighbor Interpolator.
///
/// Rounds each coordinate to the nearest integer index. Under
/// [`PaddingMode::Zeros`] samples whose rounded index falls outside the
/// input extent yield zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestInterpolator;

impl NearestInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestInterpolator {
    fn interpolate<const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        match D {
            3 => self.interpolate_3d(data, indices, padding),
            2 => self.interpolate_2d(data, indices, padding),
            _ => panic!("NearestInterpolator only supports 2D and 3D tensors"),
        }
    }
}

fn mask<B: Backend>(coord: &Tensor<B, 1>, size: usize, padding: PaddingMode) -> Tensor<B, 1> {
    match padding {
        PaddingMode::Border => Tensor::ones([coord.dims()[0]], &coord.device()),
        PaddingMode::Zeros => {
            let ge = coord.clone().greater_equal_elem(0.0).float();
            let le = coord.clone().lower_equal_elem((size - 1) as f64).float();
            ge * le
        }
    }
}

impl NearestInterpolator {
    fn interpolate_2d<B: Backend, const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1> {
        let shape = data.shape();
        let d0 = shape.dims[0];
        let d1 = shape.dims[1];

        // indices: [N, 2] -> (i0, i1) in axis order
        let r0 = indices.clone().narrow(1, 0, 1).squeeze::<1>(1).round();
        let r1 = indices.narrow(1, 1, 1).squeeze::<1>(1).round();

        let m = mask(&r0, d0, padding) * mask(&r1, d1, padding);

        let i0 = r0.clamp(0.0, (d0 - 1) as f64).int();
        let i1 = r1.clamp(0.0, (d1 - 1) as f64).int();

        let stride0 = d1 as i32;
        let idx = i0 * stride0 + i1;

        let flat_data = data.clone().reshape([d0 * d1]);
        flat_data.gather(0, idx) * m
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

        let r0 = indices.clone().narrow(1, 0, 1).squeeze::<1>(1).round();
        let r1 = indices.clone().narrow(1, 1, 1).squeeze::<1>(1).round();
        let r2 = indices.narrow(1, 2, 1).squeeze::<1>(1).round();

        let m = mask(&r0, d0, padding) * mask(&r1, d1, padding) * mask(&r2, d2, padding);

        let i0 = r0.clamp(0.0, (d0 - 1) as f64).int();
        let i1 = r1.clamp(0.0, (d1 - 1) as f64).int();
        let i2 = r2.clamp(0.0, (d2 - 1) as f64).int();

        let stride0 = (d1 * d2) as i32;
        let stride1 = d2 as i32;
        let idx = i0 * stride0 + i1 * stride1 + i2;

        let flat_data = data.clone().reshape([d0 * d1 * d2]);
        flat_data.gather(0, idx) * m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::{Shape, TensorData};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_nearest_rounds_to_closest() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![0.0, 1.0, 2.0, 3.0], Shape::new([2, 2])),
            &device,
        );

        let interpolator = NearestInterpolator::new();

        let indices = Tensor::<TestBackend, 2>::from_floats(
            [[0.4, 0.4], [0.6, 0.6], [0.4, 0.6], [1.0, 0.0]],
            &device,
        );
        let result = interpolator.interpolate(&data, indices, PaddingMode::Zeros);
        let result_data = result.into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        assert_eq!(slice[0], 0.0);
        assert_eq!(slice[1], 3.0);
        assert_eq!(slice[2], 1.0);
        assert_eq!(slice[3], 2.0);
    }

    #[test]
    fn test_nearest_zeros_outside() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![7.0, 7.0, 7.0, 7.0], Shape::new([2, 2])),
            &device,
        );

        let interpolator = NearestInterpolator::new();

        let indices =
            Tensor::<TestBackend, 2>::from_floats([[-1.0, 0.0], [0.0, 2.0]], &device);
        let result = interpolator.interpolate(&data, indices, PaddingMode::Zeros);
        let result_data = result.into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        assert_eq!(slice[0], 0.0);
        assert_eq!(slice[1], 0.0);
    }

    #[test]
    fn test_nearest_border_clamps() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![0.0, 1.0, 2.0, 3.0], Shape::new([2, 2])),
            &device,
        );

        let interpolator = NearestInterpolator::new();

        let indices =
            Tensor::<TestBackend, 2>::from_floats([[-3.0, -3.0], [9.0, 9.0]], &device);
        let result = interpolator.interpolate(&data, indices, PaddingMode::Border);
        let result_data = result.into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        assert_eq!(slice[0], 0.0);
        assert_eq!(slice[1], 3.0);
    }

    #[test]
    fn test_nearest_3d_exact_index() {
        let device = Default::default();
        let mut data_vec = vec![0.0; 27];
        data_vec[13] = 9.0; // center of a 3x3x3 block
        let data = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(data_vec, Shape::new([3, 3, 3])),
            &device,
        );

        let interpolator = NearestInterpolator::new();

        let indices = Tensor::<TestBackend, 2>::from_floats([[1.2, 0.8, 1.1]], &device);
        let result = interpolator.interpolate(&data, indices, PaddingMode::Zeros);
        let result_data = result.into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        assert_eq!(slice[0], 9.0);
    }
}
