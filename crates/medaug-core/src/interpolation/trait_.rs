//! Interpolator trait definition.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::PaddingMode;

/// Trait for interpolating values at continuous coordinates.
///
/// `indices` is `[N, D]` of continuous voxel indices with columns in natural
/// axis order (axis 0 first, matching the data layout); the result is the
/// `N` interpolated values.
pub trait Interpolator<B: Backend> {
    /// Interpolate `data` at the given continuous indices.
    fn interpolate<const D: usize>(
        &self,
        data: &Tensor<B, D>,
        indices: Tensor<B, 2>,
        padding: PaddingMode,
    ) -> Tensor<B, 1>;
}
