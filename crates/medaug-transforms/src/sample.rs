//! Sample and value model for dictionary transforms.
//!
//! A [`Sample`] maps field names ("img", "seg", ...) to [`Value`]s. A value
//! is either a device tensor (2D `[C, H, W]` or 3D `[C, D, H, W]`) or a host
//! array; the distinction is what the verification harness calls the
//! "is-tensor" classification and is controlled on output by
//! `as_tensor_output`.

use std::collections::HashMap;

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use crate::error::{Result, TransformError};

/// A dictionary sample: field name to value.
pub type Sample<B> = HashMap<String, Value<B>>;

/// A single field value.
pub enum Value<B: Backend> {
    /// Device tensor with one channel dim and two spatial dims.
    Tensor2(Tensor<B, 3>),
    /// Device tensor with one channel dim and three spatial dims.
    Tensor3(Tensor<B, 4>),
    /// Host array of any rank.
    Array(TensorData),
}

impl<B: Backend> Clone for Value<B> {
    fn clone(&self) -> Self {
        match self {
            Self::Tensor2(t) => Self::Tensor2(t.clone()),
            Self::Tensor3(t) => Self::Tensor3(t.clone()),
            Self::Array(d) => Self::Array(d.clone()),
        }
    }
}

impl<B: Backend> core::fmt::Debug for Value<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Tensor2(t) => write!(f, "Tensor2({:?})", t.dims()),
            Self::Tensor3(t) => write!(f, "Tensor3({:?})", t.dims()),
            Self::Array(d) => write!(f, "Array({:?})", d.shape),
        }
    }
}

impl<B: Backend> Value<B> {
    /// Whether this value is a device tensor (as opposed to a host array).
    pub fn is_tensor(&self) -> bool {
        !matches!(self, Self::Array(_))
    }

    /// Full shape including the channel dim.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Tensor2(t) => t.dims().to_vec(),
            Self::Tensor3(t) => t.dims().to_vec(),
            Self::Array(d) => d.shape.clone(),
        }
    }

    /// Copy out the raw values as host data.
    pub fn to_data(&self) -> TensorData {
        match self {
            Self::Tensor2(t) => t.clone().into_data(),
            Self::Tensor3(t) => t.clone().into_data(),
            Self::Array(d) => d.clone(),
        }
    }

    /// View this value as a `[C, H, W]` tensor on `device`.
    pub fn to_tensor2(&self, device: &B::Device) -> Result<Tensor<B, 3>> {
        match self {
            Self::Tensor2(t) => Ok(t.clone()),
            Self::Array(d) if d.shape.len() == 3 => Ok(Tensor::from_data(d.clone(), device)),
            other => Err(TransformError::ShapeMismatch {
                expected: vec![0, 0, 0],
                actual: other.shape(),
            }),
        }
    }

    /// View this value as a `[C, D, H, W]` tensor on `device`.
    pub fn to_tensor3(&self, device: &B::Device) -> Result<Tensor<B, 4>> {
        match self {
            Self::Tensor3(t) => Ok(t.clone()),
            Self::Array(d) if d.shape.len() == 4 => Ok(Tensor::from_data(d.clone(), device)),
            other => Err(TransformError::ShapeMismatch {
                expected: vec![0, 0, 0, 0],
                actual: other.shape(),
            }),
        }
    }
}
