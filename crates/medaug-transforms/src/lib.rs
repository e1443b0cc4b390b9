//! Randomized geometric augmentation for paired image/segmentation tensors.
//!
//! The central transforms are [`RandAffine`] for a single tensor and
//! [`RandAffined`] for dictionary samples with per-field interpolation
//! modes. Both are deterministic under [`set_random_state`]: a fixed seed
//! always yields the same sampled rotation/shear/translation/scale draws.
//!
//! [`set_random_state`]: RandAffined::set_random_state

pub mod dictionary;
pub mod error;
pub mod harness;
pub mod rand_affine;
pub mod sample;

pub use dictionary::{RandAffined, RandAffinedConfig};
pub use error::{Result, TransformError};
pub use rand_affine::{Affine, AffineParamRanges, AffineParams, RandAffine, RandAffineConfig};
pub use sample::{Sample, Value};

pub use medaug_core::{InterpMode, PaddingMode};
