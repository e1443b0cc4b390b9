//! Interpolation types and operations.
//!
//! This module provides interpolation traits and implementations
//! for sampling values at continuous coordinates.

pub mod linear;
pub mod nearest;
pub mod trait_;

pub use linear::LinearInterpolator;
pub use nearest::NearestInterpolator;
pub use trait_::Interpolator;

use serde::{Deserialize, Serialize};

/// Interpolation mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpMode {
    /// Linear interpolation (bilinear in 2D, trilinear in 3D).
    Bilinear,
    /// Nearest-neighbor interpolation.
    Nearest,
}

impl Default for InterpMode {
    fn default() -> Self {
        Self::Bilinear
    }
}

/// Behavior for samples that fall outside the input extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddingMode {
    /// Out-of-bounds samples contribute zero.
    Zeros,
    /// Out-of-bounds samples clamp to the nearest edge value.
    Border,
}

impl Default for PaddingMode {
    fn default() -> Self {
        Self::Zeros
    }
}
