pub mod affine;
pub mod grid;
pub mod interpolation;
pub mod resample;
pub mod rng;

pub use grid::{create_grid, transform_grid};
pub use interpolation::{InterpMode, Interpolator, PaddingMode};
pub use resample::GridResampler;
pub use rng::RandomState;
