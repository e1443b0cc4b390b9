//! Affine augmentation transforms.
//!
//! [`Affine`] applies explicitly given parameters; [`RandAffine`] samples
//! them uniformly from configured ranges with a probability gate. Both build
//! a pixel-centered sampling grid, push it through the composed matrix
//! (rotation, shear, translation, scale, in that order) and resample the
//! input against it.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

use medaug_core::interpolation::{LinearInterpolator, NearestInterpolator};
use medaug_core::{affine, create_grid, transform_grid};
use medaug_core::{GridResampler, InterpMode, PaddingMode, RandomState};

use crate::error::{Result, TransformError};
use crate::sample::Value;

/// Uniform sampling ranges for each parameter group.
///
/// Each entry `f` draws one parameter from `[-f, f)` (scale draws are offset
/// by `+1`); parameter positions beyond the configured entries stay at their
/// identity value. Empty groups skip their matrix factor entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffineParamRanges {
    pub rotate: Vec<f64>,
    pub shear: Vec<f64>,
    pub translate: Vec<f64>,
    pub scale: Vec<f64>,
}

/// One concrete set of affine parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffineParams {
    pub rotate: Vec<f64>,
    pub shear: Vec<f64>,
    pub translate: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Randomized affine grid factory.
///
/// Owns the parameter stream; every generated grid uses a freshly drawn
/// parameter set. The draw order within a set is rotate, shear, translate,
/// scale, one uniform per configured range entry.
#[derive(Debug, Clone)]
pub struct RandAffineGrid {
    ranges: AffineParamRanges,
    rng: RandomState,
    params: AffineParams,
}

impl RandAffineGrid {
    pub fn new(ranges: AffineParamRanges) -> Self {
        Self {
            ranges,
            rng: RandomState::seed(0),
            params: AffineParams::default(),
        }
    }

    /// Reset the parameter stream to a known seed.
    pub fn set_random_state(&mut self, seed: u32) {
        self.rng.reseed(seed);
    }

    /// Draw a new parameter set from the configured ranges.
    pub fn randomize(&mut self) {
        self.params = AffineParams {
            rotate: self.ranges.rotate.iter().map(|&f| self.rng.uniform(-f, f)).collect(),
            shear: self.ranges.shear.iter().map(|&f| self.rng.uniform(-f, f)).collect(),
            translate: self
                .ranges
                .translate
                .iter()
                .map(|&f| self.rng.uniform(-f, f))
                .collect(),
            scale: self
                .ranges
                .scale
                .iter()
                .map(|&f| self.rng.uniform(-f, f) + 1.0)
                .collect(),
        };
        tracing::debug!(params = ?self.params, "sampled affine parameters");
    }

    /// The most recently drawn parameter set.
    pub fn params(&self) -> &AffineParams {
        &self.params
    }

    /// Generate a transformed sampling grid for the given output size.
    ///
    /// Draws a fresh parameter set; callers that randomize before generating
    /// therefore consume two sets and the generated grid uses the second.
    /// Seeded reproducibility contracts depend on this consumption order.
    pub fn generate<B: Backend>(
        &mut self,
        spatial_size: &[usize],
        device: &B::Device,
    ) -> Result<Tensor<B, 2>> {
        self.randomize();
        let sd = check_spatial(spatial_size)?;
        let p = &self.params;
        let matrix = affine::compose(sd, &p.rotate, &p.shear, &p.translate, &p.scale);
        Ok(transform_grid(create_grid::<B>(spatial_size, device), &matrix))
    }
}

fn check_spatial(spatial_size: &[usize]) -> Result<usize> {
    match spatial_size.len() {
        sd @ (2 | 3) => Ok(sd),
        sd => Err(TransformError::dimension_mismatch(format!(
            "spatial size must be 2D or 3D, got {sd} dims"
        ))),
    }
}

/// Resample one value against a homogeneous grid.
pub(crate) fn resample_value<B: Backend>(
    value: &Value<B>,
    grid: &Tensor<B, 2>,
    spatial_size: &[usize],
    mode: InterpMode,
    padding: PaddingMode,
    as_tensor_output: bool,
    device: &B::Device,
) -> Result<Value<B>> {
    match *spatial_size {
        [s0, s1] => {
            let data = value.to_tensor2(device)?;
            let out = match mode {
                InterpMode::Bilinear => GridResampler::new(LinearInterpolator::new())
                    .with_padding(padding)
                    .resample_2d(&data, grid, [s0, s1]),
                InterpMode::Nearest => GridResampler::new(NearestInterpolator::new())
                    .with_padding(padding)
                    .resample_2d(&data, grid, [s0, s1]),
            };
            Ok(if as_tensor_output {
                Value::Tensor2(out)
            } else {
                Value::Array(out.into_data())
            })
        }
        [s0, s1, s2] => {
            let data = value.to_tensor3(device)?;
            let out = match mode {
                InterpMode::Bilinear => GridResampler::new(LinearInterpolator::new())
                    .with_padding(padding)
                    .resample_3d(&data, grid, [s0, s1, s2]),
                InterpMode::Nearest => GridResampler::new(NearestInterpolator::new())
                    .with_padding(padding)
                    .resample_3d(&data, grid, [s0, s1, s2]),
            };
            Ok(if as_tensor_output {
                Value::Tensor3(out)
            } else {
                Value::Array(out.into_data())
            })
        }
        _ => Err(TransformError::dimension_mismatch(
            "spatial size must be 2D or 3D",
        )),
    }
}

/// Deterministic affine transform.
///
/// Applies a fixed parameter set; useful when the randomized draw should be
/// reproduced or inspected.
pub struct Affine<B: Backend> {
    params: AffineParams,
    spatial_size: Vec<usize>,
    mode: InterpMode,
    padding: PaddingMode,
    as_tensor_output: bool,
    device: B::Device,
}

impl<B: Backend> Affine<B> {
    pub fn new(
        params: AffineParams,
        spatial_size: impl Into<Vec<usize>>,
        device: &B::Device,
    ) -> Result<Self> {
        let spatial_size = spatial_size.into();
        check_spatial(&spatial_size)?;
        Ok(Self {
            params,
            spatial_size,
            mode: InterpMode::default(),
            padding: PaddingMode::default(),
            as_tensor_output: true,
            device: device.clone(),
        })
    }

    pub fn with_mode(mut self, mode: InterpMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_as_tensor_output(mut self, as_tensor_output: bool) -> Self {
        self.as_tensor_output = as_tensor_output;
        self
    }

    /// Apply the transform to a single value.
    pub fn apply(&self, value: &Value<B>) -> Result<Value<B>> {
        let sd = self.spatial_size.len();
        let p = &self.params;
        let matrix = affine::compose(sd, &p.rotate, &p.shear, &p.translate, &p.scale);
        let grid = transform_grid(create_grid::<B>(&self.spatial_size, &self.device), &matrix);
        resample_value(
            value,
            &grid,
            &self.spatial_size,
            self.mode,
            self.padding,
            self.as_tensor_output,
            &self.device,
        )
    }
}

/// Configuration for [`RandAffine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandAffineConfig {
    /// Probability that the randomized transform is applied at all; when the
    /// gate does not fire, the identity grid is used.
    pub prob: f64,
    pub ranges: AffineParamRanges,
    pub spatial_size: Vec<usize>,
    pub mode: InterpMode,
    pub padding: PaddingMode,
    pub as_tensor_output: bool,
}

impl RandAffineConfig {
    pub fn new(spatial_size: impl Into<Vec<usize>>) -> Self {
        Self {
            prob: 0.1,
            ranges: AffineParamRanges::default(),
            spatial_size: spatial_size.into(),
            mode: InterpMode::default(),
            padding: PaddingMode::default(),
            as_tensor_output: true,
        }
    }

    pub fn with_prob(mut self, prob: f64) -> Self {
        self.prob = prob;
        self
    }

    pub fn with_rotate_range(mut self, range: impl Into<Vec<f64>>) -> Self {
        self.ranges.rotate = range.into();
        self
    }

    pub fn with_shear_range(mut self, range: impl Into<Vec<f64>>) -> Self {
        self.ranges.shear = range.into();
        self
    }

    pub fn with_translate_range(mut self, range: impl Into<Vec<f64>>) -> Self {
        self.ranges.translate = range.into();
        self
    }

    pub fn with_scale_range(mut self, range: impl Into<Vec<f64>>) -> Self {
        self.ranges.scale = range.into();
        self
    }

    pub fn with_mode(mut self, mode: InterpMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_as_tensor_output(mut self, as_tensor_output: bool) -> Self {
        self.as_tensor_output = as_tensor_output;
        self
    }
}

/// Randomized affine transform for a single value.
pub struct RandAffine<B: Backend> {
    prob: f64,
    gate: RandomState,
    grid: RandAffineGrid,
    spatial_size: Vec<usize>,
    mode: InterpMode,
    padding: PaddingMode,
    as_tensor_output: bool,
    do_transform: bool,
    device: B::Device,
}

impl<B: Backend> RandAffine<B> {
    pub fn new(config: RandAffineConfig, device: &B::Device) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.prob) {
            return Err(TransformError::invalid_configuration(format!(
                "prob must be within [0, 1], got {}",
                config.prob
            )));
        }
        check_spatial(&config.spatial_size)?;
        Ok(Self {
            prob: config.prob,
            gate: RandomState::seed(0),
            grid: RandAffineGrid::new(config.ranges),
            spatial_size: config.spatial_size,
            mode: config.mode,
            padding: config.padding,
            as_tensor_output: config.as_tensor_output,
            do_transform: false,
            device: device.clone(),
        })
    }

    /// Seed both the gating stream and the parameter stream.
    pub fn set_random_state(mut self, seed: u32) -> Self {
        self.gate.reseed(seed);
        self.grid.set_random_state(seed);
        self
    }

    /// Draw the gate and a parameter set.
    pub fn randomize(&mut self) {
        self.do_transform = self.gate.random_sample() < self.prob;
        self.grid.randomize();
    }

    /// The grid for the current draw: transformed when the gate fired,
    /// identity otherwise.
    pub(crate) fn current_grid(&mut self) -> Result<Tensor<B, 2>> {
        if self.do_transform {
            self.grid.generate(&self.spatial_size, &self.device)
        } else {
            Ok(create_grid::<B>(&self.spatial_size, &self.device))
        }
    }

    pub(crate) fn spatial_size(&self) -> &[usize] {
        &self.spatial_size
    }

    pub(crate) fn padding(&self) -> PaddingMode {
        self.padding
    }

    pub(crate) fn device(&self) -> &B::Device {
        &self.device
    }

    /// Apply to a single value, drawing fresh random parameters.
    pub fn apply(&mut self, value: &Value<B>) -> Result<Value<B>> {
        self.randomize();
        let grid = self.current_grid()?;
        resample_value(
            value,
            &grid,
            &self.spatial_size,
            self.mode,
            self.padding,
            self.as_tensor_output,
            &self.device,
        )
    }
}
