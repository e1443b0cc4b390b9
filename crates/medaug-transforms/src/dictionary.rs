//! Dictionary-based randomized affine transform.
//!
//! [`RandAffined`] applies one randomized affine draw to every configured
//! field of a [`Sample`], so paired image/segmentation fields stay aligned,
//! while each field keeps its own interpolation mode.

use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};

use medaug_core::{InterpMode, PaddingMode};

use crate::error::{Result, TransformError};
use crate::rand_affine::{resample_value, AffineParamRanges, RandAffine, RandAffineConfig};
use crate::sample::Sample;

/// Configuration for [`RandAffined`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandAffinedConfig {
    /// Fields the transform applies to; other fields pass through unchanged.
    pub keys: Vec<String>,
    /// Interpolation mode per key. Empty defaults every key to bilinear; a
    /// single entry broadcasts to all keys.
    pub modes: Vec<InterpMode>,
    pub prob: f64,
    pub ranges: AffineParamRanges,
    pub spatial_size: Vec<usize>,
    pub padding: PaddingMode,
    /// Emit device tensors when true, host arrays otherwise.
    pub as_tensor_output: bool,
}

impl RandAffinedConfig {
    pub fn new<K: Into<String>>(
        keys: impl IntoIterator<Item = K>,
        spatial_size: impl Into<Vec<usize>>,
    ) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            modes: Vec::new(),
            prob: 0.1,
            ranges: AffineParamRanges::default(),
            spatial_size: spatial_size.into(),
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

    /// Use the same interpolation mode for every key.
    pub fn with_mode(mut self, mode: InterpMode) -> Self {
        self.modes = vec![mode];
        self
    }

    /// Use one interpolation mode per key, in key order.
    pub fn with_modes(mut self, modes: impl Into<Vec<InterpMode>>) -> Self {
        self.modes = modes.into();
        self
    }

    pub fn with_as_tensor_output(mut self, as_tensor_output: bool) -> Self {
        self.as_tensor_output = as_tensor_output;
        self
    }
}

/// Dictionary version of [`RandAffine`].
pub struct RandAffined<B: Backend> {
    keys: Vec<String>,
    modes: Vec<InterpMode>,
    as_tensor_output: bool,
    rand_affine: RandAffine<B>,
}

impl<B: Backend> RandAffined<B> {
    pub fn new(config: RandAffinedConfig, device: &B::Device) -> Result<Self> {
        if config.keys.is_empty() {
            return Err(TransformError::invalid_configuration(
                "at least one key is required",
            ));
        }
        let modes = match config.modes.len() {
            0 => vec![InterpMode::default(); config.keys.len()],
            1 => vec![config.modes[0]; config.keys.len()],
            n if n == config.keys.len() => config.modes.clone(),
            n => {
                return Err(TransformError::invalid_configuration(format!(
                    "got {} modes for {} keys",
                    n,
                    config.keys.len()
                )))
            }
        };

        let inner = RandAffineConfig {
            prob: config.prob,
            ranges: config.ranges,
            spatial_size: config.spatial_size,
            mode: InterpMode::default(),
            padding: config.padding,
            as_tensor_output: config.as_tensor_output,
        };
        Ok(Self {
            keys: config.keys,
            modes,
            as_tensor_output: config.as_tensor_output,
            rand_affine: RandAffine::new(inner, device)?,
        })
    }

    /// Seed every internal random stream with the same seed.
    pub fn set_random_state(mut self, seed: u32) -> Self {
        self.rand_affine = self.rand_affine.set_random_state(seed);
        self
    }

    /// Apply one randomized draw to every configured key.
    ///
    /// All keys share a single sampling grid, so paired fields receive the
    /// same geometric transform; only the interpolation mode differs per key.
    /// Fields not listed in `keys` are passed through unchanged.
    pub fn apply(&mut self, sample: &Sample<B>) -> Result<Sample<B>> {
        self.rand_affine.randomize();
        let grid = self.rand_affine.current_grid()?;

        let mut out = Sample::new();
        for (key, mode) in self.keys.iter().zip(self.modes.iter()) {
            let value = sample
                .get(key)
                .ok_or_else(|| TransformError::missing_key(key.clone()))?;
            let resampled = resample_value(
                value,
                &grid,
                self.rand_affine.spatial_size(),
                *mode,
                self.rand_affine.padding(),
                self.as_tensor_output,
                self.rand_affine.device(),
            )?;
            tracing::trace!(key = key.as_str(), mode = ?mode, "resampled field");
            out.insert(key.clone(), resampled);
        }
        for (key, value) in sample {
            if !out.contains_key(key) {
                out.insert(key.clone(), value.clone());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Value;
    use burn::tensor::{Shape, Tensor, TensorData};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;
    type Device = <TestBackend as Backend>::Device;

    fn ones_sample(device: &Device) -> Sample<TestBackend> {
        let mut sample = Sample::new();
        for key in ["img", "seg"] {
            sample.insert(
                key.to_string(),
                Value::Tensor2(Tensor::<TestBackend, 3>::ones([3, 3, 3], device)),
            );
        }
        sample
    }

    #[test]
    fn test_missing_key_errors() {
        let device = Default::default();
        let config = RandAffinedConfig::new(["img", "label"], [2, 2]);
        let mut transform = RandAffined::<TestBackend>::new(config, &device)
            .unwrap()
            .set_random_state(123);

        let err = transform.apply(&ones_sample(&device)).unwrap_err();
        assert!(matches!(err, TransformError::MissingKey(k) if k == "label"));
    }

    #[test]
    fn test_mode_arity_mismatch_rejected() {
        let device: Device = Default::default();
        let config = RandAffinedConfig::new(["img", "seg"], [2, 2]).with_modes([
            InterpMode::Bilinear,
            InterpMode::Nearest,
            InterpMode::Nearest,
        ]);
        assert!(RandAffined::<TestBackend>::new(config, &device).is_err());
    }

    #[test]
    fn test_single_mode_broadcasts() {
        let device: Device = Default::default();
        let config =
            RandAffinedConfig::new(["img", "seg"], [2, 2]).with_mode(InterpMode::Nearest);
        let transform = RandAffined::<TestBackend>::new(config, &device).unwrap();
        assert_eq!(transform.modes, vec![InterpMode::Nearest; 2]);
    }

    #[test]
    fn test_unlisted_keys_pass_through() {
        let device = Default::default();
        let config = RandAffinedConfig::new(["img"], [2, 2]);
        let mut transform = RandAffined::<TestBackend>::new(config, &device)
            .unwrap()
            .set_random_state(123);

        let mut sample = ones_sample(&device);
        sample.insert(
            "meta".to_string(),
            Value::Array(TensorData::new(vec![42.0f32], Shape::new([1, 1, 1]))),
        );

        let out = transform.apply(&sample).unwrap();
        assert_eq!(out["img"].shape(), vec![3, 2, 2]);
        // untouched fields keep their original shape and contents
        assert_eq!(out["seg"].shape(), vec![3, 3, 3]);
        let meta = out["meta"].to_data();
        assert_eq!(meta.as_slice::<f32>().unwrap(), &[42.0]);
    }

    #[test]
    fn test_empty_keys_rejected() {
        let device: Device = Default::default();
        let config = RandAffinedConfig::new(Vec::<String>::new(), [2, 2]);
        assert!(RandAffined::<TestBackend>::new(config, &device).is_err());
    }
}
