//! Transform verification harness.
//!
//! Drives a configured [`RandAffined`] against a fixed input sample and
//! compares the result with precomputed expectations: first the
//! tensor-vs-array classification of every field, then elementwise numeric
//! agreement within `|a - b| <= ATOL + RTOL * |b|`.

use std::collections::HashMap;

use burn::tensor::backend::Backend;
use thiserror::Error;

use crate::dictionary::{RandAffined, RandAffinedConfig};
use crate::error::TransformError;
use crate::sample::{Sample, Value};

/// Relative tolerance for numeric comparison.
pub const RTOL: f64 = 1e-4;
/// Absolute tolerance for numeric comparison.
pub const ATOL: f64 = 1e-4;

/// Expected output of a case: one value for every configured key, or a
/// per-key map.
pub enum Expected<B: Backend> {
    Single(Value<B>),
    PerKey(HashMap<String, Value<B>>),
}

impl<B: Backend> Expected<B> {
    fn for_key(&self, key: &str) -> Option<&Value<B>> {
        match self {
            Self::Single(v) => Some(v),
            Self::PerKey(map) => map.get(key),
        }
    }
}

/// One verification case: a configuration, the seed, the input sample and
/// the expected output.
pub struct TransformCase<B: Backend> {
    pub config: RandAffinedConfig,
    pub seed: u32,
    pub input: Sample<B>,
    pub expected: Expected<B>,
}

/// Verification failure.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("field {key}: expected {expected} output, got {actual}")]
    Classification {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field {key}: shape mismatch: expected {expected:?}, got {actual:?}")]
    Shape {
        key: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error(
        "field {key}: value {actual} at index {index} deviates from {expected} by {deviation}"
    )]
    Tolerance {
        key: String,
        index: usize,
        expected: f64,
        actual: f64,
        deviation: f64,
    },

    #[error("field {key}: no expectation provided")]
    MissingExpectation { key: String },

    #[error("field {key}: {message}")]
    Data { key: String, message: String },
}

fn classification<B: Backend>(value: &Value<B>) -> &'static str {
    if value.is_tensor() {
        "tensor"
    } else {
        "array"
    }
}

fn check_value<B: Backend>(
    key: &str,
    actual: &Value<B>,
    expected: &Value<B>,
) -> Result<(), VerifyError> {
    if actual.is_tensor() != expected.is_tensor() {
        return Err(VerifyError::Classification {
            key: key.to_string(),
            expected: classification(expected),
            actual: classification(actual),
        });
    }
    if actual.shape() != expected.shape() {
        return Err(VerifyError::Shape {
            key: key.to_string(),
            expected: expected.shape(),
            actual: actual.shape(),
        });
    }

    let a = actual.to_data().convert::<f32>();
    let e = expected.to_data().convert::<f32>();
    let a = a.as_slice::<f32>().map_err(|err| VerifyError::Data {
        key: key.to_string(),
        message: format!("{err:?}"),
    })?;
    let e = e.as_slice::<f32>().map_err(|err| VerifyError::Data {
        key: key.to_string(),
        message: format!("{err:?}"),
    })?;

    for (index, (&av, &ev)) in a.iter().zip(e.iter()).enumerate() {
        let deviation = (av as f64 - ev as f64).abs();
        if deviation > ATOL + RTOL * (ev as f64).abs() {
            return Err(VerifyError::Tolerance {
                key: key.to_string(),
                index,
                expected: ev as f64,
                actual: av as f64,
                deviation,
            });
        }
    }
    Ok(())
}

/// Run one verification case.
///
/// Instantiates the transform, seeds it, applies it, and checks every
/// configured key. The first failing check is returned; there are no
/// retries.
pub fn run_case<B: Backend>(case: &TransformCase<B>, device: &B::Device) -> Result<(), VerifyError> {
    let mut transform =
        RandAffined::<B>::new(case.config.clone(), device)?.set_random_state(case.seed);
    let result = transform.apply(&case.input)?;

    for key in &case.config.keys {
        let actual = result
            .get(key)
            .ok_or_else(|| TransformError::missing_key(key.clone()))?;
        let expected = case
            .expected
            .for_key(key)
            .ok_or_else(|| VerifyError::MissingExpectation { key: key.clone() })?;
        check_value(key, actual, expected)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::{Shape, Tensor, TensorData};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn ones_case(as_tensor_output: bool, expected: Expected<TestBackend>) -> TransformCase<TestBackend> {
        let device = Default::default();
        let mut input = Sample::new();
        for key in ["img", "seg"] {
            input.insert(
                key.to_string(),
                Value::Tensor2(Tensor::<TestBackend, 3>::ones([3, 3, 3], &device)),
            );
        }
        TransformCase {
            config: RandAffinedConfig::new(["img", "seg"], [2, 2])
                .with_as_tensor_output(as_tensor_output),
            seed: 123,
            input,
            expected,
        }
    }

    #[test]
    fn test_classification_mismatch_detected() {
        let device = Default::default();
        // Transform emits host arrays; expectation demands tensors.
        let expected = Expected::Single(Value::Tensor2(Tensor::<TestBackend, 3>::ones(
            [3, 2, 2],
            &device,
        )));
        let case = ones_case(false, expected);
        let err = run_case(&case, &device).unwrap_err();
        assert!(matches!(err, VerifyError::Classification { .. }));
    }

    #[test]
    fn test_tolerance_violation_reports_field() {
        let device = Default::default();
        let mut bad = vec![1.0f32; 12];
        bad[5] = 2.0;
        let expected = Expected::Single(Value::Array(TensorData::new(bad, Shape::new([3, 2, 2]))));
        let case = ones_case(false, expected);
        let err = run_case(&case, &device).unwrap_err();
        match err {
            VerifyError::Tolerance { index, .. } => assert_eq!(index, 5),
            other => panic!("expected tolerance error, got {other}"),
        }
    }

    #[test]
    fn test_shape_mismatch_detected() {
        let device = Default::default();
        let expected = Expected::Single(Value::Array(TensorData::new(
            vec![1.0f32; 8],
            Shape::new([2, 2, 2]),
        )));
        let case = ones_case(false, expected);
        let err = run_case(&case, &device).unwrap_err();
        assert!(matches!(err, VerifyError::Shape { .. }));
    }

    #[test]
    fn test_passing_case() {
        let device = Default::default();
        let expected = Expected::Single(Value::Array(TensorData::new(
            vec![1.0f32; 12],
            Shape::new([3, 2, 2]),
        )));
        let case = ones_case(false, expected);
        run_case(&case, &device).unwrap();
    }
}
