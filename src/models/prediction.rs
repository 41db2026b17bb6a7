//! Prediction request/response model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::pipeline::PipelineError;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(
        length(equal = 18, message = "Input data must contain exactly 18 values"),
        custom(function = "validate_finite")
    )]
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Vec<f64>,
}

fn validate_finite(data: &[f64]) -> Result<(), ValidationError> {
    if data.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    let mut err = ValidationError::new("finite");
    err.message = Some("Input data must contain only finite values".into());
    Err(err)
}

/// A caller-supplied input that passed boundary validation
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<PredictRequest> for FeatureVector {
    type Error = PipelineError;

    fn try_from(req: PredictRequest) -> Result<Self, Self::Error> {
        req.validate().map_err(first_message)?;
        Ok(Self(req.data))
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = PipelineError;

    fn try_from(data: Vec<f64>) -> Result<Self, Self::Error> {
        PredictRequest { data }.try_into()
    }
}

fn first_message(errors: ValidationErrors) -> PipelineError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .next()
        .map(|e| match &e.message {
            Some(msg) => msg.to_string(),
            None => format!("Invalid input: {}", e.code),
        })
        .unwrap_or_else(|| "Invalid input".to_string());

    PipelineError::Validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<FeatureVector, PipelineError>) -> String {
        match result {
            Err(PipelineError::Validation(msg)) => msg,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_eighteen_values() {
        let values: Vec<f64> = (1..=18).map(|i| i as f64 / 10.0).collect();
        let features = FeatureVector::try_from(values.clone()).unwrap();
        assert_eq!(features.as_slice(), values.as_slice());
    }

    #[test]
    fn test_rejects_short_input() {
        assert_eq!(
            message(FeatureVector::try_from(vec![1.0, 2.0])),
            "Input data must contain exactly 18 values"
        );
    }

    #[test]
    fn test_rejects_long_input() {
        assert_eq!(
            message(FeatureVector::try_from(vec![0.0; 19])),
            "Input data must contain exactly 18 values"
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut values = vec![0.5; 18];
        values[7] = f64::INFINITY;
        assert_eq!(
            message(FeatureVector::try_from(values)),
            "Input data must contain only finite values"
        );

        let mut values = vec![0.5; 18];
        values[0] = f64::NAN;
        assert!(message(FeatureVector::try_from(values)).contains("finite"));
    }

    #[test]
    fn test_request_deserializes() {
        let req: PredictRequest = serde_json::from_str(r#"{"data": [1, 2.5]}"#).unwrap();
        assert_eq!(req.data, vec![1.0, 2.5]);
    }

    #[test]
    fn test_response_shape() {
        let body = serde_json::to_value(PredictResponse { prediction: vec![1.5] }).unwrap();
        assert_eq!(body, serde_json::json!({"prediction": [1.5]}));
    }
}
