//! Prediction Pipeline
//!
//! validate → load reference data → fit scaler → normalize → infer → denormalize
//!
//! Normalization bounds are refitted from the reference file on every call,
//! so two requests may see different bounds if the file changes in between.

pub mod inference;
pub mod reference;
pub mod scaler;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::models::FeatureVector;

pub use inference::{InferenceEngine, OnnxEngine};
pub use reference::ReferenceDataset;
pub use scaler::MinMaxScaler;

/// Width of the model input
pub const FEATURE_COUNT: usize = 18;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    DataAccess(String),

    #[error("{0}")]
    Inference(String),
}

#[derive(Clone)]
pub struct Pipeline {
    engine: Arc<dyn InferenceEngine>,
    reference_path: PathBuf,
}

impl Pipeline {
    pub fn new(engine: Arc<dyn InferenceEngine>, reference_path: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            reference_path: reference_path.into(),
        }
    }

    /// Run one feature vector through the model and return it in physical units
    pub fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, PipelineError> {
        let reference = ReferenceDataset::load(&self.reference_path, FEATURE_COUNT)?;
        let scaler = MinMaxScaler::fit(reference.rows.view())?;

        let normalized: Vec<f32> = scaler
            .transform(features.as_slice())?
            .into_iter()
            .map(|v| v as f32)
            .collect();

        let raw = self.engine.predict(&normalized)?;
        tracing::debug!("Model {} returned {} values", self.engine.name(), raw.len());

        let raw: Vec<f64> = raw.into_iter().map(f64::from).collect();
        scaler.inverse_transform(&raw)
    }
}
