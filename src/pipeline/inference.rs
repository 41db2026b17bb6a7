//! Inference Engine - ONNX Runtime Integration
//!
//! The graph is loaded once at startup and shared read-only by every
//! request. The trait keeps the pipeline independent of the runtime.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use parking_lot::Mutex;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;

use super::PipelineError;

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// One vector in, one vector out
pub trait InferenceEngine: Send + Sync {
    fn predict(&self, input: &[f32]) -> Result<Vec<f32>, PipelineError>;
    fn name(&self) -> &str;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxEngine {
    // `Session::run` needs `&mut`
    session: Mutex<Session>,
    model_path: PathBuf,
}

impl OnnxEngine {
    /// Load the ONNX graph from disk
    pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(PipelineError::Inference(format!(
                "Model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| PipelineError::Inference(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| PipelineError::Inference(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| PipelineError::Inference(format!("Failed to load model: {}", e)))?;

        tracing::info!(
            "ONNX model loaded successfully ({} inputs, {} outputs)",
            session.inputs.len(),
            session.outputs.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
        })
    }
}

impl InferenceEngine for OnnxEngine {
    fn predict(&self, input: &[f32]) -> Result<Vec<f32>, PipelineError> {
        let start_time = std::time::Instant::now();

        let input_array = Array2::<f32>::from_shape_vec((1, input.len()), input.to_vec())
            .map_err(|e| PipelineError::Inference(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| PipelineError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();

        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| PipelineError::Inference("No output defined".to_string()))?;

        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| PipelineError::Inference(format!("Inference failed: {}", e)))?;

        let output = outputs.get(&output_name)
            .ok_or_else(|| PipelineError::Inference("No output".to_string()))?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| PipelineError::Inference(format!("Extract error: {}", e)))?;

        tracing::debug!(
            "Inference produced {} values in {}us",
            data.len(),
            start_time.elapsed().as_micros()
        );

        Ok(data.to_vec())
    }

    fn name(&self) -> &str {
        self.model_path.to_str().unwrap_or("<non-utf8 path>")
    }
}
