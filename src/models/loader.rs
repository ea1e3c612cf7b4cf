//! ONNX model loader

use crate::error::ArtifactLoadError;
use crate::models::inference::OnnxClassifier;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::ValueType;
use std::path::Path;
use tracing::info;

/// Loader for the classifier artifact
#[derive(Debug, Clone)]
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

fn runtime_error<E: std::fmt::Display>(e: E) -> ArtifactLoadError {
    ArtifactLoadError::Runtime(e.to_string())
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier from an ONNX file.
    ///
    /// The file is read before ONNX Runtime is touched, so a missing or
    /// unreadable artifact is reported as such rather than as a runtime error.
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<OnnxClassifier, ArtifactLoadError> {
        let path = path.as_ref();
        let bytes = read_artifact(path)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        ort::init().commit().map_err(runtime_error)?;

        let session = Session::builder()
            .map_err(runtime_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(runtime_error)?
            .with_intra_threads(self.onnx_threads)
            .map_err(runtime_error)?
            .commit_from_memory(&bytes)
            .map_err(|e| ArtifactLoadError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let missing = |what| ArtifactLoadError::MissingOutput {
            path: path.to_path_buf(),
            what,
        };

        let input = session.inputs.first().ok_or_else(|| missing("inputs"))?;
        let input_name = input.name.clone();
        let input_width = match &input.input_type {
            ValueType::Tensor { shape, .. } => shape
                .last()
                .copied()
                .filter(|&d| d > 0)
                .map(|d| d as usize),
            _ => None,
        };

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone())
            .ok_or_else(|| missing("label output"))?;

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.iter().rev().find(|o| o.name != label_output))
            .map(|o| o.name.clone())
            .ok_or_else(|| missing("probability output"))?;

        info!(
            model = %name,
            input = %input_name,
            input_width = ?input_width,
            label = %label_output,
            probability = %probability_output,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier::new(
            name,
            session,
            input_name,
            label_output,
            probability_output,
            input_width,
        ))
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactLoadError> {
    std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ArtifactLoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ArtifactLoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })
}
