//! Error types for artifact loading and transaction evaluation

use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring the classifier artifact into memory.
///
/// Always fatal: the app has nothing to serve without its model.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    /// No file at the configured path
    #[error("model artifact not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// File exists but could not be read
    #[error("failed to read model artifact {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ONNX Runtime could not be initialized or configured
    #[error("ONNX runtime error: {0}")]
    Runtime(String),

    /// Bytes could not be decoded as a model (corrupt file, opset/version mismatch)
    #[error("failed to decode model artifact {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Graph decoded but does not expose the inputs/outputs we need
    #[error("model artifact {} has no {what}", path.display())]
    MissingOutput { path: PathBuf, what: &'static str },
}

/// Failure of a single evaluation. Recoverable: surfaced to the user, who may retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a number: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("field `{0}` must be a finite number")]
    NonFiniteValue(&'static str),

    /// Finite as `f64` but too large for the model's `f32` input
    #[error("field `{0}` is out of range for the model")]
    OutOfRange(&'static str),

    #[error("field `{field}` must be a whole number, got {value:?}")]
    NotWholeNumber { field: &'static str, value: String },

    #[error("model expects {expected} features but the record has {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("model returned unexpected label {0}")]
    UnexpectedLabel(i64),

    #[error("model returned invalid fraud probability {0}")]
    InvalidProbability(f64),

    #[error("model inference failed: {0}")]
    Model(String),
}

impl EvaluationError {
    /// Message shown to the user in place of a verdict.
    pub fn user_message(&self) -> String {
        format!(
            "Error: {}. Please ensure all required inputs are provided.",
            self
        )
    }
}
