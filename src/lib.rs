//! Fraud Detection App Library
//!
//! Scores a single credit card transaction with a pre-trained classifier
//! and serves the verdict through a browser form and a JSON endpoint.

pub mod config;
pub mod error;
pub mod models;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use error::{ArtifactLoadError, EvaluationError};
pub use models::{Classification, Classifier, ModelLoader, OnnxClassifier, TransactionEvaluator};
pub use types::{EvaluationReport, EvaluationResult, TransactionRecord};
