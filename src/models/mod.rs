//! Classifier loading and transaction evaluation

pub mod classifier;
pub mod evaluator;
pub mod inference;
pub mod loader;

pub use classifier::{Classification, Classifier};
pub use evaluator::TransactionEvaluator;
pub use inference::OnnxClassifier;
pub use loader::ModelLoader;
