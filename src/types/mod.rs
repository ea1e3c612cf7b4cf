//! Type definitions for the fraud detection app

pub mod transaction;
pub mod verdict;

pub use transaction::{TransactionRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use verdict::{EvaluationReport, EvaluationResult};
