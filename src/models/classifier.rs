//! Classifier seam between the evaluator and a concrete model runtime

use crate::error::EvaluationError;

/// Label and class probabilities for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: i64,
    /// `[P(legitimate), P(fraudulent)]`
    pub probabilities: [f64; 2],
}

/// A trained binary classifier over one feature row.
///
/// Implementations are loaded once and only read afterwards, so every
/// method takes `&self`.
pub trait Classifier: Send + Sync {
    /// Model name (for logging)
    fn name(&self) -> &str;

    /// Input width declared by the model, if it is fixed.
    fn input_width(&self) -> Option<usize> {
        None
    }

    /// Class label for the row: 0 = legitimate, 1 = fraudulent.
    fn predict(&self, features: &[f32]) -> Result<i64, EvaluationError>;

    /// Class probabilities for the row: `[P(legitimate), P(fraudulent)]`.
    fn predict_proba(&self, features: &[f32]) -> Result<[f64; 2], EvaluationError>;

    /// Label and probabilities together.
    ///
    /// Runtimes that produce both from one pass should override this.
    fn classify(&self, features: &[f32]) -> Result<Classification, EvaluationError> {
        Ok(Classification {
            label: self.predict(features)?,
            probabilities: self.predict_proba(features)?,
        })
    }
}
