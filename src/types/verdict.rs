//! Evaluation outcome and its user-facing rendering

use crate::types::transaction::TransactionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classifier verdict for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Model label == 1
    pub is_fraud: bool,
    /// P(fraudulent), in [0, 1]
    pub fraud_probability: f64,
}

impl EvaluationResult {
    /// Probability (in percent) of the predicted class.
    pub fn confidence_percent(&self) -> f64 {
        let fraud_pct = self.fraud_probability * 100.0;
        if self.is_fraud {
            fraud_pct
        } else {
            100.0 - fraud_pct
        }
    }

    /// Verdict line shown to the user
    pub fn message(&self) -> String {
        if self.is_fraud {
            format!(
                "⚠️ Fraudulent Transaction Detected! (Probability: {:.2}%)",
                self.confidence_percent()
            )
        } else {
            format!(
                "✔️ Transaction is Legitimate. (Probability: {:.2}%)",
                self.confidence_percent()
            )
        }
    }
}

/// JSON response for a single evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unique evaluation identifier
    pub evaluation_id: String,
    pub evaluated_at: DateTime<Utc>,
    pub is_fraud: bool,
    pub fraud_probability: f64,
    pub message: String,
    /// The record exactly as it was handed to the model
    pub record: TransactionRecord,
}

impl EvaluationReport {
    pub fn new(result: EvaluationResult, record: TransactionRecord) -> Self {
        Self {
            evaluation_id: uuid::Uuid::new_v4().to_string(),
            evaluated_at: Utc::now(),
            is_fraud: result.is_fraud,
            fraud_probability: result.fraud_probability,
            message: result.message(),
            record,
        }
    }

    pub fn result(&self) -> EvaluationResult {
        EvaluationResult {
            is_fraud: self.is_fraud,
            fraud_probability: self.fraud_probability,
        }
    }
}
