//! Transaction evaluation against the loaded classifier

use crate::error::EvaluationError;
use crate::models::classifier::{Classification, Classifier};
use crate::types::transaction::TransactionRecord;
use crate::types::verdict::EvaluationResult;
use tracing::debug;

/// Evaluates transactions with a classifier fixed at construction.
pub struct TransactionEvaluator<C> {
    classifier: C,
}

impl<C: Classifier> TransactionEvaluator<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Classify one record.
    ///
    /// The verdict is the model's own label; the probability is its P(fraud).
    pub fn evaluate(&self, record: &TransactionRecord) -> Result<EvaluationResult, EvaluationError> {
        let features = record.to_features()?;

        if let Some(expected) = self.classifier.input_width() {
            if expected != features.len() {
                return Err(EvaluationError::ShapeMismatch {
                    expected,
                    found: features.len(),
                });
            }
        }

        let Classification {
            label,
            probabilities: [_, fraud_probability],
        } = self.classifier.classify(&features)?;

        let is_fraud = match label {
            0 => false,
            1 => true,
            other => return Err(EvaluationError::UnexpectedLabel(other)),
        };

        if !(0.0..=1.0).contains(&fraud_probability) {
            return Err(EvaluationError::InvalidProbability(fraud_probability));
        }

        debug!(
            model = %self.classifier.name(),
            is_fraud = is_fraud,
            fraud_probability = fraud_probability,
            "Transaction evaluated"
        );

        Ok(EvaluationResult {
            is_fraud,
            fraud_probability,
        })
    }

    /// Build a record from named columns in any order, then classify it.
    pub fn evaluate_named<I, K>(
        &self,
        fields: I,
    ) -> Result<(TransactionRecord, EvaluationResult), EvaluationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let record = TransactionRecord::from_named(fields)?;
        let result = self.evaluate(&record)?;
        Ok((record, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::{FEATURE_COUNT, FEATURE_NAMES};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns a fixed label/probability and records every row it sees.
    struct StubClassifier {
        label: i64,
        fraud_probability: f64,
        width: Option<usize>,
        seen: Mutex<Vec<Vec<f32>>>,
    }

    impl StubClassifier {
        fn new(label: i64, fraud_probability: f64) -> Self {
            Self {
                label,
                fraud_probability,
                width: Some(FEATURE_COUNT),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Classifier for StubClassifier {
        fn name(&self) -> &str {
            "stub"
        }

        fn input_width(&self) -> Option<usize> {
            self.width
        }

        fn predict(&self, features: &[f32]) -> Result<i64, EvaluationError> {
            self.seen.lock().unwrap().push(features.to_vec());
            Ok(self.label)
        }

        fn predict_proba(&self, _features: &[f32]) -> Result<[f64; 2], EvaluationError> {
            Ok([1.0 - self.fraud_probability, self.fraud_probability])
        }
    }

    /// Scores rows by their Amount column, label follows a 0.5 cut.
    struct AmountClassifier;

    impl Classifier for AmountClassifier {
        fn name(&self) -> &str {
            "amount"
        }

        fn predict(&self, features: &[f32]) -> Result<i64, EvaluationError> {
            let [_, fraud] = self.predict_proba(features)?;
            Ok(i64::from(fraud >= 0.5))
        }

        fn predict_proba(&self, features: &[f32]) -> Result<[f64; 2], EvaluationError> {
            let amount = *features
                .get(29)
                .ok_or(EvaluationError::ShapeMismatch {
                    expected: FEATURE_COUNT,
                    found: features.len(),
                })? as f64;
            let fraud = (amount / 1000.0).clamp(0.0, 1.0);
            Ok([1.0 - fraud, fraud])
        }
    }

    /// Answers only through the combined path and counts the calls.
    #[derive(Default)]
    struct SinglePassClassifier {
        calls: AtomicUsize,
    }

    impl Classifier for SinglePassClassifier {
        fn name(&self) -> &str {
            "single_pass"
        }

        fn predict(&self, _features: &[f32]) -> Result<i64, EvaluationError> {
            Err(EvaluationError::Model("predict called separately".to_string()))
        }

        fn predict_proba(&self, _features: &[f32]) -> Result<[f64; 2], EvaluationError> {
            Err(EvaluationError::Model("predict_proba called separately".to_string()))
        }

        fn classify(&self, _features: &[f32]) -> Result<Classification, EvaluationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Classification {
                label: 1,
                probabilities: [0.25, 0.75],
            })
        }
    }

    fn record_with_amount(amount: f64) -> TransactionRecord {
        let mut values = [0.0; FEATURE_COUNT];
        values[29] = amount;
        values[31] = 3.0;
        TransactionRecord::from_array(values)
    }

    #[test]
    fn test_fraud_verdict() {
        let evaluator = TransactionEvaluator::new(StubClassifier::new(1, 0.87));
        let result = evaluator.evaluate(&record_with_amount(10.0)).unwrap();

        assert!(result.is_fraud);
        assert_eq!(result.fraud_probability, 0.87);
        assert!(result.message().contains("87.00%"));
    }

    #[test]
    fn test_legitimate_verdict() {
        let evaluator = TransactionEvaluator::new(StubClassifier::new(0, 0.10));
        let result = evaluator.evaluate(&record_with_amount(10.0)).unwrap();

        assert!(!result.is_fraud);
        assert_eq!(result.fraud_probability, 0.10);
        assert!(result.message().contains("90.00%"));
    }

    #[test]
    fn test_label_drives_verdict_and_probability_in_range() {
        let evaluator = TransactionEvaluator::new(AmountClassifier);

        for amount in [0.0, 1.5, 250.0, 499.99, 500.0, 999.0, 25_000.0] {
            let result = evaluator.evaluate(&record_with_amount(amount)).unwrap();
            let label = evaluator
                .classifier()
                .predict(&record_with_amount(amount).to_features().unwrap())
                .unwrap();

            assert!((0.0..=1.0).contains(&result.fraud_probability));
            assert_eq!(result.is_fraud, label == 1);
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let evaluator = TransactionEvaluator::new(AmountClassifier);
        let record = record_with_amount(640.0);

        let first = evaluator.evaluate(&record).unwrap();
        let second = evaluator.evaluate(&record).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_named_fields_reordered_before_model_call() {
        let evaluator = TransactionEvaluator::new(StubClassifier::new(0, 0.2));
        let fields: Vec<(&str, f64)> = FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(i, &name)| (name, i as f64 * 1.5))
            .collect();
        let mut reversed = fields.clone();
        reversed.reverse();

        let (_, canonical) = evaluator.evaluate_named(fields).unwrap();
        let (_, shuffled) = evaluator.evaluate_named(reversed).unwrap();

        assert_eq!(canonical, shuffled);

        let seen = evaluator.classifier().seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
        assert_eq!(seen[0][29], 29.0 * 1.5);
    }

    #[test]
    fn test_missing_field_is_an_evaluation_error() {
        let evaluator = TransactionEvaluator::new(StubClassifier::new(1, 0.9));
        let fields = FEATURE_NAMES
            .iter()
            .filter(|&&name| name != "LogAmount")
            .map(|&name| (name, 1.0));

        let err = evaluator.evaluate_named(fields).unwrap_err();
        assert_eq!(err, EvaluationError::MissingField("LogAmount"));
        assert!(evaluator.classifier().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_one_model_pass_per_evaluation() {
        let evaluator = TransactionEvaluator::new(SinglePassClassifier::default());

        let result = evaluator.evaluate(&record_with_amount(80.0)).unwrap();
        assert!(result.is_fraud);
        assert_eq!(result.fraud_probability, 0.75);
        assert_eq!(evaluator.classifier().calls.load(Ordering::SeqCst), 1);

        evaluator.evaluate(&record_with_amount(80.0)).unwrap();
        assert_eq!(evaluator.classifier().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_amount_beyond_f32_range_never_reaches_model() {
        let evaluator = TransactionEvaluator::new(StubClassifier::new(0, 0.1));

        let err = evaluator.evaluate(&record_with_amount(1e39)).unwrap_err();
        assert_eq!(err, EvaluationError::OutOfRange("Amount"));
        assert!(evaluator.classifier().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_shape_mismatch() {
        let mut classifier = StubClassifier::new(1, 0.9);
        classifier.width = Some(30);
        let evaluator = TransactionEvaluator::new(classifier);

        let err = evaluator.evaluate(&record_with_amount(1.0)).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::ShapeMismatch {
                expected: 30,
                found: FEATURE_COUNT
            }
        );
    }

    #[test]
    fn test_unexpected_model_output() {
        let evaluator = TransactionEvaluator::new(StubClassifier::new(2, 0.9));
        let err = evaluator.evaluate(&record_with_amount(1.0)).unwrap_err();
        assert_eq!(err, EvaluationError::UnexpectedLabel(2));

        let evaluator = TransactionEvaluator::new(StubClassifier::new(1, 1.2));
        let err = evaluator.evaluate(&record_with_amount(1.0)).unwrap_err();
        assert_eq!(err, EvaluationError::InvalidProbability(1.2));

        let evaluator = TransactionEvaluator::new(StubClassifier::new(1, f64::NAN));
        assert!(matches!(
            evaluator.evaluate(&record_with_amount(1.0)),
            Err(EvaluationError::InvalidProbability(_))
        ));
    }
}
