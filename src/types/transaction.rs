//! Transaction record fed to the fraud classifier.
//!
//! The classifier was trained on a fixed 33-column table. [`FEATURE_NAMES`]
//! is that column order and every conversion to model input goes through it.

use crate::error::EvaluationError;
use serde::{Deserialize, Serialize};

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 33;

/// Column names in the exact order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Time", "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13",
    "V14", "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26",
    "V27", "V28", "Amount", "Hour", "DayOfWeek", "LogAmount",
];

/// Position of a column in [`FEATURE_NAMES`].
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|&n| n == name)
}

/// A single credit card transaction, one value per model column.
///
/// `V1..V28` are the anonymized PCA components of the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Seconds elapsed since the first transaction in the dataset
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "V1")]
    pub v1: f64,
    #[serde(rename = "V2")]
    pub v2: f64,
    #[serde(rename = "V3")]
    pub v3: f64,
    #[serde(rename = "V4")]
    pub v4: f64,
    #[serde(rename = "V5")]
    pub v5: f64,
    #[serde(rename = "V6")]
    pub v6: f64,
    #[serde(rename = "V7")]
    pub v7: f64,
    #[serde(rename = "V8")]
    pub v8: f64,
    #[serde(rename = "V9")]
    pub v9: f64,
    #[serde(rename = "V10")]
    pub v10: f64,
    #[serde(rename = "V11")]
    pub v11: f64,
    #[serde(rename = "V12")]
    pub v12: f64,
    #[serde(rename = "V13")]
    pub v13: f64,
    #[serde(rename = "V14")]
    pub v14: f64,
    #[serde(rename = "V15")]
    pub v15: f64,
    #[serde(rename = "V16")]
    pub v16: f64,
    #[serde(rename = "V17")]
    pub v17: f64,
    #[serde(rename = "V18")]
    pub v18: f64,
    #[serde(rename = "V19")]
    pub v19: f64,
    #[serde(rename = "V20")]
    pub v20: f64,
    #[serde(rename = "V21")]
    pub v21: f64,
    #[serde(rename = "V22")]
    pub v22: f64,
    #[serde(rename = "V23")]
    pub v23: f64,
    #[serde(rename = "V24")]
    pub v24: f64,
    #[serde(rename = "V25")]
    pub v25: f64,
    #[serde(rename = "V26")]
    pub v26: f64,
    #[serde(rename = "V27")]
    pub v27: f64,
    #[serde(rename = "V28")]
    pub v28: f64,
    /// Transaction amount
    #[serde(rename = "Amount")]
    pub amount: f64,
    /// Hour of day the transaction happened
    #[serde(rename = "Hour")]
    pub hour: f64,
    /// Day of week (1 = Monday, 7 = Sunday)
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: f64,
    /// Log-transformed amount
    #[serde(rename = "LogAmount")]
    pub log_amount: f64,
}

impl TransactionRecord {
    /// Build a record from values already in [`FEATURE_NAMES`] order.
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [
            time, v1, v2, v3, v4, v5, v6, v7, v8, v9, v10, v11, v12, v13, v14, v15, v16, v17, v18,
            v19, v20, v21, v22, v23, v24, v25, v26, v27, v28, amount, hour, day_of_week, log_amount,
        ] = values;

        Self {
            time,
            v1,
            v2,
            v3,
            v4,
            v5,
            v6,
            v7,
            v8,
            v9,
            v10,
            v11,
            v12,
            v13,
            v14,
            v15,
            v16,
            v17,
            v18,
            v19,
            v20,
            v21,
            v22,
            v23,
            v24,
            v25,
            v26,
            v27,
            v28,
            amount,
            hour,
            day_of_week,
            log_amount,
        }
    }

    /// Build a record from `(column, value)` pairs given in any order.
    ///
    /// Columns the model does not know are ignored; a repeated column keeps
    /// its last value. Every one of the 33 columns must be supplied with a
    /// finite value.
    pub fn from_named<I, K>(fields: I) -> Result<Self, EvaluationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];

        for (name, value) in fields {
            match feature_index(name.as_ref()) {
                Some(idx) => slots[idx] = Some(value),
                None => tracing::debug!(column = %name.as_ref(), "Ignoring unknown column"),
            }
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (idx, slot) in slots.iter().enumerate() {
            let value = slot.ok_or(EvaluationError::MissingField(FEATURE_NAMES[idx]))?;
            if !value.is_finite() {
                return Err(EvaluationError::NonFiniteValue(FEATURE_NAMES[idx]));
            }
            values[idx] = value;
        }

        Ok(Self::from_array(values))
    }

    /// Values in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.time,
            self.v1,
            self.v2,
            self.v3,
            self.v4,
            self.v5,
            self.v6,
            self.v7,
            self.v8,
            self.v9,
            self.v10,
            self.v11,
            self.v12,
            self.v13,
            self.v14,
            self.v15,
            self.v16,
            self.v17,
            self.v18,
            self.v19,
            self.v20,
            self.v21,
            self.v22,
            self.v23,
            self.v24,
            self.v25,
            self.v26,
            self.v27,
            self.v28,
            self.amount,
            self.hour,
            self.day_of_week,
            self.log_amount,
        ]
    }

    /// Model input row (`float_input`), in training column order.
    ///
    /// Fails if a value overflows `f32`.
    pub fn to_features(&self) -> Result<Vec<f32>, EvaluationError> {
        self.columns()
            .map(|(name, value)| {
                let feature = value as f32;
                if feature.is_finite() {
                    Ok(feature)
                } else {
                    Err(EvaluationError::OutOfRange(name))
                }
            })
            .collect()
    }

    /// `(column, value)` pairs in training column order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed_fields() -> Vec<(&'static str, f64)> {
        FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(i, &name)| (name, i as f64))
            .collect()
    }

    #[test]
    fn test_named_fields_map_to_training_order() {
        let record = TransactionRecord::from_named(indexed_fields()).unwrap();

        let expected: Vec<f32> = (0..FEATURE_COUNT).map(|i| i as f32).collect();
        assert_eq!(record.to_features().unwrap(), expected);
        assert_eq!(record.time, 0.0);
        assert_eq!(record.v28, 28.0);
        assert_eq!(record.amount, 29.0);
        assert_eq!(record.log_amount, 32.0);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let canonical = TransactionRecord::from_named(indexed_fields()).unwrap();

        let mut shuffled = indexed_fields();
        shuffled.reverse();
        shuffled.swap(3, 17);
        let reordered = TransactionRecord::from_named(shuffled).unwrap();

        assert_eq!(canonical, reordered);
        assert_eq!(canonical.to_features(), reordered.to_features());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let fields: Vec<_> = indexed_fields()
            .into_iter()
            .filter(|(name, _)| *name != "Hour")
            .collect();

        let err = TransactionRecord::from_named(fields).unwrap_err();
        assert_eq!(err, EvaluationError::MissingField("Hour"));
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        let mut fields = indexed_fields();
        fields[5].1 = f64::NAN;

        let err = TransactionRecord::from_named(fields).unwrap_err();
        assert_eq!(err, EvaluationError::NonFiniteValue("V5"));
    }

    #[test]
    fn test_value_beyond_f32_range_is_rejected() {
        let mut fields = indexed_fields();
        fields[29].1 = 1e39;

        // finite as f64, so the record itself accepts it
        let record = TransactionRecord::from_named(fields).unwrap();
        assert_eq!(record.amount, 1e39);
        assert_eq!(
            record.to_features().unwrap_err(),
            EvaluationError::OutOfRange("Amount")
        );

        let mut fields = indexed_fields();
        fields[7].1 = -f64::MAX;
        let record = TransactionRecord::from_named(fields).unwrap();
        assert_eq!(
            record.to_features().unwrap_err(),
            EvaluationError::OutOfRange("V7")
        );
    }

    #[test]
    fn test_unknown_columns_ignored_and_last_duplicate_wins() {
        let mut fields = indexed_fields();
        fields.push(("Merchant", 7.0));
        fields.push(("Amount", 120.5));

        let record = TransactionRecord::from_named(fields).unwrap();
        assert_eq!(record.amount, 120.5);
    }

    #[test]
    fn test_serialized_column_names() {
        let record = TransactionRecord::from_named(indexed_fields()).unwrap();
        let json = serde_json::to_value(record).unwrap();

        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            assert_eq!(json[name], serde_json::json!(i as f64), "column {name}");
        }
    }

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(feature_index("Time"), Some(0));
        assert_eq!(feature_index("LogAmount"), Some(32));
        assert_eq!(feature_index("v1"), None);
    }
}
