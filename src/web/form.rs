//! Sidebar input widgets and form parsing.
//!
//! Widgets clamp out-of-range input the way a bounded number input does;
//! the record itself accepts any finite value.

use crate::error::EvaluationError;
use crate::types::transaction::{feature_index, TransactionRecord, FEATURE_COUNT, FEATURE_NAMES};
use std::collections::HashMap;

/// A numeric input widget for one record column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Column name, also the form field name
    pub name: &'static str,
    pub label: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
    pub default: f64,
}

impl FieldSpec {
    /// Unbounded input labelled with the column name.
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            label: name,
            min: None,
            max: None,
            step: 0.01,
            default: 0.0,
        }
    }

    const fn bounded(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: Option<f64>,
        step: f64,
    ) -> Self {
        Self {
            name,
            label,
            min: Some(min),
            max,
            step,
            default: min,
        }
    }

    /// Pull `value` into the widget's range.
    pub fn clamp(&self, value: f64) -> f64 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }

    /// Whether the widget only takes whole numbers
    pub fn is_integer(&self) -> bool {
        self.step.fract() == 0.0
    }
}

/// Widgets in sidebar order: Time, Amount, V1..V28, Hour, DayOfWeek, LogAmount.
pub fn sidebar_fields() -> Vec<FieldSpec> {
    let mut fields = Vec::with_capacity(FEATURE_NAMES.len());

    fields.push(FieldSpec::bounded(
        "Time",
        "Transaction Time (seconds)",
        0.0,
        None,
        1.0,
    ));
    fields.push(FieldSpec::bounded(
        "Amount",
        "Transaction Amount",
        0.0,
        None,
        0.01,
    ));

    // V1..V28 sit between Time and Amount in FEATURE_NAMES
    fields.extend(FEATURE_NAMES[1..29].iter().map(|&name| FieldSpec::plain(name)));

    fields.push(FieldSpec::bounded(
        "Hour",
        "Transaction Hour (0-23)",
        0.0,
        Some(23.0),
        1.0,
    ));
    fields.push(FieldSpec::bounded(
        "DayOfWeek",
        "Day of the Week (1=Monday, ..., 7=Sunday)",
        1.0,
        Some(7.0),
        1.0,
    ));
    fields.push(FieldSpec::bounded(
        "LogAmount",
        "Logarithm of Transaction Amount",
        0.0,
        None,
        0.01,
    ));

    fields
}

/// Record built from every widget's default value.
pub fn default_record() -> TransactionRecord {
    let mut values = [0.0; FEATURE_COUNT];
    for field in sidebar_fields() {
        if let Some(idx) = feature_index(field.name) {
            values[idx] = field.default;
        }
    }
    TransactionRecord::from_array(values)
}

/// Parse submitted form values into a record.
///
/// Blank or absent inputs are missing fields; anything that does not parse
/// as a number, or a fraction in a whole-number widget, is rejected with the
/// offending text.
pub fn parse_form(values: &HashMap<String, String>) -> Result<TransactionRecord, EvaluationError> {
    let mut parsed = Vec::with_capacity(FEATURE_NAMES.len());

    for field in sidebar_fields() {
        let raw = values
            .get(field.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or(EvaluationError::MissingField(field.name))?;

        let value: f64 = raw.parse().map_err(|_| EvaluationError::InvalidValue {
            field: field.name.to_string(),
            value: raw.to_string(),
        })?;

        // clamping would swallow NaN
        if !value.is_finite() {
            return Err(EvaluationError::NonFiniteValue(field.name));
        }

        if field.is_integer() && value.fract() != 0.0 {
            return Err(EvaluationError::NotWholeNumber {
                field: field.name,
                value: raw.to_string(),
            });
        }

        parsed.push((field.name, field.clamp(value)));
    }

    TransactionRecord::from_named(parsed)
}

/// Value to prefill a widget with: what was submitted, or its default.
pub fn display_value(field: &FieldSpec, submitted: Option<&HashMap<String, String>>) -> String {
    submitted
        .and_then(|values| values.get(field.name))
        .cloned()
        .unwrap_or_else(|| format_default(field))
}

fn format_default(field: &FieldSpec) -> String {
    if field.is_integer() {
        format!("{}", field.default as i64)
    } else {
        format!("{:.2}", field.default)
    }
}
