//! ONNX Runtime backed classifier

use crate::error::EvaluationError;
use crate::models::classifier::{Classification, Classifier};
use ort::memory::Allocator;
use ort::session::Session;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::sync::Mutex;
use tracing::debug;

/// Classifier exported to ONNX (e.g. a scikit-learn random forest via skl2onnx).
///
/// Expects a float input of shape `[N, features]`, an int64 label output and
/// a probability output that is either a `[N, classes]` tensor or a
/// `seq(map(int64, float))` (ZipMap).
pub struct OnnxClassifier {
    name: String,
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    probability_output: String,
    input_width: Option<usize>,
}

fn model_error<E: std::fmt::Display>(e: E) -> EvaluationError {
    EvaluationError::Model(e.to_string())
}

impl OnnxClassifier {
    pub(crate) fn new(
        name: String,
        session: Session,
        input_name: String,
        label_output: String,
        probability_output: String,
        input_width: Option<usize>,
    ) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
            input_width,
        }
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn label_output(&self) -> &str {
        &self.label_output
    }

    pub fn probability_output(&self) -> &str {
        &self.probability_output
    }

    /// Run the session on a single row
    fn run_session(&self, features: &[f32]) -> Result<Classification, EvaluationError> {
        use ort::value::Tensor;

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec())).map_err(model_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| EvaluationError::Model(format!("Lock error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(model_error)?;

        let label = self.extract_label(&outputs)?;
        let probabilities = self.extract_probabilities(&outputs)?;

        debug!(
            model = %self.name,
            label = label,
            fraud_probability = probabilities[1],
            "Session run complete"
        );

        Ok(Classification {
            label,
            probabilities,
        })
    }

    fn extract_label(&self, outputs: &ort::session::SessionOutputs) -> Result<i64, EvaluationError> {
        let output = outputs.get(self.label_output.as_str()).ok_or_else(|| {
            EvaluationError::Model(format!("output `{}` missing", self.label_output))
        })?;

        let (_, data) = output.try_extract_tensor::<i64>().map_err(model_error)?;

        data.first()
            .copied()
            .ok_or_else(|| EvaluationError::Model("empty label output".to_string()))
    }

    /// Handles both tensor outputs (`zipmap=False`) and seq(map) outputs (ZipMap)
    fn extract_probabilities(
        &self,
        outputs: &ort::session::SessionOutputs,
    ) -> Result<[f64; 2], EvaluationError> {
        let output = outputs.get(self.probability_output.as_str()).ok_or_else(|| {
            EvaluationError::Model(format!("output `{}` missing", self.probability_output))
        })?;

        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return probabilities_from_tensor(&dims, data);
        }

        let dtype = output.dtype();
        if DynSequenceValueType::can_downcast(&dtype) {
            return self.extract_from_sequence_map(output);
        }

        Err(EvaluationError::Model(format!(
            "unsupported probability output type {:?}",
            dtype
        )))
    }

    /// seq(map(int64, float)) as produced by ZipMap
    fn extract_from_sequence_map(
        &self,
        output: &ort::value::DynValue,
    ) -> Result<[f64; 2], EvaluationError> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(model_error)?;

        let maps = sequence
            .try_extract_sequence::<DynMapValueType>(&allocator)
            .map_err(model_error)?;

        // batch of one
        let map_value = maps
            .first()
            .ok_or_else(|| EvaluationError::Model("empty probability sequence".to_string()))?;

        let kv_pairs = map_value
            .try_extract_key_values::<i64, f32>()
            .map_err(model_error)?;

        probabilities_from_pairs(&kv_pairs)
    }
}

/// `[batch, classes]`, `[classes]`, or a single P(fraud) column.
fn probabilities_from_tensor(dims: &[i64], data: &[f32]) -> Result<[f64; 2], EvaluationError> {
    let classes = dims.last().copied().unwrap_or(0);

    match (classes, data) {
        (c, [legit, fraud, ..]) if c >= 2 => Ok([*legit as f64, *fraud as f64]),
        (1, [fraud, ..]) => Ok([1.0 - *fraud as f64, *fraud as f64]),
        _ => Err(EvaluationError::Model(format!(
            "unexpected probability tensor shape {:?}",
            dims
        ))),
    }
}

fn probabilities_from_pairs(pairs: &[(i64, f32)]) -> Result<[f64; 2], EvaluationError> {
    let class_prob = |class: i64| {
        pairs
            .iter()
            .find(|(id, _)| *id == class)
            .map(|(_, p)| *p as f64)
    };

    match (class_prob(0), class_prob(1)) {
        (Some(legit), Some(fraud)) => Ok([legit, fraud]),
        (None, Some(fraud)) => Ok([1.0 - fraud, fraud]),
        (Some(legit), None) => Ok([legit, 1.0 - legit]),
        (None, None) => Err(EvaluationError::Model(
            "no class probabilities in map".to_string(),
        )),
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_width(&self) -> Option<usize> {
        self.input_width
    }

    fn predict(&self, features: &[f32]) -> Result<i64, EvaluationError> {
        self.run_session(features).map(|c| c.label)
    }

    fn predict_proba(&self, features: &[f32]) -> Result<[f64; 2], EvaluationError> {
        self.run_session(features).map(|c| c.probabilities)
    }

    /// Both outputs come from the same run.
    fn classify(&self, features: &[f32]) -> Result<Classification, EvaluationError> {
        self.run_session(features)
    }
}
