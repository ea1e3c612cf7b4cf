//! HTTP routes: the interactive form and a JSON evaluation endpoint

use crate::error::EvaluationError;
use crate::models::classifier::Classifier;
use crate::models::evaluator::TransactionEvaluator;
use crate::types::transaction::{feature_index, FEATURE_NAMES};
use crate::types::verdict::EvaluationReport;
use crate::web::form::{default_record, parse_form};
use crate::web::render::{render_page, Outcome};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

type SharedEvaluator<C> = Arc<TransactionEvaluator<C>>;

/// Build the app router around an already loaded evaluator.
pub fn router<C>(evaluator: TransactionEvaluator<C>) -> Router
where
    C: Classifier + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze::<C>))
        .route("/api/evaluate", post(evaluate_json::<C>))
        .with_state(Arc::new(evaluator))
}

async fn index() -> Html<String> {
    Html(render_page(None, None, Some(&default_record())))
}

/// Form submission. Always answers 200: failures are shown in-page so the
/// user can correct the inputs and retry.
async fn analyze<C: Classifier + 'static>(
    State(evaluator): State<SharedEvaluator<C>>,
    Form(values): Form<HashMap<String, String>>,
) -> Html<String> {
    let record = match parse_form(&values) {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "Rejected form submission");
            let outcome = Outcome::Error(e.user_message());
            return Html(render_page(Some(&values), Some(&outcome), None));
        }
    };

    let outcome = match evaluator.evaluate(&record) {
        Ok(result) => {
            info!(
                is_fraud = result.is_fraud,
                fraud_probability = result.fraud_probability,
                "Transaction analyzed"
            );
            Outcome::Verdict(result)
        }
        Err(e) => {
            warn!(error = %e, "Evaluation failed");
            Outcome::Error(e.user_message())
        }
    };

    Html(render_page(Some(&values), Some(&outcome), Some(&record)))
}

/// JSON body: `{ "Time": 0, "V1": -1.36, ..., "LogAmount": 5.01 }`, any key order.
async fn evaluate_json<C: Classifier + 'static>(
    State(evaluator): State<SharedEvaluator<C>>,
    Json(body): Json<HashMap<String, Value>>,
) -> Result<Json<EvaluationReport>, ApiError> {
    for name in body.keys().filter(|name| feature_index(name).is_none()) {
        debug!(column = %name, "Ignoring unknown column");
    }

    // only model columns need to be numeric; absent ones surface as missing
    let fields = FEATURE_NAMES
        .iter()
        .filter_map(|&name| body.get(name).map(|value| (name, value)))
        .map(|(name, value)| {
            value
                .as_f64()
                .map(|v| (name, v))
                .ok_or_else(|| EvaluationError::InvalidValue {
                    field: name.to_string(),
                    value: value.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (record, result) = evaluator.evaluate_named(fields)?;
    let report = EvaluationReport::new(result, record);

    info!(
        evaluation_id = %report.evaluation_id,
        is_fraud = report.is_fraud,
        fraud_probability = report.fraud_probability,
        "Transaction evaluated via API"
    );

    Ok(Json(report))
}

/// `EvaluationError` as a 422 JSON response.
pub struct ApiError(EvaluationError);

impl From<EvaluationError> for ApiError {
    fn from(e: EvaluationError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "API evaluation rejected");
        let body = json!({ "error": self.0.to_string() });
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}
