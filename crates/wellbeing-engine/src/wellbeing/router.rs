use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use tracing::{error, warn};

use super::ledger::LedgerStore;
use super::oracle::ScoreOracle;
use super::rewards::LedgerState;
use super::service::{Assessment, WellbeingService};
use crate::error::AppError;

/// Router builder exposing the scoring endpoint and the reward ledger view.
pub fn wellbeing_router<O, S>(service: Arc<WellbeingService<O, S>>) -> Router
where
    O: ScoreOracle + 'static,
    S: LedgerStore + 'static,
{
    Router::new()
        .route("/predict", post(predict_handler::<O, S>))
        .route("/rewards", get(rewards_handler::<O, S>))
        .with_state(service)
}

/// Scores any well-formed JSON body; non-objects and bodies sent without a
/// JSON content type count as an empty submission. Malformed JSON is
/// rejected before the ledger is touched.
pub(crate) async fn predict_handler<O, S>(
    State(service): State<Arc<WellbeingService<O, S>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Assessment>, AppError>
where
    O: ScoreOracle + 'static,
    S: LedgerStore + 'static,
{
    let raw = match body {
        Ok(Json(Value::Object(map))) => map,
        Ok(Json(_)) | Err(JsonRejection::MissingJsonContentType(_)) => Map::new(),
        Err(rejection) => {
            warn!(error = %rejection, "rejected malformed submission");
            return Err(AppError::from(rejection));
        }
    };

    let assessment = tokio::task::spawn_blocking(move || service.assess(&raw))
        .await
        .map_err(|join_error| {
            error!(error = %join_error, "assessment task aborted");
            AppError::from(join_error)
        })?
        .map_err(|err| {
            error!(error = %err, "assessment failed");
            AppError::from(err)
        })?;

    Ok(Json(assessment))
}

pub(crate) async fn rewards_handler<O, S>(
    State(service): State<Arc<WellbeingService<O, S>>>,
) -> Result<Json<LedgerState>, AppError>
where
    O: ScoreOracle + 'static,
    S: LedgerStore + 'static,
{
    let state = tokio::task::spawn_blocking(move || service.ledger_state())
        .await
        .map_err(|join_error| {
            error!(error = %join_error, "ledger read task aborted");
            AppError::from(join_error)
        })?;

    Ok(Json(state))
}
