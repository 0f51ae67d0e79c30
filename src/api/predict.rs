use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Local;

use crate::error::AppError;
use crate::service::{PredictionForm, PredictionOutcome};
use crate::state::AppState;

pub async fn create_prediction(
    State(state): State<AppState>,
    payload: Result<Json<PredictionForm>, JsonRejection>,
) -> Result<(StatusCode, Json<PredictionOutcome>), AppError> {
    let Json(form) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected malformed prediction form");
        AppError::Validation(rejection.body_text())
    })?;

    let now = Local::now().naive_local();
    let outcome = state.service.submit(form, now).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
