use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;

use crate::error::AppError;
use crate::report::XLSX_CONTENT_TYPE;
use crate::state::AppState;

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

fn password(headers: &HeaderMap) -> &str {
    headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub async fn recent_activity(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    match state.service.admin_view(password(&headers)).await? {
        Some(view) => Ok(Json(view).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn export_workbook(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let now = Local::now().naive_local();
    let Some(export) = state.service.export(password(&headers), now).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", export.file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response())
}
