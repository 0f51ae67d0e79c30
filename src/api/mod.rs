use axum::{
    routing::{get, post},
    Json, Router,
};

pub mod admin;
pub mod error;
pub mod predict;
mod tests;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/predictions", post(predict::create_prediction))
        .route("/api/admin/recent", get(admin::recent_activity))
        .route("/api/admin/export", get(admin::export_workbook))
        .route("/_health", get(|| async { Json(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })) }))
        .with_state(state)
}
