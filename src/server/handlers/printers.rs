//! Printer enumeration handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use super::super::state::AppState;

/// GET /printers - List printers known to the active backend.
pub async fn list(State(state): State<Arc<AppState>>) -> Response {
    match state.printers().await {
        Ok(printers) => Json(json!({ "printers": printers })).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
