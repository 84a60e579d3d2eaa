//! Print handler.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::document::PrintRequest;

use super::super::state::AppState;

/// Message returned when a job completes
pub const PRINT_OK_MESSAGE: &str = "Print job completed";

/// Handle POST /print - render the request and send it to the printer.
///
/// The body is parsed as JSON whatever its `Content-Type`. An empty body is
/// an empty request.
pub async fn print(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request = match parse_body(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "rejected print request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Failed to parse the request body as JSON: {}", e),
            );
        }
    };

    tracing::info!(
        has_text = request.text.is_some(),
        items = request.items.as_ref().map_or(0, Vec::len),
        "received print request"
    );

    match state.print(request).await {
        Ok(()) => success_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn parse_body(body: &[u8]) -> Result<PrintRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PrintRequest::default());
    }
    serde_json::from_slice(body)
}

fn success_response() -> Response {
    (
        StatusCode::OK,
        Json(json!({"status": "success", "message": PRINT_OK_MESSAGE})),
    )
        .into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"status": "error", "message": message}))).into_response()
}
