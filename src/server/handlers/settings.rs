//! Settings handler.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::settings::Settings;

use super::super::state::AppState;

/// GET /settings - Current printer settings. Always succeeds; unset or
/// unreadable values come back as defaults.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.settings())
}
