//! # HTTP Print Relay
//!
//! Accepts print requests over local HTTP and forwards them to the
//! configured printer.
//!
//! ## Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | POST | `/print` | `{"status", "message"}` |
//! | GET | `/printers` | `{"printers": [{"name"}]}` |
//! | GET | `/settings` | `{"printerName", "paperWidth"}` |
//!
//! CORS is open so web apps served from any origin can print.
//!
//! ## Usage
//!
//! ```bash
//! printbridge serve --port 8888
//! curl -X POST localhost:8888/print -H 'content-type: application/json' \
//!      -d '{"text":"Hello","items":["Item 1: $10","Total: $10"]}'
//! ```

mod control;
mod handlers;
mod state;

pub use control::{Controller, ServerStatus};
pub use handlers::print::PRINT_OK_MESSAGE;
pub use state::{AppState, DEFAULT_PORT, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::PrintBridgeError;

/// Build the HTTP router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/print", post(handlers::print::print))
        .route("/printers", get(handlers::printers::list))
        .route("/settings", get(handlers::settings::get))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C, then shut it down.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use printbridge::backend::{self, BackendConfig, BackendKind};
/// use printbridge::server::{self, AppState, Controller, ServerConfig};
/// use printbridge::settings::SettingsStore;
///
/// # async fn example() -> Result<(), printbridge::PrintBridgeError> {
/// let state = AppState::new(
///     Arc::new(SettingsStore::in_dir("/tmp/printbridge")),
///     backend::build(BackendKind::detect(), &BackendConfig::default()),
/// );
/// let controller = Controller::new(Arc::new(state), ServerConfig::default());
/// server::serve(&controller).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(controller: &Controller) -> Result<(), PrintBridgeError> {
    let status = controller.start_server().await?;
    let backend = controller.state().backend.kind();
    let settings = controller.settings();

    tracing::info!(
        port = status.port,
        %backend,
        printer = %settings.printer_name,
        paper_width = settings.paper_width,
        "printbridge relay ready"
    );
    tracing::info!("  - POST /print");
    tracing::info!("  - GET  /printers");
    tracing::info!("  - GET  /settings");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| PrintBridgeError::Server(format!("Failed to listen for Ctrl-C: {}", e)))?;

    tracing::info!("shutting down");
    controller.stop_server().await?;
    Ok(())
}
