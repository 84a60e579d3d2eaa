//! Server state and configuration.

use std::sync::Arc;

use crate::backend::{self, PrintBackend};
use crate::document::PrintRequest;
use crate::error::PrintBridgeError;
use crate::printer::PrinterDescriptor;
use crate::settings::{Settings, SettingsStore};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8888;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "127.0.0.1")
    pub host: String,
    /// Port to bind; 0 picks a free port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application state shared across handlers and the control channel.
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub backend: Arc<dyn PrintBackend>,
}

impl AppState {
    pub fn new(settings: Arc<SettingsStore>, backend: Arc<dyn PrintBackend>) -> Self {
        Self { settings, backend }
    }

    /// Current settings, defaults filled in.
    pub fn settings(&self) -> Settings {
        self.settings.load()
    }

    /// Print a request with the current settings.
    ///
    /// Blocking operation, run in a separate thread.
    pub async fn print(&self, request: PrintRequest) -> Result<(), PrintBridgeError> {
        let settings = self.settings.load();
        let backend = self.backend.clone();
        tokio::task::spawn_blocking(move || {
            backend::print_request(backend.as_ref(), &settings, &request)
        })
        .await
        .map_err(|e| PrintBridgeError::Server(format!("Task error: {}", e)))?
    }

    /// Enumerate printers on the blocking pool.
    pub async fn printers(&self) -> Result<Vec<PrinterDescriptor>, PrintBridgeError> {
        let backend = self.backend.clone();
        let result = tokio::task::spawn_blocking(move || backend.list_printers())
            .await
            .map_err(|e| PrintBridgeError::Server(format!("Task error: {}", e)))?;

        if let Err(e) = &result {
            tracing::warn!(error = %e, "printer enumeration failed");
        }
        result
    }
}
