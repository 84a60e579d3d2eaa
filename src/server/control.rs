//! # Control Channel
//!
//! [`Controller`] is the process-scoped context a settings UI talks to. It
//! owns the shared [`AppState`] and the HTTP listener, and exposes the same
//! operations as the HTTP API plus saving settings and starting/stopping
//! the server.
//!
//! At most one listener is bound at a time: starting a running server and
//! stopping a stopped one are both no-ops.

use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use crate::error::PrintBridgeError;
use crate::printer::PrinterDescriptor;
use crate::settings::Settings;

use super::state::{AppState, ServerConfig};

/// Whether the HTTP listener is up, and on which port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub running: bool,
    pub port: u16,
}

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Owns the shared state and the HTTP server lifecycle.
pub struct Controller {
    state: Arc<AppState>,
    config: ServerConfig,
    server: Mutex<Option<RunningServer>>,
}

impl Controller {
    pub fn new(state: Arc<AppState>, config: ServerConfig) -> Self {
        Self {
            state,
            config,
            server: Mutex::new(None),
        }
    }

    /// Shared state handed to the HTTP handlers.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// List printers from the active backend.
    pub async fn printers(&self) -> Result<Vec<PrinterDescriptor>, PrintBridgeError> {
        self.state.printers().await
    }

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.state.settings()
    }

    /// Validate and persist new settings.
    pub fn save_settings(&self, settings: &Settings) -> Result<(), PrintBridgeError> {
        self.state.settings.save(settings)
    }

    /// Bind the listener and start serving. No-op if already running.
    pub async fn start_server(&self) -> Result<ServerStatus, PrintBridgeError> {
        let mut slot = self.server.lock().await;
        if let Some(running) = slot.as_ref().filter(|s| !s.task.is_finished()) {
            tracing::debug!(addr = %running.addr, "server already running");
            return Ok(ServerStatus {
                running: true,
                port: running.addr.port(),
            });
        }

        let listen_addr = self.config.listen_addr();
        let listener = TcpListener::bind(&listen_addr).await.map_err(|e| {
            PrintBridgeError::Server(format!("Failed to bind to {}: {}", listen_addr, e))
        })?;
        let addr = listener
            .local_addr()
            .map_err(|e| PrintBridgeError::Server(format!("Failed to read bound address: {}", e)))?;

        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let app = super::router(self.state.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!(%addr, "HTTP server started");
        *slot = Some(RunningServer {
            addr,
            shutdown,
            task,
        });

        Ok(ServerStatus {
            running: true,
            port: addr.port(),
        })
    }

    /// Stop serving and release the port, letting in-flight requests
    /// finish. No-op if not running.
    pub async fn stop_server(&self) -> Result<ServerStatus, PrintBridgeError> {
        let mut slot = self.server.lock().await;
        let Some(running) = slot.take() else {
            return Ok(self.stopped_status());
        };

        let _ = running.shutdown.send(());
        match running.task.await {
            Ok(Ok(())) => tracing::info!(addr = %running.addr, "HTTP server stopped"),
            Ok(Err(e)) => tracing::warn!(addr = %running.addr, error = %e, "HTTP server exited with error"),
            Err(e) => {
                return Err(PrintBridgeError::Server(format!("Server task failed: {}", e)));
            }
        }

        Ok(self.stopped_status())
    }

    /// Current server status.
    pub async fn status(&self) -> ServerStatus {
        let slot = self.server.lock().await;
        match slot.as_ref() {
            Some(running) if !running.task.is_finished() => ServerStatus {
                running: true,
                port: running.addr.port(),
            },
            _ => self.stopped_status(),
        }
    }

    fn stopped_status(&self) -> ServerStatus {
        ServerStatus {
            running: false,
            port: self.config.port,
        }
    }
}
