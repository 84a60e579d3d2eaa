//! # Relay Client
//!
//! Talks to a running relay over HTTP, the way a point-of-sale web app would.
//!
//! ```no_run
//! use printbridge::client::RelayClient;
//! use printbridge::document::PrintRequest;
//!
//! # async fn example() -> Result<(), printbridge::PrintBridgeError> {
//! let client = RelayClient::new("http://localhost:8888");
//! let request = PrintRequest {
//!     text: Some("Hello from web app!".into()),
//!     items: Some(vec!["Item 1: Product A - $10.00".into(), "Total: $10.00".into()]),
//! };
//! let response = client.print(&request).await?;
//! println!("{}", response.message);
//! # Ok(())
//! # }
//! ```

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::document::PrintRequest;
use crate::error::PrintBridgeError;
use crate::printer::PrinterDescriptor;
use crate::settings::Settings;

/// Body of a `/print` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct PrintersResponse {
    #[serde(default)]
    printers: Vec<PrinterDescriptor>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for a printbridge relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    base_url: String,
    http: reqwest::Client,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /print. A relay-side print failure is returned as an error
    /// carrying the relay's message.
    pub async fn print(&self, request: &PrintRequest) -> Result<PrintResponse, PrintBridgeError> {
        let response = self
            .http
            .post(self.url("/print"))
            .json(request)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        let body: PrintResponse = response.json().await.map_err(request_failed)?;
        if status != StatusCode::OK || body.status != "success" {
            return Err(PrintBridgeError::Remote(body.message));
        }
        Ok(body)
    }

    /// GET /printers.
    pub async fn printers(&self) -> Result<Vec<PrinterDescriptor>, PrintBridgeError> {
        let response = self
            .http
            .get(self.url("/printers"))
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        let body: PrintersResponse = response.json().await.map_err(request_failed)?;
        match body.error {
            Some(error) => Err(PrintBridgeError::Remote(error)),
            None if !status.is_success() => {
                Err(PrintBridgeError::Remote(format!("unexpected status {}", status)))
            }
            None => Ok(body.printers),
        }
    }

    /// GET /settings.
    pub async fn settings(&self) -> Result<Settings, PrintBridgeError> {
        self.http
            .get(self.url("/settings"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(request_failed)?
            .json()
            .await
            .map_err(request_failed)
    }
}

fn request_failed(e: reqwest::Error) -> PrintBridgeError {
    PrintBridgeError::Remote(format!("HTTP request failed: {}", e))
}
