//! # printbridge - Local HTTP Print Relay
//!
//! printbridge lets web apps print receipts on a thermal printer attached to
//! the local machine. It provides:
//!
//! - **HTTP relay**: `POST /print`, `GET /printers`, `GET /settings`
//! - **Print backends**: CUPS `lp`, Windows `Out-Printer`, or ESC/POS
//!   written straight to a device node
//! - **Settings store**: persisted printer name and paper width
//! - **Control channel**: start/stop the relay and edit settings from a UI
//!
//! ## Quick Start
//!
//! ```no_run
//! use printbridge::{
//!     backend::{self, BackendConfig, BackendKind},
//!     document::PrintRequest,
//!     settings::Settings,
//! };
//!
//! let backend = backend::build(BackendKind::Direct, &BackendConfig::default());
//! let request = PrintRequest {
//!     text: Some("Hello".into()),
//!     items: Some(vec!["Item 1: $10".into(), "Total: $10".into()]),
//! };
//! backend::print_request(backend.as_ref(), &Settings::default(), &request)?;
//! # Ok::<(), printbridge::PrintBridgeError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`server`] | HTTP router and server lifecycle |
//! | [`backend`] | Print strategies |
//! | [`document`] | Print requests and text rendering |
//! | [`settings`] | Persisted settings |
//! | [`config`] | Config directory resolution |
//! | [`printer`] | Printer descriptors and enumeration parsers |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | Raw device I/O |
//! | [`client`] | HTTP client for a running relay |
//! | [`error`] | Error types |

pub mod backend;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod server;
pub mod settings;
pub mod transport;

// Re-exports for convenience
pub use error::PrintBridgeError;
pub use settings::{Settings, SettingsStore};
