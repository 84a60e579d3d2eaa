//! # Error Types
//!
//! This module defines error types used throughout the printbridge library.

use thiserror::Error;

/// Main error type for printbridge operations
#[derive(Debug, Error)]
pub enum PrintBridgeError {
    /// The printer could not be reached before any data was sent
    #[error("Printer not connected: {0}")]
    NotConnected(String),

    /// A native print command failed (non-zero exit or spawn failure)
    #[error("Print command failed: {0}")]
    Command(String),

    /// Printer enumeration failed
    #[error("Failed to list printers: {0}")]
    Enumeration(String),

    /// Transport-level errors while writing to a device
    #[error("Transport error: {0}")]
    Transport(String),

    /// Settings could not be persisted
    #[error("Settings error: {0}")]
    Settings(String),

    /// Invalid value supplied by a caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP listener errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// A remote relay could not be reached or answered with an error
    #[error("Relay error: {0}")]
    Remote(String),
}
