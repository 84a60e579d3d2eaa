//! # Print Backends
//!
//! A backend knows how to list printers and how to deliver a rendered
//! document to one. The backend is chosen once at startup:
//!
//! | Kind | Enumerates with | Prints with |
//! |------|-----------------|-------------|
//! | `direct` | device-node scan | ESC/POS bytes to the device |
//! | `spool-unix` | `lpstat -p` | `lp -d NAME FILE` |
//! | `spool-windows` | `wmic printer get name` | PowerShell `Out-Printer` |
//!
//! ## Usage
//!
//! ```no_run
//! use printbridge::backend::{self, BackendConfig, BackendKind};
//! use printbridge::document::PrintRequest;
//! use printbridge::settings::Settings;
//!
//! let backend = backend::build(BackendKind::detect(), &BackendConfig::default());
//! let request = PrintRequest { text: Some("Hello".into()), items: None };
//! backend::print_request(backend.as_ref(), &Settings::default(), &request)?;
//! # Ok::<(), printbridge::PrintBridgeError>(())
//! ```

pub mod direct;
pub mod spool;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

use crate::document::PrintRequest;
use crate::error::PrintBridgeError;
use crate::printer::PrinterDescriptor;
use crate::settings::Settings;

pub use direct::DirectBackend;
pub use spool::{UnixSpoolBackend, WindowsSpoolBackend};

/// Delivery strategy for print jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// ESC/POS written straight to a printer device node
    Direct,
    /// CUPS `lp`/`lpstat` (Linux, macOS)
    SpoolUnix,
    /// PowerShell `Out-Printer` and `wmic`
    SpoolWindows,
}

impl BackendKind {
    /// The OS spooler for the platform this binary was built for.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self::SpoolWindows
        } else {
            Self::SpoolUnix
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::SpoolUnix => "spool-unix",
            Self::SpoolWindows => "spool-windows",
        };
        f.write_str(name)
    }
}

/// Paths and programs the backends use. Defaults match a stock install;
/// tests point them at temp directories and stand-in scripts.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Directory scanned for printer nodes and used to resolve relative
    /// printer names (direct backend)
    pub device_root: PathBuf,
    /// Device used when no printer name is configured (direct backend)
    pub default_device: PathBuf,
    /// Where spool backends write their temporary job files
    pub temp_dir: PathBuf,
    pub lp_program: PathBuf,
    pub lpstat_program: PathBuf,
    pub powershell_program: PathBuf,
    pub wmic_program: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            device_root: PathBuf::from("/dev"),
            default_device: PathBuf::from(crate::transport::device::DEFAULT_DEVICE),
            temp_dir: std::env::temp_dir(),
            lp_program: PathBuf::from("lp"),
            lpstat_program: PathBuf::from("lpstat"),
            powershell_program: PathBuf::from("powershell"),
            wmic_program: PathBuf::from("wmic"),
        }
    }
}

/// A printing facility: enumerates printers and prints documents.
///
/// Both operations block until the native call finishes; async callers run
/// them on the blocking pool.
pub trait PrintBackend: Send + Sync {
    /// Which strategy this backend implements.
    fn kind(&self) -> BackendKind;

    /// Printers currently available. No printers is an empty list, not an
    /// error.
    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, PrintBridgeError>;

    /// Deliver a rendered document to the printer named in `settings`.
    fn print(&self, document: &str, settings: &Settings) -> Result<(), PrintBridgeError>;
}

/// Construct the backend for `kind`.
pub fn build(kind: BackendKind, config: &BackendConfig) -> Arc<dyn PrintBackend> {
    match kind {
        BackendKind::Direct => Arc::new(DirectBackend::new(config)),
        BackendKind::SpoolUnix => Arc::new(UnixSpoolBackend::new(config)),
        BackendKind::SpoolWindows => Arc::new(WindowsSpoolBackend::new(config)),
    }
}

/// Render `request` and print it with `settings`. Single attempt, no retry.
pub fn print_request(
    backend: &dyn PrintBackend,
    settings: &Settings,
    request: &PrintRequest,
) -> Result<(), PrintBridgeError> {
    let document = request.render();
    tracing::debug!(
        backend = %backend.kind(),
        printer = %settings.printer_name,
        bytes = document.len(),
        "rendered print document"
    );

    match backend.print(&document, settings) {
        Ok(()) => {
            tracing::info!(printer = %settings.printer_name, "printed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!(printer = %settings.printer_name, error = %e, "print failed");
            Err(e)
        }
    }
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Run a native command to completion. Spawn failures and non-zero exits
/// both become [`PrintBridgeError::Command`] naming the program and, for
/// exits, its stderr.
pub(crate) fn run_command(command: &mut Command) -> Result<Output, PrintBridgeError> {
    let program = command.get_program().to_string_lossy().into_owned();
    tracing::debug!(command = ?command, "running print command");

    let output = command
        .output()
        .map_err(|e| PrintBridgeError::Command(format!("failed to run {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => String::new(),
            s => format!(": {}", s),
        };
        return Err(PrintBridgeError::Command(format!(
            "{} exited with {}{}",
            program, output.status, detail
        )));
    }

    Ok(output)
}

/// A job file that is deleted when dropped, on success and failure alike.
#[derive(Debug)]
pub(crate) struct TempDocument {
    path: PathBuf,
}

impl TempDocument {
    /// Write `contents` to a fresh `print-<uuid>.txt` in `dir`.
    pub(crate) fn create(dir: &Path, contents: &str) -> Result<Self, PrintBridgeError> {
        let path = dir.join(format!("print-{}.txt", uuid::Uuid::new_v4()));
        if let Err(e) = fs::write(&path, contents) {
            // The file may exist with partial contents (e.g. disk full).
            let _ = fs::remove_file(&path);
            return Err(PrintBridgeError::Command(format!(
                "cannot write {}: {}",
                path.display(),
                e
            )));
        }
        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDocument {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temp print file");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
