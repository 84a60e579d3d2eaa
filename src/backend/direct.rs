//! Direct-driver backend: ESC/POS straight to a device node.

use std::path::{Path, PathBuf};

use super::{BackendConfig, BackendKind, PrintBackend};
use crate::error::PrintBridgeError;
use crate::printer::{PrinterDescriptor, enumerate};
use crate::protocol::{commands, cp437};
use crate::settings::Settings;
use crate::transport::DeviceTransport;

/// Prints by opening the printer's device node and writing ESC/POS.
///
/// Printer names resolve to devices as follows:
/// - empty: the configured default device
/// - absolute path: used as-is
/// - anything else: relative to the device root (`usb/lp0` → `/dev/usb/lp0`)
#[derive(Debug, Clone)]
pub struct DirectBackend {
    device_root: PathBuf,
    default_device: PathBuf,
}

impl DirectBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            device_root: config.device_root.clone(),
            default_device: config.default_device.clone(),
        }
    }

    /// Device path for a configured printer name.
    pub fn resolve_device(&self, printer_name: &str) -> PathBuf {
        let name = printer_name.trim();
        if name.is_empty() {
            return self.default_device.clone();
        }
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.device_root.join(path)
        }
    }
}

impl PrintBackend for DirectBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Direct
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, PrintBridgeError> {
        enumerate::scan_device_root(&self.device_root).map_err(|e| {
            PrintBridgeError::Enumeration(format!(
                "cannot scan {}: {}",
                self.device_root.display(),
                e
            ))
        })
    }

    fn print(&self, document: &str, settings: &Settings) -> Result<(), PrintBridgeError> {
        let device = self.resolve_device(&settings.printer_name);

        // Opening the device is the connectivity check; nothing is sent if
        // it fails.
        let mut transport = DeviceTransport::open(&device)?;
        tracing::debug!(device = %device.display(), "printer connected");

        transport.write_all(&job_header())?;
        for line in wrap_lines(document, settings.paper_width) {
            transport.write_all(&encode_line(&line))?;
        }
        transport.write_all(&commands::finish_and_cut())?;
        transport.flush()
    }
}

fn job_header() -> Vec<u8> {
    let mut data = commands::init();
    data.extend(commands::code_table(commands::CODE_TABLE_PC437));
    data
}

fn encode_line(line: &str) -> Vec<u8> {
    let mut bytes = cp437::encode(line);
    bytes.push(commands::LF);
    bytes
}

/// Split a document into printer lines, hard-wrapping any line longer than
/// `width` characters. A width of zero disables wrapping.
fn wrap_lines(document: &str, width: u32) -> Vec<String> {
    let width = width as usize;
    let mut lines = Vec::new();

    for line in document.lines() {
        let chars: Vec<char> = line.chars().collect();
        if width == 0 || chars.len() <= width {
            lines.push(line.to_string());
            continue;
        }
        lines.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }

    lines
}

// ============================================================================
// TESTS
// ============================================================================
