//! OS-spool backends: hand a text file to the platform's print command.
//!
//! Both variants write the document to `print-<uuid>.txt` in the temp
//! directory, run the print command, and remove the file whatever the
//! outcome.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{BackendConfig, BackendKind, PrintBackend, TempDocument, run_command};
use crate::error::PrintBridgeError;
use crate::printer::{PrinterDescriptor, enumerate};
use crate::settings::Settings;

// ============================================================================
// CUPS (Linux, macOS)
// ============================================================================

/// Prints through CUPS: `lp -d NAME FILE`, enumerates with `lpstat -p`.
///
/// An empty printer name omits `-d`, which sends the job to the system
/// default destination.
#[derive(Debug, Clone)]
pub struct UnixSpoolBackend {
    temp_dir: PathBuf,
    lp: PathBuf,
    lpstat: PathBuf,
}

impl UnixSpoolBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            temp_dir: config.temp_dir.clone(),
            lp: config.lp_program.clone(),
            lpstat: config.lpstat_program.clone(),
        }
    }

    fn lp_command(&self, printer_name: &str, file: &Path) -> Command {
        let mut command = Command::new(&self.lp);
        let name = printer_name.trim();
        if !name.is_empty() {
            command.arg("-d").arg(name);
        }
        command.arg(file);
        command
    }
}

impl PrintBackend for UnixSpoolBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SpoolUnix
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, PrintBridgeError> {
        // parse_lpstat expects the untranslated "printer NAME ..." lines
        let output = Command::new(&self.lpstat)
            .arg("-p")
            .env("LC_ALL", "C")
            .output()
            .map_err(|e| {
                PrintBridgeError::Enumeration(format!(
                    "failed to run {}: {}",
                    self.lpstat.display(),
                    e
                ))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            if enumerate::lpstat_reports_no_printers(&stderr) {
                return Ok(Vec::new());
            }
            return Err(PrintBridgeError::Enumeration(format!(
                "{} exited with {}: {}",
                self.lpstat.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(enumerate::parse_lpstat(&String::from_utf8_lossy(&output.stdout)))
    }

    fn print(&self, document: &str, settings: &Settings) -> Result<(), PrintBridgeError> {
        let job = TempDocument::create(&self.temp_dir, document)?;
        let output = run_command(&mut self.lp_command(&settings.printer_name, job.path()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::info!(response = %stdout.trim(), "job submitted to CUPS");
        }
        Ok(())
    }
}

// ============================================================================
// WINDOWS
// ============================================================================

/// Prints with PowerShell `Out-Printer`, enumerates with `wmic`.
///
/// An empty printer name omits `-Name`, which prints to the default printer.
#[derive(Debug, Clone)]
pub struct WindowsSpoolBackend {
    temp_dir: PathBuf,
    powershell: PathBuf,
    wmic: PathBuf,
}

impl WindowsSpoolBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            temp_dir: config.temp_dir.clone(),
            powershell: config.powershell_program.clone(),
            wmic: config.wmic_program.clone(),
        }
    }
}

impl PrintBackend for WindowsSpoolBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SpoolWindows
    }

    fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, PrintBridgeError> {
        let output = run_command(Command::new(&self.wmic).args(["printer", "get", "name"]))
            .map_err(|e| PrintBridgeError::Enumeration(e.to_string()))?;
        Ok(enumerate::parse_wmic(&String::from_utf8_lossy(&output.stdout)))
    }

    fn print(&self, document: &str, settings: &Settings) -> Result<(), PrintBridgeError> {
        let job = TempDocument::create(&self.temp_dir, document)?;
        let script = out_printer_script(job.path(), &settings.printer_name);
        run_command(
            Command::new(&self.powershell).args(["-NoProfile", "-NonInteractive", "-Command"]).arg(script),
        )?;
        Ok(())
    }
}

/// PowerShell pipeline printing `file` to `printer_name`.
fn out_printer_script(file: &Path, printer_name: &str) -> String {
    let mut script = format!(
        "Get-Content -LiteralPath {} | Out-Printer",
        ps_quote(&file.to_string_lossy())
    );
    let name = printer_name.trim();
    if !name.is_empty() {
        script.push_str(" -Name ");
        script.push_str(&ps_quote(name));
    }
    script
}

/// Single-quote a PowerShell string literal; embedded quotes are doubled.
fn ps_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// ============================================================================
// TESTS
// ============================================================================
