//! # Printer Enumeration
//!
//! Parsers for the OS print-status commands and the device-node scan used
//! by the direct-driver backend. Running the commands is the backends' job;
//! everything here is pure so it can be tested against captured output.

use std::fs;
use std::io;
use std::path::Path;

use super::PrinterDescriptor;

/// Parse `lpstat -p` output.
///
/// ```text
/// printer POS_PRINTER is idle.  enabled since Tue 01 Oct 2024 10:00:00 AM
/// printer Office_Laser disabled since Mon 30 Sep 2024 09:00:00 AM -
///         reason unknown
/// ```
///
/// Only lines starting with `printer` name a queue; continuation lines and
/// other boilerplate are dropped.
pub fn parse_lpstat(stdout: &str) -> Vec<PrinterDescriptor> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            match (words.next(), words.next()) {
                (Some("printer"), Some(name)) => Some(PrinterDescriptor::new(name)),
                _ => None,
            }
        })
        .collect()
}

/// Whether `lpstat` stderr means "no queues configured" rather than a failure.
pub fn lpstat_reports_no_printers(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("no destinations added") || stderr.contains("no printers")
}

/// Parse `wmic printer get name` output: a `Name` header followed by one
/// printer per line, padded with spaces and CRLF line endings.
pub fn parse_wmic(stdout: &str) -> Vec<PrinterDescriptor> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "Name")
        .map(PrinterDescriptor::new)
        .collect()
}

/// Whether a device node name looks like a raw printer port.
///
/// Matches `lp0`, `lp1`, ... (parallel/USB printer class) and `rfcomm0`,
/// `rfcomm1`, ... (Bluetooth serial).
pub fn is_printer_node(name: &str) -> bool {
    ["lp", "rfcomm"].iter().any(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    })
}

/// Scan a device root (normally `/dev`) for printer nodes.
///
/// Looks at the root itself and at `usb/`. Names are reported relative to
/// the root, e.g. `usb/lp0` or `rfcomm0`, sorted. A missing `usb/`
/// directory is not an error.
pub fn scan_device_root(root: &Path) -> io::Result<Vec<PrinterDescriptor>> {
    let mut names = Vec::new();

    for (subdir, prefix) in [("", ""), ("usb", "usb/")] {
        let dir = root.join(subdir);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if !subdir.is_empty() && e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if is_printer_node(name) {
                names.push(format!("{}{}", prefix, name));
            }
        }
    }

    names.sort();
    Ok(names.into_iter().map(PrinterDescriptor::new).collect())
}

// ============================================================================
// TESTS
// ============================================================================
