//! # Raw Device Transport
//!
//! Writes bytes straight to a printer device node: a USB printer class
//! device (`/dev/usb/lp0`, `/dev/lp0`), a Bluetooth RFCOMM serial port
//! (`/dev/rfcomm0`), or any other character device or file.
//!
//! ## TTY Configuration
//!
//! When the device is a TTY (serial or RFCOMM) it is switched to raw mode
//! so binary data is transmitted unmodified:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, etc. cleared
//! - **No output processing**: OPOST cleared (no CR/LF translation)
//! - **8-bit characters**: CS8, no parity
//! - **No echo, non-canonical**
//!
//! USB printer class devices are not TTYs and are used as-is.
//!
//! ## Chunked Writes
//!
//! Large writes are split into 4096-byte chunks with a short delay between
//! them so slow serial links do not overflow.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::error::PrintBridgeError;

/// Default device path used when no printer name is configured
#[cfg(target_os = "linux")]
pub const DEFAULT_DEVICE: &str = "/dev/usb/lp0";
#[cfg(not(target_os = "linux"))]
pub const DEFAULT_DEVICE: &str = "/dev/lp0";

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// # Printer Device Transport
///
/// An open, write-only connection to a printer device.
///
/// ```no_run
/// use printbridge::transport::DeviceTransport;
/// use printbridge::protocol::commands;
///
/// let mut transport = DeviceTransport::open("/dev/usb/lp0")?;
/// transport.write_all(&commands::init())?;
/// transport.flush()?;
/// # Ok::<(), printbridge::PrintBridgeError>(())
/// ```
pub struct DeviceTransport {
    file: File,
    path: PathBuf,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl DeviceTransport {
    /// Open the device for writing.
    ///
    /// Failing to open the device means the printer is unplugged, powered
    /// off, unpaired, or not writable by this user; all of these are
    /// reported as [`PrintBridgeError::NotConnected`].
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, PrintBridgeError> {
        let path = device.as_ref();

        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            PrintBridgeError::NotConnected(format!("cannot open {}: {}", path.display(), e))
        })?;

        configure_if_tty(&file)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        })
    }

    /// Path this transport was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the chunk size for large writes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    /// Write data to the printer, chunking large writes.
    ///
    /// Data is not guaranteed to reach the device until [`flush`](Self::flush).
    pub fn write_all(&mut self, data: &[u8]) -> Result<(), PrintBridgeError> {
        if data.len() <= self.chunk_size {
            return self.write_chunk(data);
        }

        for chunk in data.chunks(self.chunk_size) {
            self.write_chunk(chunk)?;
            if !self.chunk_delay.is_zero() {
                thread::sleep(self.chunk_delay);
            }
        }
        Ok(())
    }

    /// Flush buffered data to the device.
    pub fn flush(&mut self) -> Result<(), PrintBridgeError> {
        self.file
            .flush()
            .map_err(|e| PrintBridgeError::Transport(format!("Flush failed: {}", e)))
    }

    fn write_chunk(&mut self, data: &[u8]) -> Result<(), PrintBridgeError> {
        self.file
            .write_all(data)
            .map_err(|e| PrintBridgeError::Transport(format!("Write failed: {}", e)))
    }
}

#[cfg(unix)]
fn configure_if_tty(file: &File) -> Result<(), PrintBridgeError> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    if unsafe { libc::isatty(fd) } == 1 {
        configure_tty_raw(fd)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn configure_if_tty(_file: &File) -> Result<(), PrintBridgeError> {
    Ok(())
}

/// Configure a file descriptor for raw TTY mode.
///
/// IXON/IXOFF/IXANY are cleared because 0x11 (XON) and 0x13 (XOFF) can
/// appear in encoded text and would otherwise stall the link.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<(), PrintBridgeError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(PrintBridgeError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(PrintBridgeError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
