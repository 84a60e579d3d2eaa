//! # ESC/POS Commands
//!
//! The subset of the ESC/POS command set needed to stream plain text lines
//! to a receipt printer and cut the paper afterwards.
//!
//! ## Byte Sequences
//!
//! | Command | ASCII | Hex |
//! |---------|-------|-----|
//! | Initialize | ESC @ | 1B 40 |
//! | Code table | ESC t n | 1B 74 n |
//! | Feed lines | ESC d n | 1B 64 n |
//! | Feed + cut | GS V m n | 1D 56 m n |
//!
//! Epson TM-series, Xprinter, Rongta and most generic 58/80mm thermal
//! printers accept these sequences unchanged.

// ============================================================================
// CONTROL BYTES
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Prefix for cutter, barcode and status commands
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// Code table number for PC437 (USA, Standard Europe)
pub const CODE_TABLE_PC437: u8 = 0;

/// Lines fed before cutting so the last printed line clears the cutter
pub const CUT_FEED_LINES: u8 = 4;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets text modes to their power-on defaults.
/// Sent at the start of every job.
///
/// ```
/// use printbridge::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Select Character Code Table (ESC t n)
///
/// Text sent by [`crate::protocol::cp437::encode`] assumes table 0 (PC437).
///
/// ```
/// use printbridge::protocol::commands;
///
/// assert_eq!(commands::code_table(commands::CODE_TABLE_PC437), vec![0x1B, 0x74, 0]);
/// ```
#[inline]
pub fn code_table(n: u8) -> Vec<u8> {
    vec![ESC, b't', n]
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// CUTTER CONTROL
// ============================================================================

/// # Feed and Partial Cut (GS V B n)
///
/// Feeds `n` motion units past the print position, then cuts the paper
/// leaving a small hinge so the receipt stays attached to the roll until
/// torn off.
///
/// ```
/// use printbridge::protocol::commands;
///
/// assert_eq!(commands::cut_partial_feed(0), vec![0x1D, 0x56, 0x42, 0x00]);
/// ```
#[inline]
pub fn cut_partial_feed(n: u8) -> Vec<u8> {
    vec![GS, b'V', b'B', n]
}

/// Trailer appended after the last line of a job: feed clear of the cutter,
/// then partial cut.
pub fn finish_and_cut() -> Vec<u8> {
    let mut data = feed_lines(CUT_FEED_LINES);
    data.extend(cut_partial_feed(0));
    data
}

// ============================================================================
// TESTS
// ============================================================================
