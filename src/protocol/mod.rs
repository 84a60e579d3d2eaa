//! # ESC/POS Protocol
//!
//! Low-level byte builders used by the direct-driver backend.
//!
//! - [`commands`]: initialize, feed, cut
//! - [`cp437`]: text encoding for the printer's default code table
//!
//! ## Usage Example
//!
//! ```
//! use printbridge::protocol::{commands, cp437};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(cp437::encode("Café"));
//! data.push(commands::LF);
//! data.extend(commands::finish_and_cut());
//!
//! assert_eq!(&data[..2], &[0x1B, 0x40]);
//! ```

pub mod commands;
pub mod cp437;
