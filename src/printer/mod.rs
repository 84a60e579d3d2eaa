//! # Printer Module
//!
//! Printer descriptors and enumeration helpers.
//!
//! - [`enumerate`]: parsers for `lpstat`, `wmic`, and device-node scans

pub mod enumerate;

use serde::{Deserialize, Serialize};

/// A printer as reported by enumeration. Identity is the name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDescriptor {
    pub name: String,
}

impl PrinterDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
