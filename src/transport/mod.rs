//! # Printer Transport Layer
//!
//! Communication backends for sending raw bytes to printers.
//!
//! - [`device`]: USB printer class, serial and RFCOMM device nodes

pub mod device;

pub use device::DeviceTransport;
