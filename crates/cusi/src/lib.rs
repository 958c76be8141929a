//! File management for M5Stack MicroPython devices over a serial link.
//!
//! cusi lists, downloads, uploads and removes files on the device's flash
//! file system through a small framed binary protocol.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial port opening and enumeration
//! - [`frame`] — Command frames, reply containers and CRC-16
//! - [`engine`] — Path sandbox and transfer engine

/// Re-export transport types.
pub mod transport {
    pub use cusi_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use cusi_frame::*;
}

/// Re-export engine types.
pub mod engine {
    pub use cusi_engine::*;
}
