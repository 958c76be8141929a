//! Serial link transport.
//!
//! This is the lowest layer of cusi: it opens and enumerates serial ports and
//! hands out a [`DeviceStream`], a timeout-bounded `Read + Write` byte channel.
//! Everything above it only relies on the `std::io` traits, so the protocol
//! layers can be driven by an in-memory device in tests.

pub mod error;
pub mod serial;
pub mod stream;

pub use error::{Result, TransportError};
pub use serial::{
    available_ports, open, PortInfo, SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT,
};
pub use stream::DeviceStream;
