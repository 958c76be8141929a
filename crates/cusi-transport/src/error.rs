/// Errors that can occur while opening or enumerating serial ports.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the named port.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Failed to enumerate the serial ports of this host.
    #[error("failed to list serial ports: {0}")]
    Enumerate(serialport::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
