/// Errors that can occur while exchanging frames with the device.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The reply is too short or its header/footer markers do not match.
    #[error("invalid response: {0}")]
    MalformedFrame(&'static str),

    /// The device answered with a non-zero status byte.
    #[error("device error (status 0x{status:02x}): {message}")]
    DeviceError { status: u8, message: String },

    /// The device did not send a single byte before going quiet.
    #[error("no response")]
    NoResponse,

    /// The reply kept growing past the configured maximum.
    #[error("response too large ({size} bytes, max {max})")]
    ResponseTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link accepted zero bytes of a command frame.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
