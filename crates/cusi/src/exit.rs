use std::fmt;
use std::io;

use cusi_engine::{EngineError, SandboxError};
use cusi_frame::FrameError;
use cusi_transport::TransportError;

// Process exit codes. 1-3 keep the meaning they have always had for scripts.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const LIST_PORTS_FAILED: i32 = 1;
pub const USAGE: i32 = 2;
pub const OPEN_FAILED: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const TIMEOUT: i32 = 124;
pub const INTERRUPTED: i32 = 130;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::AlreadyExists => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { .. } => CliError::new(OPEN_FAILED, format!("{context}: {err}")),
        TransportError::Enumerate(_) => {
            CliError::new(LIST_PORTS_FAILED, format!("{context}: {err}"))
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::NoResponse => CliError::new(TIMEOUT, format!("{context}: {err}")),
        FrameError::MalformedFrame(_) | FrameError::ResponseTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::DeviceError { .. } | FrameError::ConnectionClosed => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

pub fn engine_error(context: &str, err: EngineError) -> CliError {
    match err {
        EngineError::Frame(err) => frame_error(context, err),
        EngineError::Sandbox(SandboxError::AbsolutePathRejected(_))
        | EngineError::Sandbox(SandboxError::PathEscape(_))
        | EngineError::Sandbox(SandboxError::NulByte(_))
        | EngineError::PathTooLong { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        EngineError::LocalIo { context: what, source } => {
            io_error(&format!("{context}: {what}"), source)
        }
        EngineError::UnexpectedResult(_) | EngineError::BinaryContent => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        EngineError::RemoveFailed(_) | EngineError::Cancelled { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_errors_are_usage_errors() {
        let err = engine_error(
            "get",
            EngineError::Sandbox(SandboxError::AbsolutePathRejected("/x".to_string())),
        );
        assert_eq!(err.code, USAGE);
        assert_eq!(err.message, "get: absolute path is not permitted: /x");

        let err = engine_error(
            "put",
            EngineError::Sandbox(SandboxError::NulByte("a\0b".to_string())),
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn local_io_keeps_both_contexts() {
        let err = engine_error(
            "put",
            EngineError::LocalIo {
                context: "failed to open local file",
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.starts_with("put: failed to open local file: "));
    }

    #[test]
    fn silent_device_maps_to_timeout() {
        let err = engine_error("ls", EngineError::Frame(FrameError::NoResponse));
        assert_eq!(err.code, TIMEOUT);
        assert_eq!(err.to_string(), "ls: no response");
    }
}
