use cusi_frame::FrameError;

use crate::sandbox::SandboxError;

/// Errors that can occur while running a device operation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Frame exchange failed (malformed reply, device error, no reply, I/O).
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The path was rejected by the sandbox.
    #[error("{0}")]
    Sandbox(#[from] SandboxError),

    /// The sandboxed upload path does not fit the firmware's path buffer.
    #[error("REMOTE path [{path}:{len}] is too long (max: {max})")]
    PathTooLong { path: String, len: usize, max: usize },

    /// An upload chunk was not acknowledged with `done`.
    #[error("unexpected result: {0:?}")]
    UnexpectedResult(String),

    /// The device did not confirm a removal with `ok`.
    #[error("failed to remove file: {0}")]
    RemoveFailed(String),

    /// Downloaded content is not text and cannot be displayed.
    #[error("file contains binary data")]
    BinaryContent,

    /// A local file could not be opened, inspected or read.
    #[error("{context}: {source}")]
    LocalIo {
        context: &'static str,
        source: std::io::Error,
    },

    /// The upload was cancelled between chunks.
    #[error("upload cancelled after {sent} of {total} bytes")]
    Cancelled { sent: u64, total: u64 },
}

impl EngineError {
    pub(crate) fn local_io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| EngineError::LocalIo { context, source }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
