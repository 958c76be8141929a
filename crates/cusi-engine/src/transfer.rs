use std::io::{ErrorKind, Read};

use bytes::Bytes;
use cusi_frame::Command;

use crate::sandbox::SandboxedPath;

/// Acknowledgment marker the firmware sends for every stored chunk.
pub(crate) const CHUNK_ACK: &[u8] = b"done";

/// Progress after a chunk has been acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Cumulative bytes acknowledged by the device.
    pub sent: u64,
    /// Size of the source, as reported by the caller.
    pub total: u64,
    /// Number of chunks acknowledged so far.
    pub chunks: usize,
}

/// Outcome of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub remote_path: SandboxedPath,
    pub bytes_sent: u64,
    pub chunks: usize,
}

/// State of one upload. Lives for a single `upload` call.
#[derive(Debug)]
pub(crate) struct UploadSession {
    remote_path: SandboxedPath,
    first_chunk_sent: bool,
    bytes_sent: u64,
    chunks: usize,
    total: u64,
}

impl UploadSession {
    pub(crate) fn new(remote_path: SandboxedPath, total: u64) -> Self {
        Self {
            remote_path,
            first_chunk_sent: false,
            bytes_sent: 0,
            chunks: 0,
            total,
        }
    }

    /// Build the frame for the next chunk. Only the first chunk of a session
    /// carries the create/truncate flag.
    pub(crate) fn next_command(&mut self, chunk: Bytes) -> Command {
        let first = !self.first_chunk_sent;
        self.first_chunk_sent = true;
        Command::Upload {
            path: self.remote_path.as_str().to_string(),
            chunk,
            first,
        }
    }

    /// Record an acknowledged chunk of `len` bytes.
    pub(crate) fn record(&mut self, len: usize) -> UploadProgress {
        self.bytes_sent += len as u64;
        self.chunks += 1;
        self.progress()
    }

    pub(crate) fn progress(&self) -> UploadProgress {
        UploadProgress {
            sent: self.bytes_sent,
            total: self.total,
            chunks: self.chunks,
        }
    }

    pub(crate) fn finish(self) -> UploadSummary {
        UploadSummary {
            remote_path: self.remote_path,
            bytes_sent: self.bytes_sent,
            chunks: self.chunks,
        }
    }
}

/// Fill `buf` from `source`, stopping early only at end of input.
pub(crate) fn read_chunk<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Substring search on raw reply bytes.
pub(crate) fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
