use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::codec::decode_response;
use crate::error::{FrameError, Result};

/// Default cap on a single reply: 16 MiB.
pub const DEFAULT_MAX_RESPONSE: usize = 16 * 1024 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 512;
const READ_CHUNK_SIZE: usize = 256;

/// Configuration for the response reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum number of bytes accepted for one reply. Default: 16 MiB.
    pub max_response_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_response_size: DEFAULT_MAX_RESPONSE,
        }
    }
}

/// Reads device replies from any `Read` link.
///
/// Replies carry no length field. A reply is everything the link yields
/// until a read returns zero bytes, which on the serial link means the read
/// timeout elapsed with the device silent.
pub struct ResponseReader<T> {
    inner: T,
    buf: BytesMut,
    config: ReaderConfig,
}

impl<T: Read> ResponseReader<T> {
    /// Create a new reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ReaderConfig::default())
    }

    /// Create a new reader with explicit configuration.
    pub fn with_config(inner: T, config: ReaderConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read raw reply bytes until the link goes idle.
    ///
    /// Returns `Err(FrameError::NoResponse)` when the first read already
    /// yields nothing.
    pub fn read_raw(&mut self) -> Result<Bytes> {
        self.buf.clear();
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                break;
            }

            let size = self.buf.len() + read;
            if size > self.config.max_response_size {
                return Err(FrameError::ResponseTooLarge {
                    size,
                    max: self.config.max_response_size,
                });
            }
            self.buf.extend_from_slice(&chunk[..read]);
        }

        if self.buf.is_empty() {
            return Err(FrameError::NoResponse);
        }

        trace!(bytes = self.buf.len(), "read raw response");
        Ok(self.buf.split().freeze())
    }

    /// Read one reply and decode it into its body.
    pub fn read_response(&mut self) -> Result<Bytes> {
        let raw = self.read_raw()?;
        decode_response(&raw)
    }

    /// Discard whatever the link has buffered, returning the number of bytes
    /// thrown away.
    pub fn drain(&mut self) -> Result<usize> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut discarded = 0usize;

        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => discarded += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        if discarded > 0 {
            trace!(bytes = discarded, "drained stale input");
        }
        Ok(discarded)
    }
}
