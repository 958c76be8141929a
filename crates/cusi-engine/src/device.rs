use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bytes::Bytes;
use cusi_frame::{Command, CommandWriter, ReaderConfig, ResponseReader};
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::config::DeviceConfig;
use crate::error::{EngineError, Result};
use crate::sandbox::{normalize, SandboxError, SandboxedPath};
use crate::transfer::{contains, read_chunk, UploadProgress, UploadSession, UploadSummary, CHUNK_ACK};

/// Marker the firmware sends after deleting a file.
const REMOVE_ACK: &[u8] = b"ok";

/// A device file system reached over a `Read + Write` link.
///
/// One command is in flight at a time: every operation writes its frame and
/// reads the reply before returning.
pub struct Device<T> {
    link: T,
    config: DeviceConfig,
}

impl<T: Read + Write> Device<T> {
    /// Wrap a link with default configuration.
    pub fn new(link: T) -> Self {
        Self::with_config(link, DeviceConfig::default())
    }

    /// Wrap a link with explicit configuration.
    pub fn with_config(link: T, config: DeviceConfig) -> Self {
        Self { link, config }
    }

    /// Current configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Confine `path` to the configured root.
    pub fn sandbox(&self, path: &str) -> std::result::Result<SandboxedPath, SandboxError> {
        normalize(&self.config.root, path)
    }

    /// Throw away anything the device printed before we started talking to it.
    pub fn clear_input(&mut self) -> Result<usize> {
        let discarded = ResponseReader::new(&mut self.link).drain()?;
        if discarded > 0 {
            debug!(bytes = discarded, "discarded stale device output");
        }
        Ok(discarded)
    }

    /// Run one command/reply exchange and return the reply body.
    pub fn execute(&mut self, command: &Command) -> Result<Bytes> {
        CommandWriter::new(&mut self.link).send(command)?;
        debug!(command = command.name(), path = command.path(), "sent command");

        let reader_config = ReaderConfig {
            max_response_size: self.config.max_response_size,
        };
        let body = ResponseReader::with_config(&mut self.link, reader_config).read_response()?;
        debug!(command = command.name(), bytes = body.len(), "received reply");
        Ok(body)
    }

    /// List a directory, defaulting to the root.
    ///
    /// A path the sandbox rejects lists nothing: the call succeeds with no
    /// entries and no frame is sent.
    pub fn list_dir(&mut self, path: Option<&str>) -> Result<Vec<String>> {
        let path = match path {
            None => self.sandbox("")?,
            Some(path) => match self.sandbox(path) {
                Ok(path) => path,
                Err(err) => {
                    debug!(%err, "not listing rejected path");
                    return Ok(Vec::new());
                }
            },
        };

        let body = self.execute(&Command::ListDir {
            path: path.into_string(),
        })?;
        Ok(parse_listing(&body))
    }

    /// Read a whole remote file.
    pub fn download(&mut self, path: &str) -> Result<Bytes> {
        let path = self.sandbox(path)?;
        self.execute(&Command::Download {
            path: path.into_string(),
        })
    }

    /// Read a remote file that is about to be displayed; binary content is an error.
    pub fn download_text(&mut self, path: &str) -> Result<String> {
        let body = self.download(path)?;
        String::from_utf8(body.to_vec()).map_err(|_| EngineError::BinaryContent)
    }

    /// Delete a remote file.
    pub fn remove(&mut self, path: &str) -> Result<()> {
        let path = self.sandbox(path)?;
        let body = self.execute(&Command::Remove {
            path: path.into_string(),
        })?;
        if !contains(&body, REMOVE_ACK) {
            return Err(EngineError::RemoveFailed(
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }
        Ok(())
    }

    /// Upload `source` to `remote`, chunk by chunk.
    ///
    /// `total` is only used for progress reporting. `on_progress` runs after
    /// every acknowledged chunk. Cancellation is checked before each chunk, so
    /// a chunk that is on the wire always completes.
    pub fn upload<R, F>(
        &mut self,
        source: R,
        total: u64,
        remote: &str,
        cancel: &CancelToken,
        on_progress: F,
    ) -> Result<UploadSummary>
    where
        R: Read,
        F: FnMut(UploadProgress),
    {
        let remote = self.upload_target(remote)?;
        self.send_chunks(source, total, remote, cancel, on_progress)
    }

    /// Upload a local file to `remote`.
    pub fn upload_file<F>(
        &mut self,
        local: &Path,
        remote: &str,
        cancel: &CancelToken,
        on_progress: F,
    ) -> Result<UploadSummary>
    where
        F: FnMut(UploadProgress),
    {
        let remote = self.upload_target(remote)?;
        let file = File::open(local).map_err(EngineError::local_io("failed to open local file"))?;
        let total = file
            .metadata()
            .map_err(EngineError::local_io("failed to stat local file"))?
            .len();
        self.send_chunks(file, total, remote, cancel, on_progress)
    }

    /// Sandbox an upload path and check it fits the firmware's path buffer.
    fn upload_target(&self, remote: &str) -> Result<SandboxedPath> {
        let remote = self.sandbox(remote)?;
        if remote.len() > self.config.max_path_len {
            return Err(EngineError::PathTooLong {
                len: remote.len(),
                path: remote.into_string(),
                max: self.config.max_path_len,
            });
        }
        Ok(remote)
    }

    fn send_chunks<R, F>(
        &mut self,
        mut source: R,
        total: u64,
        remote: SandboxedPath,
        cancel: &CancelToken,
        mut on_progress: F,
    ) -> Result<UploadSummary>
    where
        R: Read,
        F: FnMut(UploadProgress),
    {
        debug!(path = %remote, total, "starting upload");
        let mut session = UploadSession::new(remote, total);
        let mut buf = vec![0u8; self.config.chunk_size.max(1)];

        loop {
            if cancel.is_cancelled() {
                let progress = session.progress();
                warn!(sent = progress.sent, total, "upload cancelled");
                return Err(EngineError::Cancelled {
                    sent: progress.sent,
                    total,
                });
            }

            let read = read_chunk(&mut source, &mut buf)
                .map_err(EngineError::local_io("failed to read local file"))?;
            if read == 0 {
                break;
            }

            let command = session.next_command(Bytes::copy_from_slice(&buf[..read]));
            let ack = self.execute(&command).inspect_err(|err| {
                warn!(%err, sent = session.progress().sent, "upload aborted");
            })?;
            if !contains(&ack, CHUNK_ACK) {
                let body = String::from_utf8_lossy(&ack).into_owned();
                warn!(reply = %body, sent = session.progress().sent, "upload aborted");
                return Err(EngineError::UnexpectedResult(body));
            }

            on_progress(session.record(read));
        }

        let summary = session.finish();
        debug!(path = %summary.remote_path, bytes = summary.bytes_sent, chunks = summary.chunks, "upload complete");
        Ok(summary)
    }

    /// Borrow the underlying link.
    pub fn get_ref(&self) -> &T {
        &self.link
    }
}

/// Split a comma-separated listing, dropping empty entries.
pub fn parse_listing(body: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(body)
        .split(',')
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
