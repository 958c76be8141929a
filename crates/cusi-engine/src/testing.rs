//! Scripted in-memory device for tests.

use std::collections::VecDeque;
use std::io::{Read, Write};

use bytes::BytesMut;
use cusi_frame::{encode_container, STATUS_OK};

/// Bytes served per read call, so replies arrive in pieces like on a UART.
const DEFAULT_READ_SIZE: usize = 64;

/// An in-memory stand-in for the serial link.
///
/// Every flushed write is recorded as one command frame and arms the next
/// scripted reply. Reads serve the armed reply and then return `Ok(0)`, the
/// way the real link reports an idle device.
#[derive(Debug)]
pub struct MockDevice {
    replies: VecDeque<Option<Vec<u8>>>,
    outgoing: Vec<u8>,
    pos: usize,
    read_size: usize,
    pending: Vec<u8>,
    frames: Vec<Vec<u8>>,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            replies: VecDeque::new(),
            outgoing: Vec::new(),
            pos: 0,
            read_size: DEFAULT_READ_SIZE,
            pending: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Queue a successful reply carrying `body`.
    pub fn reply_ok(self, body: &[u8]) -> Self {
        self.reply_status(STATUS_OK, body)
    }

    /// Queue a reply with an explicit status byte.
    pub fn reply_status(self, status: u8, body: &[u8]) -> Self {
        let mut raw = BytesMut::new();
        encode_container(status, body, &mut raw);
        self.reply_raw(&raw)
    }

    /// Queue raw reply bytes, framed or not.
    pub fn reply_raw(mut self, raw: &[u8]) -> Self {
        self.replies.push_back(Some(raw.to_vec()));
        self
    }

    /// Queue a command that gets no reply at all.
    pub fn reply_silence(mut self) -> Self {
        self.replies.push_back(None);
        self
    }

    /// Bytes already waiting on the link before the first command.
    pub fn with_stale_input(mut self, bytes: &[u8]) -> Self {
        self.outgoing = bytes.to_vec();
        self.pos = 0;
        self
    }

    /// Limit how many bytes a single read returns.
    pub fn with_read_size(mut self, read_size: usize) -> Self {
        self.read_size = read_size.max(1);
        self
    }

    /// Command frames received so far, one entry per flush.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Scripted replies not yet consumed.
    pub fn remaining_replies(&self) -> usize {
        self.replies.len()
    }
}

impl Read for MockDevice {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pos >= self.outgoing.len() {
            self.outgoing.clear();
            self.pos = 0;
            return Ok(0);
        }
        let n = buf
            .len()
            .min(self.read_size)
            .min(self.outgoing.len() - self.pos);
        buf[..n].copy_from_slice(&self.outgoing[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MockDevice {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.frames.push(std::mem::take(&mut self.pending));
        if let Some(Some(reply)) = self.replies.pop_front() {
            self.outgoing = reply;
            self.pos = 0;
        }
        Ok(())
    }
}
