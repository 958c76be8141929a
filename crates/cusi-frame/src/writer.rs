use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::Command;
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Writes complete command frames to any `Write` link.
pub struct CommandWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> CommandWriter<T> {
    /// Create a new command writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and send a command (blocking).
    pub fn send(&mut self, command: &Command) -> Result<()> {
        self.buf.clear();
        command.encode(&mut self.buf);
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        trace!(bytes = self.buf.len(), "wrote command frame");

        self.flush()
    }

    /// Flush the underlying link.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::encode_frame;
    use crate::opcode::LIST_DIR;

    fn list_root() -> Command {
        Command::ListDir {
            path: "/flash".to_string(),
        }
    }

    #[test]
    fn write_single_command() {
        let mut wire = Vec::new();
        CommandWriter::new(&mut wire).send(&list_root()).unwrap();

        assert_eq!(
            wire,
            vec![0x03, b'/', b'f', b'l', b'a', b's', b'h', 0xC7, 0x4F]
        );
    }

    #[test]
    fn command_matches_raw_frame_encoding() {
        let mut wire = Vec::new();
        CommandWriter::new(&mut wire)
            .send(&Command::ListDir {
                path: "/flash/lib".to_string(),
            })
            .unwrap();

        assert_eq!(wire, encoded(LIST_DIR, b"/flash/lib"));
    }

    #[test]
    fn consecutive_commands_do_not_accumulate() {
        let mut wire = Vec::new();
        let cmd = Command::Remove {
            path: "/flash/a".to_string(),
        };
        let mut writer = CommandWriter::new(&mut wire);
        writer.send(&cmd).unwrap();
        writer.send(&cmd).unwrap();
        drop(writer);

        let single = cmd.to_bytes();
        assert_eq!(wire.len(), 2 * single.len());
        assert_eq!(&wire[..single.len()], &wire[single.len()..]);
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = CommandWriter::new(sink);

        writer.send(&list_root()).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_and_short_writes() {
        let mut link = FlakyWriter {
            calls: 0,
            data: Vec::new(),
        };
        CommandWriter::new(&mut link).send(&list_root()).unwrap();

        assert_eq!(link.data, encoded(LIST_DIR, b"/flash"));
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = CommandWriter::new(ZeroWriter);
        let err = writer.send(&list_root()).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    fn encoded(opcode: u8, payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(opcode, payload, &mut buf);
        buf.to_vec()
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
    /// Interrupts the first write, blocks the second, then accepts three bytes at a time.
    struct FlakyWriter {
        calls: usize,
        data: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            match self.calls {
                1 => Err(std::io::Error::from(ErrorKind::Interrupted)),
                2 => Err(std::io::Error::from(ErrorKind::WouldBlock)),
                _ => {
                    let n = buf.len().min(3);
                    self.data.extend_from_slice(&buf[..n]);
                    Ok(n)
                }
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
