use std::io::{ErrorKind, Read, Write};

use serialport::SerialPort;

/// An open serial link to the device. Implements `Read` and `Write`.
///
/// A read that times out returns `Ok(0)`: on this link zero bytes means
/// "nothing more within the read timeout", not end of file.
pub struct DeviceStream {
    name: String,
    inner: Box<dyn SerialPort>,
}

impl DeviceStream {
    pub(crate) fn new(name: &str, inner: Box<dyn SerialPort>) -> Self {
        Self {
            name: name.to_string(),
            inner,
        }
    }
}

impl Read for DeviceStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.inner.read(buf) {
            Err(err) if err.kind() == ErrorKind::TimedOut => Ok(0),
            other => other,
        }
    }
}

impl Write for DeviceStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for DeviceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStream")
            .field("name", &self.name)
            .finish()
    }
}
