use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::append_checksum;
use crate::error::{FrameError, Result};
use crate::opcode::{opcode_name, DOWNLOAD, LIST_DIR, REMOVE, UPLOAD};

/// Reply header marker.
pub const HEADER: [u8; 3] = [0xAA, 0xAB, 0xAA];

/// Reply footer marker.
pub const FOOTER: [u8; 3] = [0xAB, 0xCC, 0xAB];

/// Smallest reply that can carry both markers: header (3) + footer (3).
pub const MIN_CONTAINER_SIZE: usize = HEADER.len() + FOOTER.len();

/// Status byte of a successful reply.
pub const STATUS_OK: u8 = 0x00;

/// Upload flag: create or truncate the target file.
pub const FIRST_CHUNK: u8 = 0x01;

/// Upload flag: append to the target file.
pub const NEXT_CHUNK: u8 = 0x00;

/// Separates the remote path from the chunk flag in an upload payload.
const PATH_TERMINATOR: u8 = 0x00;

/// Header (3) + status (1) + reserved (1).
const BODY_OFFSET: usize = 5;

/// Checksum (2) + footer (3).
const TRAILER_SIZE: usize = 5;

/// A command sent to the device. Each variant maps to exactly one opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the entries of a directory.
    ListDir { path: String },
    /// Read a whole file.
    Download { path: String },
    /// Write one chunk of a file. `first` makes the device truncate instead of append.
    Upload {
        path: String,
        chunk: Bytes,
        first: bool,
    },
    /// Delete a file.
    Remove { path: String },
}

impl Command {
    /// The opcode byte for this command.
    pub fn opcode(&self) -> u8 {
        match self {
            Command::ListDir { .. } => LIST_DIR,
            Command::Download { .. } => DOWNLOAD,
            Command::Upload { .. } => UPLOAD,
            Command::Remove { .. } => REMOVE,
        }
    }

    /// Device-side path addressed by this command.
    pub fn path(&self) -> &str {
        match self {
            Command::ListDir { path }
            | Command::Download { path }
            | Command::Upload { path, .. }
            | Command::Remove { path } => path,
        }
    }

    /// Human-readable opcode name, for logs.
    pub fn name(&self) -> &'static str {
        opcode_name(self.opcode())
    }

    /// Encode this command as a complete wire frame.
    ///
    /// ```text
    /// ┌──────────┬──────────────────────────────┬──────────────┐
    /// │ Opcode   │ Payload                      │ CRC-16 (2B)  │
    /// │ (1B)     │ path | path 0x00 flag chunk  │ high, low    │
    /// └──────────┴──────────────────────────────┴──────────────┘
    /// ```
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Command::ListDir { path } | Command::Download { path } | Command::Remove { path } => {
                encode_frame(self.opcode(), path.as_bytes(), dst);
            }
            Command::Upload { path, chunk, first } => {
                let start = dst.len();
                dst.reserve(1 + path.len() + 2 + chunk.len() + 2);
                dst.put_u8(UPLOAD);
                dst.put_slice(path.as_bytes());
                dst.put_u8(PATH_TERMINATOR);
                dst.put_u8(if *first { FIRST_CHUNK } else { NEXT_CHUNK });
                dst.put_slice(chunk);
                append_checksum(dst, start);
            }
        }
    }

    /// Encode this command into a fresh buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// Encode an opcode and raw payload into a wire frame.
///
/// The codec enforces no size limit; callers keep payloads within what the
/// device can buffer.
pub fn encode_frame(opcode: u8, payload: &[u8], dst: &mut BytesMut) {
    let start = dst.len();
    dst.reserve(1 + payload.len() + 2);
    dst.put_u8(opcode);
    dst.put_slice(payload);
    append_checksum(dst, start);
}

/// A structurally valid reply from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Status byte; `STATUS_OK` on success.
    pub status: u8,
    /// Reserved byte following the status.
    pub reserved: u8,
    /// Reply body.
    pub body: Bytes,
    /// The two bytes in front of the footer, when the reply is long enough to
    /// carry them. They are surfaced as-is and never verified.
    pub checksum: Option<u16>,
}

impl Container {
    /// True when the device reported success.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Parse the container structure of a reply without looking at its status.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────┬──────────┬────────┬──────────┬──────────────┐
/// │ Header (3B)  │ Status │ Reserved │ Body   │ Checksum │ Footer (3B)  │
/// │ AA AB AA     │ (1B)   │ (1B)     │ (N B)  │ (2B)     │ AB CC AB     │
/// └──────────────┴────────┴──────────┴────────┴──────────┴──────────────┘
/// ```
///
/// Replies of 6 to 9 bytes have valid markers but no room for a body, so
/// their body is empty.
pub fn parse_container(raw: &[u8]) -> Result<Container> {
    if raw.len() < MIN_CONTAINER_SIZE {
        return Err(FrameError::MalformedFrame("frame too short"));
    }
    if raw[..HEADER.len()] != HEADER {
        return Err(FrameError::MalformedFrame("header mismatch"));
    }
    if raw[raw.len() - FOOTER.len()..] != FOOTER {
        return Err(FrameError::MalformedFrame("footer mismatch"));
    }

    let status = raw[3];
    let reserved = raw[4];

    let (body, checksum) = if raw.len() >= BODY_OFFSET + TRAILER_SIZE {
        let end = raw.len() - TRAILER_SIZE;
        (
            Bytes::copy_from_slice(&raw[BODY_OFFSET..end]),
            Some(u16::from_be_bytes([raw[end], raw[end + 1]])),
        )
    } else {
        (Bytes::new(), None)
    };

    Ok(Container {
        status,
        reserved,
        body,
        checksum,
    })
}

/// Decode a reply into its body, turning a non-zero status into an error.
pub fn decode_response(raw: &[u8]) -> Result<Bytes> {
    let container = parse_container(raw)?;
    if !container.is_ok() {
        return Err(FrameError::DeviceError {
            status: container.status,
            message: String::from_utf8_lossy(&container.body).into_owned(),
        });
    }
    Ok(container.body)
}

/// Encode a reply the way the device firmware does.
///
/// The checksum field carries CRC-16/Modbus over status, reserved byte and
/// body. Used by device simulators and tests.
pub fn encode_container(status: u8, body: &[u8], dst: &mut BytesMut) {
    dst.reserve(BODY_OFFSET + body.len() + TRAILER_SIZE);
    dst.put_slice(&HEADER);
    let start = dst.len();
    dst.put_u8(status);
    dst.put_u8(0x00);
    dst.put_slice(body);
    append_checksum(dst, start);
    dst.put_slice(&FOOTER);
}
