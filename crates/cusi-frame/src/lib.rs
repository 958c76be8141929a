//! Command/response framing for the cusi serial file protocol.
//!
//! Host to device, every command is one frame:
//! - A 1-byte opcode
//! - The opcode-specific payload
//! - A 2-byte CRC-16/Modbus over opcode and payload, high byte first
//!
//! Device to host, every reply is one container delimited by fixed header
//! and footer markers and carrying a status byte. There is no length field:
//! the reply ends when the link goes quiet.

pub mod checksum;
pub mod codec;
pub mod error;
pub mod opcode;
pub mod reader;
pub mod writer;

pub use checksum::{append_checksum, crc16};
pub use codec::{
    decode_response, encode_container, encode_frame, parse_container, Command, Container,
    FIRST_CHUNK, FOOTER, HEADER, MIN_CONTAINER_SIZE, NEXT_CHUNK, STATUS_OK,
};
pub use error::{FrameError, Result};
pub use opcode::{opcode_name, DOWNLOAD, LIST_DIR, REMOVE, UPLOAD};
pub use reader::{ReaderConfig, ResponseReader, DEFAULT_MAX_RESPONSE};
pub use writer::CommandWriter;
