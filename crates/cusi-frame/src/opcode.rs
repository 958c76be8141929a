//! Command opcodes understood by the device firmware.

/// List a directory.
pub const LIST_DIR: u8 = 0x03;

/// Read a whole file.
pub const DOWNLOAD: u8 = 0x05;

/// Write one chunk of a file.
pub const UPLOAD: u8 = 0x06;

/// Delete a file.
pub const REMOVE: u8 = 0x07;

/// Returns a human-readable name for an opcode.
pub fn opcode_name(opcode: u8) -> &'static str {
    match opcode {
        LIST_DIR => "LIST_DIR",
        DOWNLOAD => "DOWNLOAD",
        UPLOAD => "UPLOAD",
        REMOVE => "REMOVE",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(opcode_name(0x03), "LIST_DIR");
        assert_eq!(opcode_name(0x05), "DOWNLOAD");
        assert_eq!(opcode_name(0x06), "UPLOAD");
        assert_eq!(opcode_name(0x07), "REMOVE");
        assert_eq!(opcode_name(0x04), "UNKNOWN");
    }
}
