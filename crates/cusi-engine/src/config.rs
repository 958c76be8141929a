use cusi_frame::DEFAULT_MAX_RESPONSE;

/// Device-side directory every path is confined to.
pub const DEFAULT_ROOT: &str = "/flash";

/// Upload chunk size. The firmware reads one chunk per frame.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Longest remote path the firmware's upload path buffer accepts.
pub const DEFAULT_MAX_PATH_LEN: usize = 39;

/// Settings for a [`Device`](crate::Device).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Sandbox root. Default: `/flash`.
    pub root: String,
    /// Bytes of file content per upload frame. Default: 256.
    pub chunk_size: usize,
    /// Maximum length of a sandboxed upload path in bytes. Default: 39.
    pub max_path_len: usize,
    /// Maximum size of a single reply. Default: 16 MiB.
    pub max_response_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            max_response_size: DEFAULT_MAX_RESPONSE,
        }
    }
}
