//! Path sandbox and transfer engine.
//!
//! This is the "just works" layer: hand a [`Device`] any `Read + Write` link
//! and call `list_dir`, `download`, `upload` or `remove`. Paths are confined
//! to the device root before anything reaches the wire, and uploads are
//! split into acknowledged chunks.

pub mod cancel;
pub mod config;
pub mod device;
pub mod error;
pub mod sandbox;
pub mod transfer;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use cancel::CancelToken;
pub use config::{DeviceConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_PATH_LEN, DEFAULT_ROOT};
pub use device::Device;
pub use error::{EngineError, Result};
pub use sandbox::{normalize, SandboxError, SandboxedPath};
pub use transfer::{UploadProgress, UploadSummary};
