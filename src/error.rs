use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, VmError>;

/// Errors surfaced by the translation pipeline and its I/O edges
#[derive(Error, Debug)]
pub enum VmError {
    /// The backing store file is missing or unopenable; fatal for the run.
    #[error("cannot open backing store {path}: {source}")]
    BackingStoreOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A page read from the backing store failed or came up short.
    /// Aborts the in-flight page fault.
    #[error("backing store read failed for page {page}: {source}")]
    Io {
        page: u32,
        #[source]
        source: std::io::Error,
    },

    /// The address trace file is missing or unreadable; fatal for the run.
    #[error("cannot read address trace {path}: {source}")]
    AddressSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A trace line did not parse as a non-negative integer.
    #[error("malformed address on line {line}: {token:?}")]
    MalformedAddress { line: usize, token: String },

    /// All physical frames are in use and no eviction policy is configured.
    #[error("physical memory exhausted: all {frames} frames in use and no eviction policy configured")]
    CapacityExhausted { frames: usize },

    /// Offset outside the frame; structurally unreachable from the decoder
    /// but checked rather than trusted.
    #[error("offset {offset} outside frame bounds (frame size {frame_size})")]
    InvalidAddress { offset: usize, frame_size: usize },

    /// Frame index outside physical memory; structurally unreachable from
    /// the allocator but checked the same way as the offset.
    #[error("frame {frame} outside physical memory ({num_frames} frames)")]
    InvalidFrame { frame: u32, num_frames: usize },
}
