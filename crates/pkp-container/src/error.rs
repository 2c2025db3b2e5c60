//! Error types for the container crate.

use thiserror::Error;

/// Errors that can occur when opening or decompressing a `.pkp` container.
///
/// Every variant means the input could not be turned into a decompressed
/// buffer.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (truncated header, bad magic).
    #[error("{0}")]
    Common(#[from] pkp_common::Error),

    /// The header names a compression method other than DEFLATE.
    #[error("unsupported compression method: {0}")]
    UnsupportedMethod(u8),

    /// The header is structurally invalid.
    #[error("invalid gzip header: {0}")]
    InvalidHeader(String),

    /// Decompression error (corrupt data, truncation, CRC mismatch).
    #[error("decompression error: {0}")]
    Decompression(String),
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
