//! Error types for payload splitting.

use thiserror::Error;

/// Errors that can occur when splitting a decompressed buffer.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither a PDF signature nor a script start marker was found.
    #[error("no PDF or script signature found in {len} bytes")]
    NoSignature { len: usize },
}

/// Result type for payload operations.
pub type Result<T> = std::result::Result<T, Error>;
