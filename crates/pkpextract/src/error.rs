//! Error types for extraction.

use std::path::PathBuf;

use pkp_payload::ScriptIssue;
use thiserror::Error;

/// Errors that can occur while processing one input or writing the report.
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be read or decompressed.
    #[error("{0}")]
    Container(#[from] pkp_container::Error),

    /// No payload signature in the decompressed data.
    #[error("{0}")]
    Payload(#[from] pkp_payload::Error),

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The extracted script failed the sanity check.
    #[error("{name}: {issue}")]
    ScriptCheck { name: String, issue: ScriptIssue },

    /// The stats report could not be written.
    #[error("failed to write stats file {}: {source}", path.display())]
    Stats { path: PathBuf, source: csv::Error },
}

impl Error {
    /// Short category name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Container(_) => "decompress",
            Self::Payload(_) => "format",
            Self::Write { .. } => "write",
            Self::ScriptCheck { .. } => "script",
            Self::Stats { .. } => "stats",
        }
    }
}

/// Result type for extraction.
pub type Result<T> = std::result::Result<T, Error>;
