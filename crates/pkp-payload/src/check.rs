//! Text-level sanity check of an extracted script.
//!
//! This does not parse Python. It only catches sources that were cut at the
//! wrong place: bytes that are not UTF-8, or NUL bytes from the container
//! framing.

use pkp_common::memchr;
use thiserror::Error;

/// Why a script source was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptIssue {
    /// The script segment contains no recognizable statement.
    #[error("no recognizable python part")]
    Missing,

    #[error("line {line}: invalid UTF-8 at byte {offset}")]
    NotUtf8 { offset: usize, line: usize },

    #[error("line {line}: NUL byte at byte {offset}")]
    NulByte { offset: usize, line: usize },
}

/// Check that `source` looks like a complete text file.
pub fn check_script(source: &[u8]) -> Result<(), ScriptIssue> {
    if let Err(e) = std::str::from_utf8(source) {
        let offset = e.valid_up_to();
        return Err(ScriptIssue::NotUtf8 {
            offset,
            line: line_of(source, offset),
        });
    }

    if let Some(offset) = memchr::memchr(0, source) {
        return Err(ScriptIssue::NulByte {
            offset,
            line: line_of(source, offset),
        });
    }

    Ok(())
}

/// 1-based line number of `offset`.
fn line_of(source: &[u8], offset: usize) -> usize {
    memchr::memchr_iter(b'\n', &source[..offset]).count() + 1
}
