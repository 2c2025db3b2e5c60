//! Signature markers of the two embedded payloads.
//!
//! All finders take an absolute range of the buffer to search in and return
//! absolute offsets.

use std::ops::Range;
use std::sync::OnceLock;

use pkp_common::search;
use regex::bytes::Regex;

/// Start of a PDF document.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// End-of-file marker of a PDF revision.
pub const PDF_EOF_MARKER: &[u8] = b"%%EOF";

/// Number of `%%EOF` markers that close the embedded PDF.
///
/// The authoring tool always appends one incremental update to the document,
/// so the first marker only closes the original revision.
pub const PDF_EOF_COUNT: usize = 2;

/// Anchor used to locate the script before running the full pattern.
pub const SCRIPT_ANCHOR: &[u8] = b"import ";

/// How far before the first anchor the script pattern search starts, so that
/// a `from package.module import` line is matched from its beginning.
pub const SCRIPT_LOOKBEHIND: usize = 25;

/// Byte that terminates the script inside the container.
pub const SCRIPT_TERMINATOR: u8 = 0x01;

fn script_start_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?-u)from [\w.]+ import|import [\w.]+").expect("script start pattern is valid")
    })
}

/// Offset of the first PDF signature in `buf`.
#[inline]
pub fn find_pdf_start(buf: &[u8]) -> Option<usize> {
    search::find_pattern(PDF_SIGNATURE, buf)
}

/// End offset (exclusive) of the PDF that starts at `start`.
///
/// `None` when the document has fewer than [`PDF_EOF_COUNT`] markers.
#[inline]
pub fn find_pdf_end(buf: &[u8], start: usize) -> Option<usize> {
    search::find_nth_end_from(PDF_EOF_MARKER, buf, start, PDF_EOF_COUNT)
}

/// Offset of the first script statement (`import x` or `from x import`)
/// inside `within`.
pub fn find_script_start(buf: &[u8], within: Range<usize>) -> Option<usize> {
    let segment = buf.get(within.clone())?;
    let anchor = search::find_pattern(SCRIPT_ANCHOR, segment)?;
    let from = anchor.saturating_sub(SCRIPT_LOOKBEHIND);

    script_start_pattern()
        .find_at(segment, from)
        .map(|m| within.start + m.start())
}

/// End offset (exclusive) of the script that starts at `start`, bounded by
/// `limit`.
#[inline]
pub fn find_script_end(buf: &[u8], start: usize, limit: usize) -> usize {
    let limit = limit.min(buf.len());
    match search::find_byte_from(SCRIPT_TERMINATOR, &buf[..limit], start) {
        Some(pos) => pos,
        None => limit,
    }
}
