//! Byte pattern searching.
//!
//! Thin wrappers over memchr, which picks AVX2/SSE2/NEON at runtime. All
//! offsets returned are absolute offsets into the haystack, including the
//! `_from` variants that start searching part way in.

/// Find the first occurrence of a byte at or after `start`.
#[inline]
pub fn find_byte_from(needle: u8, data: &[u8], start: usize) -> Option<usize> {
    let tail = data.get(start..)?;
    memchr::memchr(needle, tail).map(|pos| start + pos)
}

/// Find a multi-byte pattern in a slice.
#[inline]
pub fn find_pattern(needle: &[u8], haystack: &[u8]) -> Option<usize> {
    memchr::memmem::find(haystack, needle)
}

/// Find the end offset of the `nth` (1-based) non-overlapping occurrence of
/// `needle` at or after `start`.
///
/// Returns the offset one past the last byte of that occurrence.
pub fn find_nth_end_from(needle: &[u8], haystack: &[u8], start: usize, nth: usize) -> Option<usize> {
    if nth == 0 || needle.is_empty() {
        return None;
    }

    let finder = memchr::memmem::Finder::new(needle);
    let mut cursor = start;
    for _ in 0..nth {
        let tail = haystack.get(cursor..)?;
        cursor += finder.find(tail)? + needle.len();
    }
    Some(cursor)
}
