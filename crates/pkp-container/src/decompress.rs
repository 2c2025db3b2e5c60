//! Decompression of `.pkp` container streams.

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::header::MemberHeader;
use crate::{Error, Result};

/// Upper bound for the output pre-allocation taken from the gzip trailer.
const MAX_SIZE_HINT: usize = 256 * 1024 * 1024;

/// Decompress a whole `.pkp` stream.
///
/// The member header is validated first so that non-gzip input is reported
/// with a precise error instead of a generic decoder failure.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let header = MemberHeader::parse(data)?;
    debug!(
        header_len = header.header_len,
        os = header.os_name(),
        file_name = header.file_name.as_deref().unwrap_or(""),
        "parsed gzip member header"
    );

    let mut output = Vec::with_capacity(size_hint(data).unwrap_or(0));
    decompress_gzip(data, &mut output)?;
    Ok(output)
}

/// Decompress gzip data (all members) into `output`.
///
/// Truncated streams and CRC32/ISIZE mismatches are errors.
pub fn decompress_gzip(data: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut decoder = MultiGzDecoder::new(data);

    output.clear();
    decoder
        .read_to_end(output)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    Ok(())
}

/// Expected decompressed size taken from the ISIZE trailer field.
///
/// ISIZE is the length modulo 2^32 of the last member only, so this is a
/// capacity hint, never a length check.
pub fn size_hint(data: &[u8]) -> Option<usize> {
    if data.len() < 18 {
        return None;
    }
    let stored = LittleEndian::read_u32(&data[data.len() - 4..]) as usize;
    Some(stored.min(MAX_SIZE_HINT))
}
