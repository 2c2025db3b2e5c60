//! Memory-mapped `.pkp` container.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::decompress;
use crate::header::MemberHeader;
use crate::{Error, Result};

/// An opened `.pkp` container.
///
/// The file is memory-mapped; the header is parsed on open so that files
/// that are not gzip at all are rejected before any decoding work.
pub struct PkpContainer {
    /// Memory-mapped file data
    mmap: Mmap,
    /// Container file name
    name: String,
    /// Parsed member header
    header: MemberHeader,
}

impl PkpContainer {
    /// Open a container and parse its gzip header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(Error::InvalidHeader("empty file".to_string()));
        }
        let mmap = unsafe { Mmap::map(&file)? };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let header = MemberHeader::parse(&mmap)?;

        Ok(Self { mmap, name, header })
    }

    /// Get the container file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parsed gzip member header.
    #[inline]
    pub fn header(&self) -> &MemberHeader {
        &self.header
    }

    /// Size of the compressed file in bytes.
    #[inline]
    pub fn compressed_len(&self) -> usize {
        self.mmap.len()
    }

    /// Decompress the whole container into a fresh buffer.
    pub fn decompress(&self) -> Result<Vec<u8>> {
        decompress::decompress(&self.mmap)
    }
}

impl std::fmt::Debug for PkpContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkpContainer")
            .field("name", &self.name)
            .field("compressed_len", &self.mmap.len())
            .field("header", &self.header)
            .finish()
    }
}
