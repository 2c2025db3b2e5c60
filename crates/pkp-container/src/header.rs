//! gzip member header structures.

use pkp_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// Fixed part of a gzip member header, following the two magic bytes.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
struct FixedHeader {
    /// Compression method (8 = DEFLATE)
    method: u8,
    /// Flag bits, see [`MemberFlags`]
    flags: u8,
    /// Modification time, Unix seconds, little-endian
    mtime: [u8; 4],
    /// Extra flags (compression level hint)
    extra_flags: u8,
    /// Operating system that wrote the stream
    os: u8,
}

/// Header flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemberFlags(u8);

impl MemberFlags {
    pub const TEXT: u8 = 0x01;
    pub const HEADER_CRC: u8 = 0x02;
    pub const EXTRA: u8 = 0x04;
    pub const NAME: u8 = 0x08;
    pub const COMMENT: u8 = 0x10;
    const RESERVED: u8 = 0xE0;

    /// Raw flag byte.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag != 0
    }
}

/// A parsed gzip member header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberHeader {
    /// Compression method, always 8 once parsed.
    pub method: u8,
    pub flags: MemberFlags,
    /// Modification time of the original file (0 when unknown).
    pub mtime: u32,
    pub extra_flags: u8,
    /// Operating system identifier.
    pub os: u8,
    /// Length of the FEXTRA field, if present.
    pub extra_len: Option<u16>,
    /// Original file name (FNAME), decoded as Latin-1.
    pub file_name: Option<String>,
    /// File comment (FCOMMENT), decoded as Latin-1.
    pub comment: Option<String>,
    /// Total header size in bytes, including the magic.
    pub header_len: usize,
}

impl MemberHeader {
    /// gzip magic bytes.
    pub const MAGIC: [u8; 2] = [0x1f, 0x8b];

    /// The only compression method gzip defines.
    pub const METHOD_DEFLATE: u8 = 8;

    /// Parse the member header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        reader.expect_magic(&Self::MAGIC)?;

        let fixed: FixedHeader = reader.read_struct()?;
        if fixed.method != Self::METHOD_DEFLATE {
            return Err(Error::UnsupportedMethod(fixed.method));
        }

        let flags = MemberFlags(fixed.flags);
        if flags.contains(MemberFlags::RESERVED) {
            return Err(Error::InvalidHeader(format!(
                "reserved flag bits set: {:#04x}",
                flags.bits()
            )));
        }

        let extra_len = if flags.contains(MemberFlags::EXTRA) {
            let len = reader.read_u16()?;
            reader.skip(len as usize)?;
            Some(len)
        } else {
            None
        };

        let file_name = if flags.contains(MemberFlags::NAME) {
            Some(latin1(reader.read_cstring_bytes()?))
        } else {
            None
        };

        let comment = if flags.contains(MemberFlags::COMMENT) {
            Some(latin1(reader.read_cstring_bytes()?))
        } else {
            None
        };

        if flags.contains(MemberFlags::HEADER_CRC) {
            reader.skip(2)?;
        }

        Ok(Self {
            method: fixed.method,
            flags,
            mtime: u32::from_le_bytes(fixed.mtime),
            extra_flags: fixed.extra_flags,
            os: fixed.os,
            extra_len,
            file_name,
            comment,
            header_len: reader.position(),
        })
    }

    /// Human-readable name of the originating operating system.
    pub fn os_name(&self) -> &'static str {
        match self.os {
            0 => "FAT",
            3 => "Unix",
            7 => "Macintosh",
            10 => "TOPS-20",
            11 => "NTFS",
            255 => "unknown",
            _ => "other",
        }
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
