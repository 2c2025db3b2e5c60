//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! little-endian fields and fixed-layout headers from a byte slice without
//! copying.

use byteorder::{ByteOrder, LittleEndian};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use pkp_common::BinaryReader;
///
/// let data = [0x1f, 0x8b, 0x08, 0x00, 0x01, 0x02, 0x03, 0x04];
/// let mut reader = BinaryReader::new(&data);
///
/// reader.expect_magic(&[0x1f, 0x8b]).unwrap();
/// assert_eq!(reader.read_u16().unwrap(), 0x0008);
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Skip bytes, failing if the buffer is too short.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_bytes(2).map(LittleEndian::read_u16)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    /// Read bytes up to a null terminator, consuming the terminator.
    ///
    /// The returned slice does not include the terminator. No text decoding
    /// happens here since zero-terminated fields are not always UTF-8.
    pub fn read_cstring_bytes(&mut self) -> Result<&'a [u8]> {
        let remaining = self.remaining_bytes();
        let null_pos = memchr::memchr(0, remaining).ok_or(Error::MissingNullTerminator)?;

        self.position += null_pos + 1;
        Ok(&remaining[..null_pos])
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Expect specific magic bytes.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let available = self.remaining().min(expected.len());
        let actual = self.peek_bytes(available)?;
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        self.position += expected.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, // u16: 0xFFFF
            0x7F,
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u16().unwrap(), 0xFFFF);
        assert_eq!(reader.read_u8().unwrap(), 0x7F);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_cstring_bytes() {
        let data = b"doc.pkp\0caf\xe9\0";
        let mut reader = BinaryReader::new(data);

        assert_eq!(reader.read_cstring_bytes().unwrap(), b"doc.pkp");
        assert_eq!(reader.read_cstring_bytes().unwrap(), b"caf\xe9");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_missing_terminator() {
        let mut reader = BinaryReader::new(b"no end");
        assert!(matches!(
            reader.read_cstring_bytes(),
            Err(Error::MissingNullTerminator)
        ));
    }

    #[test]
    fn test_short_magic_is_reported_as_mismatch() {
        let mut reader = BinaryReader::new(&[0x1f]);
        match reader.expect_magic(&[0x1f, 0x8b]) {
            Err(Error::InvalidMagic { actual, .. }) => assert_eq!(actual, vec![0x1f]),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(reader.read_u32().is_err());
        assert!(reader.skip(3).is_err());
        assert!(reader.skip(2).is_ok());
    }
}
