//! Reader for `.pkp` containers.
//!
//! A `.pkp` file is a single gzip stream (RFC 1952) wrapping a PDF document
//! and a Python script laid out back to back. This crate handles the
//! container side only:
//!
//! - gzip member header parsing ([`MemberHeader`])
//! - DEFLATE decoding with CRC and length verification
//! - memory-mapped access to the input file ([`PkpContainer`])
//!
//! Locating the payloads inside the decompressed bytes is done by
//! `pkp-payload`.
//!
//! # Example
//!
//! ```no_run
//! use pkp_container::PkpContainer;
//!
//! let container = PkpContainer::open("lesson.pkp")?;
//! let data = container.decompress()?;
//! println!("{}: {} bytes", container.name(), data.len());
//! # Ok::<(), pkp_container::Error>(())
//! ```

mod container;
mod decompress;
mod error;
mod header;

pub use container::PkpContainer;
pub use decompress::{decompress, decompress_gzip, size_hint};
pub use error::{Error, Result};
pub use header::{MemberFlags, MemberHeader};

/// File extension of `.pkp` containers, without the dot.
pub const PKP_EXTENSION: &str = "pkp";
