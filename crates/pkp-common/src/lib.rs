//! Common utilities for pkpextract.
//!
//! This crate provides the low-level pieces shared by the other crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`search`] - memchr-backed signature searching

mod error;
mod reader;

pub mod search;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
