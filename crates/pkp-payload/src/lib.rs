//! Payload splitting for decompressed `.pkp` data.
//!
//! A decompressed container holds a PDF document and a Python script back to
//! back, with no length header between them. [`split`] finds the single
//! boundary between the two and reports which one comes first:
//!
//! - `%PDF-` at offset 0: the PDF runs up to its trailer (the second
//!   `%%EOF`) and the script is the remainder ([`Order::PdfFirst`]).
//! - `%PDF-` further in: everything before it is the script segment
//!   ([`Order::PythonFirst`]).
//! - no `%PDF-`: the whole buffer is the script, provided an import
//!   statement can be found in it.
//!
//! The two segment ranges always partition the buffer.
//!
//! # Example
//!
//! ```
//! use pkp_payload::{split, Order, Segment};
//!
//! let buf = b"import os\nprint(os.name)\n%PDF-1.4 ... %%EOF";
//! let split = split(buf)?;
//!
//! assert_eq!(split.order(), Order::PythonFirst);
//! assert_eq!(split.bytes(Segment::Pdf, buf), b"%PDF-1.4 ... %%EOF");
//! assert_eq!(split.pdf_size() + split.script_size(), buf.len());
//! # Ok::<(), pkp_payload::Error>(())
//! ```

mod check;
mod error;
pub mod signature;
mod split;

pub use check::{check_script, ScriptIssue};
pub use error::{Error, Result};
pub use split::{split, Order, ScriptSource, Segment, Split};
