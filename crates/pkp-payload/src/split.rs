//! Splitting a decompressed buffer into its PDF and script segments.

use std::fmt;
use std::ops::Range;

use tracing::debug;

use crate::signature;
use crate::{Error, Result};

/// Which payload appears first in the decompressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    PdfFirst,
    PythonFirst,
}

impl Order {
    /// Name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PdfFirst => "pdfFirst",
            Self::PythonFirst => "pythonFirst",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two embedded payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Pdf,
    Script,
}

/// The Python source inside the script segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSource {
    /// Absolute byte range of the source, from the first statement up to
    /// the terminator byte or the end of the segment.
    pub range: Range<usize>,
}

impl ScriptSource {
    /// The source bytes.
    #[inline]
    pub fn bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.range.clone()]
    }
}

/// Result of splitting a buffer: the order and the two segment ranges.
///
/// The ranges are contiguous and together cover the whole buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    order: Order,
    pdf: Range<usize>,
    script: Range<usize>,
}

impl Split {
    fn pdf_first(len: usize, pdf_end: usize) -> Self {
        Self {
            order: Order::PdfFirst,
            pdf: 0..pdf_end,
            script: pdf_end..len,
        }
    }

    fn python_first(len: usize, pdf_start: usize) -> Self {
        Self {
            order: Order::PythonFirst,
            script: 0..pdf_start,
            pdf: pdf_start..len,
        }
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Offset where the first segment ends and the second begins.
    #[inline]
    pub fn split_offset(&self) -> usize {
        match self.order {
            Order::PdfFirst => self.pdf.end,
            Order::PythonFirst => self.script.end,
        }
    }

    /// Absolute byte range of a segment.
    #[inline]
    pub fn range(&self, segment: Segment) -> Range<usize> {
        match segment {
            Segment::Pdf => self.pdf.clone(),
            Segment::Script => self.script.clone(),
        }
    }

    #[inline]
    pub fn pdf_size(&self) -> usize {
        self.pdf.len()
    }

    #[inline]
    pub fn script_size(&self) -> usize {
        self.script.len()
    }

    /// Bytes of a segment.
    ///
    /// `buf` must be the buffer this split was computed from.
    #[inline]
    pub fn bytes<'a>(&self, segment: Segment, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.range(segment)]
    }

    /// Locate the Python source inside the script segment.
    pub fn script_source(&self, buf: &[u8]) -> Option<ScriptSource> {
        let start = signature::find_script_start(buf, self.script.clone())?;
        let end = signature::find_script_end(buf, start, self.script.end);
        Some(ScriptSource { range: start..end })
    }

    /// Bytes that precede the content of the first payload.
    ///
    /// For a PDF-first buffer this is empty. Otherwise it is the part of the
    /// script segment before the first statement, or the whole script
    /// segment when no statement can be found in it.
    pub fn head_range(&self, buf: &[u8]) -> Range<usize> {
        match self.order {
            Order::PdfFirst => 0..0,
            Order::PythonFirst => match self.script_source(buf) {
                Some(source) => 0..source.range.start,
                None => self.script.clone(),
            },
        }
    }
}

/// Split a decompressed buffer into its PDF and script segments.
///
/// The first PDF signature decides the split. Without any PDF signature the
/// whole buffer is taken as script if it contains a script statement;
/// otherwise the buffer is rejected.
pub fn split(buf: &[u8]) -> Result<Split> {
    let len = buf.len();

    let split = match signature::find_pdf_start(buf) {
        Some(0) => {
            let end = signature::find_pdf_end(buf, 0).unwrap_or(len);
            Split::pdf_first(len, end)
        }
        Some(start) => Split::python_first(len, start),
        None => {
            if signature::find_script_start(buf, 0..len).is_none() {
                return Err(Error::NoSignature { len });
            }
            Split::python_first(len, len)
        }
    };

    debug!(
        order = %split.order(),
        split_offset = split.split_offset(),
        pdf_size = split.pdf_size(),
        script_size = split.script_size(),
        "split payloads"
    );

    Ok(split)
}
