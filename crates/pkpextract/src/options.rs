//! Extraction options.

use std::path::PathBuf;

/// Default size of each record in the concatenated head dump.
pub const DEFAULT_HEAD_SIZE: usize = 8 * 1024;

/// What to write for each processed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Directory receiving every output file.
    pub outdir: PathBuf,
    /// Also write the whole decompressed buffer.
    pub write_unzipped: bool,
    pub write_pdf: bool,
    pub write_python: bool,
    /// Check the script source; only failing sources are written.
    pub check_python: bool,
    /// Write `<stem>.head` with the bytes preceding the first payload.
    pub write_head: bool,
    /// Append the fixed-size head of every input to this file.
    pub head_file: Option<PathBuf>,
    pub head_size: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from("."),
            write_unzipped: false,
            write_pdf: true,
            write_python: true,
            check_python: false,
            write_head: false,
            head_file: None,
            head_size: DEFAULT_HEAD_SIZE,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outdir(mut self, outdir: impl Into<PathBuf>) -> Self {
        self.outdir = outdir.into();
        self
    }

    pub fn write_unzipped(mut self, enabled: bool) -> Self {
        self.write_unzipped = enabled;
        self
    }

    pub fn write_pdf(mut self, enabled: bool) -> Self {
        self.write_pdf = enabled;
        self
    }

    pub fn write_python(mut self, enabled: bool) -> Self {
        self.write_python = enabled;
        self
    }

    /// Enable the script check. This turns off writing of passing scripts.
    pub fn check_python(mut self, enabled: bool) -> Self {
        self.check_python = enabled;
        self
    }

    pub fn write_head(mut self, enabled: bool) -> Self {
        self.write_head = enabled;
        self
    }

    pub fn head_file(mut self, path: Option<PathBuf>, size: usize) -> Self {
        self.head_file = path;
        self.head_size = size;
        self
    }

    /// Whether passing scripts are written to `<stem>.py`.
    #[inline]
    pub fn writes_python(&self) -> bool {
        self.write_python && !self.check_python
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.outdir, PathBuf::from("."));
        assert!(options.write_pdf);
        assert!(options.writes_python());
        assert!(!options.write_unzipped);
        assert_eq!(options.head_size, DEFAULT_HEAD_SIZE);
    }

    #[test]
    fn test_check_python_disables_python_output() {
        let options = ExtractOptions::new().check_python(true);
        assert!(options.write_python);
        assert!(!options.writes_python());
    }
}
