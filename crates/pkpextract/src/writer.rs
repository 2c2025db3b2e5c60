//! Output file naming and writing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pkp_container::PKP_EXTENSION;

use crate::{Error, Result};

pub const PDF_EXT: &str = ".pdf";
pub const PYTHON_EXT: &str = ".py";
pub const HEAD_EXT: &str = ".head";
pub const BROKEN_PYTHON_EXT: &str = ".with-errors.py";
/// Used for the decompressed copy of inputs that lack the `.pkp` suffix.
pub const UNZIPPED_EXT: &str = ".unzipped";

/// Writes payload files into the output directory.
///
/// Output names are derived from the input file stem, so `in/lesson.pkp`
/// produces `<outdir>/lesson.pdf`, `<outdir>/lesson.py`, and so on.
#[derive(Debug, Clone)]
pub struct PayloadWriter {
    outdir: PathBuf,
}

impl PayloadWriter {
    pub fn new(outdir: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
        }
    }

    #[inline]
    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    /// Path of the output with extension `ext` for `input`.
    ///
    /// The base name is the input name without its `.pkp` suffix. Inputs
    /// without that suffix keep their full name, so `x.pdf` yields
    /// `x.pdf.pdf` and never its own path.
    pub fn output_path(&self, input: &Path, ext: &str) -> PathBuf {
        self.outdir.join(format!("{}{ext}", base_name(input)))
    }

    /// Path of the decompressed copy of `input`.
    ///
    /// This is the input name with the `.pkp` suffix removed, like
    /// `gunzip --suffix=.pkp --keep` would produce. Inputs without that
    /// suffix get `.unzipped` appended instead so the input is never
    /// overwritten.
    pub fn unzipped_path(&self, input: &Path) -> PathBuf {
        let ext = if has_pkp_suffix(input) { "" } else { UNZIPPED_EXT };
        self.output_path(input, ext)
    }

    /// Write `bytes` to `path`, creating missing parent directories.
    pub fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let result = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
        .and_then(|_| fs::write(path, bytes));

        result.map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the output with extension `ext` for `input`, returning its path.
    pub fn write_output(&self, input: &Path, ext: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.output_path(input, ext);
        self.write(&path, bytes)?;
        Ok(path)
    }
}

fn has_pkp_suffix(input: &Path) -> bool {
    input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PKP_EXTENSION))
}

fn base_name(input: &Path) -> String {
    let name = if has_pkp_suffix(input) {
        input.file_stem()
    } else {
        input.file_name()
    };
    name.map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Concatenated dump of fixed-size head records, one per input.
///
/// Each record is the head bytes truncated to `size`, or zero-padded up to
/// it, so record `n` always starts at offset `n * size`.
pub struct HeadDump {
    path: PathBuf,
    out: BufWriter<File>,
    size: usize,
    records: usize,
}

impl HeadDump {
    /// Create (or truncate) the dump file.
    pub fn create(path: impl Into<PathBuf>, size: usize) -> Result<Self> {
        let path = path.into();
        let file = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
        .and_then(|_| File::create(&path));

        match file {
            Ok(file) => Ok(Self {
                path,
                out: BufWriter::new(file),
                size,
                records: 0,
            }),
            Err(source) => Err(Error::Write { path, source }),
        }
    }

    /// Append one record.
    pub fn append(&mut self, head: &[u8]) -> Result<()> {
        let take = head.len().min(self.size);
        let padding = self.size - take;

        let result = self
            .out
            .write_all(&head[..take])
            .and_then(|_| self.out.write_all(&vec![0u8; padding]));
        self.records += 1;

        result.map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Number of records appended so far.
    #[inline]
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush buffered records to disk.
    pub fn finish(mut self) -> Result<()> {
        self.out.flush().map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl std::fmt::Debug for HeadDump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadDump")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("records", &self.records)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names() {
        let writer = PayloadWriter::new("out");
        let input = Path::new("inputs/lesson.one.pkp");

        assert_eq!(writer.output_path(input, PDF_EXT), Path::new("out/lesson.one.pdf"));
        assert_eq!(writer.output_path(input, PYTHON_EXT), Path::new("out/lesson.one.py"));
        assert_eq!(writer.unzipped_path(input), Path::new("out/lesson.one"));
        assert_eq!(
            writer.unzipped_path(Path::new("LESSON.PKP")),
            Path::new("out/LESSON")
        );
        assert_eq!(
            writer.unzipped_path(Path::new("lesson.gz")),
            Path::new("out/lesson.gz.unzipped")
        );
    }

    #[test]
    fn test_outputs_never_replace_input() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PayloadWriter::new(dir.path());

        for name in ["x.pdf", "x.py", "x.head"] {
            let input = dir.path().join(name);
            for ext in [PDF_EXT, PYTHON_EXT, HEAD_EXT, BROKEN_PYTHON_EXT] {
                assert_ne!(writer.output_path(&input, ext), input);
            }
            assert_ne!(writer.unzipped_path(&input), input);
        }
        assert_eq!(
            writer.output_path(&dir.path().join("x.pdf"), PDF_EXT),
            dir.path().join("x.pdf.pdf")
        );
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PayloadWriter::new(dir.path().join("a/b"));

        let path = writer
            .write_output(Path::new("x.pkp"), PDF_EXT, b"%PDF-")
            .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"%PDF-");
        writer.write(&path, b"replaced").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"replaced");
    }

    #[test]
    fn test_write_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        let writer = PayloadWriter::new(&blocker);

        let err = writer
            .write_output(Path::new("x.pkp"), PDF_EXT, b"data")
            .unwrap_err();

        assert_eq!(err.kind(), "write");
        assert!(err.to_string().contains("x.pdf"));
    }

    #[test]
    fn test_head_dump_pads_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heads/all.bin");

        let mut dump = HeadDump::create(&path, 4).unwrap();
        dump.append(b"ab").unwrap();
        dump.append(b"abcdef").unwrap();
        assert_eq!(dump.records(), 2);
        dump.finish().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"ab\0\0abcd");
    }
}
