//! The per-file extraction pipeline.
//!
//! Each input goes through decompress, split, write. Whatever fails, the
//! file still gets a stats row and the next input is processed.

use std::path::Path;
use std::time::Instant;

use pkp_container::PkpContainer;
use pkp_payload::{check_script, Order, ScriptIssue, Segment};
use tracing::{debug, info, warn};

use crate::options::ExtractOptions;
use crate::stats::{StatRow, StatsRecorder};
use crate::writer::{HeadDump, PayloadWriter, BROKEN_PYTHON_EXT, HEAD_EXT, PDF_EXT, PYTHON_EXT};
use crate::{Error, Result};

/// What a successfully processed file produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Processed {
    order: Order,
    pdf_size: usize,
    python_size: usize,
}

/// Totals of one [`Extractor::run`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub failed: usize,
}

impl RunReport {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Processes `.pkp` inputs one after another and records their stats.
#[derive(Debug)]
pub struct Extractor {
    options: ExtractOptions,
    writer: PayloadWriter,
    head_dump: Option<HeadDump>,
    stats: StatsRecorder,
}

impl Extractor {
    /// Create an extractor. Creates the head dump file when one is
    /// configured.
    pub fn new(options: ExtractOptions) -> Result<Self> {
        let head_dump = match &options.head_file {
            Some(path) => Some(HeadDump::create(path, options.head_size)?),
            None => None,
        };

        Ok(Self {
            writer: PayloadWriter::new(&options.outdir),
            options,
            head_dump,
            stats: StatsRecorder::new(),
        })
    }

    #[inline]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    #[inline]
    pub fn stats(&self) -> &StatsRecorder {
        &self.stats
    }

    /// Process every input in order.
    ///
    /// `on_file` is called after each file with its stats row and, for
    /// failed files, the error.
    pub fn run<I, P, F>(&mut self, inputs: I, mut on_file: F) -> RunReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        F: FnMut(&Path, &StatRow, Option<&Error>),
    {
        let mut report = RunReport::default();

        for input in inputs {
            let path = input.as_ref();
            let (row, error) = self.process_file(path);

            report.processed += 1;
            if error.is_some() {
                report.failed += 1;
            }
            on_file(path, &row, error.as_ref());
            self.stats.record(row);
        }

        info!(
            processed = report.processed,
            failed = report.failed,
            "extraction finished"
        );
        report
    }

    /// Process one input and build its stats row. The row is not recorded.
    pub fn process_file(&mut self, path: &Path) -> (StatRow, Option<Error>) {
        let filename = path.display().to_string();
        let start = Instant::now();

        let result = self.process_one(path);
        let elapsed = start.elapsed();

        match result {
            Ok(done) => {
                debug!(file = %filename, order = %done.order, ?elapsed, "processed");
                let row = StatRow::success(filename, done.order, done.pdf_size, done.python_size, elapsed);
                (row, None)
            }
            Err(e) => {
                warn!(file = %filename, kind = e.kind(), error = %e, "failed to process");
                (StatRow::error(filename, elapsed), Some(e))
            }
        }
    }

    fn process_one(&mut self, path: &Path) -> Result<Processed> {
        let buf = {
            let container = PkpContainer::open(path)?;
            debug!(
                file = container.name(),
                compressed = container.compressed_len(),
                os = container.header().os_name(),
                "opened container"
            );
            container.decompress()?
        };

        if self.options.write_unzipped {
            let unzipped = self.writer.unzipped_path(path);
            self.writer.write(&unzipped, &buf)?;
        }

        let split = pkp_payload::split(&buf)?;

        let pdf = split.bytes(Segment::Pdf, &buf);
        if self.options.write_pdf && !pdf.is_empty() {
            self.writer.write_output(path, PDF_EXT, pdf)?;
        }

        let head = &buf[split.head_range(&buf)];
        if self.options.write_head {
            self.writer.write_output(path, HEAD_EXT, head)?;
        }
        if let Some(dump) = self.head_dump.as_mut() {
            dump.append(head)?;
        }

        let script = split.bytes(Segment::Script, &buf);
        if self.options.check_python {
            let (source, issue) = match split.script_source(&buf) {
                Some(source) => {
                    let bytes = source.bytes(&buf);
                    (bytes, check_script(bytes).err())
                }
                None => (script, Some(ScriptIssue::Missing)),
            };

            if let Some(issue) = issue {
                self.writer.write_output(path, BROKEN_PYTHON_EXT, source)?;
                return Err(Error::ScriptCheck {
                    name: path.display().to_string(),
                    issue,
                });
            }
        } else if self.options.writes_python() && !script.is_empty() {
            self.writer.write_output(path, PYTHON_EXT, script)?;
        }

        Ok(Processed {
            order: split.order(),
            pdf_size: split.pdf_size(),
            python_size: split.script_size(),
        })
    }

    /// Flush the head dump and hand back the recorded stats.
    ///
    /// The stats are returned even when flushing the dump fails, so the
    /// report can still be written.
    pub fn finish(self) -> (StatsRecorder, Result<()>) {
        let flushed = match self.head_dump {
            Some(dump) => dump.finish(),
            None => Ok(()),
        };
        if let Err(e) = &flushed {
            warn!(error = %e, "failed to flush head dump");
        }
        (self.stats, flushed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use crate::stats::Status;

    const HEADER: &[u8] = b"\x10\x00\x00\x00PKPHDR";
    const SCRIPT: &[u8] = b"import turtle\nturtle.forward(10)\n";
    const PDF: &[u8] = b"%PDF-1.5\n1 0 obj<<>>endobj\n%%EOF\nxref\n%%EOF";

    fn write_pkp(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        let path = dir.join(name);
        fs::write(&path, encoder.finish().unwrap()).unwrap();
        path
    }

    fn python_first() -> Vec<u8> {
        [HEADER, SCRIPT, &b"\x01"[..], PDF].concat()
    }

    fn pdf_first() -> Vec<u8> {
        [PDF, SCRIPT, &b"\x01\x00"[..]].concat()
    }

    #[test]
    fn test_python_first_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pkp(dir.path(), "lesson.pkp", &python_first());
        let out = dir.path().join("out");

        let mut extractor = Extractor::new(ExtractOptions::new().outdir(&out)).unwrap();
        let report = extractor.run([&input], |_, _, _| {});
        let (stats, flushed) = extractor.finish();
        flushed.unwrap();

        assert!(report.is_success());
        let row = &stats.rows()[0];
        assert_eq!(row.status, Status::PythonFirst);
        assert_eq!(row.pdf_size, Some(PDF.len() as u64));
        assert_eq!(row.python_size, Some((HEADER.len() + SCRIPT.len() + 1) as u64));
        assert_eq!(
            row.unzipped_len,
            Some(row.pdf_size.unwrap() + row.python_size.unwrap())
        );

        assert_eq!(fs::read(out.join("lesson.pdf")).unwrap(), PDF);
        assert_eq!(fs::read(out.join("lesson.py")).unwrap(), &python_first()[..HEADER.len() + SCRIPT.len() + 1]);
        assert!(!out.join("lesson").exists());
        assert!(!out.join("lesson.head").exists());
    }

    #[test]
    fn test_pdf_first_status() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pkp(dir.path(), "doc.pkp", &pdf_first());

        let mut extractor = Extractor::new(ExtractOptions::new().outdir(dir.path())).unwrap();
        let (row, error) = extractor.process_file(&input);

        assert!(error.is_none());
        assert_eq!(row.status, Status::PdfFirst);
        assert_eq!(row.pdf_size, Some(PDF.len() as u64));
        assert_eq!(fs::read(dir.path().join("doc.pdf")).unwrap(), PDF);
    }

    #[test]
    fn test_errors_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_pkp(dir.path(), "good.pkp", &python_first());
        let no_payload = write_pkp(dir.path(), "opaque.pkp", b"nothing recognizable");
        let truncated = dir.path().join("truncated.pkp");
        let bytes = fs::read(&good).unwrap();
        fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();
        let missing = dir.path().join("missing.pkp");

        let mut kinds = Vec::new();
        let mut extractor = Extractor::new(ExtractOptions::new().outdir(dir.path().join("out"))).unwrap();
        let report = extractor.run([&truncated, &no_payload, &missing, &good], |_, _, e| {
            kinds.push(e.map(Error::kind));
        });

        assert_eq!(report, RunReport { processed: 4, failed: 3 });
        assert_eq!(kinds, vec![Some("decompress"), Some("format"), Some("decompress"), None]);

        let rows = extractor.stats().rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].status, Status::Error);
        assert_eq!(rows[0].pdf_size, None);
        assert_eq!(rows[1].status, Status::Error);
        assert_eq!(rows[3].status, Status::PythonFirst);
        assert!(rows[0].filename.ends_with("truncated.pkp"));
    }

    #[test]
    fn test_no_payload_files_still_records_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pkp(dir.path(), "quiet.pkp", &python_first());
        let out = dir.path().join("out");

        let options = ExtractOptions::new()
            .outdir(&out)
            .write_pdf(false)
            .write_python(false);
        let mut extractor = Extractor::new(options).unwrap();
        let (row, error) = extractor.process_file(&input);

        assert!(error.is_none());
        assert_eq!(row.unzipped_len, Some(python_first().len() as u64));
        assert_eq!(row.pdf_size, Some(PDF.len() as u64));
        assert!(!out.exists());
    }

    #[test]
    fn test_write_unzipped_matches_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pkp(dir.path(), "copy.pkp", &pdf_first());
        let out = dir.path().join("out");

        let options = ExtractOptions::new().outdir(&out).write_unzipped(true);
        let mut extractor = Extractor::new(options).unwrap();
        extractor.process_file(&input);

        assert_eq!(fs::read(out.join("copy")).unwrap(), pdf_first());
        assert!(input.exists());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pkp(dir.path(), "same.pkp", &python_first());
        let out = dir.path().join("out");
        let options = ExtractOptions::new().outdir(&out).write_unzipped(true).write_head(true);

        let mut snapshots = Vec::new();
        for _ in 0..2 {
            let mut extractor = Extractor::new(options.clone()).unwrap();
            extractor.run([&input], |_, _, _| {});
            let mut files: Vec<(PathBuf, Vec<u8>)> = fs::read_dir(&out)
                .unwrap()
                .map(|e| {
                    let path = e.unwrap().path();
                    let bytes = fs::read(&path).unwrap();
                    (path, bytes)
                })
                .collect();
            files.sort();
            snapshots.push(files);
        }

        assert_eq!(snapshots[0].len(), 4);
        assert_eq!(snapshots[0], snapshots[1]);
    }

    #[test]
    fn test_heads() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_pkp(dir.path(), "first.pkp", &python_first());
        let second = write_pkp(dir.path(), "second.pkp", &pdf_first());
        let dump = dir.path().join("heads.bin");

        let options = ExtractOptions::new()
            .outdir(dir.path())
            .write_head(true)
            .head_file(Some(dump.clone()), 16);
        let mut extractor = Extractor::new(options).unwrap();
        extractor.run([&first, &second], |_, _, _| {});
        extractor.finish().1.unwrap();

        assert_eq!(fs::read(dir.path().join("first.head")).unwrap(), HEADER);
        assert_eq!(fs::read(dir.path().join("second.head")).unwrap(), b"");

        let mut expected = HEADER.to_vec();
        expected.resize(32, 0);
        assert_eq!(fs::read(&dump).unwrap(), expected);
    }

    #[test]
    fn test_check_python() {
        let dir = tempfile::tempdir().unwrap();
        let clean = write_pkp(dir.path(), "clean.pkp", &python_first());
        let broken_content = [HEADER, &b"import os\nx = '\xff'\n\x01"[..], PDF].concat();
        let broken = write_pkp(dir.path(), "broken.pkp", &broken_content);

        let options = ExtractOptions::new().outdir(dir.path()).check_python(true);
        let mut extractor = Extractor::new(options).unwrap();
        let mut messages = Vec::new();
        extractor.run([&clean, &broken], |_, _, e| {
            messages.extend(e.map(|e| e.to_string()));
        });

        let rows = extractor.stats().rows();
        assert_eq!(rows[0].status, Status::PythonFirst);
        assert_eq!(rows[1].status, Status::Error);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("invalid UTF-8"));

        assert!(!dir.path().join("clean.py").exists());
        assert!(!dir.path().join("clean.with-errors.py").exists());
        assert_eq!(
            fs::read(dir.path().join("broken.with-errors.py")).unwrap(),
            b"import os\nx = '\xff'\n"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_stats_survive_head_dump_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_pkp(dir.path(), "lesson.pkp", &python_first());

        let options = ExtractOptions::new()
            .outdir(dir.path())
            .head_file(Some(PathBuf::from("/dev/full")), 16);
        let mut extractor = Extractor::new(options).unwrap();
        let report = extractor.run([&input], |_, _, _| {});
        let (stats, flushed) = extractor.finish();

        assert!(report.is_success());
        assert_eq!(flushed.unwrap_err().kind(), "write");
        assert_eq!(stats.rows().len(), 1);
        assert_eq!(stats.rows()[0].status, Status::PythonFirst);
    }
}
