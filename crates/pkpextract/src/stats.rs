//! Per-file statistics and the CSV report.

use std::fmt;
use std::io;
use std::path::Path;
use std::time::Duration;

use pkp_payload::Order;
use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// Default path of the stats report.
pub const DEFAULT_STATS_PATH: &str = "pkpextract.stats.txt";

/// Column names of the stats report.
pub const STATS_HEADER: [&str; 6] = [
    "filename",
    "unzipped_len",
    "status",
    "pdf_size",
    "python_size",
    "time_elapsed",
];

/// Outcome of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    #[serde(rename = "pdfFirst")]
    PdfFirst,
    #[serde(rename = "pythonFirst")]
    PythonFirst,
    #[serde(rename = "ERROR")]
    Error,
}

impl From<Order> for Status {
    fn from(order: Order) -> Self {
        match order {
            Order::PdfFirst => Self::PdfFirst,
            Order::PythonFirst => Self::PythonFirst,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PdfFirst => "pdfFirst",
            Self::PythonFirst => "pythonFirst",
            Self::Error => "ERROR",
        })
    }
}

/// One row of the report. Size fields are empty for failed files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    pub filename: String,
    pub unzipped_len: Option<u64>,
    pub status: Status,
    pub pdf_size: Option<u64>,
    pub python_size: Option<u64>,
    #[serde(serialize_with = "serialize_seconds")]
    pub time_elapsed: Duration,
}

impl StatRow {
    pub fn success(
        filename: impl Into<String>,
        order: Order,
        pdf_size: usize,
        python_size: usize,
        time_elapsed: Duration,
    ) -> Self {
        Self {
            filename: filename.into(),
            unzipped_len: Some((pdf_size + python_size) as u64),
            status: order.into(),
            pdf_size: Some(pdf_size as u64),
            python_size: Some(python_size as u64),
            time_elapsed,
        }
    }

    pub fn error(filename: impl Into<String>, time_elapsed: Duration) -> Self {
        Self {
            filename: filename.into(),
            unzipped_len: None,
            status: Status::Error,
            pdf_size: None,
            python_size: None,
            time_elapsed,
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

fn serialize_seconds<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.5}", duration.as_secs_f64()))
}

/// Append-only list of rows, in input order.
#[derive(Debug, Clone, Default)]
pub struct StatsRecorder {
    rows: Vec<StatRow>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: StatRow) {
        self.rows.push(row);
    }

    #[inline]
    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    /// Number of rows with status ERROR.
    pub fn failures(&self) -> usize {
        self.rows.iter().filter(|r| r.is_error()).count()
    }

    /// Serialize the report to `path`, replacing any existing file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let map_err = |source: csv::Error| Error::Stats {
            path: path.to_path_buf(),
            source,
        };

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(map_err)?;
        self.write_rows(writer).map_err(map_err)
    }

    /// Serialize the report to any writer.
    pub fn write_to<W: io::Write>(&self, out: W) -> std::result::Result<(), csv::Error> {
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        self.write_rows(writer)
    }

    fn write_rows<W: io::Write>(&self, mut writer: csv::Writer<W>) -> std::result::Result<(), csv::Error> {
        writer.write_record(STATS_HEADER)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Totals over the successfully processed files.
    pub fn summary(&self) -> StatsSummary {
        let mut summary = StatsSummary {
            files: self.rows.len(),
            failures: self.failures(),
            ..StatsSummary::default()
        };

        let mut succeeded = 0u64;
        for row in &self.rows {
            let Some(len) = row.unzipped_len else {
                continue;
            };
            succeeded += 1;
            summary.total_unzipped += len;

            if summary.largest.as_ref().map_or(true, |(max, _)| len > *max) {
                summary.largest = Some((len, row.filename.clone()));
            }
            if summary.smallest.as_ref().map_or(true, |(min, _)| len < *min) {
                summary.smallest = Some((len, row.filename.clone()));
            }
        }

        if succeeded > 0 {
            summary.average_unzipped = summary.total_unzipped / succeeded;
        }
        summary
    }
}

/// Run totals printed after processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSummary {
    pub files: usize,
    pub failures: usize,
    /// Largest decompressed size and the file it belongs to.
    pub largest: Option<(u64, String)>,
    pub smallest: Option<(u64, String)>,
    pub total_unzipped: u64,
    pub average_unzipped: u64,
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number of files = {}", self.files)?;
        writeln!(f, "failures = {}", self.failures)?;
        if let Some((len, name)) = &self.largest {
            writeln!(f, "max unzipped size = {} in {}", group_digits(*len), name)?;
        }
        if let Some((len, name)) = &self.smallest {
            writeln!(f, "min unzipped size = {} in {}", group_digits(*len), name)?;
        }
        writeln!(f, "total unzipped size = {}", group_digits(self.total_unzipped))?;
        write!(f, "average unzipped size = {}", group_digits(self.average_unzipped))
    }
}

/// Format a number with `_` between groups of three digits.
fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('_');
        }
        out.push(c);
    }
    out
}
