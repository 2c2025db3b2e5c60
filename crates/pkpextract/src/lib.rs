//! pkpextract - pulls the PDF and Python payloads out of `.pkp` containers.
//!
//! This crate ties the lower-level crates together into the extraction
//! pipeline and re-exports them:
//!
//! - [`pkp_common`] - Binary reading and byte searching
//! - [`pkp_container`] - gzip container reading and decompression
//! - [`pkp_payload`] - Locating the PDF/script boundary
//!
//! # Example
//!
//! ```no_run
//! use pkpextract::prelude::*;
//!
//! let options = ExtractOptions::new().outdir("out").write_unzipped(true);
//! let mut extractor = Extractor::new(options)?;
//!
//! let report = extractor.run(["lesson.pkp"], |path, row, _| {
//!     println!("{}: {}", path.display(), row.status);
//! });
//!
//! let (stats, flushed) = extractor.finish();
//! stats.write_csv(DEFAULT_STATS_PATH)?;
//! flushed?;
//! assert_eq!(report.failed, stats.failures());
//! # Ok::<(), pkpextract::Error>(())
//! ```

mod error;
mod extract;
mod options;
pub mod stats;
pub mod writer;

pub use error::{Error, Result};
pub use extract::{Extractor, RunReport};
pub use options::{ExtractOptions, DEFAULT_HEAD_SIZE};
pub use stats::{StatRow, StatsRecorder, StatsSummary, Status, DEFAULT_STATS_PATH};

// Re-export the sub-crates
pub use pkp_common as common;
pub use pkp_container as container;
pub use pkp_payload as payload;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Error, ExtractOptions, Extractor, RunReport, StatRow, StatsRecorder, Status,
        DEFAULT_HEAD_SIZE, DEFAULT_STATS_PATH,
    };
    pub use pkp_container::PkpContainer;
    pub use pkp_payload::{split, Order, Segment, Split};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
