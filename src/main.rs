//! pkpextract CLI - extracts the PDF and Python payloads from `.pkp` files.
//!
//! For every input `name.pkp` this writes `name.pdf` and `name.py` into the
//! output directory and appends a row to the stats report.

mod inputs;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pkpextract::prelude::*;

/// Extract the PDF and Python payloads from .pkp containers
#[derive(Parser)]
#[command(name = "pkpextract")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Statistics file (CSV)
    #[arg(long, env = "PKPEXTRACT_STATS", default_value = DEFAULT_STATS_PATH)]
    stats: PathBuf,

    /// Where to write the results
    #[arg(long, env = "PKPEXTRACT_OUTDIR", default_value = ".")]
    outdir: PathBuf,

    /// Write decompressed copies of the inputs
    #[arg(long = "write_unzipped")]
    write_unzipped: bool,

    /// Don't generate the pdf file
    #[arg(long)]
    nopdf: bool,

    /// Don't generate the python file
    #[arg(long)]
    nopython: bool,

    /// Suppress the progress bar and per-file messages
    #[arg(long)]
    quiet: bool,

    /// Check the python part; write only the failed ones, as .with-errors.py
    #[arg(long = "check_python")]
    check_python: bool,

    /// Write the bytes preceding the first payload to <name>.head
    #[arg(long = "write_head")]
    write_head: bool,

    /// Append the first <headsize> bytes of every input's head to this file
    #[arg(long)]
    head: Option<PathBuf>,

    /// Size of each record written to --head
    #[arg(long, default_value_t = DEFAULT_HEAD_SIZE)]
    headsize: usize,

    /// The .pkp files to process (files, directories or glob patterns)
    #[arg(value_name = "inputFiles", required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let inputs = inputs::expand(&cli.inputs).context("Failed to expand input files")?;
    info!(
        arguments = cli.inputs.len(),
        files = inputs.len(),
        "expanded input files"
    );

    let options = ExtractOptions::new()
        .outdir(&cli.outdir)
        .write_unzipped(cli.write_unzipped)
        .write_pdf(!cli.nopdf)
        .write_python(!cli.nopython)
        .check_python(cli.check_python)
        .write_head(cli.write_head)
        .head_file(cli.head.clone(), cli.headsize);

    let mut extractor = Extractor::new(options).context("Failed to create head file")?;

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        pb
    };

    let report = extractor.run(&inputs, |_, _, error| {
        if let Some(e) = error {
            if !cli.quiet {
                pb.suspend(|| println!("{e}"));
            }
        }
        pb.inc(1);
    });

    pb.finish_with_message("Done");

    let (stats, flushed) = extractor.finish();
    stats
        .write_csv(&cli.stats)
        .context("Failed to write stats file")?;

    if !cli.quiet {
        println!("{}", "=".repeat(60));
        println!("{}", stats.summary());
        println!("Stats written to {}", cli.stats.display());
    }

    flushed.context("Failed to write head file")?;

    if !report.is_success() {
        anyhow::bail!("{} of {} files failed", report.failed, report.processed);
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (errors only by default).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
