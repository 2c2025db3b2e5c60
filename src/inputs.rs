//! Expansion of the positional input arguments.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use pkpextract::container::PKP_EXTENSION;

/// Turn the command-line inputs into the list of files to process.
///
/// - directories are walked for `*.pkp` files, sorted by path
/// - arguments with glob metacharacters are expanded, sorted by path
/// - anything else is kept as given, so a missing file is still reported
///   as a failed input
pub fn expand(args: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::with_capacity(args.len());

    for arg in args {
        if arg.is_dir() {
            files.extend(walk_dir(arg)?);
        } else if let Some(pattern) = arg.to_str().filter(|s| is_glob(s)) {
            let matches = expand_glob(pattern)?;
            if matches.is_empty() {
                debug!(pattern, "pattern matched no files");
                files.push(arg.clone());
            } else {
                files.extend(matches);
            }
        } else {
            files.push(arg.clone());
        }
    }

    Ok(files)
}

fn is_glob(arg: &str) -> bool {
    arg.contains(|c: char| matches!(c, '*' | '?' | '['))
}

fn is_pkp(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PKP_EXTENSION))
}

fn walk_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() && is_pkp(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern).with_context(|| format!("Invalid pattern: {pattern}"))? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
