//! Whole-file rewriting.
//!
//! A file is read fully into memory, split into lines with terminators
//! preserved, classified line by line, and written back with every REMOVE
//! line dropped. Retained lines keep their original order and bytes.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::catalog::PatternCatalog;
use crate::classify::classify_lines;
use crate::error::SweepError;
use crate::Result;

/// Line counts for one rewrite.
///
/// `retained + removed == original` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    pub original: usize,
    pub retained: usize,
    pub removed: usize,
}

impl std::ops::AddAssign for LineCounts {
    fn add_assign(&mut self, other: Self) {
        self.original += other.original;
        self.retained += other.retained;
        self.removed += other.removed;
    }
}

/// Outcome of processing one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    /// The file was read, filtered and (unless dry-running) written back
    Cleaned(LineCounts),
    /// The target did not exist
    Skipped,
    /// Reading or writing failed
    Failed { error: String },
}

/// Per-file result, in configured target order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    /// Path relative to the base directory, as configured
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileResult {
    pub fn new(path: PathBuf, outcome: FileOutcome) -> Self {
        Self { path, outcome }
    }

    /// Line counts, if the file was processed successfully.
    pub fn counts(&self) -> Option<LineCounts> {
        match self.outcome {
            FileOutcome::Cleaned(counts) => Some(counts),
            _ => None,
        }
    }

    /// Lines removed from this file (zero when skipped or failed).
    pub fn removed(&self) -> usize {
        self.counts().map_or(0, |c| c.removed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, FileOutcome::Skipped)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Filter a string in memory.
///
/// Returns the retained text and the line counts. A final line without a
/// terminator counts as a line.
pub fn rewrite_str(content: &str, catalog: &PatternCatalog) -> (String, LineCounts) {
    let lines = classify_lines(content, catalog);
    let mut output = String::with_capacity(content.len());
    let mut counts = LineCounts {
        original: lines.len(),
        ..LineCounts::default()
    };

    for line in lines {
        if line.verdict.is_remove() {
            trace!("removing: {}", line.text.trim_end());
            counts.removed += 1;
        } else {
            output.push_str(line.text);
            counts.retained += 1;
        }
    }

    (output, counts)
}

/// Read a target file as UTF-8 text.
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| SweepError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| SweepError::InvalidEncoding(path.to_path_buf()))
}

/// Classify a file without modifying it.
pub fn scan_file(path: impl AsRef<Path>, catalog: &PatternCatalog) -> Result<LineCounts> {
    let content = read_text(path.as_ref())?;
    Ok(rewrite_str(&content, catalog).1)
}

/// Remove debug lines from a file in place.
///
/// The file is overwritten with exactly the retained lines. The write is not
/// atomic; callers are expected to have backed the file up first.
pub fn rewrite_file(path: impl AsRef<Path>, catalog: &PatternCatalog) -> Result<LineCounts> {
    let path = path.as_ref();
    let content = read_text(path)?;
    let (output, counts) = rewrite_str(&content, catalog);

    fs::write(path, output).map_err(|source| SweepError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "{}: {} of {} lines removed",
        path.display(),
        counts.removed,
        counts.original
    );
    Ok(counts)
}
