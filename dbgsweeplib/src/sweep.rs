//! Batch driver.
//!
//! [`run`] is the main entry point. It:
//! 1. Resolves the target list
//! 2. Backs up every existing target (skipped on dry runs)
//! 3. Rewrites each target in order, recording a [`FileResult`] per file
//! 4. Aggregates everything into a [`RunSummary`]
//!
//! Per-file problems never abort the batch. Only setup failures (bad globs,
//! a missing base directory during discovery, an unusable backup root) are
//! returned as errors, and all of them happen before any file is touched.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::backup::{BackupManager, BackupReport};
use crate::catalog::PatternCatalog;
use crate::config::DEFAULT_BACKUP_DIR;
use crate::error::SweepError;
use crate::rewrite::{rewrite_file, scan_file, FileOutcome, FileResult, LineCounts};
use crate::source::TargetSet;
use crate::Result;

/// Options for a sweep.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Directory the targets are relative to
    pub base_dir: PathBuf,
    /// Backup root, wiped and recreated each run
    pub backup_dir: PathBuf,
    /// Patterns to classify lines with
    pub catalog: PatternCatalog,
    /// Which files to process
    pub targets: TargetSet,
    /// Classify and count without writing anything
    pub dry_run: bool,
    /// Fixed backup timestamp (defaults to the current local time)
    pub timestamp: Option<String>,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            catalog: PatternCatalog::default(),
            targets: TargetSet::default(),
            dry_run: false,
            timestamp: None,
        }
    }
}

impl SweepOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    pub fn catalog(mut self, catalog: PatternCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn targets(mut self, targets: TargetSet) -> Self {
        self.targets = targets;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Use a fixed backup timestamp instead of the current time.
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Files read (and, unless dry-running, rewritten) successfully
    pub processed: usize,
    pub skipped: usize,
    pub errored: usize,
    pub backup_failures: usize,
    /// Line counts summed over processed files
    pub lines: LineCounts,
}

/// Everything that happened in one run. Built for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub base_dir: PathBuf,
    pub dry_run: bool,
    /// Absent on dry runs
    pub backup: Option<BackupReport>,
    /// One entry per target, in processing order
    pub files: Vec<FileResult>,
    pub totals: SummaryTotals,
}

impl RunSummary {
    fn new(base_dir: PathBuf, dry_run: bool, backup: Option<BackupReport>) -> Self {
        Self {
            base_dir,
            dry_run,
            backup,
            files: Vec::new(),
            totals: SummaryTotals::default(),
        }
    }

    fn push(&mut self, result: FileResult) {
        match &result.outcome {
            FileOutcome::Cleaned(counts) => {
                self.totals.processed += 1;
                self.totals.lines += *counts;
            }
            FileOutcome::Skipped => self.totals.skipped += 1,
            FileOutcome::Failed { .. } => self.totals.errored += 1,
        }
        self.files.push(result);
    }

    /// Total debug lines removed (or, on a dry run, that would be removed).
    pub fn total_removed(&self) -> usize {
        self.totals.lines.removed
    }

    pub fn processed(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| f.counts().is_some())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| f.is_skipped())
    }

    pub fn errored(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| f.error().is_some())
    }

    /// True if any file failed or any backup copy failed.
    ///
    /// Skipped files do not count as failures.
    pub fn has_failures(&self) -> bool {
        self.totals.errored > 0 || self.totals.backup_failures > 0
    }
}

/// Absolute form of `path`, following symlinks for the part that exists.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            resolve_path(parent).join(name)
        }
        _ => path.to_path_buf(),
    }
}

/// Refuse a backup root whose wipe would delete the base directory or a target.
fn check_backup_root(backup_dir: &Path, base: &Path, targets: &[PathBuf]) -> Result<()> {
    let root = resolve_path(backup_dir);
    let overlaps = |path: PathBuf| {
        if path.starts_with(&root) {
            Err(SweepError::UnsafeBackupRoot {
                root: backup_dir.to_path_buf(),
                path,
            })
        } else {
            Ok(())
        }
    };

    overlaps(resolve_path(base))?;
    for relative in targets {
        overlaps(resolve_path(&base.join(relative)))?;
    }
    Ok(())
}

/// Run a sweep.
///
/// # Example
///
/// ```rust,ignore
/// use dbgsweeplib::{run, PatternCatalog, Preset, SweepOptions, TargetSet};
///
/// let options = SweepOptions::new()
///     .base_dir("lib")
///     .catalog(PatternCatalog::preset(Preset::Advanced)?)
///     .targets(TargetSet::new().targets(["pages/home.dart"]));
/// let summary = run(&options)?;
/// println!("removed {} lines", summary.total_removed());
/// ```
pub fn run(options: &SweepOptions) -> Result<RunSummary> {
    let base = &options.base_dir;
    let targets = options.targets.resolve(base)?;

    let backup = if options.dry_run {
        None
    } else {
        check_backup_root(&options.backup_dir, base, &targets)?;
        let manager = match &options.timestamp {
            Some(ts) => BackupManager::with_timestamp(&options.backup_dir, ts.clone()),
            None => BackupManager::new(&options.backup_dir),
        };
        Some(manager.backup_all(base, &targets)?)
    };

    let mut summary = RunSummary::new(base.clone(), options.dry_run, backup);
    summary.totals.backup_failures = summary
        .backup
        .as_ref()
        .map_or(0, |report| report.failures.len());

    info!(
        "sweeping {} targets under {}{}",
        targets.len(),
        base.display(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    for relative in targets {
        let full = base.join(&relative);

        if !full.exists() {
            warn!("skipped (not found): {}", relative.display());
            summary.push(FileResult::new(relative, FileOutcome::Skipped));
            continue;
        }

        let result = if options.dry_run {
            scan_file(&full, &options.catalog)
        } else {
            rewrite_file(&full, &options.catalog)
        };

        let outcome = match result {
            Ok(counts) => FileOutcome::Cleaned(counts),
            Err(e) => {
                error!("{e}");
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        summary.push(FileResult::new(relative, outcome));
    }

    Ok(summary)
}
