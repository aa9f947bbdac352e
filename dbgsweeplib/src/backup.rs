//! Pre-rewrite backups.
//!
//! Every run owns a single backup root. [`BackupManager::reset`] wipes any
//! root left by a previous run and recreates it empty; [`BackupManager::backup_all`]
//! then copies each existing target into it before anything is rewritten.
//!
//! Entries are named `<timestamp>_<relative path with separators replaced by '_'>`,
//! e.g. `20250101_120000_services_hive_order_service.dart`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::Local;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::SweepError;
use crate::Result;

/// Timestamp format used in entry names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One copied file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEntry {
    /// Target path relative to the base directory
    pub source: PathBuf,
    /// Location of the copy
    pub path: PathBuf,
    /// Number of bytes copied
    pub bytes: u64,
}

/// A target that exists but could not be copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupFailure {
    pub source: PathBuf,
    pub error: String,
}

/// Result of the backup phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupReport {
    pub root: PathBuf,
    pub timestamp: String,
    pub entries: Vec<BackupEntry>,
    pub failures: Vec<BackupFailure>,
}

impl BackupReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Flatten a relative path into a single file name component.
///
/// Parent (`..`), current (`.`) and root components are dropped, so
/// `../services/hive/a.dart` becomes `services_hive_a.dart`.
pub fn flatten_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Owns the backup root for one run.
#[derive(Debug, Clone)]
pub struct BackupManager {
    root: PathBuf,
    timestamp: String,
}

impl BackupManager {
    /// Create a manager stamped with the current local time.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_timestamp(root, Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    /// Create a manager with a fixed timestamp.
    pub fn with_timestamp(root: impl Into<PathBuf>, timestamp: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Where the copy of `relative` goes.
    pub fn entry_path(&self, relative: &Path) -> PathBuf {
        self.root
            .join(format!("{}_{}", self.timestamp, flatten_path(relative)))
    }

    /// Destroy any previous backup root and create a fresh, empty one.
    ///
    /// Afterwards the root exists, is a directory, and contains nothing.
    /// Everything that was under it before is gone.
    pub fn reset(&self) -> Result<()> {
        let backup_err = |source| SweepError::Backup {
            path: self.root.clone(),
            source,
        };

        if self.root.is_dir() {
            info!("removing previous backup at {}", self.root.display());
            fs::remove_dir_all(&self.root).map_err(backup_err)?;
        } else if self.root.exists() {
            fs::remove_file(&self.root).map_err(backup_err)?;
        }
        fs::create_dir_all(&self.root).map_err(backup_err)?;
        Ok(())
    }

    /// Copy one target into the backup root.
    ///
    /// Returns `Ok(None)` when the target does not exist. If two targets
    /// flatten to the same name, later ones get a numeric suffix.
    pub fn backup_file(&self, base: &Path, relative: &Path) -> Result<Option<BackupEntry>> {
        let source = base.join(relative);
        if !source.is_file() {
            return Ok(None);
        }

        let mut dest = self.entry_path(relative);
        let mut n = 1;
        while dest.exists() {
            let mut name = self.entry_path(relative).into_os_string();
            name.push(format!(".{n}"));
            dest = PathBuf::from(name);
            n += 1;
        }

        let copy_err = |source| SweepError::Backup {
            path: relative.to_path_buf(),
            source,
        };
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(copy_err)?;
        }
        let bytes = fs::copy(&source, &dest).map_err(copy_err)?;

        debug!("backed up {} -> {}", relative.display(), dest.display());
        Ok(Some(BackupEntry {
            source: relative.to_path_buf(),
            path: dest,
            bytes,
        }))
    }

    /// Reset the root and back up every existing target.
    ///
    /// Missing targets are skipped silently. A failed copy is recorded in the
    /// report and does not stop the others. Only a failure to reset the root
    /// is returned as an error.
    pub fn backup_all(&self, base: &Path, targets: &[PathBuf]) -> Result<BackupReport> {
        self.reset()?;

        let mut report = BackupReport {
            root: self.root.clone(),
            timestamp: self.timestamp.clone(),
            ..BackupReport::default()
        };

        for relative in targets {
            match self.backup_file(base, relative) {
                Ok(Some(entry)) => report.entries.push(entry),
                Ok(None) => {}
                Err(e) => {
                    warn!("{e}");
                    report.failures.push(BackupFailure {
                        source: relative.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "backed up {} files to {}",
            report.entries.len(),
            self.root.display()
        );
        Ok(report)
    }
}
