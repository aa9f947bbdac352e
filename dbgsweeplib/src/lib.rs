//! # dbgsweeplib
//!
//! Remove debug print statements from source files, one whole line at a time.
//!
//! ## Overview
//!
//! Each line of a target file is matched against a [`PatternCatalog`]:
//!
//! - **Keep** patterns are checked first. A matching line always survives.
//! - **Remove** patterns are checked next. A matching line is dropped.
//! - Anything else is kept unchanged.
//!
//! Patterns are case-insensitive and anchored to the whole line, so only
//! lines that consist of a single `print('...')` (or similar) statement are
//! affected. There is no parsing of the target language: a statement split
//! across several lines is never removed.
//!
//! Before any file is rewritten, every existing target is copied into a fresh
//! backup root (see [`backup`]). Per-file failures are recorded in the
//! [`RunSummary`] and never stop the batch.
//!
//! ## Example
//!
//! ```rust
//! use dbgsweeplib::{run, PatternCatalog, SweepOptions, TargetSet};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let lib = dir.path().join("lib");
//! fs::create_dir(&lib).unwrap();
//! fs::write(
//!     lib.join("home.dart"),
//!     "a();\nprint('Debug: x');\nprint('Critical failure');\nb();\n",
//! )
//! .unwrap();
//!
//! let catalog = PatternCatalog::new()
//!     .remove_messages(&["debug"])
//!     .unwrap()
//!     .keep_messages(&["critical"])
//!     .unwrap();
//! let options = SweepOptions::new()
//!     .base_dir(&lib)
//!     .backup_dir(dir.path().join("backup"))
//!     .catalog(catalog)
//!     .targets(TargetSet::new().target("home.dart"));
//!
//! let summary = run(&options).unwrap();
//! assert_eq!(summary.total_removed(), 1);
//! assert_eq!(
//!     fs::read_to_string(lib.join("home.dart")).unwrap(),
//!     "a();\nprint('Critical failure');\nb();\n"
//! );
//! ```

pub mod backup;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod rewrite;
pub mod source;
pub mod sweep;

pub use backup::{BackupEntry, BackupFailure, BackupManager, BackupReport};
pub use catalog::{print_statement, PatternCatalog, Preset};
pub use classify::{classify, classify_lines, ClassifiedLine, Verdict};
pub use config::{PatternConfig, SweepConfig, DEFAULT_BACKUP_DIR, DEFAULT_CONFIG_FILE};
pub use error::SweepError;
pub use rewrite::{rewrite_file, rewrite_str, scan_file, FileOutcome, FileResult, LineCounts};
pub use source::TargetSet;
pub use sweep::{run, RunSummary, SummaryTotals, SweepOptions};

/// Result type for dbgsweeplib operations
pub type Result<T> = std::result::Result<T, SweepError>;
