//! Error types for dbgsweeplib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while sweeping debug output
#[derive(Error, Debug)]
pub enum SweepError {
    /// Failed to read a target file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a rewritten target file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Target file is not valid UTF-8
    #[error("file is not valid UTF-8: {0}")]
    InvalidEncoding(PathBuf),

    /// Invalid regular expression in a pattern catalog
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Failed to read a configuration file
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for this tool
    #[error("failed to parse config '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Failed to reset the backup root or copy a file into it
    #[error("backup failed for '{path}': {source}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Wiping the backup root would delete the base directory or a target
    #[error("backup root '{root}' overlaps '{path}'; choose a backup directory outside the targets")]
    UnsafeBackupRoot { root: PathBuf, path: PathBuf },
}
