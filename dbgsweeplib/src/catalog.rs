//! Pattern catalogs: what counts as debug noise and what must survive.
//!
//! A [`PatternCatalog`] holds two ordered lists of compiled, case-insensitive
//! regular expressions:
//!
//! - **remove** patterns identify a whole line as a disposable debug statement
//! - **keep** patterns identify a line as important output that is never removed,
//!   even when a remove pattern also matches
//!
//! Every pattern is anchored to the start and end of the line, so only lines
//! that consist of a single recognizable statement are affected. A statement
//! spread over several lines never matches.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SweepError;
use crate::Result;

/// Build the regex for a single-line `print('...')` statement whose string
/// literal contains `fragment`.
///
/// `fragment` is itself a regex (e.g. `Loaded.*total outlets`). The statement
/// may be indented and may end with `;` and trailing whitespace.
pub fn print_statement(fragment: &str) -> String {
    format!(r#"^\s*print\s*\(\s*['"][^'"]*{fragment}[^'"]*['"]\s*\)\s*;?\s*$"#)
}

/// A `console.log(...)` statement on a single line.
const CONSOLE_LOG: &str = r"^\s*console\.log\s*\([^)]*\)\s*;?\s*$";

/// `print('...debug...' + value)` on a single line.
const PRINT_DEBUG_CONCAT: &str = r#"^\s*print\s*\(\s*['"][^'"]*debug[^'"]*['"]\s*\+\s*[^)]*\)\s*;?\s*$"#;

/// Message fragments common to both presets.
const COMMON_PREFIXES: &[&str] = &["debug", r"\?\?", r"\?"];

const BASIC_MESSAGES: &[&str] = &[
    "REPORT SUBMISSION DEBUG",
    "CHECKOUT",
    "Error",
    "Failed",
    "Loaded",
    "Saved",
    "Cached",
    "Cleared",
    "Syncing",
    "Routes preloaded",
    "Fetching",
    "Found",
    "Debug Auth Status",
];

const ADVANCED_MESSAGES: &[&str] = &[
    "REPORT SUBMISSION DEBUG",
    "CHECKOUT",
    "Loaded",
    "Saved",
    "Cached",
    "Cleared",
    "Syncing",
    "Routes preloaded",
    "Fetching",
    "Found",
    "Debug Auth Status",
    // outlet search
    "Pattern words",
    "Matching outlets",
    "Exact match found",
    "Word boundary match",
    "Start match found",
    "Partial match found",
    "Search results",
    "Starting search operation",
    "Empty query",
    "Loading all outlets",
    "Search operation completed",
    "Search operation failed",
    "Loaded.*total outlets",
    "Error loading all outlets",
    // offline sync
    "Starting connectivity monitoring",
    "Connection restored",
    "Sync already in progress",
    "Starting offline sync",
    "Pending operations",
    "Step 1",
    "Step 2",
    "Step 3",
    "Offline sync completed",
    "Remaining operations",
    "Error during offline sync",
    "Sync process ended",
    "Syncing.*pending session",
    "Synced session start",
    "Synced session end",
    "Failed to sync session",
    "Deleted session operation",
    "Syncing.*pending journey plans",
    "Synced journey plan",
    "Failed to sync journey plan",
    "Syncing.*pending reports",
    "Cannot sync report",
    "Synced report for journey plan",
    "Failed to sync report",
    "Force sync requested",
    "Online status",
    "Currently syncing",
    "Has pending operations",
    "Cannot sync - device is offline",
    "Starting manual sync",
    // journey plans
    "Journey plan created successfully",
    "Journey plan creation failed",
    "Server error detected",
    "Saved pending journey plan",
    "Journey plan update failed",
    "Server error detected during journey plan update",
    "Web file upload error",
    "OfflineSyncIndicator",
    // dashboard and target services
    "Debug - Making dashboard API call",
    "Debug - Dashboard response status",
    "Debug - Dashboard response body",
    "Debug - Error in getDashboard",
    "Debug - Smart cache invalidation",
    "Debug - Cleared cache for prefix",
    "Debug - Cleared all cache",
    "Debug - Preloading data",
    "Debug - Preloading completed",
    "Debug - Error preloading data",
    "Debug - Using cached data",
    "Debug - No auth token found",
    "Debug - Making API call",
    "Debug - Headers",
    "Debug - Response status",
    "Debug - Response body",
    "Debug - Error in getDailyVisitTargets",
    "Debug - Using cached targets data",
    "Debug - Fetching targets",
    "Debug - Cached targets data",
    "Debug - Cleared targets cache",
    "Debug - Cleared all cache for user",
    // cache and hive services
    "Error loading detailed stats",
    "Error loading clients",
    "Error preloading routes",
    "Error fetching fresh data",
    "Error loading from cache",
    "Error refreshing client list",
    "Failed to load routes",
    "Error preloading products",
    "Error initializing Hive service",
    "Error reading cached products",
    "Error caching products",
    "Background product update failed",
    // reports and checkout
    "Cannot save report",
    "Error saving report to Hive",
    "Error syncing report",
    "Error loading existing reports",
    "Error parsing cached report",
    "Error loading cached reports",
    "Error caching reports",
    "Error loading fresh reports",
    "Error clearing caches",
    "Error picking image",
    "Error uploading image",
    "Error submitting report",
    "CHECKOUT ERROR",
    "Error during checkout",
];

const BASIC_KEEP: &[&str] = &["Exception", "Critical", "Fatal"];
const ADVANCED_KEEP: &[&str] = &["Exception", "Critical", "Fatal", "Unexpected"];

/// Built-in pattern catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Short catalog: generic debug prefixes, `console.log`, and broad
    /// `Error`/`Failed` messages
    Basic,
    /// Long catalog of specific message fragments
    #[default]
    Advanced,
    /// No built-in patterns; only what the caller adds
    Empty,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "advanced" => Ok(Self::Advanced),
            "empty" | "none" => Ok(Self::Empty),
            _ => Err(format!(
                "unknown preset '{s}' (expected basic, advanced or empty)"
            )),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// Ordered remove and keep matchers.
///
/// Built once per run through the builder methods and then only read.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    /// Patterns marking a line as debug output
    pub remove: Vec<Regex>,
    /// Patterns that protect a line from removal
    pub keep: Vec<Regex>,
}

/// Compile a pattern so it only matches the entire line.
fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
        .map_err(|e| SweepError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

impl PatternCatalog {
    /// Create an empty catalog (matches nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog for a built-in preset.
    pub fn preset(preset: Preset) -> Result<Self> {
        let catalog = Self::new();
        match preset {
            Preset::Basic => catalog
                .remove_messages(COMMON_PREFIXES)?
                .remove(CONSOLE_LOG)?
                .remove(PRINT_DEBUG_CONCAT)?
                .remove_messages(BASIC_MESSAGES)?
                .keep_messages(BASIC_KEEP),
            Preset::Advanced => catalog
                .remove_messages(COMMON_PREFIXES)?
                .remove_messages(ADVANCED_MESSAGES)?
                .keep_messages(ADVANCED_KEEP),
            Preset::Empty => Ok(catalog),
        }
    }

    /// Add a raw remove pattern. It must match the whole line.
    pub fn remove(mut self, pattern: &str) -> Result<Self> {
        self.remove.push(compile(pattern)?);
        Ok(self)
    }

    /// Add a raw keep pattern.
    pub fn keep(mut self, pattern: &str) -> Result<Self> {
        self.keep.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple raw remove patterns.
    pub fn remove_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self = self.remove(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Add multiple raw keep patterns.
    pub fn keep_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self = self.keep(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Remove `print('...')` statements whose message contains any fragment.
    pub fn remove_messages<S: AsRef<str>>(mut self, fragments: &[S]) -> Result<Self> {
        for fragment in fragments {
            self = self.remove(&print_statement(fragment.as_ref()))?;
        }
        Ok(self)
    }

    /// Protect `print('...')` statements whose message contains any fragment.
    pub fn keep_messages<S: AsRef<str>>(mut self, fragments: &[S]) -> Result<Self> {
        for fragment in fragments {
            self = self.keep(&print_statement(fragment.as_ref()))?;
        }
        Ok(self)
    }

    /// True if any keep pattern matches the line.
    pub fn is_protected(&self, line: &str) -> bool {
        self.keep.iter().any(|re| re.is_match(line))
    }

    /// True if any remove pattern matches the line.
    pub fn is_debug(&self, line: &str) -> bool {
        self.remove.iter().any(|re| re.is_match(line))
    }

    /// Total number of compiled patterns.
    pub fn len(&self) -> usize {
        self.remove.len() + self.keep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
