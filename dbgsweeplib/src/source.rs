//! Target discovery: which files a run touches.
//!
//! Targets come from two places:
//!
//! - **Explicit paths**, relative to the base directory, kept in the order given.
//!   They are never filtered; a missing one is reported later as skipped.
//! - **Glob discovery**: include/exclude patterns matched against paths relative
//!   to the base directory while walking it. Discovered files are sorted and
//!   appended after the explicit ones.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;
use walkdir::WalkDir;

use crate::error::SweepError;
use crate::Result;

/// Directories never descended into during discovery.
const SKIPPED_DIRS: &[&str] = &["target", "build", "node_modules", "dist"];

/// Explicit targets plus glob discovery rules.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    /// Paths listed explicitly, in order
    pub explicit: Vec<PathBuf>,
    /// Glob patterns to discover (if empty, no discovery happens)
    pub include: Vec<Pattern>,
    /// Glob patterns excluded from discovery
    pub exclude: Vec<Pattern>,
    /// Directories excluded from discovery (e.g. the backup root)
    pub skip: Vec<PathBuf>,
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| SweepError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

impl TargetSet {
    /// Create an empty target set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit target.
    pub fn target(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit.push(path.into());
        self
    }

    /// Add explicit targets.
    pub fn targets<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.explicit.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self = self.include(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Never descend into `dir` during discovery.
    pub fn skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip.push(dir.into());
        self
    }

    /// Check if a relative path is picked up by discovery.
    ///
    /// A path matches if it matches at least one include pattern and no
    /// exclude pattern.
    pub fn matches(&self, relative: &Path) -> bool {
        let path_str = relative.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }
        self.include.iter().any(|p| p.matches(&path_str))
    }

    /// Resolve the final ordered, de-duplicated list of relative targets.
    pub fn resolve(&self, base: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let base = base.as_ref();
        let mut targets: Vec<PathBuf> = Vec::new();

        for path in &self.explicit {
            if !targets.contains(path) {
                targets.push(path.clone());
            }
        }

        if self.include.is_empty() {
            return Ok(targets);
        }

        for path in self.discover(base)? {
            if !targets.contains(&path) {
                targets.push(path);
            }
        }

        Ok(targets)
    }

    /// Walk `base` and return matching files relative to it, sorted.
    pub fn discover(&self, base: &Path) -> Result<Vec<PathBuf>> {
        if !base.exists() {
            return Err(SweepError::PathNotFound(base.to_path_buf()));
        }

        let skip: Vec<PathBuf> = self
            .skip
            .iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect();

        let mut files = Vec::new();
        let walker = WalkDir::new(base).follow_links(true).into_iter();

        for entry in walker.filter_entry(|e| {
            // Always include the root directory
            if e.depth() == 0 {
                return true;
            }
            if e.file_type().is_dir() {
                let name = e.file_name().to_str().unwrap_or("");
                if name.starts_with('.') || SKIPPED_DIRS.contains(&name) {
                    return false;
                }
                if !skip.is_empty() {
                    if let Ok(canonical) = fs::canonicalize(e.path()) {
                        return !skip.contains(&canonical);
                    }
                }
            }
            true
        }) {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(base) else {
                continue;
            };
            if self.matches(relative) {
                files.push(relative.to_path_buf());
            }
        }

        // Sort for deterministic output
        files.sort();
        debug!("discovered {} files under {}", files.len(), base.display());

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_files(dir: &Path) {
        for path in [
            "pages/home.dart",
            "pages/reports/report.dart",
            "services/sync.dart",
            "services/sync_test.dart",
            "build/generated.dart",
            ".dart_tool/cache.dart",
            "backup/20250101_000000_pages_home.dart",
            "README.md",
        ] {
            let full = dir.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, "print('debug');\n").unwrap();
        }
    }

    #[test]
    fn test_explicit_only_keeps_order_and_dedups() {
        let set = TargetSet::new().targets(["b.dart", "a.dart", "b.dart"]);
        let resolved = set.resolve("/does/not/matter").unwrap();

        assert_eq!(
            resolved,
            vec![PathBuf::from("b.dart"), PathBuf::from("a.dart")]
        );
    }

    #[test]
    fn test_matches_include_and_exclude() {
        let set = TargetSet::new()
            .include("**/*.dart")
            .unwrap()
            .exclude("**/*_test.dart")
            .unwrap();

        assert!(set.matches(Path::new("pages/home.dart")));
        assert!(!set.matches(Path::new("services/sync_test.dart")));
        assert!(!set.matches(Path::new("pages/README.md")));
    }

    #[test]
    fn test_discover_skips_hidden_build_and_backup() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let set = TargetSet::new()
            .include("**/*.dart")
            .unwrap()
            .skip_dir(temp.path().join("backup"));
        let files = set.discover(temp.path()).unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("pages/home.dart"),
                PathBuf::from("pages/reports/report.dart"),
                PathBuf::from("services/sync.dart"),
                PathBuf::from("services/sync_test.dart"),
            ]
        );
    }

    #[test]
    fn test_resolve_appends_discovered_after_explicit() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let set = TargetSet::new()
            .targets(["services/sync.dart", "missing.dart"])
            .include("services/*.dart")
            .unwrap()
            .exclude("**/*_test.dart")
            .unwrap();
        let resolved = set.resolve(temp.path()).unwrap();

        assert_eq!(
            resolved,
            vec![PathBuf::from("services/sync.dart"), PathBuf::from("missing.dart")]
        );
    }

    #[test]
    fn test_discover_missing_base() {
        let set = TargetSet::new().include("**/*.dart").unwrap();
        let result = set.resolve("/nonexistent/path");

        assert!(matches!(result, Err(SweepError::PathNotFound(_))));
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = TargetSet::new().include("[invalid");

        if let Err(SweepError::InvalidGlob { pattern, .. }) = result {
            assert_eq!(pattern, "[invalid");
        } else {
            panic!("Expected InvalidGlob error");
        }
    }
}
