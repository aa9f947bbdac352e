//! TOML configuration.
//!
//! ```toml
//! base_dir = "lib"
//! backup_dir = "backup_debug_logs"
//! preset = "advanced"
//! targets = ["pages/home.dart", "services/sync.dart"]
//! include = ["services/**/*.dart"]
//! exclude = ["**/*.g.dart"]
//!
//! [patterns]
//! remove_messages = ["Cart updated"]
//! keep_messages = ["Payment"]
//! remove = ['^\s*debugPrint\(.*\);?\s*$']
//! keep = []
//! ```
//!
//! Relative `base_dir` and `backup_dir` in a file are resolved against the
//! directory containing that file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{PatternCatalog, Preset};
use crate::error::SweepError;
use crate::source::TargetSet;
use crate::sweep::SweepOptions;
use crate::Result;

/// Config file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "dbgsweep.toml";

/// Backup root used when none is configured.
pub const DEFAULT_BACKUP_DIR: &str = "backup_debug_logs";

/// Extra patterns layered on top of the preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternConfig {
    /// Raw remove regexes
    pub remove: Vec<String>,
    /// Raw keep regexes
    pub keep: Vec<String>,
    /// Message fragments wrapped into `print('...')` remove patterns
    pub remove_messages: Vec<String>,
    /// Message fragments wrapped into `print('...')` keep patterns
    pub keep_messages: Vec<String>,
}

impl PatternConfig {
    /// Append these patterns to `catalog`.
    pub fn apply(&self, catalog: PatternCatalog) -> Result<PatternCatalog> {
        catalog
            .remove_many(&self.remove)?
            .keep_many(&self.keep)?
            .remove_messages(&self.remove_messages)?
            .keep_messages(&self.keep_messages)
    }
}

/// Everything a run needs, as read from a file and/or the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub base_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub preset: Preset,
    pub targets: Vec<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub patterns: PatternConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            preset: Preset::default(),
            targets: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            patterns: PatternConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Parse TOML text. `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| SweepError::ConfigParse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a config file. The file must exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SweepError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content, path)?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            config.base_dir = dir.join(&config.base_dir);
            config.backup_dir = dir.join(&config.backup_dir);
        }
        Ok(config)
    }

    /// Load `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] if it exists,
    /// otherwise defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Build the pattern catalog: preset first, then extras.
    pub fn catalog(&self) -> Result<PatternCatalog> {
        self.patterns.apply(PatternCatalog::preset(self.preset)?)
    }

    /// Build the target set. The backup root is excluded from discovery.
    pub fn target_set(&self) -> Result<TargetSet> {
        Ok(TargetSet::new()
            .targets(self.targets.iter().cloned())
            .include_many(&self.include)?
            .exclude_many(&self.exclude)?
            .skip_dir(&self.backup_dir))
    }

    /// Compile everything into run options.
    pub fn into_options(self) -> Result<SweepOptions> {
        let catalog = self.catalog()?;
        let targets = self.target_set()?;
        Ok(SweepOptions::new()
            .base_dir(self.base_dir)
            .backup_dir(self.backup_dir)
            .catalog(catalog)
            .targets(targets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = SweepConfig::parse("", Path::new("x.toml")).unwrap();

        assert_eq!(config, SweepConfig::default());
        assert_eq!(config.backup_dir, PathBuf::from("backup_debug_logs"));
        assert_eq!(config.preset, Preset::Advanced);
    }

    #[test]
    fn test_parse_full() {
        let config = SweepConfig::parse(
            r#"
base_dir = "lib"
preset = "basic"
targets = ["a.dart", "pages/b.dart"]
include = ["**/*.dart"]

[patterns]
remove_messages = ["Cart updated"]
keep = ['^\s*print\(.*Payment.*\);?\s*$']
"#,
            Path::new("x.toml"),
        )
        .unwrap();

        assert_eq!(config.base_dir, PathBuf::from("lib"));
        assert_eq!(config.preset, Preset::Basic);
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.patterns.remove_messages, vec!["Cart updated"]);

        let catalog = config.catalog().unwrap();
        assert!(catalog.is_debug("print('Cart updated');"));
        assert!(catalog.is_protected("print('Payment debug');"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = SweepConfig::parse("bogus = 1", Path::new("x.toml"));
        assert!(matches!(result, Err(SweepError::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let result = SweepConfig::parse("preset = \"huge\"", Path::new("x.toml"));
        assert!(matches!(result, Err(SweepError::ConfigParse { .. })));
    }

    #[test]
    fn test_invalid_extra_pattern() {
        let config = SweepConfig {
            patterns: PatternConfig {
                remove: vec!["(".to_string()],
                ..PatternConfig::default()
            },
            ..SweepConfig::default()
        };

        assert!(matches!(
            config.catalog(),
            Err(SweepError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_load_resolves_relative_to_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dbgsweep.toml");
        fs::write(&path, "base_dir = \"lib\"\n").unwrap();

        let config = SweepConfig::load(&path).unwrap();

        assert_eq!(config.base_dir, temp.path().join("lib"));
        assert_eq!(config.backup_dir, temp.path().join(DEFAULT_BACKUP_DIR));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempdir().unwrap();
        let result = SweepConfig::discover(Some(&temp.path().join("nope.toml")));

        assert!(matches!(result, Err(SweepError::ConfigRead { .. })));
    }
}
