//! # dbgsweep
//!
//! A CLI tool that deletes debug print statements from a list of source files.
//!
//! ## Overview
//!
//! dbgsweep is built on top of dbgsweeplib. It reads an optional TOML config
//! (`dbgsweep.toml` in the working directory, or `--config`), layers command
//! line flags on top, backs up every target and then rewrites each one with
//! the matching debug lines removed.
//!
//! ## Usage
//!
//! ```bash
//! # Clean two files under lib/ using the default (advanced) catalog
//! dbgsweep --base-dir lib pages/home.dart services/sync.dart
//!
//! # See what would be removed without touching anything
//! dbgsweep --dry-run --base-dir lib --include "**/*.dart"
//!
//! # Use the basic catalog and protect an extra message
//! dbgsweep --preset basic --keep-message "Payment" pages/checkout.dart
//!
//! # Machine-readable summary
//! dbgsweep --output json
//! ```
//!
//! The exit status is non-zero if any file could not be rewritten or backed
//! up. Missing targets are reported as skipped and do not affect it.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dbgsweeplib::{run, Preset, RunSummary, SweepConfig};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("dbgsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Remove debug print statements from source files, backing them up first")
        .arg(
            Arg::new("targets")
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf))
                .help("Files to clean, relative to the base directory (added to configured targets)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("Config file (defaults to ./dbgsweep.toml if present)"),
        )
        .arg(
            Arg::new("base-dir")
                .short('b')
                .long("base-dir")
                .value_parser(value_parser!(PathBuf))
                .help("Directory targets are relative to"),
        )
        .arg(
            Arg::new("backup-dir")
                .long("backup-dir")
                .value_parser(value_parser!(PathBuf))
                .help("Backup root, replaced on every run"),
        )
        .arg(
            Arg::new("preset")
                .short('p')
                .long("preset")
                .value_parser(["basic", "advanced", "empty"])
                .help("Built-in pattern catalog"),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Also clean files matching glob pattern (relative to the base directory)"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude discovered files matching glob pattern"),
        )
        .arg(
            Arg::new("remove")
                .long("remove")
                .action(ArgAction::Append)
                .help("Extra remove pattern (regex matched against the whole line)"),
        )
        .arg(
            Arg::new("keep")
                .long("keep")
                .action(ArgAction::Append)
                .help("Extra keep pattern (regex matched against the whole line)"),
        )
        .arg(
            Arg::new("remove-message")
                .long("remove-message")
                .action(ArgAction::Append)
                .help("Remove print('...') statements containing this text"),
        )
        .arg(
            Arg::new("keep-message")
                .long("keep-message")
                .action(ArgAction::Append)
                .help("Never remove print('...') statements containing this text"),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report what would be removed without writing anything"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Report format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug, -vvv trace)"),
        )
}

/// Collect a repeatable string argument
fn extract_strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|v| v.cloned().collect())
        .unwrap_or_default()
}

/// Load the config file and apply command line overrides
fn build_config(matches: &ArgMatches) -> anyhow::Result<SweepConfig> {
    let config_path = matches.get_one::<PathBuf>("config");
    let mut config = SweepConfig::discover(config_path.map(|p| p.as_path()))?;

    if let Some(dir) = matches.get_one::<PathBuf>("base-dir") {
        config.base_dir = dir.clone();
    }
    if let Some(dir) = matches.get_one::<PathBuf>("backup-dir") {
        config.backup_dir = dir.clone();
    }
    if let Some(preset) = matches.get_one::<String>("preset") {
        config.preset = preset
            .parse::<Preset>()
            .map_err(anyhow::Error::msg)
            .context("invalid --preset")?;
    }
    if let Some(targets) = matches.get_many::<PathBuf>("targets") {
        config.targets.extend(targets.cloned());
    }

    config.include.extend(extract_strings(matches, "include"));
    config.exclude.extend(extract_strings(matches, "exclude"));
    config.patterns.remove.extend(extract_strings(matches, "remove"));
    config.patterns.keep.extend(extract_strings(matches, "keep"));
    config
        .patterns
        .remove_messages
        .extend(extract_strings(matches, "remove-message"));
    config
        .patterns
        .keep_messages
        .extend(extract_strings(matches, "keep-message"));

    Ok(config)
}

/// Handler for the sweep
fn sweep_handler(matches: &ArgMatches) -> anyhow::Result<RunSummary> {
    let config = build_config(matches)?;
    if config.targets.is_empty() && config.include.is_empty() {
        anyhow::bail!("no targets: pass file paths, --include patterns, or a config file");
    }

    let options = config.into_options()?.dry_run(matches.get_flag("dry-run"));
    let summary = run(&options)?;
    Ok(summary)
}

/// Route `log` output to stderr; `RUST_LOG` wins over `-v`
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));

    let summary = match sweep_handler(&matches) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let output = match matches.get_one::<String>("output").map(|s| s.as_str()) {
        Some("json") => render::render_json(&summary),
        _ => Ok(render::render_text(&summary)),
    };

    match output {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    if summary.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["dbgsweep"];
        argv.extend(args);
        build_command().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("dbgsweep.toml");
        std::fs::write(&config_path, "preset = \"empty\"\ntargets = [\"z.dart\"]\n").unwrap();
        let config_arg = config_path.to_string_lossy().to_string();

        let matches = parse(&[
            "--config",
            config_arg.as_str(),
            "--base-dir",
            "lib",
            "--preset",
            "basic",
            "--keep-message",
            "Payment",
            "a.dart",
            "b.dart",
        ]);
        let config = build_config(&matches).unwrap();

        assert_eq!(config.base_dir, PathBuf::from("lib"));
        assert_eq!(config.preset, Preset::Basic);
        assert_eq!(
            config.targets,
            vec![
                PathBuf::from("z.dart"),
                PathBuf::from("a.dart"),
                PathBuf::from("b.dart")
            ]
        );
        assert_eq!(config.patterns.keep_messages, vec!["Payment"]);
    }

    #[test]
    fn test_rejects_unknown_preset() {
        let result = build_command().try_get_matches_from(["dbgsweep", "--preset", "huge"]);
        assert!(result.is_err());
    }
}
