//! Command-line surface and run wiring.
//!
//! Parses arguments with clap and wires the configuration, reporter, and
//! shared counters into a [`Mover`] run. Fatal errors are flattened to a
//! message at this boundary; the caller maps them to the process exit code.

use crate::config::BackupConfig;
use crate::mover::{MoveOptions, Mover, RunCounters};
use crate::output::Reporter;
use clap::Parser;
use std::path::PathBuf;

/// Move files into type-named backup subdirectories driven by a TOML
/// extension map.
#[derive(Debug, Parser)]
#[command(name = "typestash", version)]
pub struct Cli {
    /// Folder to scan for files to back up.
    pub source_folder: PathBuf,

    /// Path to the TOML configuration; falls back to the per-user default
    /// location when the given path is missing.
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Print per-file skip decisions.
    #[arg(short, long)]
    pub verbose: bool,

    /// Report intended moves without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Descend into subdirectories instead of scanning the top level only.
    #[arg(short, long)]
    pub recursive: bool,

    /// Also back up hidden files (names starting with a dot).
    #[arg(long)]
    pub include_hidden: bool,

    /// Show a progress bar while moving.
    #[arg(long)]
    pub progress: bool,
}

/// Runs a full backup pass for the parsed arguments.
///
/// `counters` is the same instance the interrupt handler reads, so a
/// mid-run Ctrl+C can report progress gathered so far.
pub fn run(cli: &Cli, reporter: &Reporter, counters: &RunCounters) -> Result<(), String> {
    let config = BackupConfig::load_with_fallback(cli.config_file.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    if cli.dry_run {
        reporter.dry_run_notice(&format!(
            "Analyzing contents of: {}",
            cli.source_folder.display()
        ));
    } else {
        reporter.info(&format!(
            "Backing up contents of: {}",
            cli.source_folder.display()
        ));
    }

    let options = MoveOptions {
        recursive: cli.recursive,
        include_hidden: cli.include_hidden,
        dry_run: cli.dry_run,
        progress: cli.progress,
    };

    let mut mover = Mover::new(&config, options, reporter, counters);
    let summary = mover.run(&cli.source_folder).map_err(|e| e.to_string())?;

    reporter.summary_table(&summary.per_category, summary.moved, summary.errors);
    if summary.errors > 0 {
        reporter.warning("Some files could not be moved. Review the errors above.");
    }
    if cli.dry_run {
        reporter.success("Dry run complete. No files were modified.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "typestash",
            "/tmp/source",
            "--config-file",
            "/tmp/config.toml",
            "--verbose",
            "--dry-run",
            "--recursive",
            "--include-hidden",
            "--progress",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.source_folder, PathBuf::from("/tmp/source"));
        assert_eq!(cli.config_file, Some(PathBuf::from("/tmp/config.toml")));
        assert!(cli.verbose);
        assert!(cli.dry_run);
        assert!(cli.recursive);
        assert!(cli.include_hidden);
        assert!(cli.progress);
    }

    #[test]
    fn test_source_folder_is_required() {
        assert!(Cli::try_parse_from(["typestash"]).is_err());
    }
}
