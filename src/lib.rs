//! typestash - extension-driven file backup
//!
//! This library scans a source folder, classifies files by extension using
//! a TOML mapping, and moves them into type-named subdirectories under a
//! backup root, renaming to avoid collisions.

pub mod cli;
pub mod config;
pub mod mover;
pub mod naming;
pub mod output;

pub use config::{BackupConfig, CategoryRule, ConfigError};
pub use mover::{BackupError, MoveOptions, Mover, RunCounters, RunSummary};
pub use naming::unique_name;
pub use output::Reporter;

pub use cli::Cli;
