//! Classification-and-move pipeline.
//!
//! The [`Mover`] walks a source tree, classifies each file by extension via
//! the configuration, picks a collision-free target name, and moves the
//! file into its category directory under the backup root. Counters are
//! shared with the interrupt handler so a mid-run Ctrl+C can still report
//! how far the run got.

use crate::config::BackupConfig;
use crate::naming;
use crate::output::Reporter;
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

/// Fatal errors that abort a run before or during setup.
///
/// Per-file move failures are deliberately not represented here; they are
/// counted and reported, never fatal.
#[derive(Debug)]
pub enum BackupError {
    /// The source folder does not exist.
    SourceNotFound(PathBuf),
    /// The source path exists but is not a directory.
    SourceNotADirectory(PathBuf),
    /// A required destination directory could not be created.
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for BackupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotFound(path) => {
                write!(f, "Source folder not found: {}", path.display())
            }
            Self::SourceNotADirectory(path) => {
                write!(f, "Source path is not a directory: {}", path.display())
            }
            Self::DirectoryCreate { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for BackupError {}

/// Counters mutated by the processing loop and read by the interrupt
/// handler, hence the atomics. `total` is set once after enumeration so
/// `moved + remaining == total` holds at any point of the run.
#[derive(Debug, Default)]
pub struct RunCounters {
    moved: AtomicUsize,
    total: AtomicUsize,
    errors: AtomicUsize,
    per_category: Mutex<HashMap<String, usize>>,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    pub fn record_move(&self, category: &str) {
        self.moved.fetch_add(1, Ordering::SeqCst);
        let mut per_category = self.per_category.lock().expect("per-category lock");
        *per_category.entry(category.to_string()).or_insert(0) += 1;
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    pub fn moved(&self) -> usize {
        self.moved.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }

    /// Files not yet moved, counted against the up-front total.
    pub fn remaining(&self) -> usize {
        self.total().saturating_sub(self.moved())
    }

    pub fn per_category(&self) -> HashMap<String, usize> {
        self.per_category.lock().expect("per-category lock").clone()
    }
}

/// Options controlling a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOptions {
    /// Walk the whole source tree instead of the top level only.
    pub recursive: bool,
    /// Also process hidden files (names starting with a dot).
    pub include_hidden: bool,
    /// Report intended moves without touching the filesystem.
    pub dry_run: bool,
    /// Render a progress bar while processing.
    pub progress: bool,
}

/// Final accounting for a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub moved: usize,
    pub total: usize,
    pub errors: usize,
    pub per_category: HashMap<String, usize>,
}

/// Moves classified files into category directories under the backup root.
pub struct Mover<'a> {
    config: &'a BackupConfig,
    options: MoveOptions,
    reporter: &'a Reporter,
    counters: &'a RunCounters,
    // Original names already placed per category during this run. Moved
    // files are renamed on arrival, so a directory check alone would miss
    // a same-named file processed earlier in the same pass.
    placed: HashSet<(String, String)>,
}

impl<'a> Mover<'a> {
    pub fn new(
        config: &'a BackupConfig,
        options: MoveOptions,
        reporter: &'a Reporter,
        counters: &'a RunCounters,
    ) -> Self {
        Self {
            config,
            options,
            reporter,
            counters,
            placed: HashSet::new(),
        }
    }

    /// Runs the full pipeline against `source`.
    ///
    /// Setup failures (missing source, uncreatable destination) abort
    /// before any file is touched. A failure moving one file increments
    /// the error counter and processing continues with the next file.
    pub fn run(&mut self, source: &Path) -> Result<RunSummary, BackupError> {
        if !source.exists() {
            return Err(BackupError::SourceNotFound(source.to_path_buf()));
        }
        if !source.is_dir() {
            return Err(BackupError::SourceNotADirectory(source.to_path_buf()));
        }

        // Dry-run stays side-effect-free end to end: no directories are
        // created until a live run needs them.
        if !self.options.dry_run {
            self.prepare_directories()?;
        }

        let files = self.enumerate(source);
        self.counters.set_total(files.len());
        self.reporter.info(&format!(
            "Found {} file{} under {}",
            files.len(),
            if files.len() == 1 { "" } else { "s" },
            source.display()
        ));

        let bar = self
            .options
            .progress
            .then(|| self.reporter.progress_bar(files.len() as u64));

        for path in &files {
            self.process_file(path);
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        Ok(RunSummary {
            moved: self.counters.moved(),
            total: self.counters.total(),
            errors: self.counters.errors(),
            per_category: self.counters.per_category(),
        })
    }

    /// Creates the backup root and every configured category subdirectory.
    /// Creation is idempotent; existing directories are not an error.
    fn prepare_directories(&self) -> Result<(), BackupError> {
        let root = &self.config.default_directory;
        fs::create_dir_all(root).map_err(|e| BackupError::DirectoryCreate {
            path: root.clone(),
            source: e,
        })?;

        for rule in &self.config.categories {
            let category_dir = root.join(&rule.name);
            fs::create_dir_all(&category_dir).map_err(|e| BackupError::DirectoryCreate {
                path: category_dir.clone(),
                source: e,
            })?;
        }

        Ok(())
    }

    /// Collects candidate files up front so the total is known before any
    /// move happens. Hidden entries are pruned unless requested; the walk
    /// root itself is never pruned (temp directories are often dot-named).
    /// The backup root is pruned in case it sits inside the source tree.
    fn enumerate(&self, source: &Path) -> Vec<PathBuf> {
        let max_depth = if self.options.recursive {
            usize::MAX
        } else {
            1
        };
        let include_hidden = self.options.include_hidden;
        let backup_root = self.config.default_directory.clone();

        WalkDir::new(source)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                if entry.path() == backup_root {
                    return false;
                }
                include_hidden || !is_hidden(entry.file_name())
            })
            .flatten()
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Classifies and moves (or reports) a single file. Files with no
    /// matching category are left in place and do not touch any counter.
    fn process_file(&mut self, path: &Path) {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return;
        };

        let Some(extension) = naming::extension_of(&name) else {
            self.reporter
                .verbose(&format!("No extension, leaving {} in place", path.display()));
            return;
        };

        let Some(category) = self.config.category_for(&extension) else {
            self.reporter.verbose(&format!(
                "No category for {}, leaving {} in place",
                extension,
                path.display()
            ));
            return;
        };

        let category = category.to_string();
        let category_dir = self.config.default_directory.join(&category);
        // Duplicate means the original name already resides in the category
        // directory, or was placed there earlier in this run, regardless of
        // the renamed form it takes.
        let placed_key = (category.clone(), name.clone());
        let is_duplicate =
            category_dir.join(&name).exists() || self.placed.contains(&placed_key);
        let new_name = naming::unique_name(&category_dir, &name, is_duplicate);
        let target = category_dir.join(&new_name);

        if self.options.dry_run {
            self.reporter
                .dry_run_notice(&format!("{} -> {}", path.display(), target.display()));
            self.counters.record_move(&category);
            self.placed.insert(placed_key);
            return;
        }

        match move_file(path, &target) {
            Ok(()) => {
                self.reporter
                    .success(&format!("{} -> {}", path.display(), target.display()));
                self.counters.record_move(&category);
                self.placed.insert(placed_key);
            }
            Err(err) => {
                self.reporter.error(&format!(
                    "Failed to move {} to {}: {}",
                    path.display(),
                    target.display(),
                    err
                ));
                self.counters.record_error();
            }
        }
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Moves a file, falling back to copy-then-remove when rename fails (for
/// example across filesystem boundaries).
fn move_file(source: &Path, target: &Path) -> std::io::Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(source, target)?;
            fs::remove_file(source)
        }
    }
}
