//! Output formatting and styling module.
//!
//! Provides a per-run [`Reporter`] for all CLI output: colored status
//! lines, progress tracking, and the end-of-run summary table. The
//! reporter is constructed by the run controller and injected into the
//! mover, so there is no process-wide logging state.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Handles all CLI output with consistent styling.
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Prints a success message in green with a checkmark.
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(&self, message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(&self, message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a message only when verbose output is enabled.
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{}", message.dimmed());
        }
    }

    /// Prints a section header.
    pub fn header(&self, header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice describing an intended action.
    pub fn dry_run_notice(&self, message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for `total` items.
    pub fn progress_bar(&self, total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        bar
    }

    /// Prints the per-category summary table plus totals and error count.
    pub fn summary_table(
        &self,
        per_category: &HashMap<String, usize>,
        total_moved: usize,
        errors: usize,
    ) {
        self.header("SUMMARY");

        // Sort categories for consistent output
        let mut categories: Vec<_> = per_category.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let width = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &categories {
            let file_word = if **count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Moved".bold(),
            total_moved.to_string().green().bold(),
            if total_moved == 1 { "file" } else { "files" },
            width = width
        );
        if errors > 0 {
            println!(
                "{:<width$} | {}",
                "Errors".bold(),
                errors.to_string().red().bold(),
                width = width
            );
        }
    }
}
