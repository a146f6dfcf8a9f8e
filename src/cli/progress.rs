//! Progress and console output utilities for the CLI
//!
//! Key features:
//! - A spinner that follows theme generation stages
//! - Consistent console helpers for headers and status lines
//! - A writer that tees log output to the console and a file

use crate::theme::GenerationStage;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

// ============================================================================
// Styles - Consistent visual appearance
// ============================================================================

/// Get the spinner style for pipeline stages
fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷")
}

fn finished_style(marker: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(&format!("  {} {{msg}}", marker))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a section divider
pub fn print_divider() {
    println!();
    println!("{}", "─".repeat(60));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("  ✗ {}", msg);
}

// ============================================================================
// Generation spinner
// ============================================================================

/// Human-readable progress line for a stage
pub fn stage_message(stage: GenerationStage) -> &'static str {
    match stage {
        GenerationStage::Idle => "Waiting...",
        GenerationStage::Sampling => "Sampling image colors...",
        GenerationStage::Synthesizing => "Synthesizing color schemes...",
        GenerationStage::Validating => "Checking contrast...",
        GenerationStage::Done => "Themes ready",
        GenerationStage::Failed => "Theme generation failed",
    }
}

/// Spinner driven by [`GenerationStage`] transitions
pub struct GenerationSpinner {
    spinner: ProgressBar,
}

impl GenerationSpinner {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(stage_message(GenerationStage::Idle));
        Self { spinner }
    }

    /// A stage observer for [`crate::theme::ThemeGenerator::with_observer`]
    pub fn observer(&self) -> impl FnMut(GenerationStage) + 'static {
        let spinner = self.spinner.clone();
        move |stage| match stage {
            GenerationStage::Done => {
                spinner.set_style(finished_style("✓"));
                spinner.finish_with_message(stage_message(stage));
            }
            GenerationStage::Failed => {
                spinner.set_style(finished_style("✗"));
                spinner.finish_with_message(stage_message(stage));
            }
            _ => spinner.set_message(stage_message(stage)),
        }
    }

    /// Clear the spinner if the pipeline never reached a terminal stage
    pub fn finish(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl Default for GenerationSpinner {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_messages_are_distinct() {
        let stages = [
            GenerationStage::Idle,
            GenerationStage::Sampling,
            GenerationStage::Synthesizing,
            GenerationStage::Validating,
            GenerationStage::Done,
            GenerationStage::Failed,
        ];
        let messages: std::collections::HashSet<&str> =
            stages.iter().map(|s| stage_message(*s)).collect();
        assert_eq!(messages.len(), stages.len());
    }

    #[test]
    fn test_spinner_observer_finishes_on_terminal_stage() {
        let spinner = GenerationSpinner::new();
        let mut observe = spinner.observer();
        observe(GenerationStage::Sampling);
        observe(GenerationStage::Done);
        assert!(spinner.spinner.is_finished());
        spinner.finish();
    }

    #[test]
    fn test_dual_writer_writes_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let mut writer = DualWriter {
            console: std::io::stderr(),
            file: temp.reopen().unwrap(),
        };
        writer.write_all(b"hello log\n").unwrap();
        writer.flush().unwrap();
        let content = std::fs::read_to_string(temp.path()).unwrap();
        assert_eq!(content, "hello log\n");
    }
}
