//! Progress reporting and run summary
//!
//! Provides a live spinner using indicatif and a styled summary block. Both
//! write to stderr so stdout carries nothing but the report.

use crate::pipeline::{HistogramProgress, HistogramResult};
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Progress reporter that displays run status
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &HistogramProgress) {
        self.bar.set_message(progress_message(progress));
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Spinner message for a progress snapshot
fn progress_message(progress: &HistogramProgress) -> String {
    format!(
        "Files: {} | Read: {} | Counted: {} | Chunks: {} | Rate: {}/s | Queued: {} | Workers: {}",
        format_number(progress.files),
        format_size(progress.bytes_read, BINARY),
        format_size(progress.bytes_counted, BINARY),
        format_number(progress.chunks),
        format_size(progress.bytes_per_second() as u64, BINARY),
        progress.queue_len,
        progress.total_workers,
    )
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a header at the start of the run
pub fn print_header(root: &Path, workers: usize, chunk_size: usize) {
    eprintln!();
    eprintln!(
        "{} {}",
        style("byte-histogram").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Root:").bold(), root.display());
    eprintln!("  {} {}", style("Workers:").bold(), workers);
    eprintln!(
        "  {} {}",
        style("Chunk size:").bold(),
        format_size(chunk_size as u64, BINARY)
    );
    eprintln!();
}

/// Print a summary of the run
pub fn print_summary(result: &HistogramResult, elapsed: Duration) {
    let bytes_str = format_size(result.source.bytes, BINARY);
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        format_size((result.source.bytes as f64 / secs) as u64, BINARY)
    } else {
        format_size(0u64, BINARY)
    };

    eprintln!();
    eprintln!("{}", style("Histogram Complete").green().bold());
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!(
        "  {} {}",
        style("Files:").bold(),
        format_number(result.source.files)
    );
    eprintln!(
        "  {} {}",
        style("Directories:").bold(),
        format_number(result.source.dirs)
    );
    eprintln!("  {} {}", style("Total Size:").bold(), bytes_str);
    eprintln!(
        "  {} {} across {} workers",
        style("Chunks:").bold(),
        format_number(result.source.chunks),
        result.workers
    );
    eprintln!(
        "  {} {} of 256",
        style("Byte values:").bold(),
        result.counter.distinct()
    );
    if result.backpressure_events > 0 {
        eprintln!(
            "  {} {}",
            style("Reader stalls:").yellow().bold(),
            format_number(result.backpressure_events)
        );
    }
    eprintln!(
        "  {} {:.3}s ({}/s)",
        style("Duration:").bold(),
        secs,
        rate
    );
    eprintln!();
}
