//! byte-histogram - Parallel Byte-Frequency Profiler
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use byte_histogram::config::{CliArgs, HistogramConfig};
use byte_histogram::histogram::{normalize, render};
use byte_histogram::pipeline::{HistogramCoordinator, HistogramResult};
use byte_histogram::progress::{print_header, print_summary, ProgressReporter};
use clap::Parser;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let started = Instant::now();

    match run(started) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(started: Instant) -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = HistogramConfig::from_args(args).context("Invalid configuration")?;

    if config.show_summary {
        print_header(&config.root, config.worker_count, config.chunk_size);
    }

    let coordinator =
        HistogramCoordinator::new(config.clone()).context("Failed to initialize pipeline")?;

    let result = if config.show_progress {
        run_with_progress(&coordinator, started)
    } else {
        coordinator.run()
    }
    .with_context(|| format!("Histogram of '{}' failed", config.root.display()))?;

    let normalized = normalize(&result.counter);
    print!("{}", render(&result.counter, &normalized));

    let elapsed = started.elapsed();
    println!("{:?}", elapsed);

    if config.show_summary {
        print_summary(&result, elapsed);
    }

    Ok(())
}

/// Run the pipeline while a scoped thread keeps the spinner current
fn run_with_progress(
    coordinator: &HistogramCoordinator,
    started: Instant,
) -> byte_histogram::Result<HistogramResult> {
    let reporter = ProgressReporter::new();
    reporter.set_status("Reading files...");
    let done = AtomicBool::new(false);

    let result = thread::scope(|scope| {
        scope.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                reporter.update(&coordinator.progress(started.elapsed()));
                thread::sleep(Duration::from_millis(100));
            }
        });

        let result = coordinator.run();
        done.store(true, Ordering::Relaxed);
        result
    });

    reporter.finish_and_clear();
    result
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("byte_histogram=debug,warn")
        } else {
            EnvFilter::new("byte_histogram=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
