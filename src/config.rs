//! Configuration types for byte-histogram
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Default directory scanned when no root is given
pub const DEFAULT_ROOT: &str = "files";

/// Default chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Largest accepted chunk size (64 MiB)
const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Reject a zero or oversized chunk size
pub(crate) fn check_chunk_size(size: usize) -> Result<(), ConfigError> {
    if size == 0 || size > MAX_CHUNK_SIZE {
        return Err(ConfigError::InvalidChunkSize {
            size,
            max: MAX_CHUNK_SIZE,
        });
    }
    Ok(())
}

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Maximum number of chunks buffered between the reader and the workers
const MAX_QUEUE_DEPTH: usize = 4096;

/// Byte-frequency histogram over every file in a directory tree
#[derive(Parser, Debug, Clone)]
#[command(
    name = "byte-histogram",
    version,
    about = "Byte-frequency histogram over every file in a directory tree",
    long_about = "Reads every regular file under ROOT, counts how often each byte value occurs \
                  across the whole tree and prints a ranked, min-max normalized bar chart.\n\n\
                  Files are read sequentially into fixed-size chunks that are counted in \
                  parallel by a pool of worker threads.",
    after_help = "EXAMPLES:\n    \
        byte-histogram\n    \
        byte-histogram ./corpus -w 8\n    \
        byte-histogram /var/log -c 65536 -p -s"
)]
pub struct CliArgs {
    /// Directory tree to scan
    #[arg(value_name = "ROOT", default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Chunk size in bytes handed to each worker
    #[arg(short = 'c', long, default_value_t = DEFAULT_CHUNK_SIZE, value_name = "BYTES")]
    pub chunk_size: usize,

    /// Number of counter worker threads
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Chunks buffered between reader and workers (0 = direct handoff)
    #[arg(long, default_value = "0", value_name = "NUM")]
    pub queue_depth: usize,

    /// Show a live progress spinner on stderr
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Print a run summary on stderr after the report
    #[arg(short = 's', long)]
    pub summary: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn default_workers() -> usize {
    // Counting is CPU bound, one worker per usable core
    num_cpus::get().max(1)
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    /// Root of the tree to scan
    pub root: PathBuf,

    /// Chunk size in bytes
    pub chunk_size: usize,

    /// Number of counter workers
    pub worker_count: usize,

    /// Bounded queue capacity between reader and workers
    pub queue_depth: usize,

    /// Show progress indicator
    pub show_progress: bool,

    /// Print run summary
    pub show_summary: bool,
}

impl HistogramConfig {
    /// Configuration for `root` with default chunk size, workers and queue depth
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            worker_count: default_workers(),
            queue_depth: 0,
            show_progress: false,
            show_summary: false,
        }
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let config = Self {
            root: args.root,
            chunk_size: args.chunk_size,
            worker_count: args.workers,
            queue_depth: args.queue_depth,
            show_progress: args.progress,
            show_summary: args.summary,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the queue depth
    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    /// Check every numeric bound
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_chunk_size(self.chunk_size)?;

        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.worker_count,
                max: MAX_WORKERS,
            });
        }

        if self.queue_depth > MAX_QUEUE_DEPTH {
            return Err(ConfigError::InvalidQueueDepth {
                depth: self.queue_depth,
                max: MAX_QUEUE_DEPTH,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("byte-histogram").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.root, PathBuf::from("files"));
        assert_eq!(args.chunk_size, 1024);
        assert_eq!(args.queue_depth, 0);
        assert!(args.workers >= 1);

        let config = HistogramConfig::from_args(args).unwrap();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(!config.show_progress);
        assert!(!config.show_summary);
    }

    #[test]
    fn test_explicit_args() {
        let args = parse(&["/data", "-c", "4096", "-w", "3", "--queue-depth", "8", "-p", "-s"]);
        let config = HistogramConfig::from_args(args).unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.queue_depth, 8);
        assert!(config.show_progress);
        assert!(config.show_summary);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = HistogramConfig::from_args(parse(&["-c", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChunkSize { size: 0, .. }));
    }

    #[test]
    fn test_worker_bounds() {
        let err = HistogramConfig::from_args(parse(&["-w", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { count: 0, .. }));

        let err = HistogramConfig::new("x").with_workers(MAX_WORKERS + 1).validate();
        assert!(err.is_err());
    }

    #[test]
    fn test_queue_depth_bound() {
        let config = HistogramConfig::new("x").with_queue_depth(MAX_QUEUE_DEPTH + 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQueueDepth { .. })
        ));
        assert!(HistogramConfig::new("x").with_queue_depth(MAX_QUEUE_DEPTH).validate().is_ok());
    }

    #[test]
    fn test_negative_number_rejected_by_parser() {
        let res = CliArgs::try_parse_from(["byte-histogram", "-c", "-5"]);
        assert!(res.is_err());
    }
}
