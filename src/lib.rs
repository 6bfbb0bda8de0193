//! byte-histogram - Parallel Byte-Frequency Profiler
//!
//! Counts how often each of the 256 byte values occurs across every file in
//! a directory tree and renders the result as a ranked, normalized bar
//! chart. Useful as a quick profile of a corpus: text versus binary, dominant
//! byte values, line-ending style.
//!
//! # Features
//!
//! - **Chunked Reading**: Files are read sequentially and concatenated into
//!   fixed-size chunks, independent of file boundaries.
//!
//! - **Parallel Counting**: A pool of worker threads, each with a private
//!   counter, so the hot loop never touches shared state.
//!
//! - **Memory Bounded**: The reader hands chunks over a bounded queue and
//!   stalls when workers fall behind.
//!
//! - **Fail Fast**: Any traversal or read error aborts the run; a partial
//!   histogram is never printed.
//!
//! # Architecture
//!
//! ```text
//!   ChunkSource ──▶ ChunkQueue ──▶ Worker × N ──join──▶ merge
//!                                                         │
//!                                       render ◀── normalize
//! ```
//!
//! # Example
//!
//! ```bash
//! # Profile ./files with one worker per core
//! byte-histogram
//!
//! # Bigger chunks, 8 workers, live progress and a summary
//! byte-histogram /srv/corpus -c 65536 -w 8 -p -s
//! ```

pub mod config;
pub mod error;
pub mod histogram;
pub mod pipeline;
pub mod progress;

pub use config::{CliArgs, HistogramConfig};
pub use error::{HistogramError, Result};
pub use histogram::{normalize, render, Counter, GlobalCounter, NormalizedCounter};
pub use pipeline::{HistogramCoordinator, HistogramResult};

/// Run the whole pipeline and return the counts with the rendered report
pub fn profile(config: HistogramConfig) -> Result<(HistogramResult, String)> {
    let result = HistogramCoordinator::new(config)?.run()?;
    let normalized = normalize(&result.counter);
    let report = render(&result.counter, &normalized);
    Ok((result, report))
}
