//! Histogram coordinator - orchestrates a counting run
//!
//! The coordinator is responsible for:
//! - Setting up the chunk queue and spawning the counter workers
//! - Running the chunk source on the calling thread
//! - The join barrier: every worker finishes before the merge starts
//! - Merging worker counters into the global counter
//! - Exposing live progress while the run is in flight

use crate::config::HistogramConfig;
use crate::error::{HistogramError, Result, WorkerError};
use crate::histogram::{merge, Counter, GlobalCounter};
use crate::pipeline::queue::{ChunkQueue, QueueStats};
use crate::pipeline::source::{ChunkSource, SourceStats, SourceSummary};
use crate::pipeline::worker::{aggregate_stats, Worker, WorkerStats};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a completed run
#[derive(Debug)]
pub struct HistogramResult {
    /// Sum of every worker counter
    pub counter: GlobalCounter,

    /// Files, directories, bytes and chunks seen by the source
    pub source: SourceSummary,

    /// Number of counter workers used
    pub workers: usize,

    /// Sends that had to wait for a free worker
    pub backpressure_events: u64,

    /// Time from spawning workers to finishing the merge
    pub duration: Duration,
}

/// Progress information for display
#[derive(Debug, Clone, Default)]
pub struct HistogramProgress {
    /// Files fully read
    pub files: u64,

    /// Bytes read from disk
    pub bytes_read: u64,

    /// Chunks handed to the queue
    pub chunks: u64,

    /// Bytes counted by workers
    pub bytes_counted: u64,

    /// Chunks sent but not yet picked up by a worker
    pub queue_len: u64,

    /// Total workers
    pub total_workers: usize,

    /// Elapsed time
    pub elapsed: Duration,
}

impl HistogramProgress {
    /// Calculate bytes read per second
    pub fn bytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes_read as f64 / secs
        } else {
            0.0
        }
    }
}

/// Coordinates one histogram run
///
/// Statistics handles live on the coordinator so another thread can take
/// `progress` snapshots while `run` blocks. A coordinator is meant to run
/// once; a second run keeps adding to the same statistics.
pub struct HistogramCoordinator {
    /// Configuration
    config: Arc<HistogramConfig>,

    /// Reader statistics
    source_stats: Arc<SourceStats>,

    /// Queue statistics
    queue_stats: Arc<QueueStats>,

    /// One entry per worker
    worker_stats: Vec<Arc<WorkerStats>>,
}

impl HistogramCoordinator {
    /// Create a new coordinator
    pub fn new(config: HistogramConfig) -> Result<Self> {
        config.validate()?;

        let worker_stats = (0..config.worker_count)
            .map(|_| Arc::new(WorkerStats::default()))
            .collect();

        Ok(Self {
            config: Arc::new(config),
            source_stats: Arc::new(SourceStats::default()),
            queue_stats: Arc::new(QueueStats::default()),
            worker_stats,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    /// Run the pipeline to completion
    ///
    /// Fails fast: the first source error closes the queue, the workers are
    /// still joined, and the error is returned without a histogram.
    pub fn run(&self) -> Result<HistogramResult> {
        let start = Instant::now();

        info!(
            root = %self.config.root.display(),
            workers = self.config.worker_count,
            chunk_size = self.config.chunk_size,
            queue_depth = self.config.queue_depth,
            "Starting histogram run"
        );

        let queue = ChunkQueue::with_stats(self.config.queue_depth, Arc::clone(&self.queue_stats));
        let source = ChunkSource::with_stats(
            self.config.root.clone(),
            self.config.chunk_size,
            Arc::clone(&self.source_stats),
        )?;

        // Spawn workers
        let workers = self.spawn_workers(&queue)?;

        // Workers hold their own receivers; the spare one must not outlive them
        let (sender, receiver) = queue.into_parts();
        drop(receiver);

        // Producer runs here; returning drops the sender and closes the queue
        let source_result = source.run(sender);

        // Join barrier
        let joined = join_workers(workers);

        let summary = source_result.map_err(|e| {
            warn!(error = %e, "Source failed, discarding partial counts");
            HistogramError::Source(e)
        })?;
        let counters = joined?;

        let counter = merge(&counters);
        let duration = start.elapsed();

        debug_assert_eq!(counter.total(), summary.bytes);
        info!(
            files = summary.files,
            bytes = summary.bytes,
            chunks = summary.chunks,
            distinct = counter.distinct(),
            duration_ms = duration.as_millis() as u64,
            "Run completed"
        );

        Ok(HistogramResult {
            counter,
            source: summary,
            workers: counters.len(),
            backpressure_events: self.queue_stats.backpressure_count(),
            duration,
        })
    }

    /// Spawn counter workers
    fn spawn_workers(&self, queue: &ChunkQueue) -> Result<Vec<Worker>> {
        let mut workers = Vec::with_capacity(self.worker_stats.len());
        for (id, stats) in self.worker_stats.iter().enumerate() {
            // On failure the queue is dropped by the caller, which closes it
            // and lets any worker already started run off the end
            let worker = Worker::spawn_with_stats(id, queue.receiver(), Arc::clone(stats))?;
            workers.push(worker);
        }

        info!(count = workers.len(), "Workers spawned");
        Ok(workers)
    }

    /// Snapshot of the run so far
    pub fn progress(&self, elapsed: Duration) -> HistogramProgress {
        let source = self.source_stats.summary();
        let bytes_counted = self.worker_stats.iter().map(|s| s.bytes()).sum();
        let queue_len = self
            .queue_stats
            .sent_count()
            .saturating_sub(self.queue_stats.received_count());

        HistogramProgress {
            files: source.files,
            bytes_read: source.bytes,
            chunks: source.chunks,
            bytes_counted,
            queue_len,
            total_workers: self.config.worker_count,
            elapsed,
        }
    }
}

/// Join all worker threads and collect their counters
fn join_workers(workers: Vec<Worker>) -> std::result::Result<Vec<Counter>, WorkerError> {
    let (chunks, bytes) = aggregate_stats(&workers);
    debug!(chunks = chunks, bytes = bytes, "Joining workers");

    let mut counters = Vec::with_capacity(workers.len());
    let mut first_err = None;
    for worker in workers {
        match worker.join() {
            Ok(counter) => counters.push(counter),
            Err(e) => {
                warn!(error = %e, "Worker failed to join cleanly");
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(counters),
    }
}
