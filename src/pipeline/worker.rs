//! Counter worker threads
//!
//! Each worker:
//! - Owns a private `Counter` for the whole run (no sharing, no locks)
//! - Pulls chunks from the shared queue, first come first served
//! - Counts every byte of each chunk into its own counter
//! - Exits once the queue is closed and drained, returning its counter

use crate::error::WorkerError;
use crate::histogram::Counter;
use crate::pipeline::queue::ChunkReceiver;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Statistics collected by a worker
///
/// Updated once per chunk, never inside the per-byte loop.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Chunks counted
    pub chunks_processed: AtomicU64,

    /// Bytes counted
    pub bytes_processed: AtomicU64,
}

impl WorkerStats {
    fn record_chunk(&self, bytes: u64) {
        self.chunks_processed.fetch_add(1, Ordering::Relaxed);
        self.bytes_processed.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Chunks counted so far
    pub fn chunks(&self) -> u64 {
        self.chunks_processed.load(Ordering::Relaxed)
    }

    /// Bytes counted so far
    pub fn bytes(&self) -> u64 {
        self.bytes_processed.load(Ordering::Relaxed)
    }
}

/// A worker thread that counts chunks
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle, yields the worker's counter
    handle: Option<JoinHandle<Counter>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(id: usize, queue_rx: ChunkReceiver) -> Result<Self, WorkerError> {
        Self::spawn_with_stats(id, queue_rx, Arc::new(WorkerStats::default()))
    }

    /// Spawn a worker that records into an existing stats handle
    pub fn spawn_with_stats(
        id: usize,
        queue_rx: ChunkReceiver,
        stats: Arc<WorkerStats>,
    ) -> Result<Self, WorkerError> {
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("counter-{}", id))
            .spawn(move || worker_loop(id, queue_rx, &stats_clone))
            .map_err(|e| WorkerError::InitFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Wait for the worker to finish and take its counter
    pub fn join(mut self) -> Result<Counter, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|payload| WorkerError::Panicked {
                id: self.id,
                message: panic_message(payload.as_ref()),
            }),
            None => Ok(Counter::new()),
        }
    }
}

/// Main worker loop
fn worker_loop(id: usize, queue_rx: ChunkReceiver, stats: &WorkerStats) -> Counter {
    debug!(worker = id, "Worker starting");

    let mut counter = Counter::new();
    while let Some(chunk) = queue_rx.recv() {
        counter.record(&chunk.data);
        stats.record_chunk(chunk.len() as u64);
        trace!(worker = id, seq = chunk.seq, bytes = chunk.len(), "Chunk counted");
    }

    debug!(
        worker = id,
        chunks = stats.chunks(),
        bytes = stats.bytes(),
        "Worker shutting down"
    );

    counter
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Worker thread panicked".into()
    }
}

/// Aggregate statistics from multiple workers as (chunks, bytes)
pub fn aggregate_stats(workers: &[Worker]) -> (u64, u64) {
    workers.iter().fold((0, 0), |(chunks, bytes), worker| {
        (chunks + worker.stats.chunks(), bytes + worker.stats.bytes())
    })
}
