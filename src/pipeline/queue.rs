//! Chunk queue with backpressure
//!
//! A bounded crossbeam channel between the single reader and the counter
//! workers. When the queue is full the reader blocks, so memory stays at a
//! small multiple of the chunk size no matter how far the workers fall behind.
//! A capacity of zero makes every send a direct handoff to a waiting worker.
//!
//! Dropping the last `ChunkSender` closes the queue; workers drain whatever
//! is buffered and then see `None`.

use crossbeam_channel::{bounded, Receiver, SendError, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A contiguous slice of the concatenated file contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the emitted stream (0-based)
    pub seq: u64,

    /// Chunk bytes
    pub data: Vec<u8>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(seq: u64, data: Vec<u8>) -> Self {
        Self { seq, data }
    }

    /// Number of bytes in the chunk
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-length chunk
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Statistics for the chunk queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Chunks handed to the queue
    pub sent: AtomicU64,

    /// Chunks taken by workers
    pub received: AtomicU64,

    /// Bytes handed to the queue
    pub bytes_sent: AtomicU64,

    /// Sends that found the queue full and had to wait
    pub backpressure_events: AtomicU64,
}

impl QueueStats {
    /// Chunks sent so far
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Chunks received so far
    pub fn received_count(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Bytes sent so far
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    /// Get backpressure event count
    pub fn backpressure_count(&self) -> u64 {
        self.backpressure_events.load(Ordering::Relaxed)
    }
}

/// Bounded chunk queue
///
/// Owns the only sender until `into_parts` hands it to the reader.
pub struct ChunkQueue {
    sender: Sender<Chunk>,
    receiver: Receiver<Chunk>,
    capacity: usize,
    stats: Arc<QueueStats>,
}

impl ChunkQueue {
    /// Create a new chunk queue with the specified capacity
    pub fn new(capacity: usize) -> Self {
        Self::with_stats(capacity, Arc::new(QueueStats::default()))
    }

    /// Create a queue that records into an existing stats handle
    pub fn with_stats(capacity: usize, stats: Arc<QueueStats>) -> Self {
        let (sender, receiver) = bounded(capacity);

        Self {
            sender,
            receiver,
            capacity,
            stats,
        }
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> ChunkReceiver {
        ChunkReceiver {
            receiver: self.receiver.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Get queue capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Split into the sole sender and one receiver
    ///
    /// The queue closes as soon as the returned sender is dropped.
    pub fn into_parts(self) -> (ChunkSender, ChunkReceiver) {
        let receiver = ChunkReceiver {
            receiver: self.receiver,
            stats: Arc::clone(&self.stats),
        };
        let sender = ChunkSender {
            sender: self.sender,
            stats: self.stats,
        };
        (sender, receiver)
    }
}

/// Handle for sending chunks to the queue
pub struct ChunkSender {
    sender: Sender<Chunk>,
    stats: Arc<QueueStats>,
}

impl ChunkSender {
    /// Send a chunk, blocking while the queue is full
    ///
    /// Returns the chunk back if every receiver has been dropped.
    pub fn send(&self, chunk: Chunk) -> Result<(), Chunk> {
        let bytes = chunk.len() as u64;

        let result = match self.sender.try_send(chunk) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(chunk)) => {
                self.stats.backpressure_events.fetch_add(1, Ordering::Relaxed);
                self.sender.send(chunk).map_err(|SendError(chunk)| chunk)
            }
            Err(TrySendError::Disconnected(chunk)) => Err(chunk),
        };

        if result.is_ok() {
            self.stats.sent.fetch_add(1, Ordering::Relaxed);
            self.stats.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
        }
        result
    }

    /// Close the queue
    pub fn close(self) {
        drop(self);
    }
}

/// Handle for receiving chunks from the queue
#[derive(Clone)]
pub struct ChunkReceiver {
    receiver: Receiver<Chunk>,
    stats: Arc<QueueStats>,
}

impl ChunkReceiver {
    /// Receive a chunk from the queue
    ///
    /// Blocks until a chunk is available. Returns `None` once the queue is
    /// closed and drained.
    pub fn recv(&self) -> Option<Chunk> {
        match self.receiver.recv() {
            Ok(chunk) => {
                self.stats.received.fetch_add(1, Ordering::Relaxed);
                Some(chunk)
            }
            Err(_) => None,
        }
    }

    /// Try to receive a chunk without blocking
    pub fn try_recv(&self) -> Option<Chunk> {
        match self.receiver.try_recv() {
            Ok(chunk) => {
                self.stats.received.fetch_add(1, Ordering::Relaxed);
                Some(chunk)
            }
            Err(_) => None,
        }
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_queue_basic() {
        let queue = ChunkQueue::new(4);
        let stats = queue.stats();
        let (sender, receiver) = queue.into_parts();

        sender.send(Chunk::new(0, b"abc".to_vec())).unwrap();
        assert_eq!(receiver.len(), 1);

        let chunk = receiver.recv().unwrap();
        assert_eq!(chunk.seq, 0);
        assert_eq!(chunk.data, b"abc");

        assert_eq!(stats.sent_count(), 1);
        assert_eq!(stats.received_count(), 1);
        assert_eq!(stats.bytes_sent(), 3);
    }

    #[test]
    fn test_close_drains_then_ends() {
        let queue = ChunkQueue::new(4);
        let (sender, receiver) = queue.into_parts();

        sender.send(Chunk::new(0, vec![1])).unwrap();
        sender.send(Chunk::new(1, vec![2])).unwrap();
        sender.close();

        assert_eq!(receiver.recv().map(|c| c.seq), Some(0));
        assert_eq!(receiver.recv().map(|c| c.seq), Some(1));
        assert!(receiver.recv().is_none());
    }

    #[test]
    fn test_send_after_receivers_gone() {
        let queue = ChunkQueue::new(1);
        let (sender, receiver) = queue.into_parts();
        drop(receiver);

        let returned = sender.send(Chunk::new(7, vec![9])).unwrap_err();
        assert_eq!(returned.seq, 7);
    }

    #[test]
    fn test_queue_backpressure() {
        let queue = ChunkQueue::new(1);
        let stats = queue.stats();
        let (sender, receiver) = queue.into_parts();

        // Fills the only slot
        sender.send(Chunk::new(0, vec![0])).unwrap();
        assert_eq!(stats.backpressure_count(), 0);

        let consumer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            let mut seen = Vec::new();
            while let Some(chunk) = receiver.recv() {
                seen.push(chunk.seq);
            }
            seen
        });

        // Queue is full - this send has to wait for the consumer
        sender.send(Chunk::new(1, vec![1])).unwrap();
        sender.close();

        assert_eq!(consumer.join().unwrap(), vec![0, 1]);
        assert_eq!(stats.backpressure_count(), 1);
        assert_eq!(stats.sent_count(), 2);
    }

    #[test]
    fn test_rendezvous_handoff() {
        let queue = ChunkQueue::new(0);
        assert_eq!(queue.capacity(), 0);
        let (sender, receiver) = queue.into_parts();

        let consumer = thread::spawn(move || receiver.recv().map(|c| c.data));
        sender.send(Chunk::new(0, b"xy".to_vec())).unwrap();

        assert_eq!(consumer.join().unwrap(), Some(b"xy".to_vec()));
    }

    #[test]
    fn test_try_recv_empty() {
        let queue = ChunkQueue::new(2);
        let receiver = queue.receiver();
        assert!(receiver.try_recv().is_none());
        assert!(queue.is_empty());
    }
}
