//! Chunk source - walks the tree and feeds the chunk queue
//!
//! Every regular file, and every symlink to one, is read in walk order into
//! one accumulation buffer.
//! The buffer is handed off as soon as it holds `chunk_size` bytes, so every
//! chunk is exactly `chunk_size` long except possibly the last one. File
//! boundaries are not preserved: the tail of one file and the head of the next
//! routinely share a chunk.

use crate::config::check_chunk_size;
use crate::error::{ConfigError, SourceError, SourceResult};
use crate::pipeline::queue::{Chunk, ChunkSender};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Live counters for the reader
#[derive(Debug, Default)]
pub struct SourceStats {
    /// Regular files opened and fully read
    pub files_read: AtomicU64,

    /// Directories descended into
    pub dirs_visited: AtomicU64,

    /// Bytes read from files
    pub bytes_read: AtomicU64,

    /// Chunks handed to the queue
    pub chunks_emitted: AtomicU64,
}

impl SourceStats {
    fn record_file(&self) {
        self.files_read.fetch_add(1, Ordering::Relaxed);
    }

    fn record_dir(&self) {
        self.dirs_visited.fetch_add(1, Ordering::Relaxed);
    }

    fn record_bytes(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    fn record_chunk(&self) {
        self.chunks_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a plain snapshot
    pub fn summary(&self) -> SourceSummary {
        SourceSummary {
            files: self.files_read.load(Ordering::Relaxed),
            dirs: self.dirs_visited.load(Ordering::Relaxed),
            bytes: self.bytes_read.load(Ordering::Relaxed),
            chunks: self.chunks_emitted.load(Ordering::Relaxed),
        }
    }
}

/// Totals for a finished walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceSummary {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
    pub chunks: u64,
}

/// Reads a directory tree into fixed-size chunks
pub struct ChunkSource {
    root: PathBuf,
    chunk_size: usize,
    stats: Arc<SourceStats>,
}

impl ChunkSource {
    /// Create a source over `root`
    pub fn new(root: impl Into<PathBuf>, chunk_size: usize) -> Result<Self, ConfigError> {
        Self::with_stats(root, chunk_size, Arc::new(SourceStats::default()))
    }

    /// Create a source that records into an existing stats handle
    ///
    /// Fails with `InvalidChunkSize` under the same limits as
    /// `HistogramConfig::validate`.
    pub fn with_stats(
        root: impl Into<PathBuf>,
        chunk_size: usize,
        stats: Arc<SourceStats>,
    ) -> Result<Self, ConfigError> {
        check_chunk_size(chunk_size)?;
        Ok(Self {
            root: root.into(),
            chunk_size,
            stats,
        })
    }

    /// Live statistics handle
    pub fn stats(&self) -> Arc<SourceStats> {
        Arc::clone(&self.stats)
    }

    /// Root directory of the walk
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and send every chunk
    ///
    /// Consumes the sender; the queue is closed when this returns, whether
    /// the walk succeeded or not. The first traversal or I/O error stops the
    /// walk.
    pub fn run(&self, sender: ChunkSender) -> SourceResult<SourceSummary> {
        let mut emitter = Emitter {
            sender,
            buffer: Vec::with_capacity(self.chunk_size),
            chunk_size: self.chunk_size,
            next_seq: 0,
            stats: &self.stats,
        };

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| SourceError::traversal(&self.root, &e))?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                self.stats.record_dir();
                continue;
            }
            if file_type.is_symlink() {
                // Linked files are read through the link; linked dirs are never entered
                let target = fs::metadata(entry.path())
                    .map_err(|e| SourceError::open(entry.path(), &e))?;
                if !target.is_file() {
                    trace!(path = %entry.path().display(), "Skipping symlink to non-file");
                    continue;
                }
            } else if !file_type.is_file() {
                trace!(path = %entry.path().display(), "Skipping non-regular file");
                continue;
            }

            emitter.read_file(entry.path())?;
            self.stats.record_file();
        }

        emitter.flush(&self.root)?;

        let summary = self.stats.summary();
        debug!(
            root = %self.root.display(),
            files = summary.files,
            bytes = summary.bytes,
            chunks = summary.chunks,
            "Source exhausted"
        );
        Ok(summary)
    }
}

/// Accumulation buffer plus the queue it drains into
struct Emitter<'a> {
    sender: ChunkSender,
    buffer: Vec<u8>,
    chunk_size: usize,
    next_seq: u64,
    stats: &'a SourceStats,
}

impl Emitter<'_> {
    /// Append one file's bytes, emitting every chunk that fills up
    fn read_file(&mut self, path: &Path) -> SourceResult<()> {
        let mut file = File::open(path).map_err(|e| SourceError::open(path, &e))?;
        let mut file_bytes = 0u64;

        loop {
            let filled = self.buffer.len();
            self.buffer.resize(self.chunk_size, 0);

            let n = match file.read(&mut self.buffer[filled..]) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    self.buffer.truncate(filled);
                    continue;
                }
                Err(e) => {
                    self.buffer.truncate(filled);
                    return Err(SourceError::read(path, &e));
                }
            };
            self.buffer.truncate(filled + n);

            if n == 0 {
                break;
            }
            file_bytes += n as u64;
            self.stats.record_bytes(n as u64);

            if self.buffer.len() >= self.chunk_size {
                self.emit(path)?;
            }
        }

        trace!(path = %path.display(), bytes = file_bytes, "File read");
        Ok(())
    }

    /// Hand the current buffer to the queue
    fn emit(&mut self, path: &Path) -> SourceResult<()> {
        let data = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.chunk_size));
        let chunk = Chunk::new(self.next_seq, data);

        self.sender
            .send(chunk)
            .map_err(|_| SourceError::QueueClosed {
                path: path.to_path_buf(),
            })?;

        self.next_seq += 1;
        self.stats.record_chunk();
        Ok(())
    }

    /// Emit the undersized residue, if any
    fn flush(mut self, root: &Path) -> SourceResult<()> {
        if !self.buffer.is_empty() {
            self.emit(root)?;
        }
        Ok(())
    }
}
