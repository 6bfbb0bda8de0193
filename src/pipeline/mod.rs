//! Concurrent ingestion and counting pipeline
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │      ChunkSource        │
//!                     │  - calling thread       │
//!                     │  - walk + sequential    │
//!                     │    reads into chunks    │
//!                     └───────────┬─────────────┘
//!                                 │
//!                     ┌───────────▼─────────────┐
//!                     │       ChunkQueue        │
//!                     │  (crossbeam bounded)    │
//!                     │  - reader blocks when   │
//!                     │    workers fall behind  │
//!                     └───────────┬─────────────┘
//!       ┌─────────────────────────┼─────────────────────────┐
//!       │                         │                         │
//! ┌─────▼─────┐             ┌─────▼─────┐             ┌─────▼─────┐
//! │  Worker 1 │             │  Worker 2 │             │  Worker N │
//! │  Counter  │             │  Counter  │             │  Counter  │
//! └─────┬─────┘             └─────┬─────┘             └─────┬─────┘
//!       └─────────────────────────┼─────────────────────────┘
//!                                 │ join
//!                           ┌─────▼─────┐
//!                           │   merge   │
//!                           └───────────┘
//! ```

pub mod coordinator;
pub mod queue;
pub mod source;
pub mod worker;

pub use coordinator::{HistogramCoordinator, HistogramProgress, HistogramResult};
pub use queue::{Chunk, ChunkQueue};
pub use source::{ChunkSource, SourceSummary};
