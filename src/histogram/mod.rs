//! Counting, merging, normalization and rendering
//!
//! ```text
//!   worker Counters ──merge──▶ GlobalCounter ──normalize──▶ NormalizedCounter
//!                                    │                             │
//!                                    └───────────render────────────┘
//!                                                 │
//!                                                 ▼
//!                                            report text
//! ```

pub mod counter;
pub mod normalize;
pub mod render;

pub use counter::{merge, Counter, GlobalCounter};
pub use normalize::{normalize, NormalizedCounter, UNIFORM_PERCENT};
pub use render::render;
