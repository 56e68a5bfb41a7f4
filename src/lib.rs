//! ipcount: parallel distinct-line counting for large IP address lists.
//!
//! The input is a newline-delimited text file, one candidate key per line.
//! The file is split into byte ranges that are scanned in parallel; trimmed,
//! non-empty lines flow through a bounded queue to a pool of workers that
//! deduplicate them with one of two engines and count the new ones.
//!
//! # Engines
//!
//! | Engine                | Memory                   | Result      |
//! |-----------------------|--------------------------|-------------|
//! | [`BloomEngine`] (`1`) | fixed (M bits)           | approximate |
//! | [`ExactEngine`] (`2`) | grows with distinct keys | exact       |
//!
//! The Bloom engine never forgets a key (zero false negatives) but a false
//! positive hides a new key, and with the classic layout two workers racing on
//! the same new key may both count it. See [`filters::bloom`].
//!
//! # Quick Start
//!
//! ```no_run
//! use ipcount::prelude::*;
//!
//! let config = RunConfig::builder()
//!     .input("result.txt")
//!     .engine(EngineKind::Exact)
//!     .build()?;
//!
//! let report = Driver::new(config)?.run()?;
//! println!("{}", report);
//! # Ok::<(), ipcount::CounterError>(())
//! ```
//!
//! Engines can be used directly as well:
//!
//! ```
//! use ipcount::prelude::*;
//!
//! let engine = BloomEngine::new(BloomConfig::new(1 << 16, 4)).unwrap();
//! assert!(engine.test_and_insert(b"10.0.0.1"));
//! assert!(!engine.test_and_insert(b"10.0.0.1"));
//! ```
//!
//! # Known edge cases
//!
//! - Byte ranges ignore line boundaries. A line crossing one is counted as two
//!   fragments.
//! - A read error or an over-long line abandons the rest of that range. The
//!   run still completes; see [`RunReport::chunks_failed`].
//!
//! # Feature Flags
//!
//! - `trace`: per-key `trace!` events on the engine hot path.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![deny(unsafe_code)]

/// Bit array, sizing math and the engine trait
pub mod core;

/// Error types and result aliases
pub mod error;

/// Run configuration
pub mod config;

/// Bloom and exact deduplication engines
pub mod filters;

/// Hash functions and index schemes
pub mod hash;

/// Shared counter
pub mod sync;

/// Chunked file reader
pub mod reader;

/// Queue consumers
pub mod pool;

/// Run orchestration and report
pub mod driver;

/// Random input generator
pub mod generator;

pub use crate::config::{RunConfig, RunConfigBuilder};
pub use crate::core::{DedupEngine, EngineKind};
pub use crate::driver::{Driver, RunReport};
pub use crate::error::{CounterError, Result};
pub use crate::filters::{BloomConfig, BloomEngine, BloomLayout, ExactEngine};
pub use crate::hash::IndexScheme;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{RunConfig, RunConfigBuilder};
    pub use crate::core::{DedupEngine, EngineKind};
    pub use crate::driver::{Driver, RunReport};
    pub use crate::error::{CounterError, Result};
    pub use crate::filters::{BloomConfig, BloomEngine, BloomLayout, ExactEngine};
    pub use crate::hash::IndexScheme;
}
