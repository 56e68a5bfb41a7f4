//! Core types shared by the engines.
//!
//! ```text
//! core/
//! ├── bitvec.rs    - atomic, set-only bit array
//! ├── engine.rs    - DedupEngine trait and EngineKind selector
//! ├── params.rs    - Bloom sizing math
//! └── mod.rs       - this file
//! ```
//!
//! # Example
//!
//! ```
//! use ipcount::core::params::{optimal_bit_count, optimal_hash_count};
//!
//! let m = optimal_bit_count(10_000, 0.01).unwrap();
//! let k = optimal_hash_count(m, 10_000).unwrap();
//! assert_eq!(k, 7);
//! ```

pub mod bitvec;
pub mod engine;
pub mod params;

pub use bitvec::BitVec;
pub use engine::{DedupEngine, EngineKind};
pub use params::{calculate_filter_params, expected_fp_rate, optimal_bit_count, optimal_hash_count};
