//! Synchronization primitives shared by the worker pool.

pub mod atomic_counter;

pub use atomic_counter::{CacheLinePadded, DistinctCounter};
