//! Exact concurrent set engine.
//!
//! Stores every distinct key in a sharded [`DashSet`]. Memory grows with the
//! number of distinct keys, but the count is exact: the insert is a single
//! atomic check-and-insert under the shard lock, so each distinct key is
//! reported new exactly once, whatever the interleaving of workers.

use crate::core::engine::{DedupEngine, EngineKind};
use dashmap::DashSet;

/// Exact deduplication over owned byte-string keys.
///
/// ```
/// use ipcount::filters::ExactEngine;
///
/// let engine = ExactEngine::new();
/// assert!(engine.insert_if_absent(b"10.0.0.1"));
/// assert!(!engine.insert_if_absent(b"10.0.0.1"));
/// assert_eq!(engine.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ExactEngine {
    keys: DashSet<Box<[u8]>>,
}

impl ExactEngine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine pre-sized for `capacity` distinct keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: DashSet::with_capacity(capacity),
        }
    }

    /// Insert `key` if it is not present yet. Returns `true` if it was inserted.
    ///
    /// The key is only copied when the lookup misses.
    pub fn insert_if_absent(&self, key: &[u8]) -> bool {
        #[cfg(feature = "trace")]
        tracing::trace!(key = %String::from_utf8_lossy(key), "ExactEngine::insert_if_absent");

        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(Box::from(key))
    }

    /// Whether `key` has been inserted.
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.keys.contains(key)
    }

    /// Number of distinct keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl DedupEngine for ExactEngine {
    #[inline]
    fn test_and_insert(&self, key: &[u8]) -> bool {
        self.insert_if_absent(key)
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Exact
    }
}
