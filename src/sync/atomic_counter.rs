//! Shared distinct-key counter.
//!
//! Every worker increments the same counter once per new key, so the atomic
//! lives alone on its cache line: the engine's bit array and the workers'
//! local state never share a line with it.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

/// Aligns `T` to a 64-byte cache line to prevent false sharing.
///
/// ```
/// use ipcount::sync::CacheLinePadded;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// let padded = CacheLinePadded::new(AtomicU64::new(42));
/// assert_eq!(padded.load(Ordering::Relaxed), 42);
/// assert_eq!(std::mem::align_of_val(&padded), 64);
/// ```
#[repr(align(64))]
#[derive(Default)]
pub struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    /// Wrap `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Consume the wrapper and return the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for CacheLinePadded<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for CacheLinePadded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// Monotonic count of keys the engine reported as new.
///
/// Increments use `Relaxed` ordering: the only reader is the driver, after it
/// has joined every worker, and the join already synchronizes.
///
/// ```
/// use ipcount::sync::DistinctCounter;
///
/// let counter = DistinctCounter::new();
/// counter.increment();
/// counter.increment();
/// assert_eq!(counter.get(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DistinctCounter {
    count: CacheLinePadded<AtomicU64>,
}

impl DistinctCounter {
    /// Create a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: CacheLinePadded::new(AtomicU64::new(0)),
        }
    }

    /// Add one.
    #[inline]
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }
}
