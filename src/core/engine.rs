//! The deduplication capability shared by both engines.
//!
//! The driver and the worker pool depend only on [`DedupEngine`]. Which engine
//! sits behind it is decided once, at configuration time, by [`EngineKind`].

use crate::error::{CounterError, Result};
use std::fmt;
use std::str::FromStr;

/// A concurrent set of byte-string keys with a test-and-insert contract.
///
/// Implementations are shared by reference across all pool workers, so every
/// method takes `&self`.
///
/// # Contract
///
/// `test_and_insert(key)` returns `true` when the engine considers `key` new
/// and has recorded it. The caller increments the distinct counter exactly
/// when it gets `true`.
///
/// - [`ExactEngine`](crate::filters::ExactEngine): one atomic check-and-insert,
///   `true` exactly once per distinct key regardless of scheduling.
/// - [`BloomEngine`](crate::filters::BloomEngine): probabilistic. A false
///   positive makes a new key return `false`; with the classic layout two
///   workers racing on the same new key may both get `true`.
pub trait DedupEngine: Send + Sync {
    /// Record `key` and report whether it was newly inserted.
    fn test_and_insert(&self, key: &[u8]) -> bool;

    /// Which engine variant this is.
    fn kind(&self) -> EngineKind;

    /// Estimated false-positive rate after `inserted` distinct keys.
    ///
    /// `None` for engines that cannot produce false positives.
    fn estimated_fp_rate(&self, _inserted: u64) -> Option<f64> {
        None
    }
}

/// Engine selector, parsed from the CLI's numeric code.
///
/// ```
/// use ipcount::core::EngineKind;
///
/// assert_eq!(EngineKind::from_selector("1").unwrap(), EngineKind::Bloom);
/// assert_eq!(EngineKind::from_selector("2").unwrap(), EngineKind::Exact);
/// assert!(EngineKind::from_selector("3").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineKind {
    /// Fixed-memory probabilistic Bloom filter (selector `1`).
    #[default]
    Bloom,
    /// Exact concurrent set (selector `2`).
    Exact,
}

impl EngineKind {
    /// Parse the numeric selector used on the command line.
    ///
    /// The selector must be exactly `1` or `2`. Surrounding whitespace is not
    /// stripped.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidEngineSelector`] for any other value.
    pub fn from_selector(selector: &str) -> Result<Self> {
        match selector.parse::<u8>() {
            Ok(1) => Ok(Self::Bloom),
            Ok(2) => Ok(Self::Exact),
            _ => Err(CounterError::invalid_engine_selector(selector)),
        }
    }

    /// The numeric selector for this engine.
    #[must_use]
    pub const fn selector(self) -> u8 {
        match self {
            Self::Bloom => 1,
            Self::Exact => 2,
        }
    }

    /// Human-readable engine name used in the run report.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bloom => "Bloom filter",
            Self::Exact => "exact set",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_selector(s)
    }
}
