//! Error types for ipcount operations.
//!
//! Everything that can stop a run before or while it starts is a
//! [`CounterError`]. These are the *fatal* errors: the binary prints one
//! diagnostic line and exits with status 1.
//!
//! Failures while scanning a single chunk of the input are not fatal and are
//! modelled separately by [`ChunkError`](crate::reader::ChunkError).
//!
//! # Error Propagation
//!
//! ```
//! use ipcount::{Result, CounterError};
//! use ipcount::core::params::{optimal_bit_count, optimal_hash_count};
//!
//! fn bloom_params(n: usize, fp: f64) -> Result<(usize, usize)> {
//!     let m = optimal_bit_count(n, fp)?;
//!     let k = optimal_hash_count(m, n)?;
//!     Ok((m, k))
//! }
//! # assert!(bloom_params(1000, 0.01).is_ok());
//! ```

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::path::{Path, PathBuf};

/// Result type alias for ipcount operations.
pub type Result<T> = std::result::Result<T, CounterError>;

/// Fatal errors raised while configuring or starting a counting run.
///
/// I/O failures are stored as rendered messages so the enum stays
/// `Clone + PartialEq` and can be compared in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum CounterError {
    /// The engine selector was not one of the accepted values (`1` or `2`).
    InvalidEngineSelector {
        /// The selector exactly as supplied.
        selector: String,
    },

    /// The input file could not be opened.
    OpenInput {
        /// Path that was opened.
        path: PathBuf,
        /// Rendered I/O error.
        message: String,
    },

    /// The input file was opened but its metadata could not be read.
    StatInput {
        /// Path that was inspected.
        path: PathBuf,
        /// Rendered I/O error.
        message: String,
    },

    /// A run or engine configuration value is unusable.
    InvalidConfig {
        /// Human-readable description of what's invalid.
        message: String,
    },

    /// False positive rate out of the open interval (0, 1).
    FalsePositiveRateOutOfBounds {
        /// The rate that was provided.
        fp_rate: f64,
    },

    /// Expected item count for filter sizing was zero.
    InvalidItemCount {
        /// The count that was provided.
        count: usize,
    },

    /// Number of hash functions outside the supported range.
    InvalidHashCount {
        /// The count that was provided.
        count: usize,
        /// Minimum allowed value.
        min: usize,
        /// Maximum allowed value.
        max: usize,
    },

    /// Bit array size is zero or too small for the chosen layout.
    InvalidFilterSize {
        /// The size in bits.
        size: usize,
    },

    /// A reader or pool thread panicked and could not be joined.
    WorkerPanicked {
        /// Which worker group the thread belonged to.
        role: &'static str,
        /// Index of the worker within its group.
        worker: usize,
    },

    /// The OS refused to start a reader or pool thread.
    SpawnWorker {
        /// Which worker group the thread belonged to.
        role: &'static str,
        /// Rendered I/O error.
        message: String,
    },
}

impl fmt::Display for CounterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEngineSelector { selector } => {
                write!(
                    f,
                    "Incorrect algorithm '{}'. Use `1` for the Bloom filter or `2` for the exact set.",
                    selector
                )
            }
            Self::OpenInput { path, message } => {
                write!(f, "Error when opening '{}': {}", path.display(), message)
            }
            Self::StatInput { path, message } => {
                write!(
                    f,
                    "Error getting file information for '{}': {}",
                    path.display(),
                    message
                )
            }
            Self::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {}.", message)
            }
            Self::FalsePositiveRateOutOfBounds { fp_rate } => {
                write!(
                    f,
                    "False positive rate {} is out of bounds. Must be in range (0, 1).",
                    fp_rate
                )
            }
            Self::InvalidItemCount { count } => {
                write!(
                    f,
                    "Invalid item count: {}. Expected items must be greater than 0.",
                    count
                )
            }
            Self::InvalidHashCount { count, min, max } => {
                write!(
                    f,
                    "Invalid hash function count: {}. Must be in range [{}, {}].",
                    count, min, max
                )
            }
            Self::InvalidFilterSize { size } => {
                write!(
                    f,
                    "Invalid filter size: {} bits. Must be positive and within memory limits.",
                    size
                )
            }
            Self::WorkerPanicked { role, worker } => {
                write!(f, "{} worker {} panicked", role, worker)
            }
            Self::SpawnWorker { role, message } => {
                write!(f, "Failed to start {} thread: {}", role, message)
            }
        }
    }
}

impl std::error::Error for CounterError {}

impl CounterError {
    /// Create an `InvalidEngineSelector` error.
    #[must_use]
    pub fn invalid_engine_selector(selector: impl Into<String>) -> Self {
        Self::InvalidEngineSelector {
            selector: selector.into(),
        }
    }

    /// Create an `OpenInput` error from an I/O failure.
    #[must_use]
    pub fn open_input(path: &Path, err: &std::io::Error) -> Self {
        Self::OpenInput {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Create a `StatInput` error from an I/O failure.
    #[must_use]
    pub fn stat_input(path: &Path, err: &std::io::Error) -> Self {
        Self::StatInput {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Create an `InvalidConfig` error with a formatted message.
    ///
    /// ```
    /// use ipcount::CounterError;
    ///
    /// let err = CounterError::invalid_config(format!("workers={} must be > 0", 0));
    /// assert!(err.to_string().contains("workers=0"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a `FalsePositiveRateOutOfBounds` error.
    #[must_use]
    pub fn fp_rate_out_of_bounds(fp_rate: f64) -> Self {
        Self::FalsePositiveRateOutOfBounds { fp_rate }
    }

    /// Create an `InvalidItemCount` error.
    #[must_use]
    pub fn invalid_item_count(count: usize) -> Self {
        Self::InvalidItemCount { count }
    }

    /// Create an `InvalidHashCount` error.
    #[must_use]
    pub fn invalid_hash_count(count: usize, min: usize, max: usize) -> Self {
        Self::InvalidHashCount { count, min, max }
    }

    /// Create an `InvalidFilterSize` error.
    #[must_use]
    pub fn invalid_filter_size(size: usize) -> Self {
        Self::InvalidFilterSize { size }
    }

    /// Create a `WorkerPanicked` error.
    #[must_use]
    pub fn worker_panicked(role: &'static str, worker: usize) -> Self {
        Self::WorkerPanicked { role, worker }
    }

    /// Create a `SpawnWorker` error from a thread spawn failure.
    #[must_use]
    pub fn spawn_worker(role: &'static str, err: &std::io::Error) -> Self {
        Self::SpawnWorker {
            role,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_invalid_engine_selector() {
        let err = CounterError::invalid_engine_selector("3");
        let display = format!("{err}");
        assert!(display.contains("'3'"));
        assert!(display.contains("`1`"));
        assert!(display.contains("`2`"));
    }

    #[test]
    fn test_error_display_open_input() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
        let err = CounterError::open_input(Path::new("missing.txt"), &io_err);
        let display = format!("{err}");
        assert!(display.contains("missing.txt"));
        assert!(display.contains("No such file"));
    }

    #[test]
    fn test_error_display_stat_input() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = CounterError::stat_input(Path::new("data.txt"), &io_err);
        let display = format!("{err}");
        assert!(display.contains("file information"));
        assert!(display.contains("data.txt"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_error_display_invalid_config() {
        let err = CounterError::invalid_config("queue capacity must be > 0");
        let display = format!("{err}");
        assert!(display.starts_with("Invalid configuration"));
        assert!(display.ends_with('.'));
    }

    #[test]
    fn test_error_display_fp_rate_out_of_bounds() {
        let err = CounterError::fp_rate_out_of_bounds(1.5);
        let display = format!("{err}");
        assert!(display.contains("1.5"));
        assert!(display.contains("(0, 1)"));
    }

    #[test]
    fn test_error_display_invalid_hash_count() {
        let err = CounterError::invalid_hash_count(0, 1, 32);
        let display = format!("{err}");
        assert!(display.contains("[1, 32]"));
    }

    #[test]
    fn test_error_display_invalid_filter_size() {
        let err = CounterError::invalid_filter_size(0);
        assert!(format!("{err}").contains("0 bits"));
    }

    #[test]
    fn test_error_display_worker_panicked() {
        let err = CounterError::worker_panicked("reader", 3);
        assert_eq!(format!("{err}"), "reader worker 3 panicked");
    }

    #[test]
    fn test_error_display_spawn_worker() {
        let io_err = io::Error::new(io::ErrorKind::WouldBlock, "resource temporarily unavailable");
        let err = CounterError::spawn_worker("pool", &io_err);
        assert!(format!("{err}").starts_with("Failed to start pool thread"));
    }

    #[test]
    fn test_error_clone_and_eq() {
        let err1 = CounterError::invalid_item_count(0);
        let err2 = err1.clone();
        assert_eq!(err1, err2);
        assert_ne!(err1, CounterError::invalid_filter_size(0));
    }

    #[test]
    fn test_error_implements_std_error() {
        let _err: Box<dyn std::error::Error> = Box::new(CounterError::invalid_config("test"));
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<()> {
            Err(CounterError::invalid_engine_selector("x"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
