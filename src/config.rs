//! Run configuration.
//!
//! # Examples
//!
//! ```
//! use ipcount::config::RunConfig;
//! use ipcount::core::EngineKind;
//!
//! let config = RunConfig::builder()
//!     .input("ips.txt")
//!     .engine(EngineKind::Exact)
//!     .workers(4)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.workers(), 4);
//! assert_eq!(config.queue_capacity(), 100);
//! ```
//!
//! ```
//! use ipcount::config::RunConfig;
//!
//! assert!(RunConfig::builder().workers(0).build().is_err());
//! ```

use crate::core::engine::EngineKind;
use crate::error::{CounterError, Result};
use crate::filters::BloomConfig;
use std::path::{Path, PathBuf};

/// Input path used when none is given.
pub const DEFAULT_INPUT: &str = "result.txt";

/// Capacity of the reader → pool queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Longest accepted line, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Validated configuration of one counting run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    input: PathBuf,
    engine: EngineKind,
    workers: usize,
    queue_capacity: usize,
    max_line_len: usize,
    bloom: BloomConfig,
}

impl RunConfig {
    /// Start from the defaults.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }

    /// Input file path.
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Selected engine.
    #[must_use]
    pub const fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Reader and pool size. Both groups use the same count.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Bounded queue capacity.
    #[must_use]
    pub const fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Longest accepted line.
    #[must_use]
    pub const fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    /// Bloom engine parameters. Ignored by the exact engine.
    #[must_use]
    pub const fn bloom(&self) -> &BloomConfig {
        &self.bloom
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            engine: EngineKind::default(),
            workers: num_cpus::get(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            bloom: BloomConfig::default(),
        }
    }
}

/// Builder for [`RunConfig`]. Every setter is optional.
#[derive(Debug, Clone, Default)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Builder holding the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input file.
    #[must_use]
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input = path.into();
        self
    }

    /// Set the engine.
    #[must_use]
    pub fn engine(mut self, engine: EngineKind) -> Self {
        self.config.engine = engine;
        self
    }

    /// Set the worker count.
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the queue capacity.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the maximum line length.
    #[must_use]
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.max_line_len = len;
        self
    }

    /// Replace the Bloom parameters.
    #[must_use]
    pub fn bloom(mut self, bloom: BloomConfig) -> Self {
        self.config.bloom = bloom;
        self
    }

    /// Validate and produce the config.
    ///
    /// Bloom parameters are only checked when the Bloom engine is selected.
    ///
    /// # Errors
    ///
    /// [`CounterError::InvalidConfig`] for a zero worker count, queue capacity
    /// or line length; any [`BloomConfig::validate`] error for the Bloom engine.
    pub fn build(self) -> Result<RunConfig> {
        let config = self.config;

        if config.workers == 0 {
            return Err(CounterError::invalid_config("worker count must be at least 1"));
        }
        if config.queue_capacity == 0 {
            return Err(CounterError::invalid_config(
                "queue capacity must be at least 1",
            ));
        }
        if config.max_line_len == 0 {
            return Err(CounterError::invalid_config(
                "maximum line length must be at least 1",
            ));
        }
        if config.engine == EngineKind::Bloom {
            config.bloom.validate()?;
        }

        Ok(config)
    }
}
