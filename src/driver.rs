//! Run orchestration: reader group → bounded queue → worker pool.
//!
//! ```text
//!  reader-0 ─┐                      ┌─ worker-0 ─┐
//!  reader-1 ─┼─▶ bounded(capacity) ─┼─ worker-1 ─┼─▶ engine + DistinctCounter
//!  reader-N ─┘                      └─ worker-N ─┘
//! ```
//!
//! Readers block when the queue is full and workers block when it is empty.
//! The queue closes when the last reader drops its sender, and the run ends
//! once every worker has drained it.

use crate::config::RunConfig;
use crate::core::engine::{DedupEngine, EngineKind};
use crate::error::Result;
use crate::filters;
use crate::pool::WorkerPool;
use crate::reader::{self, InputFile};
use crate::sync::DistinctCounter;
use crossbeam_channel::bounded;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Readers and pool workers used.
    pub workers: usize,
    /// Engine that deduplicated the keys.
    pub engine: EngineKind,
    /// Keys the engine reported as new.
    pub distinct: u64,
    /// Non-empty keys read from the file.
    pub lines: u64,
    /// Ranges abandoned after a read error.
    pub chunks_failed: usize,
    /// Bytes scanned.
    pub bytes: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
    /// Bloom runs only: theoretical false-positive rate at `distinct` keys.
    pub estimated_fp_rate: Option<f64>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Using {} workers", self.workers)?;
        writeln!(f, "Using the {}", self.engine)?;
        writeln!(f, "Total number of unique IP addresses: {}", self.distinct)?;
        if let Some(fp_rate) = self.estimated_fp_rate {
            writeln!(f, "Estimated false positive rate: {:.3e}", fp_rate)?;
        }
        if self.chunks_failed > 0 {
            writeln!(
                f,
                "Chunks abandoned after read errors: {}",
                self.chunks_failed
            )?;
        }
        write!(f, "Execution time: {:?}", self.elapsed)
    }
}

/// A configured run with its input opened and engine allocated.
pub struct Driver {
    config: RunConfig,
    input: InputFile,
    engine: Arc<dyn DedupEngine>,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("input", &self.input)
            .field("engine", &self.engine.kind())
            .finish()
    }
}

impl Driver {
    /// Open the input and build the engine. Nothing is read yet.
    ///
    /// # Errors
    ///
    /// [`CounterError::OpenInput`](crate::CounterError::OpenInput) or
    /// [`CounterError::StatInput`](crate::CounterError::StatInput) for the
    /// input file, or an engine construction error.
    pub fn new(config: RunConfig) -> Result<Self> {
        let input = InputFile::open(config.input())?;
        let engine = filters::build_engine(config.engine(), config.bloom())?;

        Ok(Self {
            config,
            input,
            engine: Arc::from(engine),
        })
    }

    /// The opened input file.
    #[must_use]
    pub fn input(&self) -> &InputFile {
        &self.input
    }

    /// Count the distinct keys of the input.
    ///
    /// Per-chunk read errors do not fail the run; they show up in
    /// [`RunReport::chunks_failed`].
    ///
    /// # Errors
    ///
    /// Thread spawn failures and worker panics.
    pub fn run(self) -> Result<RunReport> {
        let start = Instant::now();
        let workers = self.config.workers();

        tracing::info!(
            input = %self.input.path().display(),
            bytes = self.input.size(),
            engine = %self.config.engine(),
            workers,
            queue_capacity = self.config.queue_capacity(),
            "starting run"
        );

        let (tx, rx) = bounded(self.config.queue_capacity());
        let counter = Arc::new(DistinctCounter::new());

        let pool = WorkerPool::spawn(workers, &rx, &self.engine, &counter)?;
        drop(rx);
        let readers = reader::spawn_readers(&self.input, workers, self.config.max_line_len(), tx)?;

        let chunks = readers.join();
        let pool_stats = pool.join();
        let (chunks, pool_stats) = (chunks?, pool_stats?);

        let distinct = counter.get();
        let report = RunReport {
            workers,
            engine: self.engine.kind(),
            distinct,
            lines: pool_stats.iter().map(|s| s.received).sum(),
            chunks_failed: chunks.iter().filter(|c| c.failed).count(),
            bytes: chunks.iter().map(|c| c.bytes).sum(),
            elapsed: start.elapsed(),
            estimated_fp_rate: self.engine.estimated_fp_rate(distinct),
        };

        tracing::info!(
            distinct = report.distinct,
            lines = report.lines,
            bytes = report.bytes,
            chunks_failed = report.chunks_failed,
            elapsed = ?report.elapsed,
            "run finished"
        );

        Ok(report)
    }
}

/// Build a [`Driver`] from `config` and run it.
///
/// # Errors
///
/// See [`Driver::new`] and [`Driver::run`].
pub fn run(config: RunConfig) -> Result<RunReport> {
    Driver::new(config)?.run()
}
