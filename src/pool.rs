//! Worker pool draining the bounded queue.
//!
//! Each worker blocks on the queue, runs the engine's test-and-insert on every
//! key it receives and bumps the shared [`DistinctCounter`] when the engine
//! reports the key as new. A worker exits only when the queue is closed and
//! empty, so no queued key is lost at shutdown.

use crate::core::engine::DedupEngine;
use crate::error::{CounterError, Result};
use crate::reader::WorkItem;
use crate::sync::DistinctCounter;
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// What one pool worker processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Worker index.
    pub worker: usize,
    /// Keys received from the queue.
    pub received: u64,
    /// Keys the engine reported as new.
    pub inserted: u64,
}

/// Running pool threads.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerStats>>,
}

impl WorkerPool {
    /// Start `workers` consumers on `rx`.
    ///
    /// # Errors
    ///
    /// [`CounterError::SpawnWorker`] if a thread cannot be started.
    pub fn spawn(
        workers: usize,
        rx: &Receiver<WorkItem>,
        engine: &Arc<dyn DedupEngine>,
        counter: &Arc<DistinctCounter>,
    ) -> Result<Self> {
        let mut handles = Vec::with_capacity(workers);

        for worker in 0..workers {
            let rx = rx.clone();
            let engine = Arc::clone(engine);
            let counter = Arc::clone(counter);
            let handle = thread::Builder::new()
                .name(format!("worker-{}", worker))
                .spawn(move || drain(worker, &rx, engine.as_ref(), &counter))
                .map_err(|err| CounterError::spawn_worker("pool", &err))?;
            handles.push(handle);
        }

        Ok(Self { handles })
    }

    /// Number of worker threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the pool has no threads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker. Returns once the queue is closed and drained.
    ///
    /// # Errors
    ///
    /// [`CounterError::WorkerPanicked`] if a worker thread panicked.
    pub fn join(self) -> Result<Vec<WorkerStats>> {
        self.handles
            .into_iter()
            .enumerate()
            .map(|(i, handle)| {
                handle
                    .join()
                    .map_err(|_| CounterError::worker_panicked("pool", i))
            })
            .collect()
    }
}

/// Consume keys until the queue is closed and empty.
pub fn drain(
    worker: usize,
    rx: &Receiver<WorkItem>,
    engine: &dyn DedupEngine,
    counter: &DistinctCounter,
) -> WorkerStats {
    let mut stats = WorkerStats {
        worker,
        ..WorkerStats::default()
    };

    for key in rx {
        stats.received += 1;
        if engine.test_and_insert(&key) {
            counter.increment();
            stats.inserted += 1;
        }
    }

    tracing::debug!(
        worker,
        received = stats.received,
        inserted = stats.inserted,
        "pool worker finished"
    );
    stats
}
