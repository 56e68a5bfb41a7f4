//! Chunked parallel reader.
//!
//! The input file is opened and measured once ([`InputFile::open`]); failures
//! there are fatal. It is then split into one [`ByteRange`] per worker and each
//! range is scanned on its own thread, which reopens the file, seeks to the
//! range start and pushes every trimmed, non-empty line onto the shared
//! bounded queue. The queue closes once every reader thread has dropped its
//! sender.
//!
//! Errors inside a range are **not** fatal. The reader logs a [`ChunkError`]
//! at `warn` level, drops the rest of its range and reports the failure in
//! its [`ChunkStats`]. Keys already queued stay counted.
//!
//! Range boundaries are byte offsets, not line boundaries. A line crossing a
//! boundary is scanned as two separate fragments, one per range.

pub mod chunk;
pub mod lines;

pub use chunk::{partition, ByteRange};
pub use lines::{trim_key, LineScanner, ScanError};

use crate::error::{CounterError, Result};
use crossbeam_channel::Sender;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

/// A key travelling from a reader to a pool worker.
pub type WorkItem = Box<[u8]>;

const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Per-range scan failure. Logged, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// The range's own file handle could not be opened.
    #[error("chunk {chunk}: cannot open {}: {source}", path.display())]
    Open {
        /// Range index.
        chunk: usize,
        /// Input path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Seeking to the range start failed.
    #[error("chunk {chunk}: cannot seek to byte {offset}: {source}")]
    Seek {
        /// Range index.
        chunk: usize,
        /// Absolute offset of the seek target.
        offset: u64,
        /// Underlying error.
        source: io::Error,
    },

    /// Reading inside the range failed.
    #[error("chunk {chunk}: read failed near byte {offset}: {source}")]
    Read {
        /// Range index.
        chunk: usize,
        /// Absolute offset reached before the failure.
        offset: u64,
        /// Underlying error.
        source: io::Error,
    },

    /// A line exceeded the maximum line length.
    #[error("chunk {chunk}: line longer than {max} bytes before byte {offset}")]
    LineTooLong {
        /// Range index.
        chunk: usize,
        /// Absolute offset reached when the limit was hit.
        offset: u64,
        /// The configured limit.
        max: usize,
    },
}

impl ChunkError {
    /// Index of the range that failed.
    #[must_use]
    pub const fn chunk(&self) -> usize {
        match self {
            Self::Open { chunk, .. }
            | Self::Seek { chunk, .. }
            | Self::Read { chunk, .. }
            | Self::LineTooLong { chunk, .. } => *chunk,
        }
    }
}

/// What one reader thread did with its range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkStats {
    /// Range index.
    pub chunk: usize,
    /// Keys pushed onto the queue.
    pub keys: u64,
    /// Bytes consumed from the range.
    pub bytes: u64,
    /// Whether the range was abandoned after a [`ChunkError`].
    pub failed: bool,
}

/// The validated input file: path plus size at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    path: PathBuf,
    size: u64,
}

impl InputFile {
    /// Open and stat `path`.
    ///
    /// # Errors
    ///
    /// [`CounterError::OpenInput`] if the file cannot be opened or is a
    /// directory, [`CounterError::StatInput`] if its metadata is unavailable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| CounterError::open_input(path, &err))?;
        let metadata = file
            .metadata()
            .map_err(|err| CounterError::stat_input(path, &err))?;

        if metadata.is_dir() {
            let err = io::Error::other("is a directory");
            return Err(CounterError::open_input(path, &err));
        }

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    /// Path the file was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at open time.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// Scan one range and push its keys to `tx`.
///
/// Never fails: a [`ChunkError`] is logged and recorded in the returned stats.
/// Stops early without error if every receiver is gone.
pub fn read_chunk(
    path: &Path,
    range: ByteRange,
    max_line_len: usize,
    tx: &Sender<WorkItem>,
) -> ChunkStats {
    let mut stats = ChunkStats {
        chunk: range.index,
        ..ChunkStats::default()
    };

    if let Err(err) = scan_chunk(path, range, max_line_len, tx, &mut stats) {
        tracing::warn!(
            chunk = err.chunk(),
            error = %err,
            dropped_bytes = range.len - stats.bytes,
            "abandoning chunk"
        );
        stats.failed = true;
    }

    tracing::debug!(
        chunk = range.index,
        start = range.start,
        len = range.len,
        keys = stats.keys,
        "reader finished"
    );
    stats
}

fn scan_chunk(
    path: &Path,
    range: ByteRange,
    max_line_len: usize,
    tx: &Sender<WorkItem>,
    stats: &mut ChunkStats,
) -> std::result::Result<(), ChunkError> {
    let chunk = range.index;
    if range.is_empty() {
        return Ok(());
    }

    let mut file = File::open(path).map_err(|source| ChunkError::Open {
        chunk,
        path: path.to_path_buf(),
        source,
    })?;
    file.seek(SeekFrom::Start(range.start))
        .map_err(|source| ChunkError::Seek {
            chunk,
            offset: range.start,
            source,
        })?;

    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file.take(range.len));
    let mut scanner = LineScanner::new(reader, max_line_len);

    loop {
        let next = scanner.next_key();
        stats.bytes = scanner.consumed();
        let offset = range.start + stats.bytes;

        match next {
            Ok(Some(key)) => {
                if tx.send(key).is_err() {
                    tracing::debug!(chunk, "queue disconnected, reader stopping");
                    return Ok(());
                }
                stats.keys += 1;
            }
            Ok(None) => return Ok(()),
            Err(ScanError::Io(source)) => {
                return Err(ChunkError::Read {
                    chunk,
                    offset,
                    source,
                })
            }
            Err(ScanError::LineTooLong { max }) => {
                return Err(ChunkError::LineTooLong { chunk, offset, max })
            }
        }
    }
}

/// Running reader threads, one per range.
#[derive(Debug)]
pub struct ReaderGroup {
    handles: Vec<JoinHandle<ChunkStats>>,
}

impl ReaderGroup {
    /// Number of reader threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the group has no threads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every reader and collect their stats in range order.
    ///
    /// # Errors
    ///
    /// [`CounterError::WorkerPanicked`] if a reader thread panicked.
    pub fn join(self) -> Result<Vec<ChunkStats>> {
        self.handles
            .into_iter()
            .enumerate()
            .map(|(i, handle)| {
                handle
                    .join()
                    .map_err(|_| CounterError::worker_panicked("reader", i))
            })
            .collect()
    }
}

/// Partition `input` into `parts` ranges and start one reader per range.
///
/// Each thread owns a clone of `tx`; the queue closes when the last of them
/// finishes, since `tx` itself is dropped on return.
///
/// # Errors
///
/// [`CounterError::SpawnWorker`] if a thread cannot be started. Readers
/// already started keep running to completion.
pub fn spawn_readers(
    input: &InputFile,
    parts: usize,
    max_line_len: usize,
    tx: Sender<WorkItem>,
) -> Result<ReaderGroup> {
    let ranges = partition(input.size(), parts);
    let mut handles = Vec::with_capacity(ranges.len());

    for range in ranges {
        let tx = tx.clone();
        let path = input.path().to_path_buf();
        let handle = thread::Builder::new()
            .name(format!("reader-{}", range.index))
            .spawn(move || read_chunk(&path, range, max_line_len, &tx))
            .map_err(|err| CounterError::spawn_worker("reader", &err))?;
        handles.push(handle);
    }

    Ok(ReaderGroup { handles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_input(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_open_missing_file() {
        let err = InputFile::open("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, CounterError::OpenInput { .. }));
    }

    #[test]
    fn test_open_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = InputFile::open(dir.path()).unwrap_err();
        assert!(matches!(err, CounterError::OpenInput { .. }));
    }

    #[test]
    fn test_open_reports_size() {
        let file = temp_input(b"1.1.1.1\n2.2.2.2\n");
        let input = InputFile::open(file.path()).unwrap();
        assert_eq!(input.size(), 16);
        assert_eq!(input.path(), file.path());
    }

    #[test]
    fn test_read_chunk_whole_file() {
        let file = temp_input(b"1.1.1.1\n\n  2.2.2.2 \n1.1.1.1\n");
        let (tx, rx) = unbounded();
        let range = ByteRange {
            index: 0,
            start: 0,
            len: 28,
        };

        let stats = read_chunk(file.path(), range, 64, &tx);
        drop(tx);

        let keys: Vec<WorkItem> = rx.iter().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(&*keys[1], b"2.2.2.2");
        assert_eq!(stats.keys, 3);
        assert_eq!(stats.bytes, 28);
        assert!(!stats.failed);
    }

    #[test]
    fn test_read_chunk_respects_range() {
        let file = temp_input(b"aaaa\nbbbb\ncccc\n");
        let (tx, rx) = unbounded();
        let range = ByteRange {
            index: 1,
            start: 5,
            len: 5,
        };

        let stats = read_chunk(file.path(), range, 64, &tx);
        drop(tx);

        let keys: Vec<WorkItem> = rx.iter().collect();
        assert_eq!(keys, vec![Box::from(&b"bbbb"[..])]);
        assert_eq!(stats.chunk, 1);
    }

    #[test]
    fn test_read_chunk_line_too_long_keeps_earlier_keys() {
        let file = temp_input(b"ok\nthis line is too long\nlost\n");
        let (tx, rx) = unbounded();
        let range = ByteRange {
            index: 0,
            start: 0,
            len: 30,
        };

        let stats = read_chunk(file.path(), range, 8, &tx);
        drop(tx);

        let keys: Vec<WorkItem> = rx.iter().collect();
        assert_eq!(keys, vec![Box::from(&b"ok"[..])]);
        assert!(stats.failed);
        assert_eq!(stats.keys, 1);
    }

    #[test]
    fn test_read_chunk_open_failure_is_not_fatal() {
        let (tx, _rx) = unbounded();
        let range = ByteRange {
            index: 2,
            start: 0,
            len: 10,
        };
        let stats = read_chunk(Path::new("/definitely/not/here.txt"), range, 64, &tx);
        assert!(stats.failed);
        assert_eq!(stats.keys, 0);
    }

    #[test]
    fn test_read_chunk_stops_when_receiver_gone() {
        let file = temp_input(b"a\nb\nc\n");
        let (tx, rx) = bounded(1);
        drop(rx);
        let range = ByteRange {
            index: 0,
            start: 0,
            len: 6,
        };
        let stats = read_chunk(file.path(), range, 64, &tx);
        assert!(!stats.failed);
        assert_eq!(stats.keys, 0);
    }

    #[test]
    fn test_chunk_error_display() {
        let err = ChunkError::LineTooLong {
            chunk: 3,
            offset: 120,
            max: 64,
        };
        assert_eq!(err.chunk(), 3);
        assert!(err.to_string().contains("chunk 3"));
        assert!(err.to_string().contains("64 bytes"));
    }

    #[test]
    fn test_spawn_readers_splits_boundary_lines() {
        // Ranges [0,2) [2,4) [4,8): "abc" is cut into "ab" and "c"
        let file = temp_input(b"abc\ndef\n");
        let input = InputFile::open(file.path()).unwrap();
        let (tx, rx) = bounded(4);

        let group = spawn_readers(&input, 3, 64, tx).unwrap();
        assert_eq!(group.len(), 3);

        let mut keys: Vec<Vec<u8>> = rx.iter().map(Vec::from).collect();
        let stats = group.join().unwrap();
        keys.sort();

        assert_eq!(keys, vec![b"ab".to_vec(), b"c".to_vec(), b"def".to_vec()]);
        assert_eq!(stats.iter().map(|s| s.bytes).sum::<u64>(), 8);
    }
}
