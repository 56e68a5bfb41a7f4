//! Byte-range partitioning of the input file.

/// One worker's contiguous slice of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// Position of this range in the partition, starting at 0.
    pub index: usize,
    /// First byte offset.
    pub start: u64,
    /// Number of bytes.
    pub len: u64,
}

impl ByteRange {
    /// One past the last byte offset.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.start + self.len
    }

    /// Whether the range covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Split `size` bytes into `parts` contiguous ranges.
///
/// Every range but the last is `size / parts` bytes long; the last one absorbs
/// the remainder. The ranges cover `[0, size)` with no gaps or overlaps.
/// Boundaries ignore line structure: a line crossing one is split in two.
///
/// `parts == 0` is treated as 1.
///
/// ```
/// use ipcount::reader::chunk::partition;
///
/// let ranges = partition(10, 3);
/// let lens: Vec<u64> = ranges.iter().map(|r| r.len).collect();
/// assert_eq!(lens, vec![3, 3, 4]);
/// assert_eq!(ranges[2].end(), 10);
/// ```
#[must_use]
pub fn partition(size: u64, parts: usize) -> Vec<ByteRange> {
    let parts = parts.max(1);
    let chunk = size / parts as u64;

    (0..parts)
        .map(|index| {
            let start = chunk * index as u64;
            let len = if index + 1 == parts { size - start } else { chunk };
            ByteRange { index, start, len }
        })
        .collect()
}
