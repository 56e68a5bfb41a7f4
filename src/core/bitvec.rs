//! Lock-free bit vector with atomic operations.
//!
//! This is the storage substrate of the Bloom engine: a fixed-size bit array
//! backed by `Box<[AtomicU64]>`, shared by every pool worker through `&self`.
//!
//! # Thread Safety
//!
//! - `set` / `or_word`: atomic `fetch_or` with `Ordering::Release`
//! - `get` / `load_word`: atomic load with `Ordering::Acquire`
//!
//! There is deliberately no way to clear a bit. Within one run bits are only
//! ever set, so a bit observed as set stays set and queries can never flip from
//! "present" back to "absent".
//!
//! # Memory Layout
//!
//! Bits are packed into 64-bit words in little-endian bit order:
//!
//! ```text
//! Word 0: [bit 0][bit 1]...[bit 63]
//! Word 1: [bit 64][bit 65]...[bit 127]
//! ```
//!
//! # Examples
//!
//! ```
//! use ipcount::core::bitvec::BitVec;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let bv = Arc::new(BitVec::new(1000).unwrap());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let bv = Arc::clone(&bv);
//!         thread::spawn(move || {
//!             for j in 0..250 {
//!                 bv.set(i * 250 + j);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! assert_eq!(bv.count_ones(), 1000);
//! ```

use crate::error::{CounterError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of bits stored in one word.
pub const WORD_BITS: usize = 64;

/// Lock-free, set-only bit vector.
///
/// Storage is never exposed; callers go through the atomic accessors only.
#[derive(Debug)]
pub struct BitVec {
    /// Atomic words, each storing 64 bits.
    blocks: Box<[AtomicU64]>,

    /// Total number of bits in the vector.
    len: usize,
}

impl BitVec {
    /// Create a new bit vector with the specified number of bits, all clear.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidFilterSize`] if `num_bits` is 0 or the
    /// words cannot be allocated.
    ///
    /// ```
    /// use ipcount::core::bitvec::BitVec;
    ///
    /// let bv = BitVec::new(1000).unwrap();
    /// assert_eq!(bv.len(), 1000);
    /// assert_eq!(bv.num_blocks(), 16);
    /// ```
    pub fn new(num_bits: usize) -> Result<Self> {
        if num_bits == 0 {
            return Err(CounterError::invalid_filter_size(num_bits));
        }

        let num_blocks = num_bits.div_ceil(WORD_BITS);
        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(num_blocks)
            .map_err(|_| CounterError::invalid_filter_size(num_bits))?;
        blocks.extend((0..num_blocks).map(|_| AtomicU64::new(0)));
        let blocks = blocks.into_boxed_slice();

        Ok(Self {
            blocks,
            len: num_bits,
        })
    }

    /// Number of bits in the vector.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false` for a successfully constructed vector.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of 64-bit words backing the vector.
    #[must_use]
    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Set a bit to 1 atomically.
    ///
    /// Returns `true` if this call flipped the bit (it was clear before).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`, matching slice indexing.
    ///
    /// ```
    /// use ipcount::core::bitvec::BitVec;
    ///
    /// let bv = BitVec::new(64).unwrap();
    /// assert!(bv.set(10));
    /// assert!(!bv.set(10)); // already set
    /// assert!(bv.get(10));
    /// ```
    #[inline]
    pub fn set(&self, index: usize) -> bool {
        assert!(
            index < self.len,
            "BitVec index out of bounds: index={} len={}",
            index,
            self.len
        );

        let mask = 1u64 << (index % WORD_BITS);
        let prev = self.blocks[index / WORD_BITS].fetch_or(mask, Ordering::Release);
        prev & mask == 0
    }

    /// Read a bit atomically.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(
            index < self.len,
            "BitVec index out of bounds: index={} len={}",
            index,
            self.len
        );

        let mask = 1u64 << (index % WORD_BITS);
        // Acquire pairs with the Release in set/or_word
        self.blocks[index / WORD_BITS].load(Ordering::Acquire) & mask != 0
    }

    /// OR `mask` into word `word` with a single atomic operation.
    ///
    /// Returns the word's previous value, so the caller can tell which of the
    /// masked bits this call flipped. This is the primitive behind both the
    /// one-OR-per-touched-word insert and the single-word test-and-set.
    ///
    /// # Panics
    ///
    /// Panics if `word >= num_blocks()`.
    #[inline]
    pub fn or_word(&self, word: usize, mask: u64) -> u64 {
        debug_assert!(
            mask == 0 || word * WORD_BITS + (63 - mask.leading_zeros() as usize) < self.len,
            "or_word mask touches bits past len"
        );
        self.blocks[word].fetch_or(mask, Ordering::Release)
    }

    /// Load word `word` atomically.
    ///
    /// # Panics
    ///
    /// Panics if `word >= num_blocks()`.
    #[must_use]
    #[inline]
    pub fn load_word(&self, word: usize) -> u64 {
        self.blocks[word].load(Ordering::Acquire)
    }

    /// Count the number of set bits.
    ///
    /// Not a snapshot: concurrent `set` calls may or may not be observed.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| block.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }

    /// Total memory usage in bytes (words plus the struct itself).
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.blocks.len() * std::mem::size_of::<AtomicU64>() + std::mem::size_of::<Self>()
    }
}
