//! Fixed-memory Bloom filter engine.
//!
//! A [`BloomEngine`] owns one [`BitVec`] of M bits and derives k bit positions
//! per key from an [`IndexScheme`]. All mutation goes through atomic OR on the
//! bit array; nothing is ever cleared, so the engine has **zero false
//! negatives**: once `add(key)` returns, `test(key)` is `true` for every
//! worker, forever. The false-positive rate grows with the number of distinct
//! keys inserted, roughly as `(1 - e^(-kn/M))^k`.
//!
//! # Layouts and the test-then-add race
//!
//! With [`BloomLayout::Classic`] the k positions are spread over the whole
//! array and `test_and_insert` is two separate steps: `test`, then `add` if
//! the test failed. Two workers that pick up the same new key at the same
//! moment can both observe "absent", both add it, and both report it as new.
//! The distinct count is then **overcounted** by one for that key. This is the
//! documented behavior of the classic layout and matches the reference tool's
//! counts; it only shows up when duplicates of a not-yet-seen key are in
//! flight on different workers at once.
//!
//! [`BloomLayout::WordBlocked`] closes the race. The first hash picks one
//! 64-bit word and all k bits are placed inside it, so a single `fetch_or`
//! both tests and sets every bit of the key. Exactly one caller ever sees a
//! key's bits go from "not all set" to "all set", and a key is reported new at
//! most once. The price is a higher false-positive rate at the same M and k,
//! since keys now collide inside 64-bit blocks.
//!
//! # Example
//!
//! ```
//! use ipcount::filters::{BloomConfig, BloomEngine};
//!
//! let engine = BloomEngine::new(BloomConfig::new(1 << 16, 4)).unwrap();
//!
//! assert!(engine.test_and_insert(b"1.1.1.1"));
//! assert!(!engine.test_and_insert(b"1.1.1.1"));
//! assert!(engine.test(b"1.1.1.1"));
//! ```

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use crate::core::bitvec::{BitVec, WORD_BITS};
use crate::core::engine::{DedupEngine, EngineKind};
use crate::core::params::{self, MAX_HASH_FUNCTIONS};
use crate::error::{CounterError, Result};
use crate::hash::IndexScheme;
use std::fmt;

/// Placement of a key's k bits in the bit array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BloomLayout {
    /// k positions anywhere in `[0, M)`; test-then-add insertion.
    #[default]
    Classic,
    /// All k bits inside one 64-bit word; single-`fetch_or` test-and-set.
    WordBlocked,
}

impl BloomLayout {
    /// Short name for logs and the CLI.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::WordBlocked => "word-blocked",
        }
    }
}

impl fmt::Display for BloomLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Construction parameters of a [`BloomEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomConfig {
    /// Requested bit capacity M. Rounded up to a whole number of words.
    pub bits: usize,
    /// Number of hash functions k.
    pub hashes: usize,
    /// How the k hash values are derived.
    pub scheme: IndexScheme,
    /// Where the k bits are placed.
    pub layout: BloomLayout,
}

impl BloomConfig {
    /// Default capacity: 2 billion bits (250 MB).
    pub const DEFAULT_BITS: usize = 2_000_000_000;

    /// Default number of hash functions.
    pub const DEFAULT_HASHES: usize = 5;

    /// Config with explicit M and k and the default scheme and layout.
    #[must_use]
    pub fn new(bits: usize, hashes: usize) -> Self {
        Self {
            bits,
            hashes,
            scheme: IndexScheme::default(),
            layout: BloomLayout::default(),
        }
    }

    /// Config sized for `expected_items` distinct keys at `fp_rate`.
    ///
    /// # Errors
    ///
    /// Propagates the sizing errors of [`params::calculate_filter_params`].
    ///
    /// ```
    /// use ipcount::filters::BloomConfig;
    ///
    /// let config = BloomConfig::for_capacity(1_000_000, 0.001).unwrap();
    /// assert_eq!(config.hashes, 10);
    /// ```
    pub fn for_capacity(expected_items: usize, fp_rate: f64) -> Result<Self> {
        let (bits, hashes) = params::calculate_filter_params(expected_items, fp_rate)?;
        Ok(Self::new(bits, hashes))
    }

    /// Replace the index scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: IndexScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Replace the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: BloomLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Bit capacity after rounding up to whole 64-bit words.
    ///
    /// # Errors
    ///
    /// [`CounterError::InvalidFilterSize`] if `bits` is 0 or overflows when rounded.
    pub fn word_aligned_bits(&self) -> Result<usize> {
        if self.bits == 0 {
            return Err(CounterError::invalid_filter_size(self.bits));
        }
        self.bits
            .checked_next_multiple_of(WORD_BITS)
            .ok_or_else(|| CounterError::invalid_filter_size(self.bits))
    }

    /// Check that an engine can be built from this config.
    ///
    /// # Errors
    ///
    /// - [`CounterError::InvalidFilterSize`] for a zero or overflowing size
    /// - [`CounterError::InvalidHashCount`] if the scheme cannot produce k values
    /// - [`CounterError::InvalidConfig`] for `WordBlocked` with a narrow scheme
    pub fn validate(&self) -> Result<()> {
        self.word_aligned_bits()?;
        self.scheme.validate_hash_count(self.hashes)?;

        if self.layout == BloomLayout::WordBlocked && !self.scheme.is_wide() {
            return Err(CounterError::invalid_config(format!(
                "layout {} needs 64-bit hash values, {} only produces 32",
                self.layout, self.scheme
            )));
        }

        Ok(())
    }
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BITS, Self::DEFAULT_HASHES)
    }
}

/// Probabilistic, lock-free deduplication engine.
///
/// Shared by reference across all pool workers; every method takes `&self`.
#[derive(Debug)]
pub struct BloomEngine {
    bits: BitVec,
    k: usize,
    scheme: IndexScheme,
    layout: BloomLayout,
}

impl BloomEngine {
    /// Build an engine with all bits clear.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`BloomConfig::validate`].
    pub fn new(config: BloomConfig) -> Result<Self> {
        config.validate()?;
        let bits = BitVec::new(config.word_aligned_bits()?)?;

        tracing::debug!(
            bits = bits.len(),
            hashes = config.hashes,
            scheme = %config.scheme,
            layout = %config.layout,
            bytes = bits.memory_usage(),
            "allocated bloom filter"
        );

        Ok(Self {
            bits,
            k: config.hashes,
            scheme: config.scheme,
            layout: config.layout,
        })
    }

    /// Record `key`: set all k of its bits.
    ///
    /// Positions sharing a word are merged so each touched word gets exactly
    /// one atomic OR.
    pub fn add(&self, key: &[u8]) {
        let hashes = self.hashes(key);
        match self.layout {
            BloomLayout::Classic => {
                let (words, touched) = self.classic_words(&hashes[..self.k]);
                for &(word, mask) in &words[..touched] {
                    self.bits.or_word(word, mask);
                }
            }
            BloomLayout::WordBlocked => {
                let (word, mask) = self.blocked_word(&hashes[..self.k]);
                self.bits.or_word(word, mask);
            }
        }
    }

    /// Probabilistic membership test.
    ///
    /// `false` is definitive: no caller ever added `key`. `true` means `key`
    /// was probably added, subject to the false-positive rate.
    #[must_use]
    pub fn test(&self, key: &[u8]) -> bool {
        let hashes = self.hashes(key);
        match self.layout {
            BloomLayout::Classic => {
                let m = self.bits.len() as u64;
                hashes[..self.k]
                    .iter()
                    .all(|&h| self.bits.get((h % m) as usize))
            }
            BloomLayout::WordBlocked => {
                let (word, mask) = self.blocked_word(&hashes[..self.k]);
                self.bits.load_word(word) & mask == mask
            }
        }
    }

    /// Test, and add if absent. Returns `true` if the key was considered new.
    ///
    /// Classic layout: `test` then `add`, racy under concurrency (see the
    /// module docs). Word-blocked layout: one atomic `fetch_or`.
    pub fn test_and_insert(&self, key: &[u8]) -> bool {
        #[cfg(feature = "trace")]
        tracing::trace!(key = %String::from_utf8_lossy(key), "BloomEngine::test_and_insert");

        match self.layout {
            BloomLayout::Classic => {
                if self.test(key) {
                    false
                } else {
                    self.add(key);
                    true
                }
            }
            BloomLayout::WordBlocked => {
                let hashes = self.hashes(key);
                let (word, mask) = self.blocked_word(&hashes[..self.k]);
                self.bits.or_word(word, mask) & mask != mask
            }
        }
    }

    /// Bit capacity M (word-aligned).
    #[must_use]
    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    /// Number of hash functions k.
    #[must_use]
    pub const fn hash_count(&self) -> usize {
        self.k
    }

    /// The index scheme in use.
    #[must_use]
    pub const fn scheme(&self) -> IndexScheme {
        self.scheme
    }

    /// The bit layout in use.
    #[must_use]
    pub const fn layout(&self) -> BloomLayout {
        self.layout
    }

    /// Number of bits currently set.
    #[must_use]
    pub fn count_set_bits(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits currently set, in `[0, 1]`.
    #[must_use]
    pub fn fill_rate(&self) -> f64 {
        self.count_set_bits() as f64 / self.bit_count() as f64
    }

    /// Theoretical false-positive rate after `inserted` distinct keys.
    ///
    /// Assumes independent hash functions and the classic layout; it is a
    /// lower bound for `WordBlocked` and for `Fnv32Reference`.
    #[must_use]
    pub fn estimated_fp_rate(&self, inserted: u64) -> f64 {
        let n = usize::try_from(inserted).unwrap_or(usize::MAX);
        params::expected_fp_rate(self.bit_count(), n, self.k).unwrap_or(1.0)
    }

    /// Memory held by the bit array, in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.bits.memory_usage()
    }

    #[inline]
    fn hashes(&self, key: &[u8]) -> [u64; MAX_HASH_FUNCTIONS] {
        let mut out = [0u64; MAX_HASH_FUNCTIONS];
        self.scheme.hash_into(key, &mut out[..self.k]);
        out
    }

    /// Map hash values to `(word, mask)` pairs, one per distinct word.
    #[inline]
    fn classic_words(&self, hashes: &[u64]) -> ([(usize, u64); MAX_HASH_FUNCTIONS], usize) {
        let m = self.bits.len() as u64;
        let mut words = [(0usize, 0u64); MAX_HASH_FUNCTIONS];
        let mut touched = 0;

        for &h in hashes {
            let index = (h % m) as usize;
            let (word, bit) = (index / WORD_BITS, 1u64 << (index % WORD_BITS));
            match words[..touched].iter_mut().find(|(w, _)| *w == word) {
                Some((_, mask)) => *mask |= bit,
                None => {
                    words[touched] = (word, bit);
                    touched += 1;
                }
            }
        }

        (words, touched)
    }

    /// Word chosen by the first hash; bit offsets from each hash's top 6 bits.
    #[inline]
    fn blocked_word(&self, hashes: &[u64]) -> (usize, u64) {
        let word = (hashes[0] % self.bits.num_blocks() as u64) as usize;
        let mask = hashes.iter().fold(0u64, |mask, &h| mask | 1u64 << (h >> 58));
        (word, mask)
    }
}

impl DedupEngine for BloomEngine {
    #[inline]
    fn test_and_insert(&self, key: &[u8]) -> bool {
        BloomEngine::test_and_insert(self, key)
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Bloom
    }

    fn estimated_fp_rate(&self, inserted: u64) -> Option<f64> {
        Some(BloomEngine::estimated_fp_rate(self, inserted))
    }
}
