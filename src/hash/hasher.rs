//! Hash function trait and the FNV-1a 64 hasher.
//!
//! Hash functions operate on byte slices: keys are raw line bytes, so there is
//! no `T: Hash` serialization step between the input file and the hasher.
//!
//! # Independence
//!
//! The Bloom engine derives its k index functions by calling
//! [`BloomHasher::hash_bytes_with_seed`] with k distinct seeds. Implementations
//! must make different seeds behave as different functions; a seed that is
//! merely XOR-ed into the output would collapse every function onto the same
//! hash value and shrink the effective k to 1.
//!
//! ```
//! use ipcount::hash::hasher::{BloomHasher, StdHasher};
//!
//! let hasher = StdHasher::new();
//! let h1 = hasher.hash_bytes_with_seed(b"10.0.0.1", 1);
//! let h2 = hasher.hash_bytes_with_seed(b"10.0.0.1", 2);
//! assert_ne!(h1, h2);
//! ```

#![allow(clippy::module_name_repetitions)]

/// FNV-1a 64-bit offset basis.
const FNV64_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Base hasher trait for Bloom filter hash functions.
///
/// All implementations must be deterministic within a process and
/// `Send + Sync` so one engine can be shared by every pool worker.
pub trait BloomHasher: Send + Sync {
    /// Hash arbitrary bytes to a 64-bit value.
    fn hash_bytes(&self, bytes: &[u8]) -> u64;

    /// Hash bytes under an explicit seed.
    ///
    /// Different seeds MUST produce statistically independent outputs. The
    /// seed has to enter the hash state before the data; see the module docs.
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Streaming FNV-1a 64 state, usable as a [`std::hash::Hasher`].
#[derive(Debug, Clone)]
pub struct Fnv1aState {
    state: u64,
}

impl Fnv1aState {
    /// Create a new state at the FNV-1a offset basis.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FNV64_OFFSET,
        }
    }
}

impl Default for Fnv1aState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::hash::Hasher for Fnv1aState {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(FNV64_PRIME);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// Deterministic FNV-1a 64 hasher.
///
/// The seed is written into the FNV state ahead of the key bytes, so each
/// seed starts the key from a different state. Good enough for Bloom indexing
/// of short keys; [`XxHasher`](super::XxHasher) mixes better and is the
/// default.
#[derive(Debug, Clone)]
pub struct StdHasher {
    seed: u64,
}

impl StdHasher {
    /// Create a new hasher with the default seed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seed: 0x517c_c1b7_2722_0a95,
        }
    }

    /// Create a new hasher with an explicit base seed.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for StdHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BloomHasher for StdHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        use std::hash::Hasher;

        let mut hasher = Fnv1aState::new();
        hasher.write_u64(self.seed);
        hasher.write(bytes);
        hasher.finish()
    }

    #[inline]
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64 {
        use std::hash::Hasher;

        let mut hasher = Fnv1aState::new();
        hasher.write_u64(self.seed ^ seed);
        hasher.write(bytes);
        hasher.finish()
    }

    #[inline]
    fn name(&self) -> &'static str {
        "FNV-1a-64"
    }
}
