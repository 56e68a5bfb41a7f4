//! XXH3-64 hasher.
//!
//! Wraps the `xxhash-rust` crate. XXH3 takes the seed as a native input to its
//! mixing rounds, so every seed is a genuinely different function. That makes
//! it the default source of the Bloom engine's k index functions.
//!
//! ```
//! use ipcount::hash::{BloomHasher, XxHasher};
//!
//! let h1 = XxHasher::with_seed(0).hash_bytes(b"8.8.8.8");
//! let h2 = XxHasher::with_seed(1).hash_bytes(b"8.8.8.8");
//! assert_ne!(h1, h2);
//! ```

#![allow(clippy::module_name_repetitions)]

use super::hasher::BloomHasher;

use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

/// XXH3-64 hasher with a base seed.
#[derive(Debug, Clone, Copy)]
pub struct XxHasher {
    seed: u64,
}

impl XxHasher {
    /// Create a new hasher with seed `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    /// Create a new hasher with an explicit base seed.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for XxHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BloomHasher for XxHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        if self.seed == 0 {
            xxh3_64(bytes)
        } else {
            xxh3_64_with_seed(bytes, self.seed)
        }
    }

    #[inline]
    fn hash_bytes_with_seed(&self, bytes: &[u8], seed: u64) -> u64 {
        xxh3_64_with_seed(bytes, self.seed.wrapping_add(seed))
    }

    #[inline]
    fn name(&self) -> &'static str {
        "XXH3-64"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes_deterministic() {
        let hasher = XxHasher::new();
        assert_eq!(hasher.hash_bytes(b"10.1.2.3"), hasher.hash_bytes(b"10.1.2.3"));
    }

    #[test]
    fn test_seed_zero_matches_unseeded() {
        assert_eq!(XxHasher::new().hash_bytes(b"abc"), xxh3_64(b"abc"));
        assert_eq!(
            XxHasher::new().hash_bytes_with_seed(b"abc", 0),
            XxHasher::new().hash_bytes(b"abc")
        );
    }

    #[test]
    fn test_different_seeds_different_hashes() {
        let hasher = XxHasher::new();
        let hashes: Vec<u64> = (1..=8)
            .map(|seed| hasher.hash_bytes_with_seed(b"172.16.0.1", seed))
            .collect();

        for i in 0..hashes.len() {
            for j in (i + 1)..hashes.len() {
                assert_ne!(hashes[i], hashes[j], "seeds {} and {} collided", i + 1, j + 1);
            }
        }
    }

    #[test]
    fn test_hash_bytes_different_inputs() {
        let hasher = XxHasher::new();
        assert_ne!(hasher.hash_bytes(b"1.1.1.1"), hasher.hash_bytes(b"1.1.1.2"));
    }

    #[test]
    fn test_hash_bytes_empty() {
        let hasher = XxHasher::new();
        assert_eq!(hasher.hash_bytes(b""), hasher.hash_bytes(b""));
    }

    #[test]
    fn test_name() {
        assert_eq!(XxHasher::new().name(), "XXH3-64");
    }
}
