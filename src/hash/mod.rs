//! Hash functions and the k-hash index schemes of the Bloom engine.
//!
//! ```text
//! hash/
//! ├── hasher.rs  - BloomHasher trait, FNV-1a 64 StdHasher
//! ├── xxhash.rs  - XXH3-64 XxHasher
//! ├── fnv32.rs   - 32-bit FNV-1 / FNV-1a
//! └── mod.rs     - IndexScheme (this file)
//! ```
//!
//! # Index Schemes
//!
//! | Scheme            | k hash values                                   | Independent |
//! |-------------------|-------------------------------------------------|-------------|
//! | `Xxh3` (default)  | XXH3-64 under k distinct seeds                  | yes         |
//! | `Fnv1a`           | FNV-1a-64 with k distinct seeds prefixed        | yes         |
//! | `Fnv32Reference`  | FNV-1a-32, FNV-1-32, FNV-1a-32 + key length      | no, k = 3   |
//!
//! `Fnv32Reference` exists to reproduce the counts of an older tool. Its first
//! and third values differ only by the key length, so keys of equal length
//! share the offset between those two positions and the filter behaves as if
//! k were closer to 2. Expect a measurably higher false-positive rate than
//! [`expected_fp_rate`](crate::core::params::expected_fp_rate) predicts.
//!
//! # Example
//!
//! ```
//! use ipcount::hash::IndexScheme;
//!
//! let mut hashes = [0u64; 5];
//! IndexScheme::Xxh3.hash_into(b"10.0.0.1", &mut hashes);
//! assert!(hashes.windows(2).all(|w| w[0] != w[1]));
//! ```

pub mod fnv32;
pub mod hasher;
pub mod xxhash;

pub use hasher::{BloomHasher, StdHasher};
pub use xxhash::XxHasher;

use crate::core::params::{MAX_HASH_FUNCTIONS, MIN_HASH_FUNCTIONS};
use crate::error::{CounterError, Result};
use std::fmt;

/// Golden-ratio increment used to spread per-function seeds.
const SEED_STEP: u64 = 0x9e37_79b9_7f4a_7c15;

/// How the Bloom engine derives its k hash values from a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexScheme {
    /// k independently seeded XXH3-64 evaluations.
    #[default]
    Xxh3,
    /// k independently seeded FNV-1a-64 evaluations.
    Fnv1a,
    /// The three correlated 32-bit FNV values of the reference tool.
    Fnv32Reference,
}

impl IndexScheme {
    /// Number of hash values `Fnv32Reference` produces.
    pub const REFERENCE_HASH_COUNT: usize = 3;

    /// Seed for the `i`-th hash function.
    #[must_use]
    #[inline]
    pub const fn seed_for(i: usize) -> u64 {
        SEED_STEP.wrapping_mul(i as u64 + 1)
    }

    /// Check that this scheme can produce `k` hash values.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidHashCount`] if `k` is outside
    /// `[1, 32]`, or not exactly 3 for `Fnv32Reference`.
    pub fn validate_hash_count(self, k: usize) -> Result<()> {
        let (min, max) = match self {
            Self::Fnv32Reference => (Self::REFERENCE_HASH_COUNT, Self::REFERENCE_HASH_COUNT),
            Self::Xxh3 | Self::Fnv1a => (MIN_HASH_FUNCTIONS, MAX_HASH_FUNCTIONS),
        };
        if (min..=max).contains(&k) {
            Ok(())
        } else {
            Err(CounterError::invalid_hash_count(k, min, max))
        }
    }

    /// Whether every hash value carries 64 well-mixed bits.
    ///
    /// The reference scheme only fills the low 32 bits.
    #[must_use]
    pub const fn is_wide(self) -> bool {
        !matches!(self, Self::Fnv32Reference)
    }

    /// Fill `out` with `out.len()` hash values of `key`.
    ///
    /// `out.len()` must already have passed [`validate_hash_count`](Self::validate_hash_count).
    #[inline]
    pub fn hash_into(self, key: &[u8], out: &mut [u64]) {
        match self {
            Self::Xxh3 => fill_seeded(&XxHasher::new(), key, out),
            Self::Fnv1a => fill_seeded(&StdHasher::new(), key, out),
            Self::Fnv32Reference => {
                debug_assert_eq!(out.len(), Self::REFERENCE_HASH_COUNT);
                let h1 = fnv32::fnv1a_32(key);
                out[0] = u64::from(h1);
                out[1] = u64::from(fnv32::fnv1_32(key));
                out[2] = u64::from(h1.wrapping_add(key.len() as u32));
            }
        }
    }

    /// Short name for logs and the CLI.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xxh3 => "xxh3",
            Self::Fnv1a => "fnv1a",
            Self::Fnv32Reference => "fnv32-reference",
        }
    }
}

impl fmt::Display for IndexScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn fill_seeded<H: BloomHasher>(hasher: &H, key: &[u8], out: &mut [u64]) {
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = hasher.hash_bytes_with_seed(key, IndexScheme::seed_for(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_are_distinct() {
        let seeds: Vec<u64> = (0..MAX_HASH_FUNCTIONS).map(IndexScheme::seed_for).collect();
        for i in 0..seeds.len() {
            for j in (i + 1)..seeds.len() {
                assert_ne!(seeds[i], seeds[j]);
            }
        }
    }

    #[test]
    fn test_validate_hash_count() {
        assert!(IndexScheme::Xxh3.validate_hash_count(1).is_ok());
        assert!(IndexScheme::Xxh3.validate_hash_count(32).is_ok());
        assert!(IndexScheme::Xxh3.validate_hash_count(0).is_err());
        assert!(IndexScheme::Fnv1a.validate_hash_count(33).is_err());
        assert!(IndexScheme::Fnv32Reference.validate_hash_count(3).is_ok());
        assert_eq!(
            IndexScheme::Fnv32Reference.validate_hash_count(5),
            Err(CounterError::invalid_hash_count(5, 3, 3))
        );
    }

    #[test]
    fn test_seeded_schemes_produce_distinct_values() {
        for scheme in [IndexScheme::Xxh3, IndexScheme::Fnv1a] {
            let mut out = [0u64; 7];
            scheme.hash_into(b"203.0.113.9", &mut out);
            for i in 0..out.len() {
                for j in (i + 1)..out.len() {
                    assert_ne!(out[i], out[j], "{} produced equal hashes", scheme);
                }
            }
        }
    }

    #[test]
    fn test_hash_into_is_deterministic() {
        let mut a = [0u64; 5];
        let mut b = [0u64; 5];
        IndexScheme::Xxh3.hash_into(b"1.1.1.1", &mut a);
        IndexScheme::Xxh3.hash_into(b"1.1.1.1", &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reference_scheme_layout() {
        let key = b"1.2.3.4";
        let mut out = [0u64; 3];
        IndexScheme::Fnv32Reference.hash_into(key, &mut out);

        let h1 = fnv32::fnv1a_32(key);
        assert_eq!(out[0], u64::from(h1));
        assert_eq!(out[1], u64::from(fnv32::fnv1_32(key)));
        assert_eq!(out[2], u64::from(h1.wrapping_add(7)));
        assert!(out.iter().all(|&h| h <= u64::from(u32::MAX)));
    }

    #[test]
    fn test_reference_scheme_correlation() {
        // Equal-length keys keep the same offset between the first and third value
        let mut a = [0u64; 3];
        let mut b = [0u64; 3];
        IndexScheme::Fnv32Reference.hash_into(b"10.0.0.1", &mut a);
        IndexScheme::Fnv32Reference.hash_into(b"10.0.0.2", &mut b);
        assert_eq!(
            (a[2] as u32).wrapping_sub(a[0] as u32),
            (b[2] as u32).wrapping_sub(b[0] as u32)
        );
    }

    #[test]
    fn test_is_wide() {
        assert!(IndexScheme::Xxh3.is_wide());
        assert!(IndexScheme::Fnv1a.is_wide());
        assert!(!IndexScheme::Fnv32Reference.is_wide());
    }
}
