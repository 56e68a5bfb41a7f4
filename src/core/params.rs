//! Sizing math for the Bloom engine.
//!
//! Given:
//! - `n`: expected number of distinct keys
//! - `ε`: target false positive rate
//!
//! Optimal parameters:
//! - `m = -n × ln(ε) / (ln 2)²` (bits in filter)
//! - `k = (m/n) × ln 2` (number of hash functions)
//!
//! Expected false positive rate after `n` insertions:
//! - `p = (1 - e^(-kn/m))^k`
//!
//! The last formula assumes independent hash functions. With the
//! `Fnv32Reference` index scheme that assumption does not hold and the real
//! rate is worse than reported here.
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/Time Trade-offs in Hash Coding with Allowable Errors"

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use crate::error::{CounterError, Result};
use std::f64::consts::LN_2;

/// (ln 2)² ≈ 0.4804530139182014
const LN2_SQUARED: f64 = LN_2 * LN_2;

/// Minimum practical filter size in bits.
pub const MIN_FILTER_SIZE: usize = 64;

/// Maximum number of hash functions per key.
pub const MAX_HASH_FUNCTIONS: usize = 32;

/// Minimum number of hash functions per key.
pub const MIN_HASH_FUNCTIONS: usize = 1;

/// Calculate the optimal number of bits: `m = -n × ln(ε) / (ln 2)²`.
///
/// The result is at least [`MIN_FILTER_SIZE`].
///
/// # Errors
///
/// - [`CounterError::InvalidItemCount`] if `n == 0`
/// - [`CounterError::FalsePositiveRateOutOfBounds`] if `fp_rate` not in (0, 1)
/// - [`CounterError::InvalidConfig`] if the result does not fit in memory
///
/// ```
/// use ipcount::core::params::optimal_bit_count;
///
/// let bits = optimal_bit_count(1000, 0.01).unwrap();
/// assert!(bits >= 9585 && bits <= 9586);
/// ```
pub fn optimal_bit_count(n: usize, fp_rate: f64) -> Result<usize> {
    if n == 0 {
        return Err(CounterError::invalid_item_count(n));
    }

    if fp_rate <= 0.0 || fp_rate >= 1.0 || fp_rate.is_nan() {
        return Err(CounterError::fp_rate_out_of_bounds(fp_rate));
    }

    let m = (-(n as f64) * fp_rate.ln() / LN2_SQUARED).ceil();

    if m > (usize::MAX / 2) as f64 {
        return Err(CounterError::invalid_config(format!(
            "calculated filter size {:.0} bits exceeds memory limits",
            m
        )));
    }

    Ok((m as usize).max(MIN_FILTER_SIZE))
}

/// Calculate the optimal number of hash functions: `k = (m/n) × ln 2`.
///
/// The result is clamped to `[MIN_HASH_FUNCTIONS, MAX_HASH_FUNCTIONS]`.
///
/// # Errors
///
/// - [`CounterError::InvalidFilterSize`] if `m == 0`
/// - [`CounterError::InvalidItemCount`] if `n == 0`
///
/// ```
/// use ipcount::core::params::optimal_hash_count;
///
/// assert_eq!(optimal_hash_count(9585, 1000).unwrap(), 7);
/// ```
pub fn optimal_hash_count(m: usize, n: usize) -> Result<usize> {
    if m == 0 {
        return Err(CounterError::invalid_filter_size(m));
    }

    if n == 0 {
        return Err(CounterError::invalid_item_count(n));
    }

    let k = ((m as f64 / n as f64) * LN_2).round() as usize;
    Ok(k.clamp(MIN_HASH_FUNCTIONS, MAX_HASH_FUNCTIONS))
}

/// Expected false positive rate after `n` insertions: `p = (1 - e^(-kn/m))^k`.
///
/// # Errors
///
/// - [`CounterError::InvalidFilterSize`] if `m == 0`
/// - [`CounterError::InvalidHashCount`] if `k` is outside valid bounds
///
/// ```
/// use ipcount::core::params::expected_fp_rate;
///
/// let fp = expected_fp_rate(9585, 1000, 7).unwrap();
/// assert!((fp - 0.01).abs() < 0.001);
/// ```
pub fn expected_fp_rate(m: usize, n: usize, k: usize) -> Result<f64> {
    if m == 0 {
        return Err(CounterError::invalid_filter_size(m));
    }

    if !(MIN_HASH_FUNCTIONS..=MAX_HASH_FUNCTIONS).contains(&k) {
        return Err(CounterError::invalid_hash_count(
            k,
            MIN_HASH_FUNCTIONS,
            MAX_HASH_FUNCTIONS,
        ));
    }

    if n == 0 {
        return Ok(0.0);
    }

    let k_f64 = k as f64;
    let prob_bit_one = 1.0 - (-(k_f64 * n as f64) / m as f64).exp();

    Ok(prob_bit_one.powf(k_f64).clamp(0.0, 1.0))
}

/// Optimal `(m, k)` for `n` keys at false positive rate `fp_rate`.
///
/// # Errors
///
/// See [`optimal_bit_count`].
pub fn calculate_filter_params(n: usize, fp_rate: f64) -> Result<(usize, usize)> {
    let m = optimal_bit_count(n, fp_rate)?;
    let k = optimal_hash_count(m, n)?;
    Ok((m, k))
}
