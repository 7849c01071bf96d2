//! Arbitrary precision table bound.
//!
//! `bound = floor(multiplier * sqrt(2^bits / count))`. The square root is
//! taken over a fixed-point big integer so `2^bits` never has to fit a
//! machine word; the multiplier is applied through its exact binary
//! decomposition. The result stays a big integer, since keys only compare
//! and hash it.

use kgr_core::errors::{ErrorInfo, KgrError};
use num_bigint::BigUint;
use num_traits::{Float, One, Zero};

const FRACTION_BITS: usize = 64;

/// `2^bits` as a big integer.
pub fn secret_modulus(secret_bits: u32) -> BigUint {
    BigUint::one() << secret_bits as usize
}

/// Computes the step bound a table built for `count` searches covers.
pub fn table_bound(multiplier: f64, secret_bits: u32, count: i64) -> Result<BigUint, KgrError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(KgrError::Domain(
            ErrorInfo::new("bound_multiplier", "multiplier must be finite and non-negative")
                .with_context("multiplier", multiplier.to_string()),
        ));
    }
    if count <= 0 {
        return Err(KgrError::Domain(
            ErrorInfo::new("bound_count", "count must be positive")
                .with_context("count", count.to_string()),
        ));
    }
    if multiplier == 0.0 {
        return Ok(BigUint::zero());
    }

    let scaled = (secret_modulus(secret_bits) << (2 * FRACTION_BITS)) / BigUint::from(count as u64);
    // root == floor(sqrt(2^bits / count) * 2^FRACTION_BITS)
    let root = scaled.sqrt();
    let (mantissa, exponent, _) = Float::integer_decode(multiplier);
    let product = root * BigUint::from(mantissa);
    let shift = i64::from(exponent) - FRACTION_BITS as i64;
    Ok(if shift >= 0 {
        product << shift as usize
    } else {
        product >> shift.unsigned_abs() as usize
    })
}
