use std::time::Duration;

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Number of quantization steps per whole win unit (one decimal place).
pub(crate) const TENTHS_PER_UNIT: u64 = 10;

/// Derives the RNG seed for shard `index` from the run's base seed.
///
/// The derivation is a pure function of its inputs, so a seeded run fills
/// every shard identically no matter which thread fills it.
pub(crate) fn shard_seed(base_seed: u64, index: usize) -> u64 {
    xxh3_64_with_seed(&(index as u64).to_le_bytes(), base_seed)
}

/// Quantizes `amount` to whole tenths, rounding half away from zero.
///
/// Returns `None` for negative or non-finite amounts and for amounts whose
/// tenths do not fit in a `u64` (about `1.8e18` and above).
pub(crate) fn quantize_tenths(amount: f64) -> Option<u64> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let scaled = (amount * TENTHS_PER_UNIT as f64).round();
    // u64::MAX as f64 is 2^64, the first value that no longer fits.
    if scaled >= u64::MAX as f64 {
        return None;
    }
    Some(scaled as u64)
}

/// Integer division of `numerator` by `denominator`, rounded half away from
/// zero. `denominator` must be non-zero.
pub(crate) fn div_round_half_up(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder >= denominator - remainder {
        quotient + 1
    } else {
        quotient
    }
}

/// `numerator * scale / denominator`, rounded half away from zero and
/// saturating at `u128::MAX` instead of overflowing.
pub(crate) fn scaled_div_round(numerator: u128, scale: u128, denominator: u128) -> u128 {
    let whole = (numerator / denominator).saturating_mul(scale);
    let remainder = numerator % denominator;
    let fraction = match remainder.checked_mul(scale) {
        Some(scaled) => div_round_half_up(scaled, denominator),
        None => remainder / (denominator / scale),
    };
    whole.saturating_add(fraction)
}

/// `observed` equals `expected` or deviates from it by strictly less than
/// `expected * tolerance`. Nothing but an exact match passes when `expected`
/// is 0.
pub(crate) fn within_tolerance(observed: u64, expected: f64, tolerance: f64) -> bool {
    let observed = observed as f64;
    observed == expected || (observed - expected).abs() < expected * tolerance
}

/// Whole milliseconds of `elapsed`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
