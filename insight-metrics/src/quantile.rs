//! Quantile band assignment.
//!
//! Bands are ordinal buckets 1..=k assigned from a value's percentile
//! rank within its population. The caller sorts the population (stably,
//! with a deterministic tie-break) and feeds each element's rank here.
//! The maximum value always lands in band k, the minimum in band 1.

/// Band for the element at `rank` (0-based) in a population of `n`
/// sorted ascending, split into `k` quantile bands.
///
/// Computed from the percentile rank p = rank / (n - 1):
///   band = min(k, ⌊p · k⌋ + 1)
///
/// Callers must not pass `n < 2`; a population that small has no
/// quantiles and should take [`middle_band`] instead.
pub fn band_for_rank(rank: usize, n: usize, k: u8) -> u8 {
    debug_assert!(n >= 2, "quantile bands need at least two values");
    debug_assert!(rank < n);
    let p = rank as f64 / (n - 1) as f64;
    let band = (p * k as f64).floor() as u8 + 1;
    band.min(k)
}

/// The middle band ⌈k/2⌉, used when a dimension has no variance.
///
/// Every customer sharing a single value carries no ordering signal, so
/// all of them sit in the middle rather than splitting arbitrarily.
pub fn middle_band(k: u8) -> u8 {
    k.div_ceil(2)
}

/// True when the values carry no ordering signal: fewer than two
/// observations, or every observation equal.
pub fn is_degenerate(values: &[f64]) -> bool {
    match values.first() {
        None => true,
        Some(&first) => values.len() < 2 || values.iter().all(|&v| v == first),
    }
}
