use std::cmp::Ordering;

use insight_metrics::quantile::{band_for_rank, is_degenerate, middle_band};

use crate::scorer::Scorer;
use crate::types::{CustomerProfile, ReportQuery};

/// Valid quantile band counts. Two is the coarsest split that still
/// orders customers; beyond nine the bands stop being readable.
const BAND_RANGE: std::ops::RangeInclusive<u8> = 2..=9;

/// Assigns quantile bands across the full candidate population.
///
/// Each dimension is banded independently: (value, customer_id) pairs
/// are stable-sorted ascending and the element at rank i receives
/// band = min(k, ⌊k·i/(n−1)⌋ + 1). Recency enters negated, so band k
/// always means "most recently active". A dimension with no variance
/// collapses to the middle band for every customer instead of dividing
/// by zero.
///
/// The composite `rfm_score` is the sum of the three bands.
pub struct QuantileBandScorer;

impl Scorer<ReportQuery, CustomerProfile> for QuantileBandScorer {
    fn score(
        &self,
        query: &ReportQuery,
        candidates: &[CustomerProfile],
    ) -> Result<Vec<CustomerProfile>, String> {
        let k = query.bands;
        if !BAND_RANGE.contains(&k) {
            return Err(format!("band count {} outside {:?}", k, BAND_RANGE));
        }

        // Low raw recency is desirable; banding the negated value flips
        // the scale without disturbing the middle-band fallback.
        let recency = band_dimension(candidates, k, |c| -(c.recency_days as f64));
        let frequency = band_dimension(candidates, k, |c| c.frequency as f64);
        let monetary = band_dimension(candidates, k, |c| c.monetary);

        let scored = candidates
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let r = recency[i];
                let f = frequency[i];
                let m = monetary[i];
                CustomerProfile {
                    r_band: Some(r),
                    f_band: Some(f),
                    m_band: Some(m),
                    rfm_score: Some((r + f + m) as f64),
                    ..CustomerProfile::default()
                }
            })
            .collect();

        Ok(scored)
    }

    fn update(&self, candidate: &mut CustomerProfile, scored: CustomerProfile) {
        candidate.r_band = scored.r_band;
        candidate.f_band = scored.f_band;
        candidate.m_band = scored.m_band;
        candidate.rfm_score = scored.rfm_score;
    }
}

/// Band one dimension across the population, index-aligned with the
/// candidate slice.
fn band_dimension<V>(candidates: &[CustomerProfile], k: u8, value: V) -> Vec<u8>
where
    V: Fn(&CustomerProfile) -> f64,
{
    let n = candidates.len();
    let values: Vec<f64> = candidates.iter().map(&value).collect();

    if is_degenerate(&values) {
        log::debug!("degenerate dimension, assigning middle band {} to all", middle_band(k));
        return vec![middle_band(k); n];
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
            .then_with(|| candidates[a].customer_id.cmp(&candidates[b].customer_id))
    });

    let mut bands = vec![0u8; n];
    for (rank, &idx) in order.iter().enumerate() {
        bands[idx] = band_for_rank(rank, n, k);
    }
    bands
}
