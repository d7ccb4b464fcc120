//! Customer segment classification from RFM bands.
//!
//! Maps each customer's (recency, frequency, monetary) band triple onto
//! a named behavioral segment through an ordered rule table; the first
//! matching rule wins. The table is total over [1, k]³ (every triple
//! classifies) and pure, so reclassifying the same bands always yields
//! the same segment.
//!
//! Also hosts the segment aggregator, which rolls classified profiles
//! up into one summary row per segment.

use std::collections::HashMap;

use crate::types::{CustomerProfile, Segment, SegmentSummary};

// ---------------------------------------------------------------------------
// Band cut points
// ---------------------------------------------------------------------------

/// Cut points splitting the 1..=k band range into low / mid / high.
///
/// `high` is the lowest band treated as "high", `low` the highest band
/// treated as "low". Derived as high = ⌈3k/4⌉ and low = max(1, ⌊k/4⌋):
/// for k=4 that is high=3, low=1; for k=5, high=4, low=1.
#[derive(Clone, Copy, Debug)]
pub struct BandCuts {
    pub high: u8,
    pub low: u8,
}

impl BandCuts {
    /// Derive cut points from the band count.
    pub fn for_bands(k: u8) -> Self {
        let high = ((3 * k as u16).div_ceil(4)) as u8;
        let low = (k / 4).max(1);
        Self { high, low }
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Classify one band triple.
///
/// Rules, evaluated top to bottom:
/// 1. high r, high f, high m            → Champions
/// 2. high r and (high f or high m)     → Loyal Customers
/// 3. high r                            → Promising
/// 4. low r and (high f or high m)      → At Risk
/// 5. low r                             → Lost
/// 6. mid r and (high f or high m)      → Loyal Customers
/// 7. everything else                   → Needs Attention
pub fn classify_bands(r: u8, f: u8, m: u8, cuts: BandCuts) -> Segment {
    let BandCuts { high, low } = cuts;
    let high_value = f >= high || m >= high;

    if r >= high && f >= high && m >= high {
        return Segment::Champions;
    }
    if r >= high && high_value {
        return Segment::LoyalCustomers;
    }
    if r >= high {
        return Segment::Promising;
    }
    if r <= low && high_value {
        return Segment::AtRisk;
    }
    if r <= low {
        return Segment::Lost;
    }
    if high_value {
        return Segment::LoyalCustomers;
    }
    Segment::NeedsAttention
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Roll classified profiles up into one row per segment present.
///
/// Means are population means (denominator is the group size). Rows are
/// sorted by descending customer count, ties broken by segment label
/// ascending. Profiles that never received a segment are skipped; with
/// the classifier being total that only happens if the scorer never ran.
pub fn segment_summary(profiles: &[CustomerProfile]) -> Vec<SegmentSummary> {
    struct Acc {
        count: usize,
        recency: f64,
        frequency: f64,
        monetary: f64,
    }

    let mut groups: HashMap<Segment, Acc> = HashMap::new();
    for profile in profiles {
        let Some(segment) = profile.segment else {
            continue;
        };
        let acc = groups.entry(segment).or_insert(Acc {
            count: 0,
            recency: 0.0,
            frequency: 0.0,
            monetary: 0.0,
        });
        acc.count += 1;
        acc.recency += profile.recency_days as f64;
        acc.frequency += profile.frequency as f64;
        acc.monetary += profile.monetary;
    }

    let total: usize = groups.values().map(|a| a.count).sum();
    let mut rows: Vec<SegmentSummary> = groups
        .into_iter()
        .map(|(segment, acc)| {
            let n = acc.count as f64;
            SegmentSummary {
                segment,
                customer_count: acc.count,
                mean_recency: acc.recency / n,
                mean_frequency: acc.frequency / n,
                mean_monetary: acc.monetary / n,
                share_pct: acc.count as f64 / total as f64 * 100.0,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.customer_count
            .cmp(&a.customer_count)
            .then_with(|| a.segment.label().cmp(b.segment.label()))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, recency: i64, frequency: u64, monetary: f64) -> CustomerProfile {
        CustomerProfile {
            customer_id: id.to_string(),
            recency_days: recency,
            frequency,
            monetary,
            ..CustomerProfile::default()
        }
    }

    #[test]
    fn cut_points_for_common_band_counts() {
        let quartiles = BandCuts::for_bands(4);
        assert_eq!(quartiles.high, 3);
        assert_eq!(quartiles.low, 1);

        let quintiles = BandCuts::for_bands(5);
        assert_eq!(quintiles.high, 4);
        assert_eq!(quintiles.low, 1);
    }

    #[test]
    fn classification_is_total_and_idempotent() {
        for k in [4u8, 5u8] {
            let cuts = BandCuts::for_bands(k);
            for r in 1..=k {
                for f in 1..=k {
                    for m in 1..=k {
                        let first = classify_bands(r, f, m, cuts);
                        let second = classify_bands(r, f, m, cuts);
                        assert_eq!(
                            first, second,
                            "triple ({},{},{}) reclassified differently",
                            r, f, m
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn representative_triples_for_quartiles() {
        let cuts = BandCuts::for_bands(4);
        assert_eq!(classify_bands(4, 4, 4, cuts), Segment::Champions);
        assert_eq!(classify_bands(3, 3, 3, cuts), Segment::Champions);
        assert_eq!(classify_bands(4, 4, 1, cuts), Segment::LoyalCustomers);
        assert_eq!(classify_bands(4, 1, 1, cuts), Segment::Promising);
        assert_eq!(classify_bands(2, 2, 2, cuts), Segment::NeedsAttention);
        assert_eq!(classify_bands(1, 4, 2, cuts), Segment::AtRisk);
        assert_eq!(classify_bands(1, 1, 1, cuts), Segment::Lost);
        assert_eq!(classify_bands(2, 4, 1, cuts), Segment::LoyalCustomers);
    }

    #[test]
    fn better_recency_never_yields_a_worse_tier_at_top_bands() {
        // With identical f/m, a high-recency customer lands in a
        // recent-facing segment while a low-recency one lands in a
        // lapsed-facing segment.
        let cuts = BandCuts::for_bands(4);
        let recent = classify_bands(4, 4, 4, cuts);
        let lapsed = classify_bands(1, 4, 4, cuts);
        assert_eq!(recent, Segment::Champions);
        assert_eq!(lapsed, Segment::AtRisk);
    }

    #[test]
    fn summary_counts_sum_to_total_customers() {
        let mut profiles = vec![
            profile("a", 2, 8, 900.0),
            profile("b", 40, 2, 150.0),
            profile("c", 200, 1, 40.0),
            profile("d", 210, 1, 35.0),
            profile("e", 10, 5, 700.0),
        ];
        let cuts = BandCuts::for_bands(4);
        // Hand-assign bands so the test controls the segments.
        let bands = [(4, 4, 4), (2, 2, 2), (1, 1, 1), (1, 1, 1), (3, 3, 3)];
        for (p, (r, f, m)) in profiles.iter_mut().zip(bands) {
            p.r_band = Some(r);
            p.f_band = Some(f);
            p.m_band = Some(m);
            p.segment = Some(classify_bands(r, f, m, cuts));
        }

        let summary = segment_summary(&profiles);
        let counted: usize = summary.iter().map(|s| s.customer_count).sum();
        assert_eq!(counted, profiles.len());

        let share: f64 = summary.iter().map(|s| s.share_pct).sum();
        assert!((share - 100.0).abs() < 0.1);
    }

    #[test]
    fn summary_sorted_by_count_then_label() {
        let mut profiles = vec![
            profile("a", 1, 1, 1.0),
            profile("b", 1, 1, 1.0),
            profile("c", 1, 1, 1.0),
            profile("d", 1, 1, 1.0),
        ];
        profiles[0].segment = Some(Segment::Lost);
        profiles[1].segment = Some(Segment::Lost);
        profiles[2].segment = Some(Segment::AtRisk);
        profiles[3].segment = Some(Segment::Champions);

        let summary = segment_summary(&profiles);
        assert_eq!(summary[0].segment, Segment::Lost);
        // One-customer groups tie on count; "At Risk" < "Champions".
        assert_eq!(summary[1].segment, Segment::AtRisk);
        assert_eq!(summary[2].segment, Segment::Champions);
    }

    #[test]
    fn summary_means_are_population_means() {
        let mut profiles = vec![profile("a", 10, 2, 100.0), profile("b", 20, 4, 300.0)];
        profiles[0].segment = Some(Segment::Champions);
        profiles[1].segment = Some(Segment::Champions);

        let summary = segment_summary(&profiles);
        assert_eq!(summary.len(), 1);
        assert!((summary[0].mean_recency - 15.0).abs() < 1e-9);
        assert!((summary[0].mean_frequency - 3.0).abs() < 1e-9);
        assert!((summary[0].mean_monetary - 200.0).abs() < 1e-9);
    }
}
