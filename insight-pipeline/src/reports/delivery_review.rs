use insight_metrics::stats::{linear_fit, mean, pearson};

use crate::order_loader::OrderRecord;
use crate::types::{DeliveryBucketRow, DeliveryReviewSummary};

/// Fast-delivery cutoff in days, also the first bucket's upper edge.
const FAST_DAYS: f64 = 7.0;

/// Delivery-duration bucket labels and upper edges in days. The last
/// bucket is open-ended.
const BUCKETS: [(&str, f64); 4] = [
    ("Fast (<=7 days)", 7.0),
    ("Normal (8-14 days)", 14.0),
    ("Slow (15-21 days)", 21.0),
    ("Very Slow (>21 days)", f64::INFINITY),
];

fn bucket_index(days: f64) -> usize {
    BUCKETS
        .iter()
        .position(|&(_, edge)| days <= edge)
        .unwrap_or(BUCKETS.len() - 1)
}

/// Delivery duration vs. review score, over orders carrying both fields:
/// Pearson correlation, least-squares trend line, fixed duration buckets
/// with mean scores, and the share of fast deliveries.
pub fn delivery_review(orders: &[OrderRecord]) -> DeliveryReviewSummary {
    let paired: Vec<(f64, f64)> = orders
        .iter()
        .filter_map(|o| match (o.delivery_days, o.review_score) {
            (Some(days), Some(score)) => Some((days, score)),
            _ => None,
        })
        .collect();

    let days: Vec<f64> = paired.iter().map(|(d, _)| *d).collect();
    let scores: Vec<f64> = paired.iter().map(|(_, s)| *s).collect();

    let mut bucket_counts = [0usize; 4];
    let mut bucket_scores = [0.0f64; 4];
    for &(d, s) in &paired {
        let idx = bucket_index(d);
        bucket_counts[idx] += 1;
        bucket_scores[idx] += s;
    }

    let buckets = BUCKETS
        .iter()
        .enumerate()
        .map(|(i, &(label, _))| DeliveryBucketRow {
            label,
            order_count: bucket_counts[i],
            mean_review_score: if bucket_counts[i] > 0 {
                Some(bucket_scores[i] / bucket_counts[i] as f64)
            } else {
                None
            },
        })
        .collect();

    let fast = paired.iter().filter(|(d, _)| *d <= FAST_DAYS).count();
    let fast_share_pct = if paired.is_empty() {
        0.0
    } else {
        fast as f64 / paired.len() as f64 * 100.0
    };

    DeliveryReviewSummary {
        correlation: pearson(&days, &scores),
        regression: linear_fit(&days, &scores),
        buckets,
        mean_delivery_days: mean(&days),
        mean_review_score: mean(&scores),
        fast_share_pct,
        paired_orders: paired.len(),
    }
}
