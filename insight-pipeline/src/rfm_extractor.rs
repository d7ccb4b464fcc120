//! Per-customer RFM metric extraction.
//!
//! Computes Recency / Frequency / Monetary for every distinct customer
//! from order-level records. The reference date is the maximum purchase
//! timestamp across the dataset, never the wall clock, so a fixed
//! snapshot always produces identical profiles.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::order_loader::OrderRecord;
use crate::types::CustomerProfile;

/// The dataset's newest purchase timestamp, if any orders exist.
pub fn reference_date(orders: &[OrderRecord]) -> Option<NaiveDateTime> {
    orders.iter().map(|o| o.purchased_at).max()
}

/// Extract one profile per distinct customer.
///
/// - recency = whole days between the reference date and the customer's
///   latest order (0 for the customer who placed the newest order),
/// - frequency = the customer's order count,
/// - monetary = the customer's revenue sum.
///
/// Output is sorted by customer id for determinism. Returns an empty
/// vector for an empty input.
pub fn extract_profiles(orders: &[OrderRecord]) -> Vec<CustomerProfile> {
    let Some(reference) = reference_date(orders) else {
        return Vec::new();
    };

    struct Acc {
        latest: NaiveDateTime,
        count: u64,
        total: f64,
    }

    let mut per_customer: HashMap<&str, Acc> = HashMap::new();
    for order in orders {
        per_customer
            .entry(order.customer_id.as_str())
            .and_modify(|acc| {
                acc.latest = acc.latest.max(order.purchased_at);
                acc.count += 1;
                acc.total += order.revenue;
            })
            .or_insert(Acc {
                latest: order.purchased_at,
                count: 1,
                total: order.revenue,
            });
    }

    let mut profiles: Vec<CustomerProfile> = per_customer
        .into_iter()
        .map(|(customer_id, acc)| CustomerProfile {
            customer_id: customer_id.to_string(),
            recency_days: (reference - acc.latest).num_days(),
            frequency: acc.count,
            monetary: acc.total,
            ..CustomerProfile::default()
        })
        .collect();
    profiles.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));
    profiles
}
