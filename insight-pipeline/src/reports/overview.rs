use std::collections::HashSet;

use insight_metrics::stats::mean;

use crate::order_loader::OrderRecord;
use crate::types::OverviewKpis;

/// Headline KPI block: totals, distinct counts, and global means.
pub fn overview(orders: &[OrderRecord]) -> OverviewKpis {
    let total_revenue: f64 = orders.iter().map(|o| o.revenue).sum();
    let total_orders = orders
        .iter()
        .map(|o| o.order_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let total_customers = orders
        .iter()
        .map(|o| o.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let reviews: Vec<f64> = orders.iter().filter_map(|o| o.review_score).collect();
    let deliveries: Vec<f64> = orders.iter().filter_map(|o| o.delivery_days).collect();

    let avg_ticket = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };

    OverviewKpis {
        total_revenue,
        total_orders,
        total_customers,
        avg_review_score: mean(&reviews),
        avg_delivery_days: mean(&deliveries),
        avg_ticket,
    }
}
