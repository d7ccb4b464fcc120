use std::collections::{HashMap, HashSet};

use crate::order_loader::OrderRecord;
use crate::types::CategoryRevenueRow;

/// Per-category revenue totals over rows that carry a product category.
/// Rows without one contribute nothing. Sorted by descending revenue,
/// ties broken by category name ascending.
pub fn category_revenue(orders: &[OrderRecord]) -> Vec<CategoryRevenueRow> {
    struct Acc<'a> {
        revenue: f64,
        order_ids: HashSet<&'a str>,
    }

    let mut groups: HashMap<&str, Acc<'_>> = HashMap::new();
    for order in orders {
        let Some(category) = order.product_category.as_deref() else {
            continue;
        };
        let acc = groups.entry(category).or_insert(Acc {
            revenue: 0.0,
            order_ids: HashSet::new(),
        });
        acc.revenue += order.revenue;
        acc.order_ids.insert(order.order_id.as_str());
    }

    let mut rows: Vec<CategoryRevenueRow> = groups
        .into_iter()
        .map(|(category, acc)| {
            let total_orders = acc.order_ids.len();
            CategoryRevenueRow {
                category: category.to_string(),
                total_revenue: acc.revenue,
                total_orders,
                avg_revenue_per_order: acc.revenue / total_orders as f64,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_revenue
            .partial_cmp(&a.total_revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}
