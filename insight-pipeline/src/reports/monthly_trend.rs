use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use insight_metrics::series::{moving_average, pct_change};

use crate::order_loader::OrderRecord;
use crate::types::MonthlyTrendRow;

/// Window length for the trailing moving averages.
const MA_WINDOW: usize = 3;

/// Group orders by calendar month: distinct order counts, revenue sums,
/// trailing 3-month moving averages for both series, and month-over-month
/// revenue growth. Rows come out chronologically sorted; the first two
/// months have no defined moving average and the first none for growth.
pub fn monthly_trend(orders: &[OrderRecord]) -> Vec<MonthlyTrendRow> {
    struct MonthAcc<'a> {
        order_ids: HashSet<&'a str>,
        revenue: f64,
    }

    let mut months: BTreeMap<(i32, u32), MonthAcc<'_>> = BTreeMap::new();
    for order in orders {
        let key = (order.purchased_at.year(), order.purchased_at.month());
        let acc = months.entry(key).or_insert(MonthAcc {
            order_ids: HashSet::new(),
            revenue: 0.0,
        });
        acc.order_ids.insert(order.order_id.as_str());
        acc.revenue += order.revenue;
    }

    let keys: Vec<(i32, u32)> = months.keys().cloned().collect();
    let order_counts: Vec<f64> = months.values().map(|a| a.order_ids.len() as f64).collect();
    let revenues: Vec<f64> = months.values().map(|a| a.revenue).collect();

    let orders_ma = moving_average(&order_counts, MA_WINDOW);
    let revenue_ma = moving_average(&revenues, MA_WINDOW);
    let growth = pct_change(&revenues);

    keys.iter()
        .enumerate()
        .map(|(i, (year, month))| MonthlyTrendRow {
            year_month: format!("{:04}-{:02}", year, month),
            total_orders: order_counts[i] as usize,
            total_revenue: revenues[i],
            orders_ma3: orders_ma[i],
            revenue_ma3: revenue_ma[i],
            revenue_growth_pct: growth[i],
        })
        .collect()
}
