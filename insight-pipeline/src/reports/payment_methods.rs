use std::collections::HashMap;

use crate::order_loader::OrderRecord;
use crate::types::PaymentSummaryRow;

/// Group transactions by payment type: count, mean value, total value,
/// and each type's share of the transaction count. Rows are sorted by
/// descending count, ties broken by type name ascending.
pub fn payment_methods(orders: &[OrderRecord]) -> Vec<PaymentSummaryRow> {
    let mut groups: HashMap<&str, (usize, f64)> = HashMap::new();
    for order in orders {
        let entry = groups.entry(order.payment_type.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += order.revenue;
    }

    let total_tx: usize = groups.values().map(|(count, _)| count).sum();
    let mut rows: Vec<PaymentSummaryRow> = groups
        .into_iter()
        .map(|(payment_type, (count, total_value))| PaymentSummaryRow {
            payment_type: payment_type.to_string(),
            count,
            avg_value: total_value / count as f64,
            total_value,
            share_pct: count as f64 / total_tx as f64 * 100.0,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.payment_type.cmp(&b.payment_type))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(payment: &str, revenue: f64) -> OrderRecord {
        OrderRecord {
            order_id: format!("{}-{}", payment, revenue),
            customer_id: "cust".into(),
            purchased_at: NaiveDate::from_ymd_opt(2018, 5, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            revenue,
            payment_type: payment.to_string(),
            review_score: None,
            delivery_days: None,
            product_category: None,
        }
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let rows = payment_methods(&[
            order("credit_card", 120.0),
            order("credit_card", 80.0),
            order("boleto", 60.0),
            order("voucher", 20.0),
            order("debit_card", 45.0),
            order("credit_card", 200.0),
            order("boleto", 90.0),
        ]);
        let total_share: f64 = rows.iter().map(|r| r.share_pct).sum();
        assert!((total_share - 100.0).abs() < 0.1);
    }

    #[test]
    fn dominant_method_comes_first() {
        let rows = payment_methods(&[
            order("boleto", 60.0),
            order("credit_card", 120.0),
            order("credit_card", 80.0),
        ]);
        assert_eq!(rows[0].payment_type, "credit_card");
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].avg_value - 100.0).abs() < 1e-9);
        assert!((rows[0].total_value - 200.0).abs() < 1e-9);
    }

    #[test]
    fn equal_counts_order_by_name() {
        let rows = payment_methods(&[order("voucher", 10.0), order("boleto", 10.0)]);
        assert_eq!(rows[0].payment_type, "boleto");
        assert_eq!(rows[1].payment_type, "voucher");
    }

    #[test]
    fn no_orders_means_no_rows() {
        assert!(payment_methods(&[]).is_empty());
    }
}
