//! CSV order data loader.
//!
//! Parses order-level CSV exports into `OrderRecord` structs. Expected
//! CSV columns:
//!   order_id, customer_unique_id, order_purchase_timestamp, revenue,
//!   payment_type, review_score, delivery_days, product_category
//!
//! `review_score`, `delivery_days` and `product_category` may be empty;
//! the analytics that need them skip rows without them. Rows that fail a
//! field constraint are dropped and counted, never fatal; only a
//! missing file or a fully empty result halts the run.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{InsightError, InsightResult, RecordRejection, RejectReason};

/// Payment label used when the export left the column blank.
const UNKNOWN_PAYMENT: &str = "not_defined";

/// Rejections retained verbatim for diagnostics; the rest only count.
const MAX_KEPT_REJECTIONS: usize = 20;

/// A raw CSV row before validation. Numeric optionals deserialize to
/// `None` on empty fields; everything else is validated in `validate`.
#[derive(Debug, Clone, Deserialize)]
struct RawOrderRow {
    order_id: String,
    customer_unique_id: String,
    order_purchase_timestamp: String,
    revenue: f64,
    #[serde(default)]
    payment_type: String,
    #[serde(default)]
    review_score: Option<f64>,
    #[serde(default)]
    delivery_days: Option<f64>,
    #[serde(default)]
    product_category: Option<String>,
}

/// A validated order record, one per order.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub purchased_at: NaiveDateTime,
    pub revenue: f64,
    pub payment_type: String,
    pub review_score: Option<f64>,
    pub delivery_days: Option<f64>,
    pub product_category: Option<String>,
}

/// Outcome of a load: validated orders plus rejection accounting.
#[derive(Debug)]
pub struct LoadReport {
    pub orders: Vec<OrderRecord>,
    /// Total rows dropped for any reason.
    pub dropped: usize,
    /// First rejections in input order, capped at `MAX_KEPT_REJECTIONS`.
    pub rejections: Vec<RecordRejection>,
}

/// Parse an order timestamp. Accepts `%Y-%m-%d %H:%M:%S`,
/// `%Y-%m-%dT%H:%M:%S`, and bare dates (midnight assumed).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn validate(raw: RawOrderRow, line: usize) -> Result<OrderRecord, RecordRejection> {
    let reject = |reason| RecordRejection { line, reason };

    if raw.order_id.trim().is_empty() {
        return Err(reject(RejectReason::MissingField("order_id")));
    }
    if raw.customer_unique_id.trim().is_empty() {
        return Err(reject(RejectReason::MissingField("customer_unique_id")));
    }

    let purchased_at = parse_timestamp(&raw.order_purchase_timestamp).ok_or_else(|| {
        reject(RejectReason::UnparseableTimestamp(
            raw.order_purchase_timestamp.clone(),
        ))
    })?;

    if !raw.revenue.is_finite() || raw.revenue < 0.0 {
        return Err(reject(RejectReason::InvalidRevenue(raw.revenue)));
    }
    if let Some(score) = raw.review_score {
        if !(1.0..=5.0).contains(&score) {
            return Err(reject(RejectReason::ReviewOutOfRange(score)));
        }
    }
    if let Some(days) = raw.delivery_days {
        if days < 0.0 {
            return Err(reject(RejectReason::NegativeDeliveryDays(days)));
        }
    }

    let payment_type = if raw.payment_type.trim().is_empty() {
        UNKNOWN_PAYMENT.to_string()
    } else {
        raw.payment_type.trim().to_string()
    };

    let product_category = raw
        .product_category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(OrderRecord {
        order_id: raw.order_id.trim().to_string(),
        customer_id: raw.customer_unique_id.trim().to_string(),
        purchased_at,
        revenue: raw.revenue,
        payment_type,
        review_score: raw.review_score,
        delivery_days: raw.delivery_days,
        product_category,
    })
}

/// Load order records from a CSV reader, dropping invalid rows.
pub fn load_orders<R: Read>(reader: R) -> InsightResult<LoadReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut orders = Vec::new();
    let mut rejections = Vec::new();
    let mut dropped = 0usize;

    for (idx, result) in csv_reader.deserialize::<RawOrderRow>().enumerate() {
        // Header occupies line 1; data rows start at line 2.
        let line = idx + 2;
        let outcome = match result {
            Ok(raw) => validate(raw, line),
            Err(e) => Err(RecordRejection {
                line,
                reason: RejectReason::Malformed(e.to_string()),
            }),
        };
        match outcome {
            Ok(record) => orders.push(record),
            Err(rejection) => {
                dropped += 1;
                if rejections.len() < MAX_KEPT_REJECTIONS {
                    log::warn!("dropping order row: {}", rejection);
                    rejections.push(rejection);
                }
            }
        }
    }

    if dropped > 0 {
        log::warn!("dropped {} invalid order rows", dropped);
    }
    if orders.is_empty() {
        return Err(InsightError::EmptyInput { dropped });
    }

    Ok(LoadReport {
        orders,
        dropped,
        rejections,
    })
}

/// Load order records from a CSV file path.
pub fn load_orders_file(path: &str) -> InsightResult<LoadReport> {
    let file = std::fs::File::open(path).map_err(|e| InsightError::MissingInput {
        path: path.to_string(),
        source: e,
    })?;
    load_orders(file)
}
