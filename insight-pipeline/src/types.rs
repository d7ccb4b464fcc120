//! Core query, candidate, and output-table types.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::candidate_pipeline::HasRequestId;

/// Default quantile band count per RFM dimension (quartiles).
pub const DEFAULT_BANDS: u8 = 4;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Inclusive date window over order purchase dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Parameters for one analytics run.
///
/// The explicit successor to the source material's implicit globals:
/// everything that shapes a run travels in this struct.
#[derive(Clone, Debug)]
pub struct ReportQuery {
    pub request_id: String,
    /// Purchase-date window; `None` means "whole dataset" and is filled
    /// in by the date-range query hydrator.
    pub window: Option<DateWindow>,
    /// Quantile band count `k` per RFM dimension, in 2..=9.
    pub bands: u8,
}

impl ReportQuery {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            window: None,
            bands: DEFAULT_BANDS,
        }
    }
}

impl HasRequestId for ReportQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// A customer's behavioral segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Segment {
    Champions,
    LoyalCustomers,
    Promising,
    NeedsAttention,
    AtRisk,
    Lost,
}

impl Segment {
    /// All segments, for exhaustive iteration in tests and displays.
    pub const ALL: [Segment; 6] = [
        Segment::Champions,
        Segment::LoyalCustomers,
        Segment::Promising,
        Segment::NeedsAttention,
        Segment::AtRisk,
        Segment::Lost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Segment::Champions => "Champions",
            Segment::LoyalCustomers => "Loyal Customers",
            Segment::Promising => "Promising",
            Segment::NeedsAttention => "Needs Attention",
            Segment::AtRisk => "At Risk",
            Segment::Lost => "Lost",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A per-customer RFM profile flowing through the pipeline.
///
/// Raw metrics come from the extractor; the band and score fields are
/// populated by the quantile band scorer, the segment by the segment
/// hydrator.
#[derive(Clone, Debug, Serialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    /// Whole days since the customer's latest order, relative to the
    /// dataset's newest order. Always ≥ 0.
    pub recency_days: i64,
    /// Distinct orders placed. Always ≥ 1.
    pub frequency: u64,
    /// Total revenue across the customer's orders. Always ≥ 0.
    pub monetary: f64,

    // Scoring fields (populated by the quantile band scorer)
    pub r_band: Option<u8>,
    pub f_band: Option<u8>,
    pub m_band: Option<u8>,
    /// Composite score: sum of the three bands.
    pub rfm_score: Option<f64>,

    // Populated by the segment hydrator
    pub segment: Option<Segment>,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            recency_days: 0,
            frequency: 1,
            monetary: 0.0,
            r_band: None,
            f_band: None,
            m_band: None,
            rfm_score: None,
            segment: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Output tables
// ---------------------------------------------------------------------------

/// One aggregated row per segment present in the population.
#[derive(Clone, Debug, Serialize)]
pub struct SegmentSummary {
    pub segment: Segment,
    pub customer_count: usize,
    pub mean_recency: f64,
    pub mean_frequency: f64,
    pub mean_monetary: f64,
    /// Share of all classified customers, in percent.
    pub share_pct: f64,
}

/// One calendar month of order activity.
#[derive(Clone, Debug, Serialize)]
pub struct MonthlyTrendRow {
    /// "YYYY-MM".
    pub year_month: String,
    pub total_orders: usize,
    pub total_revenue: f64,
    /// Trailing 3-month moving averages; absent for the first two months.
    pub orders_ma3: Option<f64>,
    pub revenue_ma3: Option<f64>,
    /// Month-over-month revenue growth in percent; absent for month one.
    pub revenue_growth_pct: Option<f64>,
}

/// One payment method's transaction summary.
#[derive(Clone, Debug, Serialize)]
pub struct PaymentSummaryRow {
    pub payment_type: String,
    pub count: usize,
    pub avg_value: f64,
    pub total_value: f64,
    /// Share of all transactions, in percent.
    pub share_pct: f64,
}

/// Mean satisfaction within one delivery-duration bucket.
#[derive(Clone, Debug, Serialize)]
pub struct DeliveryBucketRow {
    pub label: &'static str,
    pub order_count: usize,
    pub mean_review_score: Option<f64>,
}

/// Delivery-duration vs. review-score analysis over orders carrying both
/// fields.
#[derive(Clone, Debug, Serialize)]
pub struct DeliveryReviewSummary {
    /// Pearson correlation between delivery days and review score.
    pub correlation: Option<f64>,
    /// Least-squares trend line (slope, intercept) of score over days.
    pub regression: Option<(f64, f64)>,
    pub buckets: Vec<DeliveryBucketRow>,
    pub mean_delivery_days: Option<f64>,
    pub mean_review_score: Option<f64>,
    /// Percent of orders delivered within seven days.
    pub fast_share_pct: f64,
    /// Orders that carried both fields and entered the analysis.
    pub paired_orders: usize,
}

/// One product category's revenue summary.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryRevenueRow {
    pub category: String,
    pub total_revenue: f64,
    pub total_orders: usize,
    pub avg_revenue_per_order: f64,
}

/// Headline KPI block.
#[derive(Clone, Debug, Serialize)]
pub struct OverviewKpis {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub total_customers: usize,
    pub avg_review_score: Option<f64>,
    pub avg_delivery_days: Option<f64>,
    /// Mean revenue per order.
    pub avg_ticket: f64,
}
