use chrono::NaiveDate;

use insight_pipeline::candidate_pipeline::CandidatePipeline;
use insight_pipeline::components::order_metrics_source::OrderMetricsSource;
use insight_pipeline::components::quantile_band_scorer::QuantileBandScorer;
use insight_pipeline::components::rfm_rank_selector::RfmRankSelector;
use insight_pipeline::order_loader::{load_orders, OrderRecord};
use insight_pipeline::pipelines::segmentation::SegmentationPipeline;
use insight_pipeline::scorer::Scorer;
use insight_pipeline::segment_classifier::segment_summary;
use insight_pipeline::selector::Selector;
use insight_pipeline::source::Source;
use insight_pipeline::types::*;

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

fn order(customer: &str, date: &str, revenue: f64) -> OrderRecord {
    OrderRecord {
        order_id: format!("{}-{}", customer, date),
        customer_id: customer.to_string(),
        purchased_at: NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap(),
        revenue,
        payment_type: "credit_card".into(),
        review_score: None,
        delivery_days: None,
        product_category: None,
    }
}

/// Three customers with clearly separated behavior:
/// - cust-best: five recent orders, R$1000 total (the newest order in
///   the dataset, so recency 0)
/// - cust-mid: three orders, last one a month back, R$500 total
/// - cust-lost: a single small order from half a year ago
fn sample_orders() -> Vec<OrderRecord> {
    vec![
        order("cust-best", "2018-04-02", 150.0),
        order("cust-best", "2018-05-11", 200.0),
        order("cust-best", "2018-06-20", 250.0),
        order("cust-best", "2018-07-30", 150.0),
        order("cust-best", "2018-08-31", 250.0),
        order("cust-mid", "2018-03-15", 100.0),
        order("cust-mid", "2018-06-10", 150.0),
        order("cust-mid", "2018-08-01", 250.0),
        order("cust-lost", "2018-02-12", 50.0),
    ]
}

fn make_query() -> ReportQuery {
    ReportQuery::new("test-001")
}

// ---------------------------------------------------------------------------
// Source tests
// ---------------------------------------------------------------------------

#[test]
fn source_produces_one_profile_per_customer() {
    let source = OrderMetricsSource::new(sample_orders());
    let candidates = source.get_candidates(&make_query()).unwrap();
    assert_eq!(candidates.len(), 3);

    let best = candidates
        .iter()
        .find(|c| c.customer_id == "cust-best")
        .expect("cust-best profile");
    assert_eq!(best.frequency, 5);
    assert_eq!(best.recency_days, 0);
    assert!((best.monetary - 1000.0).abs() < 0.01);
}

#[test]
fn source_disabled_for_empty_data() {
    let source = OrderMetricsSource::new(vec![]);
    assert!(!source.enable(&make_query()));
}

// ---------------------------------------------------------------------------
// Scorer tests
// ---------------------------------------------------------------------------

#[test]
fn scorer_orders_bands_with_customer_quality() {
    let source = OrderMetricsSource::new(sample_orders());
    let query = make_query();
    let mut candidates = source.get_candidates(&query).unwrap();

    let scorer = QuantileBandScorer;
    let scored = scorer.score(&query, &candidates).unwrap();
    for (candidate, partial) in candidates.iter_mut().zip(scored) {
        scorer.update(candidate, partial);
    }

    let best = candidates
        .iter()
        .find(|c| c.customer_id == "cust-best")
        .unwrap();
    let lost = candidates
        .iter()
        .find(|c| c.customer_id == "cust-lost")
        .unwrap();

    assert!(best.r_band.unwrap() > lost.r_band.unwrap());
    assert!(best.f_band.unwrap() > lost.f_band.unwrap());
    assert!(best.m_band.unwrap() > lost.m_band.unwrap());
    assert!(best.rfm_score.unwrap() > lost.rfm_score.unwrap());
}

// ---------------------------------------------------------------------------
// Selector tests
// ---------------------------------------------------------------------------

#[test]
fn selector_ranks_by_composite_score_descending() {
    let selector = RfmRankSelector;
    let query = make_query();
    let candidates = vec![
        CustomerProfile {
            customer_id: "low".into(),
            rfm_score: Some(4.0),
            ..CustomerProfile::default()
        },
        CustomerProfile {
            customer_id: "high".into(),
            rfm_score: Some(11.0),
            ..CustomerProfile::default()
        },
        CustomerProfile {
            customer_id: "mid".into(),
            rfm_score: Some(7.0),
            ..CustomerProfile::default()
        },
    ];
    let selected = selector.select(&query, candidates);
    let ids: Vec<&str> = selected.iter().map(|c| c.customer_id.as_str()).collect();
    assert_eq!(ids, vec!["high", "mid", "low"]);
}

// ---------------------------------------------------------------------------
// Full pipeline integration tests
// ---------------------------------------------------------------------------

#[test]
fn segmentation_pipeline_end_to_end() {
    let pipeline = SegmentationPipeline::with_orders(sample_orders());
    let result = pipeline.execute(make_query());

    assert_eq!(result.retrieved_candidates.len(), 3);
    assert_eq!(result.selected_candidates.len(), 3);
    assert!(result.filtered_candidates.is_empty());

    // The hydrator filled the window from the data span.
    let window = result.query.window.expect("hydrated window");
    assert_eq!(window.from, NaiveDate::from_ymd_opt(2018, 2, 12).unwrap());
    assert_eq!(window.to, NaiveDate::from_ymd_opt(2018, 8, 31).unwrap());

    // Every candidate carries bands, a composite score, and a segment.
    for c in &result.selected_candidates {
        assert!(c.r_band.is_some(), "{} missing r_band", c.customer_id);
        assert!(c.rfm_score.is_some(), "{} missing score", c.customer_id);
        assert!(c.segment.is_some(), "{} missing segment", c.customer_id);
    }

    // Best customer first, lost customer last, strictly ordered.
    assert_eq!(result.selected_candidates[0].customer_id, "cust-best");
    assert_eq!(result.selected_candidates[2].customer_id, "cust-lost");
    assert!(
        result.selected_candidates[0].rfm_score.unwrap()
            > result.selected_candidates[2].rfm_score.unwrap()
    );

    // Segment placement: top customer in a top segment, lapsed
    // single-order customer in a bottom segment.
    let best_segment = result.selected_candidates[0].segment.unwrap();
    assert!(
        matches!(best_segment, Segment::Champions | Segment::LoyalCustomers),
        "best customer landed in {:?}",
        best_segment
    );
    let lost_segment = result.selected_candidates[2].segment.unwrap();
    assert!(
        matches!(lost_segment, Segment::Lost | Segment::AtRisk),
        "lapsed customer landed in {:?}",
        lost_segment
    );
}

#[test]
fn pipeline_respects_explicit_date_window() {
    let pipeline = SegmentationPipeline::with_orders(sample_orders());
    let mut query = make_query();
    // Only cust-lost ordered before March 2018.
    query.window = Some(DateWindow {
        from: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
        to: NaiveDate::from_ymd_opt(2018, 2, 28).unwrap(),
    });
    let result = pipeline.execute(query);
    assert_eq!(result.selected_candidates.len(), 1);
    assert_eq!(result.selected_candidates[0].customer_id, "cust-lost");
}

#[test]
fn aggregated_summary_accounts_for_every_customer() {
    let pipeline = SegmentationPipeline::with_orders(sample_orders());
    let result = pipeline.execute(make_query());

    let summary = segment_summary(&result.selected_candidates);
    let counted: usize = summary.iter().map(|s| s.customer_count).sum();
    assert_eq!(counted, 3);

    let share: f64 = summary.iter().map(|s| s.share_pct).sum();
    assert!((share - 100.0).abs() < 0.1);

    // Sorted by descending count, ties by label.
    for pair in summary.windows(2) {
        assert!(pair[0].customer_count >= pair[1].customer_count);
    }
}

#[test]
fn identical_monetary_values_collapse_to_middle_band() {
    // Same spend everywhere: monetary carries no signal and must not
    // divide by zero.
    let orders = vec![
        order("cust-a", "2018-08-31", 100.0),
        order("cust-b", "2018-07-01", 100.0),
        order("cust-c", "2018-05-01", 100.0),
    ];
    let pipeline = SegmentationPipeline::with_orders(orders);
    let result = pipeline.execute(make_query());
    for c in &result.selected_candidates {
        assert_eq!(c.m_band, Some(2), "customer {}", c.customer_id);
    }
}

// ---------------------------------------------------------------------------
// Loader-to-pipeline integration
// ---------------------------------------------------------------------------

#[test]
fn csv_load_feeds_the_pipeline() {
    let csv_data = "\
order_id,customer_unique_id,order_purchase_timestamp,revenue,payment_type,review_score,delivery_days,product_category
o-1,cust-best,2018-08-31 09:00:00,250.00,credit_card,5,4,health_beauty
o-2,cust-best,2018-07-30 10:00:00,150.00,credit_card,5,6,health_beauty
o-3,cust-lost,2018-02-12 11:00:00,50.00,boleto,2,20,toys
o-4,cust-bad,not-a-timestamp,10.00,boleto,2,20,toys
";
    let report = load_orders(csv_data.as_bytes()).unwrap();
    assert_eq!(report.dropped, 1);
    assert_eq!(report.orders.len(), 3);

    let pipeline = SegmentationPipeline::with_orders(report.orders);
    let result = pipeline.execute(make_query());
    assert_eq!(result.selected_candidates.len(), 2);
    assert_eq!(result.selected_candidates[0].customer_id, "cust-best");
}

// ---------------------------------------------------------------------------
// Types tests
// ---------------------------------------------------------------------------

#[test]
fn customer_profile_default_has_no_derived_fields() {
    let profile = CustomerProfile::default();
    assert!(profile.r_band.is_none());
    assert!(profile.rfm_score.is_none());
    assert!(profile.segment.is_none());
}

#[test]
fn report_query_has_request_id() {
    use insight_pipeline::candidate_pipeline::HasRequestId;
    let query = make_query();
    assert_eq!(query.request_id(), "test-001");
    assert_eq!(query.bands, DEFAULT_BANDS);
}

#[test]
fn segment_labels_are_human_readable() {
    assert_eq!(Segment::LoyalCustomers.to_string(), "Loyal Customers");
    assert_eq!(Segment::NeedsAttention.label(), "Needs Attention");
    assert_eq!(Segment::ALL.len(), 6);
}
