use std::env;
use std::process;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use insight_pipeline::candidate_pipeline::CandidatePipeline;
use insight_pipeline::error::InsightError;
use insight_pipeline::order_loader::{load_orders_file, OrderRecord};
use insight_pipeline::pipelines::segmentation::SegmentationPipeline;
use insight_pipeline::reports;
use insight_pipeline::segment_classifier::segment_summary;
use insight_pipeline::types::{
    CategoryRevenueRow, CustomerProfile, DateWindow, DeliveryReviewSummary, MonthlyTrendRow,
    OverviewKpis, PaymentSummaryRow, ReportQuery, SegmentSummary, DEFAULT_BANDS,
};

/// Ranked customers shown in tables and serialized in the digest.
const DEFAULT_TOP: usize = 10;

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DigestJson {
    generated_at: String,
    window: Option<DateWindow>,
    bands: u8,
    records_loaded: usize,
    records_dropped: usize,
    load_ms: u128,
    compute_ms: u128,
    overview: OverviewKpis,
    segments: Vec<SegmentSummary>,
    top_customers: Vec<CustomerJson>,
    monthly_trend: Vec<MonthlyTrendRow>,
    payment_methods: Vec<PaymentSummaryRow>,
    delivery_review: DeliveryReviewSummary,
    category_revenue: Vec<CategoryRevenueRow>,
}

#[derive(Serialize)]
struct CustomerJson {
    customer_id: String,
    recency_days: i64,
    frequency: u64,
    monetary: f64,
    r_band: u8,
    f_band: u8,
    m_band: u8,
    rfm_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment: Option<String>,
}

impl CustomerJson {
    fn from_profile(profile: &CustomerProfile) -> Self {
        Self {
            customer_id: profile.customer_id.clone(),
            recency_days: profile.recency_days,
            frequency: profile.frequency,
            monetary: profile.monetary,
            r_band: profile.r_band.unwrap_or(0),
            f_band: profile.f_band.unwrap_or(0),
            m_band: profile.m_band.unwrap_or(0),
            rfm_score: profile.rfm_score.unwrap_or(0.0),
            segment: profile.segment.map(|s| s.label().to_string()),
        }
    }
}

/// Everything one run computes, handed to both output modes.
struct Digest {
    window: Option<DateWindow>,
    bands: u8,
    records_loaded: usize,
    records_dropped: usize,
    load_ms: u128,
    compute_ms: u128,
    overview: OverviewKpis,
    segments: Vec<SegmentSummary>,
    customers: Vec<CustomerProfile>,
    monthly_trend: Vec<MonthlyTrendRow>,
    payment_methods: Vec<PaymentSummaryRow>,
    delivery_review: DeliveryReviewSummary,
    category_revenue: Vec<CategoryRevenueRow>,
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a count with comma thousands separators.
fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

/// Format a monetary amount: separators on the whole part, two decimals.
fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as usize;
    format!("${}.{:02}", format_count(cents / 100), cents % 100)
}

fn section_header(title: &str) {
    println!();
    println!("  {}", title);
    println!("  {:\u{2500}<64}", "");
}

// ---------------------------------------------------------------------------
// Narrative insights
// ---------------------------------------------------------------------------

fn segment_insight(segments: &[SegmentSummary]) -> String {
    let Some(largest) = segments.first() else {
        return "No classified customers.".into();
    };
    let champions = segments
        .iter()
        .find(|s| s.segment.label() == "Champions")
        .map(|s| s.share_pct)
        .unwrap_or(0.0);
    format!(
        "'{}' is the largest segment at {:.1}% of the base; Champions hold {:.1}%. \
         Lapsed segments respond best to win-back offers, top segments to loyalty perks.",
        largest.segment, largest.share_pct, champions
    )
}

fn trend_insight(trend: &[MonthlyTrendRow]) -> String {
    if trend.len() < 2 {
        return "Not enough months for a trend.".into();
    }
    let first = &trend[0];
    let last = &trend[trend.len() - 1];
    let growth = if first.total_revenue > 0.0 {
        (last.total_revenue - first.total_revenue) / first.total_revenue * 100.0
    } else {
        0.0
    };
    let peak = trend
        .iter()
        .max_by(|a, b| a.total_revenue.partial_cmp(&b.total_revenue).unwrap_or(std::cmp::Ordering::Equal))
        .expect("non-empty trend");
    format!(
        "Revenue moved {:+.0}% from {} to {}; the peak month was {} at {}. \
         The 3-month average smooths one-off spikes out of that reading.",
        growth,
        first.year_month,
        last.year_month,
        peak.year_month,
        format_amount(peak.total_revenue)
    )
}

fn payment_insight(payments: &[PaymentSummaryRow]) -> String {
    let Some(dominant) = payments.first() else {
        return "No transactions.".into();
    };
    format!(
        "'{}' dominates with {:.1}% of transactions (avg {}). \
         Low-share methods mostly serve as discount instruments, not primary payment.",
        dominant.payment_type,
        dominant.share_pct,
        format_amount(dominant.avg_value)
    )
}

fn delivery_insight(summary: &DeliveryReviewSummary) -> String {
    match summary.correlation {
        Some(r) => {
            let strength = if r.abs() >= 0.5 {
                "strong"
            } else if r.abs() >= 0.2 {
                "moderate"
            } else {
                "weak"
            };
            let direction = if r < 0.0 {
                "longer deliveries score lower"
            } else {
                "longer deliveries score higher"
            };
            format!(
                "Delivery time and satisfaction correlate at r = {:.3} ({}, {}); \
                 {:.1}% of orders arrive within a week.",
                r, strength, direction, summary.fast_share_pct
            )
        }
        None => "Too little paired delivery/review data for a correlation.".into(),
    }
}

fn category_insight(categories: &[CategoryRevenueRow]) -> String {
    let Some(top) = categories.first() else {
        return "No categorized orders.".into();
    };
    let total: f64 = categories.iter().map(|c| c.total_revenue).sum();
    let share = if total > 0.0 {
        top.total_revenue / total * 100.0
    } else {
        0.0
    };
    format!(
        "'{}' leads with {} ({:.1}% of categorized revenue). \
         High-order, low-revenue categories point at volume products; the inverse at premium ones.",
        top.category,
        format_amount(top.total_revenue),
        share
    )
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn print_overview(digest: &Digest) {
    section_header("OVERVIEW");
    let kpis = &digest.overview;
    println!("  Total revenue     {}", format_amount(kpis.total_revenue));
    println!("  Total orders      {}", format_count(kpis.total_orders));
    println!("  Unique customers  {}", format_count(kpis.total_customers));
    match kpis.avg_review_score {
        Some(score) => println!("  Avg review score  {:.2} / 5", score),
        None => println!("  Avg review score  n/a"),
    }
    match kpis.avg_delivery_days {
        Some(days) => println!("  Avg delivery      {:.1} days", days),
        None => println!("  Avg delivery      n/a"),
    }
    println!("  Avg ticket        {}", format_amount(kpis.avg_ticket));
}

fn print_segments(digest: &Digest, top: usize) {
    section_header("CUSTOMER SEGMENTS (RFM)");
    println!(
        "  {:<18} {:>10} {:>8} {:>12} {:>10} {:>12}",
        "Segment", "Customers", "Share", "Avg Recency", "Avg Freq", "Avg Spend"
    );
    for row in &digest.segments {
        println!(
            "  {:<18} {:>10} {:>7.1}% {:>10.1}d {:>10.2} {:>12}",
            row.segment.label(),
            format_count(row.customer_count),
            row.share_pct,
            row.mean_recency,
            row.mean_frequency,
            format_amount(row.mean_monetary)
        );
    }
    println!();
    println!("  {}", segment_insight(&digest.segments));

    let shown = digest.customers.iter().take(top);
    println!();
    println!(
        "  Top customers by composite score (R/F/M bands of {}):",
        digest.bands
    );
    for (i, c) in shown.enumerate() {
        println!(
            "  {:>2}. {:<24} {}/{}/{}  score {:>4.1}  {:<16} {}",
            i + 1,
            c.customer_id,
            c.r_band.unwrap_or(0),
            c.f_band.unwrap_or(0),
            c.m_band.unwrap_or(0),
            c.rfm_score.unwrap_or(0.0),
            c.segment.map(|s| s.label()).unwrap_or("unclassified"),
            format_amount(c.monetary)
        );
    }
}

fn print_trend(digest: &Digest) {
    section_header("MONTHLY TREND");
    println!(
        "  {:<9} {:>8} {:>14} {:>12} {:>10}",
        "Month", "Orders", "Revenue", "Rev MA3", "MoM"
    );
    for row in &digest.monthly_trend {
        let ma = row
            .revenue_ma3
            .map(format_amount)
            .unwrap_or_else(|| "-".into());
        let growth = row
            .revenue_growth_pct
            .map(|g| format!("{:+.1}%", g))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<9} {:>8} {:>14} {:>12} {:>10}",
            row.year_month,
            format_count(row.total_orders),
            format_amount(row.total_revenue),
            ma,
            growth
        );
    }
    println!();
    println!("  {}", trend_insight(&digest.monthly_trend));
}

fn print_payments(digest: &Digest) {
    section_header("PAYMENT METHODS");
    println!(
        "  {:<16} {:>10} {:>8} {:>12} {:>14}",
        "Method", "Count", "Share", "Avg Value", "Total Value"
    );
    for row in &digest.payment_methods {
        println!(
            "  {:<16} {:>10} {:>7.1}% {:>12} {:>14}",
            row.payment_type,
            format_count(row.count),
            row.share_pct,
            format_amount(row.avg_value),
            format_amount(row.total_value)
        );
    }
    println!();
    println!("  {}", payment_insight(&digest.payment_methods));
}

fn print_delivery(digest: &Digest) {
    section_header("DELIVERY & SATISFACTION");
    let summary = &digest.delivery_review;
    match summary.correlation {
        Some(r) => println!("  Pearson correlation (days vs score)  {:.3}", r),
        None => println!("  Pearson correlation                  n/a"),
    }
    if let Some((slope, intercept)) = summary.regression {
        println!("  Trend line  score = {:.4} x days + {:.2}", slope, intercept);
    }
    println!("  Paired orders  {}", format_count(summary.paired_orders));
    println!();
    for bucket in &summary.buckets {
        let score = bucket
            .mean_review_score
            .map(|s| format!("{:.2} / 5", s))
            .unwrap_or_else(|| "n/a".into());
        println!(
            "  {:<22} {:>8} orders   avg score {}",
            bucket.label,
            format_count(bucket.order_count),
            score
        );
    }
    println!();
    println!("  {}", delivery_insight(summary));
}

fn print_categories(digest: &Digest, top: usize) {
    section_header("REVENUE BY CATEGORY");
    println!(
        "  {:<28} {:>14} {:>8} {:>12}",
        "Category", "Revenue", "Orders", "Avg/Order"
    );
    for row in digest.category_revenue.iter().take(top) {
        println!(
            "  {:<28} {:>14} {:>8} {:>12}",
            row.category,
            format_amount(row.total_revenue),
            format_count(row.total_orders),
            format_amount(row.avg_revenue_per_order)
        );
    }
    let hidden = digest.category_revenue.len().saturating_sub(top);
    if hidden > 0 {
        println!("  ... {} more categories", hidden);
    }
    println!();
    println!("  {}", category_insight(&digest.category_revenue));
}

fn print_human(digest: &Digest, section: Section, top: usize) {
    println!();
    println!("  \u{2554}{:\u{2550}<62}\u{2557}", "");
    println!("  \u{2551}{:^62}\u{2551}", "ORDER INSIGHT \u{2014} Commerce Analytics Digest");
    println!("  \u{255a}{:\u{2550}<62}\u{255d}", "");

    if let Some(window) = &digest.window {
        println!("  Window {} .. {}", window.from, window.to);
    }
    println!(
        "  {} orders loaded \u{00b7} {} rows dropped \u{00b7} {} bands per dimension",
        format_count(digest.records_loaded),
        format_count(digest.records_dropped),
        digest.bands
    );

    if matches!(section, Section::All | Section::Overview) {
        print_overview(digest);
    }
    if matches!(section, Section::All | Section::Rfm) {
        print_segments(digest, top);
    }
    if matches!(section, Section::All | Section::Trend) {
        print_trend(digest);
    }
    if matches!(section, Section::All | Section::Payment) {
        print_payments(digest);
    }
    if matches!(section, Section::All | Section::Delivery) {
        print_delivery(digest);
    }
    if matches!(section, Section::All | Section::Category) {
        print_categories(digest, top);
    }

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Analytics ran in {}ms \u{00b7} Total {}ms",
        digest.load_ms,
        digest.compute_ms,
        digest.load_ms + digest.compute_ms
    );
    println!();
}

fn build_json(digest: &Digest, top: usize) -> DigestJson {
    DigestJson {
        generated_at: Utc::now().to_rfc3339(),
        window: digest.window,
        bands: digest.bands,
        records_loaded: digest.records_loaded,
        records_dropped: digest.records_dropped,
        load_ms: digest.load_ms,
        compute_ms: digest.compute_ms,
        overview: digest.overview.clone(),
        segments: digest.segments.clone(),
        top_customers: digest
            .customers
            .iter()
            .take(top)
            .map(CustomerJson::from_profile)
            .collect(),
        monthly_trend: digest.monthly_trend.clone(),
        payment_methods: digest.payment_methods.clone(),
        delivery_review: digest.delivery_review.clone(),
        category_revenue: digest.category_revenue.clone(),
    }
}

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq)]
enum Section {
    All,
    Overview,
    Rfm,
    Trend,
    Payment,
    Delivery,
    Category,
}

impl Section {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(Section::All),
            "overview" => Some(Section::Overview),
            "rfm" => Some(Section::Rfm),
            "trend" => Some(Section::Trend),
            "payment" => Some(Section::Payment),
            "delivery" => Some(Section::Delivery),
            "category" => Some(Section::Category),
            _ => None,
        }
    }
}

fn usage() -> ! {
    eprintln!("Usage: insight-server <orders.csv> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --from YYYY-MM-DD   Start of the purchase-date window");
    eprintln!("  --to YYYY-MM-DD     End of the purchase-date window");
    eprintln!("  --bands K           Quantile bands per RFM dimension (2-9, default 4)");
    eprintln!("  --top N             Customers/categories shown per table (default 10)");
    eprintln!("  --section S         all|overview|rfm|trend|payment|delivery|category");
    eprintln!("  --json              Output as JSON instead of formatted text");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  insight-server fixtures/orders.csv");
    eprintln!("  insight-server fixtures/orders.csv --from 2017-01-01 --to 2017-12-31 --json");
    process::exit(1);
}

fn parse_date_arg(flag: &str, raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| {
        eprintln!("Error: {} expects a YYYY-MM-DD date, got '{}'", flag, raw);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }
    let csv_path = &args[1];

    let mut from: Option<NaiveDate> = None;
    let mut to: Option<NaiveDate> = None;
    let mut bands: u8 = DEFAULT_BANDS;
    let mut top: usize = DEFAULT_TOP;
    let mut section = Section::All;
    let mut json_output = false;

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--from" | "--to" => {
                let Some(raw) = args.get(i + 1) else {
                    eprintln!("Error: {} requires a date", flag);
                    process::exit(1);
                };
                let date = parse_date_arg(flag, raw);
                if flag == "--from" {
                    from = Some(date);
                } else {
                    to = Some(date);
                }
                i += 2;
            }
            "--bands" => {
                let parsed = args.get(i + 1).and_then(|r| r.parse::<u8>().ok());
                match parsed {
                    Some(k) if (2..=9).contains(&k) => bands = k,
                    _ => {
                        eprintln!("Error: --bands requires an integer between 2 and 9");
                        process::exit(1);
                    }
                }
                i += 2;
            }
            "--top" => {
                let parsed = args.get(i + 1).and_then(|r| r.parse::<usize>().ok());
                match parsed {
                    Some(n) if n > 0 => top = n,
                    _ => {
                        eprintln!("Error: --top requires a positive integer");
                        process::exit(1);
                    }
                }
                i += 2;
            }
            "--section" => {
                let parsed = args.get(i + 1).and_then(|r| Section::parse(r));
                match parsed {
                    Some(s) => section = s,
                    None => {
                        eprintln!(
                            "Error: --section expects one of all, overview, rfm, trend, payment, delivery, category"
                        );
                        process::exit(1);
                    }
                }
                i += 2;
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
            }
        }
    }

    let window = match (from, to) {
        (Some(f), Some(t)) if f > t => {
            eprintln!("Error: --from {} is after --to {}", f, t);
            process::exit(1);
        }
        (Some(f), Some(t)) => Some(DateWindow { from: f, to: t }),
        (Some(f), None) => Some(DateWindow {
            from: f,
            to: NaiveDate::MAX,
        }),
        (None, Some(t)) => Some(DateWindow {
            from: NaiveDate::MIN,
            to: t,
        }),
        (None, None) => None,
    };

    // Load the order table; a missing file blocks the whole digest.
    let load_start = Instant::now();
    let report = match load_orders_file(csv_path) {
        Ok(report) => report,
        Err(e @ InsightError::MissingInput { .. }) => {
            eprintln!("Error: {}", e);
            eprintln!("Regenerate the order export and run again; nothing was rendered.");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();
    let records_loaded = report.orders.len();
    let records_dropped = report.dropped;
    log::info!(
        "loaded {} orders from '{}' ({} rows dropped)",
        records_loaded,
        csv_path,
        records_dropped
    );

    // Run the segmentation pipeline and the report builders.
    let compute_start = Instant::now();
    let pipeline = SegmentationPipeline::with_orders(report.orders.clone());
    let mut query = ReportQuery::new("digest-001");
    query.window = window;
    query.bands = bands;
    let result = pipeline.execute(query);

    // Reports use the same resolved window the pipeline ran with.
    let window = result.query.window;
    let window_orders: Vec<OrderRecord> = match &window {
        Some(w) => report
            .orders
            .iter()
            .filter(|o| w.contains(o.purchased_at.date()))
            .cloned()
            .collect(),
        None => report.orders.clone(),
    };

    let mut digest = Digest {
        window,
        bands,
        records_loaded,
        records_dropped,
        load_ms,
        compute_ms: 0,
        overview: reports::overview(&window_orders),
        segments: segment_summary(&result.selected_candidates),
        customers: result.selected_candidates,
        monthly_trend: reports::monthly_trend(&window_orders),
        payment_methods: reports::payment_methods(&window_orders),
        delivery_review: reports::delivery_review(&window_orders),
        category_revenue: reports::category_revenue(&window_orders),
    };
    digest.compute_ms = compute_start.elapsed().as_millis();

    if json_output {
        match serde_json::to_string_pretty(&build_json(&digest, top)) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                eprintln!("Error serializing digest: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_human(&digest, section, top);
    }
}
