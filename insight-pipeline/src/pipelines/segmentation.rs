use std::sync::Arc;

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::date_range_query_hydrator::DateRangeQueryHydrator;
use crate::components::order_metrics_source::OrderMetricsSource;
use crate::components::quantile_band_scorer::QuantileBandScorer;
use crate::components::rfm_rank_selector::RfmRankSelector;
use crate::components::segment_hydrator::SegmentHydrator;
use crate::components::segmentation_log_side_effect::SegmentationLogSideEffect;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::order_loader::OrderRecord;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{CustomerProfile, ReportQuery};

/// The customer segmentation pipeline.
///
/// Pipeline flow:
/// 1. DateRangeQueryHydrator fills in a missing date window
/// 2. OrderMetricsSource extracts per-customer R/F/M profiles
/// 3. QuantileBandScorer assigns quantile bands and the composite score
/// 4. RfmRankSelector orders the population, best customers first
/// 5. SegmentHydrator attaches the behavioral segment (post-selection,
///    so classification covers the entire ranked population)
/// 6. SegmentationLogSideEffect logs the run summary
pub struct SegmentationPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<ReportQuery>>>,
    sources: Vec<Box<dyn Source<ReportQuery, CustomerProfile>>>,
    hydrators: Vec<Box<dyn Hydrator<ReportQuery, CustomerProfile>>>,
    filters: Vec<Box<dyn Filter<ReportQuery, CustomerProfile>>>,
    scorers: Vec<Box<dyn Scorer<ReportQuery, CustomerProfile>>>,
    selector: RfmRankSelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<ReportQuery, CustomerProfile>>>,
    post_selection_filters: Vec<Box<dyn Filter<ReportQuery, CustomerProfile>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<ReportQuery, CustomerProfile>>>>,
}

impl SegmentationPipeline {
    /// Create a pipeline over loaded order records.
    pub fn with_orders(orders: Vec<OrderRecord>) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<ReportQuery>>> =
            match DateRangeQueryHydrator::from_orders(&orders) {
                Some(hydrator) => vec![Box::new(hydrator)],
                None => Vec::new(),
            };

        let sources: Vec<Box<dyn Source<ReportQuery, CustomerProfile>>> =
            vec![Box::new(OrderMetricsSource::new(orders))];

        let scorers: Vec<Box<dyn Scorer<ReportQuery, CustomerProfile>>> =
            vec![Box::new(QuantileBandScorer)];

        let post_selection_hydrators: Vec<Box<dyn Hydrator<ReportQuery, CustomerProfile>>> =
            vec![Box::new(SegmentHydrator)];

        let side_effects: Arc<Vec<Box<dyn SideEffect<ReportQuery, CustomerProfile>>>> =
            Arc::new(vec![Box::new(SegmentationLogSideEffect)]);

        Self {
            query_hydrators,
            sources,
            hydrators: Vec::new(),
            filters: Vec::new(),
            scorers,
            selector: RfmRankSelector,
            post_selection_hydrators,
            post_selection_filters: Vec::new(),
            side_effects,
        }
    }
}

impl CandidatePipeline<ReportQuery, CustomerProfile> for SegmentationPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<ReportQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<ReportQuery, CustomerProfile>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<ReportQuery, CustomerProfile>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<ReportQuery, CustomerProfile>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<ReportQuery, CustomerProfile>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<ReportQuery, CustomerProfile> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<ReportQuery, CustomerProfile>>] {
        &self.post_selection_hydrators
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<ReportQuery, CustomerProfile>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<ReportQuery, CustomerProfile>>>> {
        Arc::clone(&self.side_effects)
    }
}
