use crate::selector::Selector;
use crate::types::{CustomerProfile, ReportQuery};

/// Ranks profiles by composite RFM score, best customers first.
///
/// No truncation: the full classified population flows to aggregation;
/// display layers cut the table down themselves.
pub struct RfmRankSelector;

impl Selector<ReportQuery, CustomerProfile> for RfmRankSelector {
    fn score(&self, candidate: &CustomerProfile) -> f64 {
        candidate.rfm_score.unwrap_or(f64::NEG_INFINITY)
    }
}
