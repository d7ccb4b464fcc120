use std::collections::HashSet;
use std::sync::Arc;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{CustomerProfile, ReportQuery};

/// Logs a one-line summary of the segmentation run.
pub struct SegmentationLogSideEffect;

impl SideEffect<ReportQuery, CustomerProfile> for SegmentationLogSideEffect {
    fn run(&self, input: Arc<SideEffectInput<ReportQuery, CustomerProfile>>) -> Result<(), String> {
        let segments: HashSet<_> = input
            .selected_candidates
            .iter()
            .filter_map(|c| c.segment)
            .collect();
        log::info!(
            "request_id={} classified {} customers across {} segments",
            input.query.request_id,
            input.selected_candidates.len(),
            segments.len()
        );
        Ok(())
    }
}
