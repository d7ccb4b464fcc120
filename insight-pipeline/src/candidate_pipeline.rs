//! The staged candidate pipeline.
//!
//! Orchestrates query hydration, candidate sourcing, hydration,
//! filtering, scoring, selection, post-selection stages, and side
//! effects, in that order. Stage failures degrade gracefully instead of
//! aborting the run: a failing source contributes no candidates, a
//! failing hydrator/scorer leaves its fields unpopulated, a failing
//! filter removes nothing. Every failure is logged with the stage name
//! and request id.

use std::sync::Arc;

use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Anything that carries a request id for log correlation.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything the pipeline produced for one query.
pub struct PipelineResult<Q, C> {
    /// The query after hydration.
    pub query: Q,
    /// Every candidate any source produced.
    pub retrieved_candidates: Vec<C>,
    /// Candidates removed by filters.
    pub filtered_candidates: Vec<C>,
    /// The final, sorted (and possibly truncated) candidate list.
    pub selected_candidates: Vec<C>,
}

/// A candidate pipeline wires concrete stage components together; the
/// provided `execute` drives them in a fixed order.
pub trait CandidatePipeline<Q, C>
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn post_selection_filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;

    /// Optional cap on the final candidate list. `None` keeps every
    /// candidate (the selector may still truncate on its own).
    fn result_size(&self) -> Option<usize> {
        None
    }

    /// Run the full pipeline for one query.
    fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let mut query = query;

        // 1. Query hydration
        for qh in self.query_hydrators() {
            if !qh.enable(&query) {
                continue;
            }
            match qh.hydrate(&query) {
                Ok(hydrated) => qh.update(&mut query, hydrated),
                Err(e) => log::warn!(
                    "request_id={} query hydrator {} failed: {}",
                    query.request_id(),
                    qh.name(),
                    e
                ),
            }
        }

        // 2. Sources
        let mut retrieved: Vec<C> = Vec::new();
        for source in self.sources() {
            if !source.enable(&query) {
                continue;
            }
            match source.get_candidates(&query) {
                Ok(candidates) => retrieved.extend(candidates),
                Err(e) => log::warn!(
                    "request_id={} source {} failed: {}",
                    query.request_id(),
                    source.name(),
                    e
                ),
            }
        }
        let mut candidates = retrieved.clone();

        // 3. Hydration
        apply_hydrators(self.hydrators(), &query, &mut candidates);

        // 4. Filtering
        let mut removed_all: Vec<C> = Vec::new();
        apply_filters(self.filters(), &query, &mut candidates, &mut removed_all);

        // 5. Scoring
        for scorer in self.scorers() {
            if !scorer.enable(&query) {
                continue;
            }
            match scorer.score(&query, &candidates) {
                Ok(scored) if scored.len() == candidates.len() => {
                    for (candidate, partial) in candidates.iter_mut().zip(scored) {
                        scorer.update(candidate, partial);
                    }
                }
                Ok(scored) => log::warn!(
                    "request_id={} scorer {} returned {} results for {} candidates; skipped",
                    query.request_id(),
                    scorer.name(),
                    scored.len(),
                    candidates.len()
                ),
                Err(e) => log::warn!(
                    "request_id={} scorer {} failed: {}",
                    query.request_id(),
                    scorer.name(),
                    e
                ),
            }
        }

        // 6. Selection
        let mut selected = if self.selector().enable(&query) {
            self.selector().select(&query, candidates)
        } else {
            candidates
        };
        if let Some(limit) = self.result_size() {
            selected.truncate(limit);
        }

        // 7. Post-selection stages
        apply_hydrators(self.post_selection_hydrators(), &query, &mut selected);
        apply_filters(
            self.post_selection_filters(),
            &query,
            &mut selected,
            &mut removed_all,
        );

        // 8. Side effects
        let input = Arc::new(SideEffectInput {
            query: Arc::new(query.clone()),
            selected_candidates: selected.clone(),
        });
        for side_effect in self.side_effects().iter() {
            if !side_effect.enable(Arc::clone(&input.query)) {
                continue;
            }
            if let Err(e) = side_effect.run(Arc::clone(&input)) {
                log::warn!(
                    "request_id={} side effect {} failed: {}",
                    query.request_id(),
                    side_effect.name(),
                    e
                );
            }
        }

        PipelineResult {
            query,
            retrieved_candidates: retrieved,
            filtered_candidates: removed_all,
            selected_candidates: selected,
        }
    }
}

fn apply_hydrators<Q, C>(hydrators: &[Box<dyn Hydrator<Q, C>>], query: &Q, candidates: &mut [C])
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    for hydrator in hydrators {
        if !hydrator.enable(query) {
            continue;
        }
        match hydrator.hydrate(query, candidates) {
            Ok(hydrated) if hydrated.len() == candidates.len() => {
                for (candidate, partial) in candidates.iter_mut().zip(hydrated) {
                    hydrator.update(candidate, partial);
                }
            }
            Ok(hydrated) => log::warn!(
                "request_id={} hydrator {} returned {} results for {} candidates; skipped",
                query.request_id(),
                hydrator.name(),
                hydrated.len(),
                candidates.len()
            ),
            Err(e) => log::warn!(
                "request_id={} hydrator {} failed: {}",
                query.request_id(),
                hydrator.name(),
                e
            ),
        }
    }
}

fn apply_filters<Q, C>(
    filters: &[Box<dyn Filter<Q, C>>],
    query: &Q,
    candidates: &mut Vec<C>,
    removed_all: &mut Vec<C>,
) where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    for filter in filters {
        if !filter.enable(query) {
            continue;
        }
        // The filter consumes its input, so hand it a clone; a failing
        // filter must leave the candidate list untouched.
        match filter.filter(query, candidates.clone()) {
            Ok(result) => {
                *candidates = result.kept;
                removed_all.extend(result.removed);
            }
            Err(e) => {
                log::warn!(
                    "request_id={} filter {} failed: {}",
                    query.request_id(),
                    filter.name(),
                    e
                );
            }
        }
    }
}
