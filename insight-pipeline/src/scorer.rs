use crate::util;

/// Scorers derive ranking fields for candidates.
///
/// A scorer receives the full candidate slice so it can compute
/// population-level statistics (quantiles need every value). It returns
/// one partial candidate per input, carrying only the fields this scorer
/// owns; the pipeline copies them back via `update`.
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this scorer should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Score candidates. The returned vector must be index-aligned with
    /// the input slice.
    fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy this scorer's fields from the scored partial onto the
    /// candidate. Only the fields this scorer is responsible for should
    /// be copied.
    fn update(&self, candidate: &mut C, scored: C);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
