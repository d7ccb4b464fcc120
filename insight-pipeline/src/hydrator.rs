use crate::util;

/// Hydrators enrich candidates with derived or looked-up fields.
///
/// Same partial-result contract as scorers: return one candidate per
/// input carrying only the fields this hydrator owns, and copy them back
/// in `update`.
pub trait Hydrator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Hydrate candidates. The returned vector must be index-aligned
    /// with the input slice.
    fn hydrate(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy this hydrator's fields from the hydrated partial onto the
    /// candidate.
    fn update(&self, candidate: &mut C, hydrated: C);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
