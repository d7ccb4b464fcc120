use crate::util;

/// Query hydrators run before candidate fetching and enrich the query
/// object with defaults or looked-up context.
pub trait QueryHydrator<Q>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
{
    /// Decide if this query hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Hydrate the query. Returns a new query with this hydrator's
    /// fields populated.
    fn hydrate(&self, query: &Q) -> Result<Q, String>;

    /// Update the query with the hydrated fields. Only the fields this
    /// hydrator is responsible for should be copied.
    fn update(&self, query: &mut Q, hydrated: Q);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
