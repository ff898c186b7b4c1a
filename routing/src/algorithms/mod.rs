use crate::algorithms::errors::QueryResult;
use crate::algorithms::queries::earliest_arrival::PlanQuery;
use crate::algorithms::queries::range::RangeQuery;
use crate::journey::Journey;

pub mod errors;
pub mod queries;

/// Answers journey queries on a dataset. Implementations keep no per-query state, so one instance
/// can be queried from many threads at once.
pub trait RoutingAlgorithm: Send + Sync {
    /// Earliest arrival journeys when departing at or after the query time, at most one per
    /// number of boarded trips
    fn plan(&self, query: PlanQuery) -> QueryResult<Vec<Journey>>;

    /// All non-dominated journeys departing on the query date, sorted by departure
    fn range(&self, query: RangeQuery) -> QueryResult<Vec<Journey>>;
}
