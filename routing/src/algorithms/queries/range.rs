use crate::journey::Journey;
use common::util::date::Date;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// A range query asks for all optimal journeys between two stops departing on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub source_stop_id: String,
    pub target_stop_id: String,
    pub date: Date,
}

/// Journey `a` is dominated by `b` if `b` departs no earlier and arrives no later, and is strictly
/// better in at least one of the two
fn dominates(b: &Journey, a: &Journey) -> bool {
    b.departure_time >= a.departure_time
        && b.arrival_time <= a.arrival_time
        && (b.departure_time > a.departure_time || b.arrival_time < a.arrival_time)
}

/// Keeps the pareto front of (late departure, early arrival). Journeys with the same departure and
/// arrival collapse into the first one, the result is sorted by departure, then arrival.
pub fn remove_dominated(journeys: Vec<Journey>) -> Vec<Journey> {
    let mut seen_times = HashSet::new();
    let unique: Vec<Journey> = journeys.into_iter()
        .filter(|journey| seen_times.insert((journey.departure_time, journey.arrival_time)))
        .collect();

    let mut front: Vec<Journey> = unique.iter()
        .filter(|a| !unique.iter().any(|b| dominates(b, a)))
        .cloned()
        .collect();

    // stable, so ties keep their order
    front.sort_by_key(|journey| (journey.departure_time, journey.arrival_time));
    front
}
