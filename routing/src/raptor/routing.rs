use crate::algorithms::errors::QueryResult;
use crate::algorithms::queries::earliest_arrival::PlanQuery;
use crate::algorithms::queries::range::{remove_dominated, RangeQuery};
use crate::algorithms::RoutingAlgorithm;
use crate::journey::Journey;
use crate::raptor::state::RaptorState;
use crate::raptor::RaptorAlgorithm;
use common::types::{RouteIdx, StopIdx};
use common::util::date::Date;
use common::util::time::{Time, INFINITY, SECONDS_PER_DAY};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use log::debug;
use std::cmp::min;

/// A trip of a route on a specific day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TripInstance {
    pub(crate) trip_offset: usize,
    /// Added to all times of the trip, 86400 per day after the query date
    pub(crate) day_shift: u32,
}

/// The trip currently ridden while scanning a route
struct BoardedTrip {
    row: usize,
    instance: TripInstance,
    boarding_stop: StopIdx,
    boarding_position: usize,
}

impl RaptorAlgorithm {
    /// Selects the first trip of a route (in stored order) that runs on `date` and both arrives at
    /// and departs from the `position`-th stop of the route no earlier than `min_time`. Feeds may
    /// list a departure before the arrival, such a trip can't be boarded once its departure passed.
    ///
    /// If there is none, the following days are tried, up to `max_days` days in total. For each
    /// later day `min_time` is lowered by 86400 (saturating at 0) rather than reset to midnight,
    /// so a query time beyond 24:00:00 still limits the trips of the next day.
    pub(crate) fn earliest_trip(
        &self,
        route: RouteIdx,
        position: usize,
        date: Date,
        min_time: Time,
    ) -> Option<TripInstance> {
        let number_of_trips = self.dataset.route(route).number_of_trips;
        let services = self.dataset.services_of(route);

        let mut date = date;
        let mut min_time = min_time.as_secs();

        for day in 0..self.params.max_days {
            let day_shift = SECONDS_PER_DAY.saturating_mul(day as u32);

            let trip_offset = (0..number_of_trips).find(|trip_offset| {
                let stop_time = self.dataset.stop_time(route, *trip_offset, position);
                services[*trip_offset].runs_on(date)
                    && stop_time.arrival_time.as_secs() >= min_time
                    && stop_time.departure_time.as_secs() >= min_time
            });
            if let Some(trip_offset) = trip_offset {
                return Some(TripInstance { trip_offset, day_shift });
            }

            date = date.next_day();
            min_time = min_time.saturating_sub(SECONDS_PER_DAY);
        }

        None
    }

    /// For every route serving a marked stop, the position of the marked stop that comes first on
    /// the route. Routes are queued in the order they were first found.
    pub(crate) fn build_queue(&self, marked_stops: &[StopIdx]) -> Vec<(RouteIdx, usize)> {
        let mut queue: Vec<(RouteIdx, usize)> = vec![];
        let mut queue_idx_by_route: HashMap<RouteIdx, usize> = HashMap::new();

        for stop in marked_stops {
            for route in self.dataset.stop_routes_of(*stop) {
                let Some(position) = self.dataset.route_stops_of(*route).iter().position(|s| s == stop) else {
                    debug_assert!(false, "{route} is listed for {stop}, but doesn't visit it");
                    continue;
                };

                match queue_idx_by_route.entry(*route) {
                    Entry::Occupied(entry) => {
                        let queued = &mut queue[*entry.get()];
                        queued.1 = min(queued.1, position);
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(queue.len());
                        queue.push((*route, position));
                    }
                }
            }
        }

        queue
    }

    fn scan_route(
        &self,
        state: &mut RaptorState,
        route: RouteIdx,
        start_position: usize,
        date: Date,
        target: StopIdx,
    ) {
        let stop_times = &self.dataset.stop_times;
        let mut trip: Option<BoardedTrip> = None;

        for (position, stop) in self.dataset.route_stops_of(route).iter().enumerate().skip(start_position) {
            let stop = *stop;

            // if t != ⊥ and arr(t, pᵢ) < min{ τ*(pᵢ), τ*(pₜ) }
            if let Some(boarded) = &trip {
                let arrival = stop_times[boarded.row + position].arrival_time.add_secs(boarded.instance.day_shift);
                let best = min(state.best_arrival(stop), state.best_arrival(target));

                if arrival < best && stop != boarded.boarding_stop {
                    let departure = stop_times[boarded.row + boarded.boarding_position].departure_time
                        .add_secs(boarded.instance.day_shift);
                    state.set_transit(boarded.boarding_stop, stop, boarded.row, departure, arrival);
                }
            }

            // Board a trip here if the stop was reached in the previous round. Also re-board when
            // an earlier trip of the same route can be caught at this stop.
            let previous_arrival = state.previous_tau(stop);
            if previous_arrival == INFINITY {
                continue;
            }
            let can_catch_earlier = match &trip {
                None => true,
                Some(boarded) => {
                    previous_arrival <= stop_times[boarded.row + position].departure_time
                        .add_secs(boarded.instance.day_shift)
                }
            };
            if !can_catch_earlier {
                continue;
            }

            let Some(instance) = self.earliest_trip(route, position, date, previous_arrival) else {
                continue;
            };
            // Keep riding the held trip unless the one found here runs before it
            let is_earlier = trip.as_ref().map_or(true, |boarded| {
                (instance.day_shift, instance.trip_offset) < (boarded.instance.day_shift, boarded.instance.trip_offset)
            });
            if is_earlier {
                trip = Some(BoardedTrip {
                    row: self.dataset.trip_row(route, instance.trip_offset),
                    instance,
                    boarding_stop: stop,
                    boarding_position: position,
                });
            }
        }
    }

    /// Walks from every stop reached by a trip in this round
    fn relax_footpaths(&self, state: &mut RaptorState, stops: &[StopIdx]) {
        for start in stops {
            let departure = state.tau(*start);
            if departure == INFINITY {
                continue;
            }

            for footpath in self.dataset.footpaths_of(*start) {
                let arrival = departure.add_secs(footpath.walking_time);
                if arrival < state.best_arrival(footpath.target_stop_idx) {
                    state.set_walk(*start, footpath.target_stop_idx, footpath.walking_time);
                }
            }
        }
    }

    pub(crate) fn run(&self, source: StopIdx, target: StopIdx, date: Date, departure: Time) -> RaptorState {
        let mut state = RaptorState::init(self.num_stops(), source, departure);

        // foreach k <- 1,2,... do
        while state.k < self.params.max_rounds {
            let marked_stops = state.marked_stops.take();
            if marked_stops.is_empty() {
                break;
            }

            state.new_round();

            // FIRST STAGE: Build queue of routes and the stop to start scanning at
            let queue = self.build_queue(&marked_stops);

            // SECOND STAGE: Scan routes
            for (route, position) in queue {
                self.scan_route(&mut state, route, position, date, target);
            }

            // THIRD STAGE: Footpaths from the stops reached by a trip
            let reached_by_trip = state.marked_stops.as_slice().to_vec();
            self.relax_footpaths(&mut state, &reached_by_trip);

            debug!(
                target: "raptor",
                "Round {} improved {} stops", state.k, state.marked_stops.as_slice().len()
            );
        }

        state
    }

    fn journeys(&self, source: StopIdx, target: StopIdx, date: Date, departure: Time) -> Vec<Journey> {
        self.run(source, target, date, departure)
            .backtrace(&self.dataset, source, target)
    }
}

impl RoutingAlgorithm for RaptorAlgorithm {
    fn plan(&self, query: PlanQuery) -> QueryResult<Vec<Journey>> {
        let source = self.stop_mapping.translate_to_local(&query.source_stop_id)?;
        let target = self.stop_mapping.translate_to_local(&query.target_stop_id)?;

        Ok(self.journeys(source, target, query.date, query.time))
    }

    fn range(&self, query: RangeQuery) -> QueryResult<Vec<Journey>> {
        let source = self.stop_mapping.translate_to_local(&query.source_stop_id)?;
        let target = self.stop_mapping.translate_to_local(&query.target_stop_id)?;

        let mut journeys = vec![];
        let mut departure = Time::MIDNIGHT;

        loop {
            let found: Vec<Journey> = self.journeys(source, target, query.date, departure)
                .into_iter()
                .filter(|journey| journey.departure_time < Time::END_OF_DAY)
                .collect();

            let Some(earliest_departure) = found.iter().map(|journey| journey.departure_time).min() else {
                break;
            };
            journeys.extend(found);

            // Stop times with departure before arrival could otherwise move the query time backwards
            departure = earliest_departure.max(departure).add_secs(1);
        }

        debug!(target: "raptor", "Range query found {} journeys before filtering", journeys.len());

        Ok(remove_dominated(journeys))
    }
}
