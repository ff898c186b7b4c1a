use crate::dataset::Dataset;
use crate::journey::{Journey, Segment};
use common::types::StopIdx;
use common::util::time::{Time, INFINITY};

/// How a stop was reached in a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connection {
    Transit {
        boarding_stop: StopIdx,
        /// Row of the trip's first stop time
        trip_row: usize,
        departure: Time,
        arrival: Time,
    },
    Walk {
        start: StopIdx,
        departure: Time,
        arrival: Time,
    },
}

impl Connection {
    fn source(&self) -> StopIdx {
        match self {
            Connection::Transit { boarding_stop: source, .. } | Connection::Walk { start: source, .. } => *source,
        }
    }

    fn departure(&self) -> Time {
        match self {
            Connection::Transit { departure, .. } | Connection::Walk { departure, .. } => *departure,
        }
    }

    fn arrival(&self) -> Time {
        match self {
            Connection::Transit { arrival, .. } | Connection::Walk { arrival, .. } => *arrival,
        }
    }
}

/// Stops improved in the current round, in the order they were improved
#[derive(Debug, Default)]
pub(crate) struct MarkedStops {
    order: Vec<StopIdx>,
    mask: Vec<bool>,
}

impl MarkedStops {
    fn new(num_stops: usize) -> Self {
        Self { order: vec![], mask: vec![false; num_stops] }
    }

    pub(crate) fn insert(&mut self, stop: StopIdx) {
        if !self.mask[stop.idx()] {
            self.mask[stop.idx()] = true;
            self.order.push(stop);
        }
    }

    pub(crate) fn as_slice(&self) -> &[StopIdx] {
        &self.order
    }

    /// Returns all marked stops and unmarks them
    pub(crate) fn take(&mut self) -> Vec<StopIdx> {
        for stop in &self.order {
            self.mask[stop.idx()] = false;
        }
        std::mem::take(&mut self.order)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug)]
pub(crate) struct RaptorState {
    pub(super) k: usize,
    /// Earliest arrival per stop with up to k trips, called τₖ(p) in the RAPTOR paper
    pub(super) k_arrivals: Vec<Vec<Time>>,
    /// Called τ*(p) in the RAPTOR paper (see section on local pruning)
    pub(super) best_arrivals: Vec<Time>,
    /// connections[k][stop]: the last improvement of stop in round k
    pub(super) connections: Vec<Vec<Option<Connection>>>,
    pub(super) marked_stops: MarkedStops,
}

impl RaptorState {
    pub fn init(num_stops: usize, source: StopIdx, departure: Time) -> Self {
        let mut initial_taus = vec![INFINITY; num_stops];
        initial_taus[source.idx()] = departure;

        let mut marked_stops = MarkedStops::new(num_stops);
        marked_stops.insert(source);

        Self {
            k: 0,
            k_arrivals: vec![initial_taus.clone()],
            best_arrivals: initial_taus,
            connections: vec![vec![None; num_stops]],
            marked_stops,
        }
    }

    pub fn new_round(&mut self) {
        self.k += 1;

        // Arrivals with k trips are at least as good as with k - 1 trips, so start from there
        let previous = self.k_arrivals[self.k - 1].clone();
        self.k_arrivals.push(previous);
        self.connections.push(vec![None; self.best_arrivals.len()]);
    }

    // τₖ(stop)
    pub fn tau(&self, stop: StopIdx) -> Time {
        self.k_arrivals[self.k][stop.idx()]
    }

    // τₖ₋₁(stop)
    pub fn previous_tau(&self, stop: StopIdx) -> Time {
        debug_assert!(self.k >= 1);
        self.k_arrivals[self.k - 1][stop.idx()]
    }

    // τ*(stop)
    pub fn best_arrival(&self, stop: StopIdx) -> Time {
        self.best_arrivals[stop.idx()]
    }

    pub fn set_transit(
        &mut self,
        boarding_stop: StopIdx,
        alight_stop: StopIdx,
        trip_row: usize,
        departure: Time,
        arrival: Time,
    ) {
        debug_assert!(
            self.previous_tau(boarding_stop) <= departure,
            "Trip in row {trip_row} must depart after arriving at {boarding_stop}. It departs at {departure}, but the stop is reached at {}",
            self.previous_tau(boarding_stop)
        );

        self.improve(alight_stop, Connection::Transit { boarding_stop, trip_row, departure, arrival });
    }

    pub fn set_walk(&mut self, start: StopIdx, end: StopIdx, walking_time: u32) {
        let departure = self.tau(start);
        let arrival = departure.add_secs(walking_time);

        debug_assert!(
            arrival < self.best_arrival(end),
            "set_walk called for footpath between {start} and {end} despite not being faster"
        );

        self.improve(end, Connection::Walk { start, departure, arrival });
    }

    fn improve(&mut self, stop: StopIdx, connection: Connection) {
        let arrival = connection.arrival();
        self.k_arrivals[self.k][stop.idx()] = arrival;
        self.best_arrivals[stop.idx()] = arrival;
        self.connections[self.k][stop.idx()] = Some(connection);
        self.marked_stops.insert(stop);
    }

    /// One journey per round in which the target was reached, fewest trips first
    pub fn backtrace(&self, dataset: &Dataset, source: StopIdx, target: StopIdx) -> Vec<Journey> {
        (1..=self.k)
            .filter(|k| self.connections[*k][target.idx()].is_some())
            .filter_map(|k| self.extract_journey(dataset, k, source, target))
            .collect()
    }

    /// Follows the connections from the target back to the source. Returns None if the chain
    /// doesn't lead back to the source in order of time.
    fn extract_journey(&self, dataset: &Dataset, k: usize, source: StopIdx, target: StopIdx) -> Option<Journey> {
        let mut segments: Vec<Segment> = vec![];
        let mut visited = vec![target];

        let mut stop = target;
        let mut round = k;
        let mut connection = self.connections[k][target.idx()]?;

        loop {
            if connection.departure() > connection.arrival() {
                return None;
            }
            // the connection happens before the ones already collected
            if let Some(later) = segments.last() {
                if connection.arrival() > later.departure_time() {
                    return None;
                }
            }
            segments.push(self.segment(dataset, stop, &connection));

            let previous_stop = connection.source();
            if previous_stop == source {
                break;
            }
            if visited.contains(&previous_stop) {
                return None;
            }
            visited.push(previous_stop);

            // Walking doesn't count as a round, riding a trip does
            let max_round = match connection {
                Connection::Transit { .. } => round - 1,
                Connection::Walk { .. } => round,
            };
            let (previous_round, previous_connection) = (1..=max_round).rev()
                .find_map(|j| self.connections[j][previous_stop.idx()].map(|c| (j, c)))?;

            stop = previous_stop;
            round = previous_round;
            connection = previous_connection;
        }

        segments.reverse();
        Some(Journey::from(segments))
    }

    fn segment(&self, dataset: &Dataset, stop: StopIdx, connection: &Connection) -> Segment {
        let target_stop_id = dataset.stop(stop).stop_id.clone();

        match *connection {
            Connection::Transit { boarding_stop, trip_row, departure, arrival } => Segment::Transit {
                trip_id: dataset.stop_times[trip_row].trip_id.clone(),
                source_stop_id: dataset.stop(boarding_stop).stop_id.clone(),
                target_stop_id,
                departure_time: departure,
                arrival_time: arrival,
            },
            Connection::Walk { start, departure, arrival } => Segment::Walk {
                source_stop_id: dataset.stop(start).stop_id.clone(),
                target_stop_id,
                departure_time: departure,
                arrival_time: arrival,
            },
        }
    }
}
