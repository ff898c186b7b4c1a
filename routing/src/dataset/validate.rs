use super::Dataset;
use common::types::{RouteIdx, StopIdx};
use hashbrown::HashSet;
use std::fmt;
use std::fmt::Display;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// A `first_*_idx`/`number_of_*` pair of a stop doesn't continue where the previous stop ended
    BrokenStopRange { stop: StopIdx, sequence: &'static str },
    /// The stop ranges don't cover the whole sequence
    IncompleteStopRanges { sequence: &'static str, covered: usize, len: usize },
    BrokenRouteRange { route: RouteIdx, sequence: &'static str },
    IncompleteRouteRanges { sequence: &'static str, covered: usize, len: usize },
    ServiceCountMismatch(RouteIdx),
    StopOutOfBounds(StopIdx),
    RouteOutOfBounds(RouteIdx),
    DuplicateStopId(String),
    FootpathTargetMismatch { stop: StopIdx, target: StopIdx },
    TripStopMismatch { route: RouteIdx, row: usize },
    UnsortedTrips(RouteIdx),
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DatasetError::BrokenStopRange { stop, sequence } =>
                write!(f, "Range of stop {stop} into {sequence} does not continue the previous one"),
            DatasetError::IncompleteStopRanges { sequence, covered, len } =>
                write!(f, "Stops cover {covered} entries of {sequence}, but it has {len}"),
            DatasetError::BrokenRouteRange { route, sequence } =>
                write!(f, "Range of route {route} into {sequence} does not continue the previous one"),
            DatasetError::IncompleteRouteRanges { sequence, covered, len } =>
                write!(f, "Routes cover {covered} entries of {sequence}, but it has {len}"),
            DatasetError::ServiceCountMismatch(route) =>
                write!(f, "Route {route} does not have exactly one service per trip"),
            DatasetError::StopOutOfBounds(stop) => write!(f, "Stop index {stop} is out of bounds"),
            DatasetError::RouteOutOfBounds(route) => write!(f, "Route index {route} is out of bounds"),
            DatasetError::DuplicateStopId(stop_id) => write!(f, "Stop ID {stop_id} is not unique"),
            DatasetError::FootpathTargetMismatch { stop, target } =>
                write!(f, "Footpath from {stop} names a target stop id that is not the id of stop {target}"),
            DatasetError::TripStopMismatch { route, row } =>
                write!(f, "Stop time {row} of route {route} does not follow the route's stop sequence"),
            DatasetError::UnsortedTrips(route) =>
                write!(f, "Trips of route {route} are not sorted by departure"),
        }
    }
}

/// Walks consecutive `(first, len)` ranges and checks that they partition `0..total`
struct Partition {
    next: usize,
}

impl Partition {
    fn new() -> Self {
        Self { next: 0 }
    }

    fn advance(&mut self, first: usize, len: usize) -> bool {
        if first != self.next {
            return false;
        }
        self.next = first + len;
        true
    }
}

impl Dataset {
    /// Checks all structural invariants the planner relies on
    pub fn validate(&self) -> Result<(), DatasetError> {
        self.validate_stops()?;
        self.validate_routes()?;
        self.validate_trips()?;
        Ok(())
    }

    fn validate_stops(&self) -> Result<(), DatasetError> {
        let mut stop_ids = HashSet::with_capacity(self.stops.len());
        let mut footpath_ranges = Partition::new();
        let mut stop_route_ranges = Partition::new();

        for (idx, stop) in self.stops.iter().enumerate() {
            let stop_idx = StopIdx::from(idx);

            if !stop_ids.insert(stop.stop_id.as_str()) {
                return Err(DatasetError::DuplicateStopId(stop.stop_id.clone()));
            }
            if !footpath_ranges.advance(stop.first_transfer_idx, stop.number_of_transfers) {
                return Err(DatasetError::BrokenStopRange { stop: stop_idx, sequence: "footpaths" });
            }
            if !stop_route_ranges.advance(stop.first_stop_route_idx, stop.number_of_stop_routes) {
                return Err(DatasetError::BrokenStopRange { stop: stop_idx, sequence: "stop_routes" });
            }
        }

        if footpath_ranges.next != self.footpaths.len() {
            return Err(DatasetError::IncompleteStopRanges {
                sequence: "footpaths", covered: footpath_ranges.next, len: self.footpaths.len(),
            });
        }
        if stop_route_ranges.next != self.stop_routes.len() {
            return Err(DatasetError::IncompleteStopRanges {
                sequence: "stop_routes", covered: stop_route_ranges.next, len: self.stop_routes.len(),
            });
        }

        for (idx, stop) in self.stops.iter().enumerate() {
            let stop_idx = StopIdx::from(idx);
            for footpath in self.footpaths_of(stop_idx) {
                let target = self.stops.get(footpath.target_stop_idx.idx())
                    .ok_or(DatasetError::StopOutOfBounds(footpath.target_stop_idx))?;
                if target.stop_id != footpath.target_stop_id {
                    return Err(DatasetError::FootpathTargetMismatch {
                        stop: stop_idx, target: footpath.target_stop_idx,
                    });
                }
            }
            debug_assert_eq!(stop.number_of_stop_routes, self.stop_routes_of(stop_idx).len());
        }

        if let Some(route) = self.stop_routes.iter().find(|route| route.idx() >= self.routes.len()) {
            return Err(DatasetError::RouteOutOfBounds(*route));
        }

        Ok(())
    }

    fn validate_routes(&self) -> Result<(), DatasetError> {
        let mut route_stop_ranges = Partition::new();
        let mut trip_ranges = Partition::new();
        let mut service_ranges = Partition::new();

        for (idx, route) in self.routes.iter().enumerate() {
            let route_idx = RouteIdx::from(idx);

            if route.number_of_services != route.number_of_trips {
                return Err(DatasetError::ServiceCountMismatch(route_idx));
            }
            if !route_stop_ranges.advance(route.first_route_stop_idx, route.number_of_route_stops) {
                return Err(DatasetError::BrokenRouteRange { route: route_idx, sequence: "route_stops" });
            }
            if !trip_ranges.advance(route.first_trip_idx, route.number_of_trips * route.number_of_route_stops) {
                return Err(DatasetError::BrokenRouteRange { route: route_idx, sequence: "stop_times" });
            }
            if !service_ranges.advance(route.first_service_idx, route.number_of_services) {
                return Err(DatasetError::BrokenRouteRange { route: route_idx, sequence: "services" });
            }
        }

        let totals = [
            ("route_stops", route_stop_ranges.next, self.route_stops.len()),
            ("stop_times", trip_ranges.next, self.stop_times.len()),
            ("services", service_ranges.next, self.services.len()),
        ];
        for (sequence, covered, len) in totals {
            if covered != len {
                return Err(DatasetError::IncompleteRouteRanges { sequence, covered, len });
            }
        }

        if let Some(stop) = self.route_stops.iter().find(|stop| stop.idx() >= self.stops.len()) {
            return Err(DatasetError::StopOutOfBounds(*stop));
        }

        Ok(())
    }

    /// Requires validated routes, otherwise indexing might go out of bounds
    fn validate_trips(&self) -> Result<(), DatasetError> {
        for (idx, route) in self.routes.iter().enumerate() {
            let route_idx = RouteIdx::from(idx);
            let route_stops = self.route_stops_of(route_idx);

            for trip_offset in 0..route.number_of_trips {
                let row = self.trip_row(route_idx, trip_offset);
                for (position, stop) in route_stops.iter().enumerate() {
                    if self.stop_times[row + position].stop_id != self.stop(*stop).stop_id {
                        return Err(DatasetError::TripStopMismatch { route: route_idx, row: row + position });
                    }
                }
            }

            if route.number_of_route_stops == 0 {
                continue;
            }
            let sorted = (1..route.number_of_trips).all(|trip_offset| {
                self.stop_time(route_idx, trip_offset - 1, 0).departure_time
                    <= self.stop_time(route_idx, trip_offset, 0).departure_time
            });
            if !sorted {
                return Err(DatasetError::UnsortedTrips(route_idx));
            }
        }

        Ok(())
    }
}
