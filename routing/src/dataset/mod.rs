//! The flattened, index-addressed timetable the planner runs on.
//!
//! Relationships between entities are expressed as ranges into the flat sequences
//! (`first_*_idx` + `number_of_*`), so a stop's routes are
//! `stop_routes[first_stop_route_idx..first_stop_route_idx + number_of_stop_routes]` and so on.

use common::types::{RouteIdx, StopIdx};
use common::util::date::Date;
use common::util::time::Time;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

pub mod builder;
pub mod persistence;
mod validate;

pub use validate::DatasetError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub stop_id: String,
    pub number_of_transfers: usize,
    pub number_of_stop_routes: usize,
    pub first_transfer_idx: usize,
    pub first_stop_route_idx: usize,
}

/// A set of trips that visit exactly the same stop sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Hash of the stop sequence, not the feed's route id
    pub route_id: String,
    pub number_of_trips: usize,
    pub number_of_services: usize,
    pub number_of_route_stops: usize,
    pub first_trip_idx: usize,
    pub first_service_idx: usize,
    pub first_route_stop_idx: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTime {
    pub stop_id: String,
    pub trip_id: String,
    pub arrival_time: Time,
    pub departure_time: Time,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footpath {
    pub target_stop_id: String,
    pub target_stop_idx: StopIdx,
    /// Seconds
    pub walking_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_id: String,
    /// YYYYMMDD, 0 if the service has no calendar
    pub start_date: u32,
    /// YYYYMMDD, u32::MAX if the service has no calendar
    pub end_date: u32,
    /// Sunday first
    pub day_of_week: [bool; 7],
    #[serde(with = "persistence::tagged_map")]
    pub exclude: BTreeMap<u32, bool>,
    #[serde(with = "persistence::tagged_map")]
    pub include: BTreeMap<u32, bool>,
}

impl Service {
    /// Explicit additions win over explicit removals, which win over the weekly pattern
    pub fn runs_on(&self, date: Date) -> bool {
        let date_number = date.to_number();

        if self.include.get(&date_number).copied().unwrap_or(false) {
            return true;
        }
        if self.exclude.get(&date_number).copied().unwrap_or(false) {
            return false;
        }

        self.start_date <= date_number
            && date_number <= self.end_date
            && self.day_of_week[date.day_of_week()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub routes: Vec<Route>,
    pub stop_times: Vec<StopTime>,
    pub stops: Vec<Stop>,
    pub footpaths: Vec<Footpath>,
    pub route_stops: Vec<StopIdx>,
    pub stop_routes: Vec<RouteIdx>,
    pub services: Vec<Service>,
}

fn range(first: usize, len: usize) -> Range<usize> {
    first..first + len
}

impl Dataset {
    pub fn stop(&self, stop: StopIdx) -> &Stop {
        &self.stops[stop.idx()]
    }

    pub fn route(&self, route: RouteIdx) -> &Route {
        &self.routes[route.idx()]
    }

    /// Stops of a route in travel order
    pub fn route_stops_of(&self, route: RouteIdx) -> &[StopIdx] {
        let route = self.route(route);
        &self.route_stops[range(route.first_route_stop_idx, route.number_of_route_stops)]
    }

    pub fn stop_routes_of(&self, stop: StopIdx) -> &[RouteIdx] {
        let stop = self.stop(stop);
        &self.stop_routes[range(stop.first_stop_route_idx, stop.number_of_stop_routes)]
    }

    pub fn footpaths_of(&self, stop: StopIdx) -> &[Footpath] {
        let stop = self.stop(stop);
        &self.footpaths[range(stop.first_transfer_idx, stop.number_of_transfers)]
    }

    /// One service per trip, in trip order
    pub fn services_of(&self, route: RouteIdx) -> &[Service] {
        let route = self.route(route);
        &self.services[range(route.first_service_idx, route.number_of_services)]
    }

    /// Index into `stop_times` of the first stop of a trip
    pub fn trip_row(&self, route: RouteIdx, trip_offset: usize) -> usize {
        let route = self.route(route);
        route.first_trip_idx + trip_offset * route.number_of_route_stops
    }

    pub fn stop_time(&self, route: RouteIdx, trip_offset: usize, position: usize) -> &StopTime {
        &self.stop_times[self.trip_row(route, trip_offset) + position]
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.routes.is_empty()
    }
}
