//! Raw GTFS records as they come out of the feed files. Every field is kept as a string, parsing
//! and validation happen when a dataset gets built.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    pub stop_lat: String,
    pub stop_lon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_sequence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub service_id: String,
    pub start_date: String,
    pub end_date: String,
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

impl CalendarRecord {
    /// Weekday flags, Sunday first
    pub fn day_of_week(&self) -> [bool; 7] {
        [
            &self.sunday,
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
            &self.saturday,
        ].map(|flag| flag.trim() == "1")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDateRecord {
    pub service_id: String,
    pub date: String,
    /// "1" = service added for that date, anything else = removed
    pub exception_type: String,
}

impl CalendarDateRecord {
    pub fn is_addition(&self) -> bool {
        self.exception_type.trim() == "1"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub min_transfer_time: String,
}

/// All records of one or more feeds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GtfsRecords {
    pub stops: Vec<StopRecord>,
    pub stop_times: Vec<StopTimeRecord>,
    pub trips: Vec<TripRecord>,
    pub calendars: Vec<CalendarRecord>,
    pub calendar_dates: Vec<CalendarDateRecord>,
    pub transfers: Vec<TransferRecord>,
}

impl GtfsRecords {
    pub fn extend(&mut self, other: GtfsRecords) {
        self.stops.extend(other.stops);
        self.stop_times.extend(other.stop_times);
        self.trips.extend(other.trips);
        self.calendars.extend(other.calendars);
        self.calendar_dates.extend(other.calendar_dates);
        self.transfers.extend(other.transfers);
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
            && self.stop_times.is_empty()
            && self.trips.is_empty()
            && self.calendars.is_empty()
            && self.calendar_dates.is_empty()
            && self.transfers.is_empty()
    }
}
