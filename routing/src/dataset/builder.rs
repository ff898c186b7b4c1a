use crate::dataset::{Dataset, Footpath, Route, Service, Stop, StopTime};
use crate::transfers::crow_fly::CrowFlyFootpaths;
use crate::transfers::fixed_time::FixedTimeFootpaths;
use crate::transfers::noop::NoFootpaths;
use crate::transfers::{FootpathProvider, GeneratedFootpath};
use common::types::config::BuildConfig;
use common::types::gtfs::{CalendarDateRecord, CalendarRecord, GtfsRecords, StopRecord, TripRecord};
use common::types::{RouteIdx, StopIdx};
use common::util::date::Date;
use common::util::logging::run_with_spinner;
use common::util::speed::WalkingSpeed;
use common::util::time::Time;
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::str::FromStr;
use xxhash_rust::xxh3::xxh3_128;

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Generate crow-fly footpaths when no transfer records were loaded
    pub footpaths: bool,
    pub avg_walking_speed: WalkingSpeed,
    /// Seconds
    pub max_walking_time: u32,
}

impl BuildOptions {
    pub fn without_footpaths() -> Self {
        Self { footpaths: false, ..Self::default() }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from(&BuildConfig::default())
    }
}

impl From<&BuildConfig> for BuildOptions {
    fn from(config: &BuildConfig) -> Self {
        Self {
            footpaths: config.footpaths,
            avg_walking_speed: config.avg_walking_speed,
            max_walking_time: config.max_walking_time,
        }
    }
}

/// Collects raw records of one or more feeds and flattens them into a [Dataset]
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    records: GtfsRecords,
    dataset: Dataset,
}

/// A stop time whose fields could all be parsed
struct ParsedStopTime<'a> {
    trip_id: &'a str,
    stop_idx: StopIdx,
    sequence: u32,
    arrival_time: Time,
    departure_time: Time,
}

/// Trips that share the same stop sequence
struct TripGroup<'a> {
    route_id: String,
    stop_sequence: Vec<StopIdx>,
    trips: Vec<&'a TripRecord>,
}

impl DatasetBuilder {
    /// Adds records, e.g. of another feed. Nothing is validated until [DatasetBuilder::build].
    pub fn load_records(&mut self, records: GtfsRecords) {
        self.records.extend(records);
    }

    pub fn build(&mut self, options: &BuildOptions) -> &Dataset {
        self.dataset = run_with_spinner("builder", "Building dataset", || {
            build_dataset(&self.records, options)
        });

        info!(
            target: "builder",
            "Dataset has {} stops, {} routes, {} stop times and {} footpaths",
            self.dataset.stops.len(),
            self.dataset.routes.len(),
            self.dataset.stop_times.len(),
            self.dataset.footpaths.len(),
        );

        &self.dataset
    }

    /// The dataset of the last build, empty but well-formed before the first one
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }
}

fn build_dataset(records: &GtfsRecords, options: &BuildOptions) -> Dataset {
    let stops = unique_stops(&records.stops);
    let stop_idx_by_id: HashMap<&str, StopIdx> = stops.iter()
        .enumerate()
        .map(|(idx, stop)| (stop.stop_id.as_str(), StopIdx::from(idx)))
        .collect();

    let stop_times_by_trip = group_stop_times(records, &stop_idx_by_id);
    let groups = group_trips(records, &stop_times_by_trip, &stops);

    let mut dataset = Dataset::default();
    let services = ServiceLookup::new(&records.calendars, &records.calendar_dates);

    for group in &groups {
        dataset.routes.push(Route {
            route_id: group.route_id.clone(),
            number_of_trips: group.trips.len(),
            number_of_services: group.trips.len(),
            number_of_route_stops: group.stop_sequence.len(),
            first_trip_idx: dataset.stop_times.len(),
            first_service_idx: dataset.services.len(),
            first_route_stop_idx: dataset.route_stops.len(),
        });

        for trip in &group.trips {
            // Groups only contain trips that have stop times
            let trip_stop_times = stop_times_by_trip.get(trip.trip_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            dataset.stop_times.extend(trip_stop_times.iter().map(|stop_time| StopTime {
                stop_id: stops[stop_time.stop_idx.idx()].stop_id.clone(),
                trip_id: stop_time.trip_id.to_string(),
                arrival_time: stop_time.arrival_time,
                departure_time: stop_time.departure_time,
            }));
            dataset.services.push(services.service(&trip.service_id));
        }

        dataset.route_stops.extend(group.stop_sequence.iter().copied());
    }

    let footpaths = generate_footpaths(records, options, &stops);
    let mut footpaths_by_stop = group_footpaths(footpaths, &stop_idx_by_id, stops.len());
    let routes_by_stop = routes_by_stop(&groups, stops.len());

    for (idx, stop) in stops.iter().enumerate() {
        let stop_footpaths = std::mem::take(&mut footpaths_by_stop[idx]);
        let stop_routes = &routes_by_stop[idx];

        dataset.stops.push(Stop {
            stop_id: stop.stop_id.clone(),
            number_of_transfers: stop_footpaths.len(),
            number_of_stop_routes: stop_routes.len(),
            first_transfer_idx: dataset.footpaths.len(),
            first_stop_route_idx: dataset.stop_routes.len(),
        });
        dataset.footpaths.extend(stop_footpaths);
        dataset.stop_routes.extend(stop_routes.iter().copied());
    }

    dataset
}

/// The first record of a stop id wins
fn unique_stops(records: &[StopRecord]) -> Vec<StopRecord> {
    let stops = records.iter()
        .unique_by(|stop| stop.stop_id.as_str())
        .cloned()
        .collect_vec();

    if stops.len() < records.len() {
        warn!(target: "builder", "Ignored {} stop records with duplicate stop ids", records.len() - stops.len());
    }

    stops
}

/// Stop times per trip, ordered by stop sequence
fn group_stop_times<'a>(
    records: &'a GtfsRecords,
    stop_idx_by_id: &HashMap<&str, StopIdx>,
) -> HashMap<&'a str, Vec<ParsedStopTime<'a>>> {
    let mut parsed = records.stop_times.iter()
        .filter_map(|record| {
            Some(ParsedStopTime {
                trip_id: record.trip_id.as_str(),
                stop_idx: *stop_idx_by_id.get(record.stop_id.as_str())?,
                sequence: record.stop_sequence.trim().parse().ok()?,
                arrival_time: Time::from_str(&record.arrival_time).ok()?,
                departure_time: Time::from_str(&record.departure_time).ok()?,
            })
        })
        .collect_vec();

    let dropped = records.stop_times.len() - parsed.len();
    if dropped > 0 {
        warn!(target: "builder", "Dropped {dropped} stop times with unknown stops or unparseable fields");
    }

    // stable, so equal sequence numbers keep their record order
    parsed.sort_by_key(|stop_time| stop_time.sequence);

    parsed.into_iter().into_group_map_by(|stop_time| stop_time.trip_id)
        .into_iter()
        .collect()
}

/// Groups trips by their stop sequence, in the order the trips were loaded. The trips of each
/// group are sorted by their departure at the first stop.
fn group_trips<'a>(
    records: &'a GtfsRecords,
    stop_times_by_trip: &HashMap<&str, Vec<ParsedStopTime>>,
    stops: &[StopRecord],
) -> Vec<TripGroup<'a>> {
    let mut groups: Vec<TripGroup> = vec![];
    let mut group_idx_by_route_id: HashMap<String, usize> = HashMap::new();
    let mut seen_trips: HashSet<&str> = HashSet::new();

    for trip in &records.trips {
        if !seen_trips.insert(trip.trip_id.as_str()) {
            debug!(target: "builder", "Ignoring duplicate trip {}", trip.trip_id);
            continue;
        }
        let Some(trip_stop_times) = stop_times_by_trip.get(trip.trip_id.as_str()) else {
            debug!(target: "builder", "Ignoring trip {} without stop times", trip.trip_id);
            continue;
        };

        let stop_sequence = trip_stop_times.iter().map(|stop_time| stop_time.stop_idx).collect_vec();
        let route_id = route_id(stop_sequence.iter().map(|stop| stops[stop.idx()].stop_id.as_str()));

        let group_idx = *group_idx_by_route_id.entry(route_id.clone()).or_insert_with(|| {
            groups.push(TripGroup { route_id, stop_sequence, trips: vec![] });
            groups.len() - 1
        });
        groups[group_idx].trips.push(trip);
    }

    for group in groups.iter_mut() {
        group.trips.sort_by_key(|trip| {
            stop_times_by_trip.get(trip.trip_id.as_str())
                .and_then(|stop_times| stop_times.first())
                .map(|first| first.departure_time)
        });
    }

    groups
}

/// Content hash of a stop sequence, equal sequences get equal ids
fn route_id<'a>(stop_ids: impl Iterator<Item = &'a str>) -> String {
    let joined = stop_ids.collect_vec().join("-");
    format!("{:032x}", xxh3_128(joined.as_bytes()))
}

/// Calendar rows and exceptions by service id
struct ServiceLookup<'a> {
    calendars: HashMap<&'a str, &'a CalendarRecord>,
    /// (include, exclude)
    exceptions: HashMap<&'a str, (BTreeMap<u32, bool>, BTreeMap<u32, bool>)>,
}

impl<'a> ServiceLookup<'a> {
    fn new(calendars: &'a [CalendarRecord], calendar_dates: &'a [CalendarDateRecord]) -> Self {
        let mut by_service: HashMap<&str, &CalendarRecord> = HashMap::new();
        for calendar in calendars {
            by_service.entry(calendar.service_id.as_str()).or_insert(calendar);
        }

        let mut exceptions: HashMap<&str, (BTreeMap<u32, bool>, BTreeMap<u32, bool>)> = HashMap::new();
        for calendar_date in calendar_dates {
            let Ok(date) = Date::from_str(&calendar_date.date) else {
                debug!(target: "builder", "Ignoring calendar date with invalid date {}", calendar_date.date);
                continue;
            };
            let (include, exclude) = exceptions.entry(calendar_date.service_id.as_str()).or_default();
            if calendar_date.is_addition() {
                include.insert(date.to_number(), true);
            } else {
                exclude.insert(date.to_number(), true);
            }
        }

        Self { calendars: by_service, exceptions }
    }

    fn service(&self, service_id: &str) -> Service {
        let calendar = self.calendars.get(service_id);
        let parse_date = |value: &str| Date::from_str(value).ok().map(|date| date.to_number());

        let (include, exclude) = self.exceptions.get(service_id).cloned().unwrap_or_default();

        Service {
            service_id: service_id.to_string(),
            start_date: calendar.and_then(|calendar| parse_date(&calendar.start_date)).unwrap_or(0),
            end_date: calendar.and_then(|calendar| parse_date(&calendar.end_date)).unwrap_or(u32::MAX),
            day_of_week: calendar.map(|calendar| calendar.day_of_week()).unwrap_or_default(),
            exclude,
            include,
        }
    }
}

fn generate_footpaths(records: &GtfsRecords, options: &BuildOptions, stops: &[StopRecord]) -> Vec<GeneratedFootpath> {
    let provider: Box<dyn FootpathProvider> = if !records.transfers.is_empty() {
        info!(target: "builder", "Using {} precomputed transfers as footpaths", records.transfers.len());
        Box::new(FixedTimeFootpaths::from(records.transfers.clone()))
    } else if options.footpaths {
        Box::new(CrowFlyFootpaths {
            walking_speed: options.avg_walking_speed,
            max_walking_time: options.max_walking_time,
        })
    } else {
        Box::new(NoFootpaths)
    };

    provider.footpaths(stops)
}

/// Footpaths leaving each stop, sorted by target stop id
fn group_footpaths(
    footpaths: Vec<GeneratedFootpath>,
    stop_idx_by_id: &HashMap<&str, StopIdx>,
    num_stops: usize,
) -> Vec<Vec<Footpath>> {
    let mut by_stop: Vec<Vec<Footpath>> = vec![vec![]; num_stops];

    for footpath in footpaths {
        let from = stop_idx_by_id.get(footpath.from_stop_id.as_str());
        let to = stop_idx_by_id.get(footpath.to_stop_id.as_str());
        let (Some(from), Some(to)) = (from, to) else {
            debug!(
                target: "builder", "Ignoring footpath between unknown stops {} and {}",
                footpath.from_stop_id, footpath.to_stop_id
            );
            continue;
        };

        by_stop[from.idx()].push(Footpath {
            target_stop_id: footpath.to_stop_id,
            target_stop_idx: *to,
            walking_time: footpath.walking_time,
        });
    }

    for footpaths in by_stop.iter_mut() {
        footpaths.sort_by(|a, b| a.target_stop_id.cmp(&b.target_stop_id));
        // One footpath per target, the first one loaded wins
        footpaths.dedup_by(|next, previous| next.target_stop_idx == previous.target_stop_idx);
    }

    by_stop
}

/// Routes serving each stop, each route listed once per stop
fn routes_by_stop(groups: &[TripGroup], num_stops: usize) -> Vec<Vec<RouteIdx>> {
    let mut by_stop: Vec<Vec<RouteIdx>> = vec![vec![]; num_stops];

    for (idx, group) in groups.iter().enumerate() {
        let route = RouteIdx::from(idx);
        for stop in &group.stop_sequence {
            let routes = &mut by_stop[stop.idx()];
            if routes.last() != Some(&route) {
                routes.push(route);
            }
        }
    }

    by_stop
}
