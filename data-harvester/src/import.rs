use crate::gtfs_file::{CALENDAR, CALENDAR_DATES, STOPS, STOP_TIMES, TRANSFERS, TRIPS};
use common::types::gtfs::{
    CalendarDateRecord, CalendarRecord, GtfsRecords, StopRecord, StopTimeRecord, TransferRecord, TripRecord,
};
use common::util::logging::run_with_spinner;
use log::info;
use rayon::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::{fmt, io};

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    Io(#[from] io::Error),
    Polars(#[from] polars::error::PolarsError),
    MissingColumn { file: &'static str, column: &'static str },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            ImportError::Io(err) => err,
            ImportError::Polars(err) => err,
            ImportError::MissingColumn { file, column } => {
                return write!(f, "Missing column {column} in {file}");
            }
        };
        write!(f, "{}", err)
    }
}

/// Reads the records of a GTFS feed directory. Files the planner doesn't need are ignored.
pub fn import_feed(dir: &Path) -> ImportResult<GtfsRecords> {
    let records = GtfsRecords {
        stops: STOPS.read_from(dir)?
            .into_iter()
            .map(|[stop_id, stop_lat, stop_lon]| StopRecord { stop_id, stop_lat, stop_lon })
            .collect(),
        stop_times: STOP_TIMES.read_from(dir)?
            .into_iter()
            .map(|[trip_id, stop_id, arrival_time, departure_time, stop_sequence]| StopTimeRecord {
                trip_id,
                stop_id,
                arrival_time,
                departure_time,
                stop_sequence,
            })
            .collect(),
        trips: TRIPS.read_from(dir)?
            .into_iter()
            .map(|[route_id, service_id, trip_id]| TripRecord { route_id, service_id, trip_id })
            .collect(),
        calendars: CALENDAR.read_from(dir)?
            .into_iter()
            .map(|[service_id, start_date, end_date, monday, tuesday, wednesday, thursday, friday, saturday, sunday]| {
                CalendarRecord {
                    service_id,
                    start_date,
                    end_date,
                    monday,
                    tuesday,
                    wednesday,
                    thursday,
                    friday,
                    saturday,
                    sunday,
                }
            })
            .collect(),
        calendar_dates: CALENDAR_DATES.read_from(dir)?
            .into_iter()
            .map(|[service_id, date, exception_type]| CalendarDateRecord { service_id, date, exception_type })
            .collect(),
        transfers: TRANSFERS.read_from(dir)?
            .into_iter()
            .map(transfer_record)
            .collect(),
    };

    info!(
        target: "import",
        "Imported {} stops, {} trips and {} stop times from {}",
        records.stops.len(), records.trips.len(), records.stop_times.len(), dir.display()
    );
    Ok(records)
}

/// Imports all feeds in parallel. Records are merged in the order of `dirs`.
pub fn import_feeds(dirs: &[PathBuf]) -> ImportResult<GtfsRecords> {
    run_with_spinner("import", "Importing feeds", || {
        let feeds = dirs.par_iter()
            .map(|dir| import_feed(dir))
            .collect::<ImportResult<Vec<GtfsRecords>>>()?;

        let mut records = GtfsRecords::default();
        for feed in feeds {
            records.extend(feed);
        }
        Ok(records)
    })
}

/// Reads a standalone transfers file, e.g. one written by [crate::export::export_transfers]
pub fn import_transfers(path: &Path) -> ImportResult<Vec<TransferRecord>> {
    let transfers: Vec<TransferRecord> = TRANSFERS.read(path)?
        .into_iter()
        .map(transfer_record)
        .collect();

    info!(target: "import", "Imported {} transfers from {}", transfers.len(), path.display());
    Ok(transfers)
}

fn transfer_record([from_stop_id, to_stop_id, min_transfer_time]: [String; 3]) -> TransferRecord {
    TransferRecord { from_stop_id, to_stop_id, min_transfer_time }
}
