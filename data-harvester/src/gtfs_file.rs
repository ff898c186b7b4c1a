use crate::import::{ImportError, ImportResult};
use log::debug;
use polars::prelude::{LazyCsvReader, LazyFileListReader, StringChunked};
use std::path::Path;

/// A GTFS text file and the columns read from it. The first `required` columns must be present,
/// the others are read as empty strings if they are missing.
#[derive(Debug)]
pub(crate) struct GtfsFile<const N: usize> {
    pub(crate) name: &'static str,
    pub(crate) columns: [&'static str; N],
    pub(crate) required: usize,
}

pub(crate) const STOPS: GtfsFile<3> = GtfsFile {
    name: "stops.txt",
    columns: ["stop_id", "stop_lat", "stop_lon"],
    required: 3,
};

pub(crate) const STOP_TIMES: GtfsFile<5> = GtfsFile {
    name: "stop_times.txt",
    columns: ["trip_id", "stop_id", "arrival_time", "departure_time", "stop_sequence"],
    required: 5,
};

pub(crate) const TRIPS: GtfsFile<3> = GtfsFile {
    name: "trips.txt",
    columns: ["route_id", "service_id", "trip_id"],
    required: 3,
};

pub(crate) const CALENDAR: GtfsFile<10> = GtfsFile {
    name: "calendar.txt",
    columns: [
        "service_id",
        "start_date",
        "end_date",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ],
    required: 10,
};

pub(crate) const CALENDAR_DATES: GtfsFile<3> = GtfsFile {
    name: "calendar_dates.txt",
    columns: ["service_id", "date", "exception_type"],
    required: 3,
};

pub(crate) const TRANSFERS: GtfsFile<3> = GtfsFile {
    name: "transfers.txt",
    columns: ["from_stop_id", "to_stop_id", "min_transfer_time"],
    required: 2,
};

impl<const N: usize> GtfsFile<N> {
    /// Reads the file from a feed directory
    pub(crate) fn read_from(&self, dir: &Path) -> ImportResult<Vec<[String; N]>> {
        self.read(&dir.join(self.name))
    }

    /// Reads the rows of the file, with values in the order of `columns`. Missing or empty
    /// files yield no rows.
    pub(crate) fn read(&self, path: &Path) -> ImportResult<Vec<[String; N]>> {
        if !path.is_file() || path.metadata()?.len() == 0 {
            debug!(target: "import", "No {} at {}", self.name, path.display());
            return Ok(vec![]);
        }

        // An inferred schema length of 0 reads all columns as strings
        let frame = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        let names: Vec<String> = frame.get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let mut columns: Vec<Option<&StringChunked>> = Vec::with_capacity(N);
        for (idx, column) in self.columns.into_iter().enumerate() {
            // Headers may carry a byte order mark or padding
            let actual = names.iter()
                .find(|name| name.trim_start_matches('\u{feff}').trim() == column);

            match actual {
                Some(actual) => columns.push(Some(frame.column(actual)?.str()?)),
                None if idx < self.required => {
                    return Err(ImportError::MissingColumn { file: self.name, column });
                }
                None => columns.push(None),
            }
        }

        let rows = (0..frame.height())
            .map(|row| {
                std::array::from_fn(|idx| {
                    columns[idx]
                        .and_then(|values| values.get(row))
                        .unwrap_or_default()
                        .trim()
                        .to_string()
                })
            })
            .collect::<Vec<_>>();

        debug!(target: "import", "Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}
