use crate::PlannerError;
use common::types::config::{BuildConfig, PlannerConfig};
use common::types::gtfs::TransferRecord;
use common::util::date::Date;
use common::util::time::Time;
use data_harvester::export::export_transfers;
use data_harvester::import::{import_feeds, import_transfers};
use log::{info, warn};
use routing::algorithms::queries::earliest_arrival::PlanQuery;
use routing::algorithms::queries::range::RangeQuery;
use routing::algorithms::RoutingAlgorithm;
use routing::dataset::builder::{BuildOptions, DatasetBuilder};
use routing::dataset::Dataset;
use routing::journey::Journey;
use routing::raptor::{RaptorAlgorithm, RaptorParams};
use routing::transfers::crow_fly::CrowFlyFootpaths;
use routing::transfers::FootpathProvider;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub(crate) fn build_dataset(
    feeds: &[PathBuf],
    transfers: Option<&Path>,
    build: &BuildConfig,
    dataset_path: &Path,
) -> Result<(), PlannerError> {
    let mut records = import_feeds(feeds)?;
    if let Some(transfers) = transfers {
        records.transfers.extend(import_transfers(transfers)?);
    }
    if records.is_empty() {
        warn!(target: "main", "The configured feeds contain no records");
    }

    let mut builder = DatasetBuilder::default();
    builder.load_records(records);
    let dataset = builder.build(&BuildOptions::from(build));

    dataset.save_to_disk(dataset_path)?;
    info!(target: "main", "Dataset saved to {}", dataset_path.display());
    Ok(())
}

pub(crate) fn create_transfers(feeds: &[PathBuf], build: &BuildConfig, output: &Path) -> Result<(), PlannerError> {
    let records = import_feeds(feeds)?;

    let provider = CrowFlyFootpaths {
        walking_speed: build.avg_walking_speed,
        max_walking_time: build.max_walking_time,
    };
    let transfers: Vec<TransferRecord> = provider.footpaths(&records.stops)
        .into_iter()
        .map(TransferRecord::from)
        .collect();

    export_transfers(&transfers, output)?;
    Ok(())
}

fn load_planner(dataset_path: &Path, planner: &PlannerConfig) -> Result<RaptorAlgorithm, PlannerError> {
    let dataset = Dataset::load_from_disk(dataset_path)?;
    Ok(RaptorAlgorithm::new(Arc::new(dataset), RaptorParams::from(planner))?)
}

pub(crate) fn plan(
    dataset_path: &Path,
    planner: &PlannerConfig,
    source_stop_id: String,
    target_stop_id: String,
    date: Date,
    time: Time,
) -> Result<(), PlannerError> {
    let algorithm = load_planner(dataset_path, planner)?;
    let journeys = algorithm.plan(PlanQuery { source_stop_id, target_stop_id, date, time })?;

    info!(target: "main", "Found {} journeys", journeys.len());
    write_journeys(std::io::stdout().lock(), &journeys)
}

pub(crate) fn range(
    dataset_path: &Path,
    planner: &PlannerConfig,
    source_stop_id: String,
    target_stop_id: String,
    date: Date,
) -> Result<(), PlannerError> {
    let algorithm = load_planner(dataset_path, planner)?;
    let journeys = algorithm.range(RangeQuery { source_stop_id, target_stop_id, date })?;

    info!(target: "main", "Found {} journeys", journeys.len());
    write_journeys(std::io::stdout().lock(), &journeys)
}

fn write_journeys<W: Write>(mut writer: W, journeys: &[Journey]) -> Result<(), PlannerError> {
    serde_json::to_writer_pretty(&mut writer, journeys)?;
    writeln!(writer)?;
    Ok(())
}
