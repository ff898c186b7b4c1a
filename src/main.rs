pub mod bootstrap_config;
mod commands;
mod config;

use crate::config::load_config;
use bootstrap_config::{BootstrapConfig, Command};
use common::types::config::Config;
use common::util::logging;
use data_harvester::import::ImportError;
use log::{debug, error};
use routing::algorithms::errors::QueryError;
use routing::dataset::persistence::PersistenceError;
use routing::dataset::DatasetError;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "main", "{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), PlannerError> {
    let bootstrap_config = BootstrapConfig::read();

    logging::initialize_logging(bootstrap_config.log_level.clone().into());
    debug!(target: "main", "Using config file {}", bootstrap_config.config_file.display());

    let Config::Version1 { feeds, dataset, transfers, build, planner } = load_config(&bootstrap_config.config_file)?;

    match bootstrap_config.command {
        Command::BuildDataset => commands::build_dataset(&feeds, transfers.as_deref(), &build, &dataset),
        Command::CreateTransfers { output } => commands::create_transfers(&feeds, &build, &output),
        Command::Plan { source_stop_id, target_stop_id, date, time } => {
            commands::plan(&dataset, &planner, source_stop_id, target_stop_id, date, time)
        }
        Command::Range { source_stop_id, target_stop_id, date } => {
            commands::range(&dataset, &planner, source_stop_id, target_stop_id, date)
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PlannerError {
    Config(#[from] config::ConfigError),
    Import(#[from] ImportError),
    Persistence(#[from] PersistenceError),
    Dataset(#[from] DatasetError),
    Query(#[from] QueryError),
    Output(#[from] serde_json::Error),
    IO(#[from] std::io::Error),
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let err: &dyn Display = match self {
            PlannerError::Config(err) => err,
            PlannerError::Import(err) => err,
            PlannerError::Persistence(err) => err,
            PlannerError::Dataset(err) => err,
            PlannerError::Query(err) => err,
            PlannerError::Output(err) => err,
            PlannerError::IO(err) => err,
        };
        let prefix = match self {
            PlannerError::Config(_) => "Reading config file",
            PlannerError::Import(_) => "Importing feeds",
            PlannerError::Persistence(_) => "Reading or writing the dataset",
            PlannerError::Dataset(_) => "Checking the dataset",
            PlannerError::Query(_) => "Answering the query",
            PlannerError::Output(_) => "Writing journeys",
            PlannerError::IO(_) => "Error during IO",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
