use clap::{Parser, Subcommand};
use common::util::date::Date;
use common::util::time::Time;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(version, about)]
pub struct BootstrapConfig {
    #[clap(short('c'), long("config"), env("RAPTOR_CONFIG"), default_value_os = "config.yaml")]
    pub config_file: PathBuf,
    #[clap(short('l'), long("log-level"), env("RAPTOR_LOG_LEVEL"), default_value_t, value_enum)]
    pub log_level: LogLevel,
    #[command(subcommand)]
    pub command: Command,
}

impl BootstrapConfig {
    pub fn read() -> Self {
        BootstrapConfig::parse()
    }
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    /// Imports the configured feeds and saves the built dataset
    BuildDataset,
    /// Generates walking transfers between the stops of the configured feeds
    CreateTransfers {
        /// Where the GTFS transfers file is written to
        #[clap(short('o'), long("output"))]
        output: PathBuf,
    },
    /// Finds the journeys that arrive earliest when departing at or after the given time
    Plan {
        source_stop_id: String,
        target_stop_id: String,
        /// YYYY-MM-DD or YYYYMMDD
        date: Date,
        /// HH:MM:SS
        time: Time,
    },
    /// Finds all journeys departing on the given day that aren't beaten by another one
    Range {
        source_stop_id: String,
        target_stop_id: String,
        date: Date,
    },
}

#[derive(clap::ValueEnum, Clone, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}
