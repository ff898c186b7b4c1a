use common::types::config::Config;
use log::info;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::path::Path;
use std::{fmt, io};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    Io(#[from] io::Error),
    Yaml(#[from] serde_yml::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let err: &dyn Display = match self {
            ConfigError::Io(err) => err,
            ConfigError::Yaml(err) => err,
        };
        write!(f, "{}", err)
    }
}

pub(super) fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_file = File::open(path)?;
    let config: Config = serde_yml::from_reader(config_file)?;

    info!(target: "main", "Config read successfully from '{}'", path.display());

    Ok(config)
}
