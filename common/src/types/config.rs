use crate::util::speed::WalkingSpeed;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1")]
    Version1 {
        /// Directories that contain the GTFS text files of one feed each
        feeds: Vec<PathBuf>,
        /// Where the built dataset is stored
        dataset: PathBuf,
        /// Precomputed footpaths in GTFS transfers format
        #[serde(default)]
        transfers: Option<PathBuf>,
        #[serde(default)]
        build: BuildConfig,
        #[serde(default)]
        planner: PlannerConfig,
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    #[serde(default = "default_footpaths")]
    pub footpaths: bool,
    #[serde(default)]
    pub avg_walking_speed: WalkingSpeed,
    /// Seconds
    #[serde(default = "default_max_walking_time")]
    pub max_walking_time: u32,
}

fn default_footpaths() -> bool {
    true
}

fn default_max_walking_time() -> u32 {
    300
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            footpaths: default_footpaths(),
            avg_walking_speed: WalkingSpeed::default(),
            max_walking_time: default_max_walking_time(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlannerConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_max_days")]
    pub max_days: usize,
}

fn default_max_rounds() -> usize {
    10
}

fn default_max_days() -> usize {
    1
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_days: default_max_days(),
        }
    }
}
