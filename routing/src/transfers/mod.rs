pub mod crow_fly;
pub mod fixed_time;
pub mod noop;

use common::types::gtfs::{StopRecord, TransferRecord};
use serde::{Deserialize, Serialize};

/// Generates the walking connections between stops of a feed
pub trait FootpathProvider {
    /// All footpaths between distinct stops, never from a stop to itself
    fn footpaths(&self, stops: &[StopRecord]) -> Vec<GeneratedFootpath>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFootpath {
    pub from_stop_id: String,
    pub to_stop_id: String,
    /// Seconds
    pub walking_time: u32,
}

/// GTFS transfer_type for transfers that need a minimum amount of time
pub const MIN_TIME_TRANSFER_TYPE: u32 = 2;

impl From<GeneratedFootpath> for TransferRecord {
    fn from(footpath: GeneratedFootpath) -> Self {
        TransferRecord {
            from_stop_id: footpath.from_stop_id,
            to_stop_id: footpath.to_stop_id,
            min_transfer_time: footpath.walking_time.to_string(),
        }
    }
}
