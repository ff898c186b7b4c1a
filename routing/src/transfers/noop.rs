use crate::transfers::{FootpathProvider, GeneratedFootpath};
use common::types::gtfs::StopRecord;

/// Doesn't generate any footpaths, journeys can then only change trips at the very same stop
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFootpaths;

impl FootpathProvider for NoFootpaths {
    fn footpaths(&self, _stops: &[StopRecord]) -> Vec<GeneratedFootpath> {
        vec![]
    }
}
