use crate::transfers::{FootpathProvider, GeneratedFootpath};
use common::types::gtfs::{StopRecord, TransferRecord};
use log::warn;

/// Don't calculate any walking time, instead use precalculated transfer records.
/// Useful if footpaths were generated beforehand or come with the feed. Walking times may be
/// asymmetric (a -> b taking a different time than b -> a).
#[derive(Debug, Clone, Default)]
pub struct FixedTimeFootpaths {
    transfers: Vec<TransferRecord>,
}

impl From<Vec<TransferRecord>> for FixedTimeFootpaths {
    fn from(transfers: Vec<TransferRecord>) -> Self {
        Self { transfers }
    }
}

impl FootpathProvider for FixedTimeFootpaths {
    /// Stops are not needed, the records already name both ends of each footpath
    fn footpaths(&self, _stops: &[StopRecord]) -> Vec<GeneratedFootpath> {
        let footpaths: Vec<GeneratedFootpath> = self.transfers.iter()
            .filter(|transfer| transfer.from_stop_id != transfer.to_stop_id)
            .filter_map(|transfer| {
                let walking_time = transfer.min_transfer_time.trim().parse::<u32>().ok()?;
                Some(GeneratedFootpath {
                    from_stop_id: transfer.from_stop_id.clone(),
                    to_stop_id: transfer.to_stop_id.clone(),
                    walking_time,
                })
            })
            .collect();

        let dropped = self.transfers.len() - footpaths.len();
        if dropped > 0 {
            warn!(target: "footpaths", "Dropped {dropped} transfer records without a usable walking time");
        }

        footpaths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(from: &str, to: &str, time: &str) -> TransferRecord {
        TransferRecord { from_stop_id: from.into(), to_stop_id: to.into(), min_transfer_time: time.into() }
    }

    #[test]
    fn test_records_become_footpaths() {
        let provider = FixedTimeFootpaths::from(vec![
            transfer("a", "b", "120"),
            transfer("b", "a", " 90 "),
        ]);

        let footpaths = provider.footpaths(&[]);
        assert_eq!(footpaths, vec![
            GeneratedFootpath { from_stop_id: "a".into(), to_stop_id: "b".into(), walking_time: 120 },
            GeneratedFootpath { from_stop_id: "b".into(), to_stop_id: "a".into(), walking_time: 90 },
        ]);
    }

    #[test]
    fn test_unusable_records_are_dropped() {
        let provider = FixedTimeFootpaths::from(vec![
            transfer("a", "a", "0"),
            transfer("a", "b", ""),
            transfer("a", "c", "-5"),
            transfer("a", "d", "30"),
        ]);

        let footpaths = provider.footpaths(&[]);
        assert_eq!(footpaths.len(), 1);
        assert_eq!(footpaths[0].to_stop_id, "d");
    }
}
