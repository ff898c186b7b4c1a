use crate::dataset::{Dataset, DatasetError};
use common::types::config::PlannerConfig;
use common::types::errors::UnknownStopIdError;
use common::types::StopIdx;
use hashbrown::HashMap;
use std::sync::Arc;

mod routing;
mod state;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaptorParams {
    /// Upper bound for the number of trips a journey may board
    pub max_rounds: usize,
    /// How many days (including the query date) are searched for a trip to board
    pub max_days: usize,
}

impl Default for RaptorParams {
    fn default() -> Self {
        Self::from(&PlannerConfig::default())
    }
}

impl From<&PlannerConfig> for RaptorParams {
    fn from(config: &PlannerConfig) -> Self {
        Self { max_rounds: config.max_rounds, max_days: config.max_days }
    }
}

pub struct RaptorAlgorithm {
    pub(crate) dataset: Arc<Dataset>,
    pub(crate) params: RaptorParams,
    pub(crate) stop_mapping: StopMapping,
}

impl RaptorAlgorithm {
    /// Fails if the dataset violates one of the structural invariants the algorithm relies on
    pub fn new(dataset: Arc<Dataset>, params: RaptorParams) -> Result<Self, DatasetError> {
        dataset.validate()?;
        let stop_mapping = StopMapping::new(&dataset);

        Ok(Self { dataset, params, stop_mapping })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn params(&self) -> RaptorParams {
        self.params
    }

    pub(crate) fn num_stops(&self) -> usize {
        self.dataset.stops.len()
    }
}

/// Queries name stops by their feed ids, the algorithm works on stop indices. The dataset maps
/// indices to ids, this maps ids back to indices.
#[derive(Debug)]
pub(crate) struct StopMapping(HashMap<String, StopIdx>);

impl StopMapping {
    fn new(dataset: &Dataset) -> Self {
        Self(
            dataset.stops.iter()
                .enumerate()
                .map(|(idx, stop)| (stop.stop_id.clone(), StopIdx::from(idx)))
                .collect()
        )
    }

    pub(crate) fn translate_to_local(&self, stop_id: &str) -> Result<StopIdx, UnknownStopIdError> {
        self.0.get(stop_id)
            .copied()
            .ok_or_else(|| UnknownStopIdError(stop_id.to_string()))
    }
}
