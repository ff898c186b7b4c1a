use common::util::date::Date;
use common::util::time::Time;
use serde::{Deserialize, Serialize};

/// The earliest arrival query asks for the optimal journeys when departing at or after a
/// specified point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    pub source_stop_id: String,
    pub target_stop_id: String,
    pub date: Date,
    pub time: Time,
}
