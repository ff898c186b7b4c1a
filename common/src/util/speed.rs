use serde::{Deserialize, Serialize};

/// Walking speed in meters per second
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalkingSpeed(pub f64);

pub const AVG_WALKING_SPEED: WalkingSpeed = WalkingSpeed(1.33);

impl Default for WalkingSpeed {
    fn default() -> Self {
        AVG_WALKING_SPEED
    }
}

impl WalkingSpeed {
    /// Farthest distance in meters that can be covered within `seconds`
    pub fn max_distance(&self, seconds: u32) -> f64 {
        seconds as f64 * self.0
    }

    /// Whole seconds needed to walk `meters`, rounded up
    pub fn time_to_walk(&self, meters: f64) -> u32 {
        (meters / self.0).ceil() as u32
    }
}
