use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod config;
pub mod errors;
pub mod gtfs;

// a continuous stop index
// "continuous" means that if we have n stops, all indices are from 0,...,n-1 and no number in
// that range is unused
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopIdx(pub u32);

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteIdx(pub u32);

impl StopIdx {
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl RouteIdx {
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for StopIdx {
    fn from(value: usize) -> Self {
        Self(value as u32)
    }
}

impl From<usize> for RouteIdx {
    fn from(value: usize) -> Self {
        Self(value as u32)
    }
}

impl Display for StopIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Display for RouteIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
