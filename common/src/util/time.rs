use either::Either;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Seconds since midnight of the service day.
///
/// Times are not wrapped at midnight: a trip arriving at `25:30:00` keeps the value `91800`, so
/// that trips running past midnight stay ordered without modular arithmetic.
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "SerializedTime")]
pub struct Time(u32);

/// "Never reached" marker used for arrival labels
pub const INFINITY: Time = Time(u32::MAX);

impl Time {
    pub const MIDNIGHT: Time = Time(0);
    pub const END_OF_DAY: Time = Time(SECONDS_PER_DAY);

    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    pub const fn add_secs(&self, secs: u32) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl From<u32> for Time {
    fn from(secs: u32) -> Self {
        Self(secs)
    }
}

impl From<Time> for u32 {
    fn from(time: Time) -> Self {
        time.0
    }
}

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):([0-5]\d):([0-5]\d)$").expect("time regex is valid"));

impl FromStr for Time {
    type Err = TimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let caps = TIME_REGEX.captures(value.trim()).ok_or(TimeError)?;

        let mut secs = 0u32;
        for (idx, seconds_in_unit) in [(1, 60 * 60), (2, 60), (3, 1)] {
            let factor: u32 = caps[idx].parse().map_err(|_| TimeError)?;
            secs = factor.checked_mul(seconds_in_unit)
                .and_then(|part| secs.checked_add(part))
                .ok_or(TimeError)?;
        }

        Ok(Self(secs))
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Serialized representation of a Time
/// Either 36600 (seconds) or "10:10:00" (String)
#[derive(Debug, Deserialize, Clone)]
#[serde(transparent)]
struct SerializedTime {
    #[serde(with = "either::serde_untagged")]
    value: Either<u32, String>,
}

impl TryFrom<SerializedTime> for Time {
    type Error = TimeError;

    fn try_from(serialized: SerializedTime) -> Result<Self, Self::Error> {
        match serialized.value {
            Either::Left(secs) => Ok(Self(secs)),
            Either::Right(value) => Time::from_str(&value),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub struct TimeError;

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wrong time format. Example of valid format: 09:42:00")
    }
}
