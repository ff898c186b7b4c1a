use chrono::{Datelike, Days, NaiveDate};
use either::Either;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

/// A calendar date, exchanged as the integer `YYYYMMDD` (e.g. `20240906`)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "SerializedDate")]
pub struct Date(NaiveDate);

impl Date {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError)
    }

    pub fn to_number(&self) -> u32 {
        // Years before 0 or after 9999 do not fit into YYYYMMDD, clamp them
        let year = self.0.year().clamp(0, 9999) as u32;
        year * 10_000 + self.0.month() * 100 + self.0.day()
    }

    /// 0 = Sunday, ..., 6 = Saturday
    pub fn day_of_week(&self) -> usize {
        self.0.weekday().num_days_from_sunday() as usize
    }

    pub fn add_days(&self, days: u64) -> Self {
        Self(self.0.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX))
    }

    pub fn next_day(&self) -> Self {
        self.add_days(1)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<Date> for u32 {
    fn from(date: Date) -> Self {
        date.to_number()
    }
}

impl TryFrom<u32> for Date {
    type Error = DateError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        let year = (value / 10_000) as i32;
        let month = (value / 100) % 100;
        let day = value % 100;
        Date::from_ymd(year, month, day)
    }
}

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-?(\d{2})-?(\d{2})$").expect("date regex is valid")
});

impl FromStr for Date {
    type Err = DateError;

    /// Accepts `YYYY-MM-DD` as well as the GTFS form `YYYYMMDD`
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let caps = DATE_REGEX.captures(value.trim()).ok_or(DateError)?;
        let number = u32::from_str(&format!("{}{}{}", &caps[1], &caps[2], &caps[3]))
            .map_err(|_| DateError)?;

        Date::try_from(number)
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Serialized representation of a Date
/// Either 20240906 (number) or "2024-09-06" (String)
#[derive(Debug, Deserialize, Clone)]
#[serde(transparent)]
struct SerializedDate {
    #[serde(with = "either::serde_untagged")]
    value: Either<u32, String>,
}

impl TryFrom<SerializedDate> for Date {
    type Error = DateError;

    fn try_from(serialized: SerializedDate) -> Result<Self, Self::Error> {
        match serialized.value {
            Either::Left(number) => Date::try_from(number),
            Either::Right(value) => Date::from_str(&value),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub struct DateError;

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wrong date format. Example of valid format: 2024-09-06")
    }
}
