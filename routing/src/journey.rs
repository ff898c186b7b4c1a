use common::util::time::Time;
#[cfg(debug_assertions)] use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash)]
#[serde(tag = "type")]
pub enum Segment {
    #[serde(rename = "transit", rename_all = "camelCase")]
    Transit {
        trip_id: String,
        source_stop_id: String,
        target_stop_id: String,
        departure_time: Time,
        arrival_time: Time,
    },
    #[serde(rename = "walk", rename_all = "camelCase")]
    Walk {
        source_stop_id: String,
        target_stop_id: String,
        departure_time: Time,
        arrival_time: Time,
    },
}

impl Segment {
    pub fn source_stop_id(&self) -> &str {
        match self {
            Segment::Transit { source_stop_id, .. } | Segment::Walk { source_stop_id, .. } => source_stop_id,
        }
    }

    pub fn target_stop_id(&self) -> &str {
        match self {
            Segment::Transit { target_stop_id, .. } | Segment::Walk { target_stop_id, .. } => target_stop_id,
        }
    }

    pub fn departure_time(&self) -> Time {
        match self {
            Segment::Transit { departure_time, .. } | Segment::Walk { departure_time, .. } => *departure_time,
        }
    }

    pub fn arrival_time(&self) -> Time {
        match self {
            Segment::Transit { arrival_time, .. } | Segment::Walk { arrival_time, .. } => *arrival_time,
        }
    }

    pub fn trip_id(&self) -> Option<&str> {
        match self {
            Segment::Transit { trip_id, .. } => Some(trip_id),
            Segment::Walk { .. } => None,
        }
    }

    #[cfg(debug_assertions)]
    pub(crate) fn validate(&self) {
        debug_assert!(
            self.source_stop_id() != self.target_stop_id(),
            "Segment must not end where it starts ({}).", self.source_stop_id()
        );
        debug_assert!(
            self.departure_time() <= self.arrival_time(),
            "Start of segment ({} @{}) must not be after end ({} @{}).",
            self.source_stop_id(), self.departure_time(), self.target_stop_id(), self.arrival_time()
        );
    }
}

impl Debug for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Transit { trip_id, .. } => write!(
                f, "{} @{} ---{}---> {} @{}",
                self.source_stop_id(), self.departure_time(), trip_id, self.target_stop_id(), self.arrival_time()
            ),
            Segment::Walk { .. } => write!(
                f, "{} @{} ---walk---> {} @{}",
                self.source_stop_id(), self.departure_time(), self.target_stop_id(), self.arrival_time()
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub segments: Vec<Segment>,
    pub departure_time: Time,
    pub arrival_time: Time,
}

impl Journey {
    /// Segments must be in travel order and form a chain of stops
    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        #[cfg(debug_assertions)] {
            debug_assert!(!segments.is_empty(), "A Journey must have at least one segment");

            for segment in &segments {
                segment.validate();
            }
            for (previous, next) in segments.iter().tuple_windows() {
                debug_assert!(previous.target_stop_id() == next.source_stop_id());
                debug_assert!(previous.arrival_time() <= next.departure_time());
            }

            let stops = segments.iter().map(|segment| segment.source_stop_id());
            debug_assert!(
                stops.clone().all_unique(),
                "Expected stops of journey to be unique. Instead, stops {:?} are visited twice.",
                stops.duplicates().collect_vec()
            );
        }

        let departure_time = segments.first().map(Segment::departure_time).unwrap_or_default();
        let arrival_time = segments.last().map(Segment::arrival_time).unwrap_or_default();

        Self { segments, departure_time, arrival_time }
    }

    pub fn source_stop_id(&self) -> Option<&str> {
        self.segments.first().map(Segment::source_stop_id)
    }

    pub fn target_stop_id(&self) -> Option<&str> {
        self.segments.last().map(Segment::target_stop_id)
    }

    /// Number of trips boarded
    pub fn number_of_trips(&self) -> usize {
        self.segments.iter().filter(|segment| matches!(segment, Segment::Transit { .. })).count()
    }

    pub fn duration(&self) -> u32 {
        self.arrival_time.as_secs().saturating_sub(self.departure_time.as_secs())
    }
}

impl From<Vec<Segment>> for Journey {
    fn from(segments: Vec<Segment>) -> Self {
        Self::new(segments)
    }
}
