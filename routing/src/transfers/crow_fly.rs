use crate::transfers::{FootpathProvider, GeneratedFootpath};
use common::types::gtfs::StopRecord;
use common::util::distance::{haversine_distance, point_from_strings};
use common::util::logging::run_with_pb;
use common::util::speed::WalkingSpeed;
use geo::Point;
use rayon::prelude::*;

/// Footpaths along the straight line between two stops. Every stop pair that can be walked within
/// `max_walking_time` gets connected.
#[derive(Debug, Clone, Copy)]
pub struct CrowFlyFootpaths {
    pub walking_speed: WalkingSpeed,
    /// Seconds
    pub max_walking_time: u32,
}

impl FootpathProvider for CrowFlyFootpaths {
    fn footpaths(&self, stops: &[StopRecord]) -> Vec<GeneratedFootpath> {
        let points: Vec<Point<f64>> = stops.iter()
            .map(|stop| point_from_strings(&stop.stop_lat, &stop.stop_lon))
            .collect();
        let max_distance = self.walking_speed.max_distance(self.max_walking_time);

        run_with_pb("footpaths", "Generating footpaths", stops.len() as u64, |pb| {
            stops.par_iter()
                .zip(points.par_iter())
                .flat_map_iter(|(source, source_point)| {
                    pb.inc(1);
                    stops.iter()
                        .zip(points.iter())
                        .filter(move |(target, _)| target.stop_id != source.stop_id)
                        .filter_map(move |(target, target_point)| {
                            let distance = haversine_distance(*source_point, *target_point);
                            // NaN coordinates never compare as within reach
                            (distance <= max_distance).then(|| GeneratedFootpath {
                                from_stop_id: source.stop_id.clone(),
                                to_stop_id: target.stop_id.clone(),
                                walking_time: self.walking_speed.time_to_walk(distance),
                            })
                        })
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, lat: &str, lon: &str) -> StopRecord {
        StopRecord { stop_id: id.into(), stop_lat: lat.into(), stop_lon: lon.into() }
    }

    fn provider() -> CrowFlyFootpaths {
        CrowFlyFootpaths { walking_speed: WalkingSpeed(1.33), max_walking_time: 300 }
    }

    #[test]
    fn test_close_stops_are_connected_both_ways() {
        let stops = vec![
            stop("a", "52.5200", "13.4050"),
            stop("b", "52.5205", "13.4060"),
            // far away
            stop("c", "48.1351", "11.5820"),
        ];

        let footpaths = provider().footpaths(&stops);
        assert_eq!(footpaths.len(), 2);

        let a_to_b = &footpaths[0];
        let b_to_a = &footpaths[1];
        assert_eq!((a_to_b.from_stop_id.as_str(), a_to_b.to_stop_id.as_str()), ("a", "b"));
        assert_eq!((b_to_a.from_stop_id.as_str(), b_to_a.to_stop_id.as_str()), ("b", "a"));
        assert_eq!(a_to_b.walking_time, b_to_a.walking_time);

        let distance = haversine_distance(
            point_from_strings("52.5200", "13.4050"),
            point_from_strings("52.5205", "13.4060"),
        );
        assert_eq!(a_to_b.walking_time, (distance / 1.33).ceil() as u32);
    }

    #[test]
    fn test_out_of_reach() {
        // roughly 1.1km apart, but only 399m can be walked in 300s
        let stops = vec![
            stop("a", "52.5200", "13.4050"),
            stop("b", "52.5300", "13.4050"),
        ];
        assert!(provider().footpaths(&stops).is_empty());
    }

    #[test]
    fn test_invalid_coordinates_are_never_connected() {
        let stops = vec![
            stop("a", "52.5200", "13.4050"),
            stop("b", "", "13.4050"),
        ];
        assert!(provider().footpaths(&stops).is_empty());
    }

    #[test]
    fn test_same_location_different_stops() {
        let stops = vec![
            stop("platform-1", "52.5200", "13.4050"),
            stop("platform-2", "52.5200", "13.4050"),
        ];
        let footpaths = provider().footpaths(&stops);
        assert_eq!(footpaths.len(), 2);
        assert!(footpaths.iter().all(|footpath| footpath.walking_time == 0));
    }
}
