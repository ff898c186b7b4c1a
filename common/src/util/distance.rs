use geo::Point;

/// Mean earth radius in meters
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points given as (longitude, latitude) in degrees.
///
/// `geo`'s own haversine uses a slightly different mean radius, distances here have to match the
/// ones footpath files were generated with.
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat_a = a.y().to_radians();
    let lat_b = b.y().to_radians();
    let delta_lat = (b.y() - a.y()).to_radians();
    let delta_lon = (b.x() - a.x()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Parses a coordinate pair as found in GTFS stop records, unparseable values become NaN
pub fn point_from_strings(lat: &str, lon: &str) -> Point<f64> {
    let lat = lat.trim().parse::<f64>().unwrap_or(f64::NAN);
    let lon = lon.trim().parse::<f64>().unwrap_or(f64::NAN);
    Point::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point() {
        let p = Point::new(13.4050, 52.5200);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // Berlin Hbf -> Alexanderplatz, roughly 2.9km
        let hbf = Point::new(13.369545, 52.525592);
        let alex = Point::new(13.411267, 52.521918);
        let distance = haversine_distance(hbf, alex);
        assert!((2_800.0..3_000.0).contains(&distance), "got {distance}");
    }

    #[test]
    fn test_symmetric() {
        let a = Point::new(4.8952, 52.3702);
        let b = Point::new(2.3522, 48.8566);
        assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_latitude() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 1.0);
        let expected = EARTH_RADIUS * std::f64::consts::PI / 180.0;
        assert!((haversine_distance(a, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_nan_propagates() {
        let a = point_from_strings("52.52", "not a number");
        let b = Point::new(13.40, 52.52);
        assert!(haversine_distance(a, b).is_nan());
    }
}
