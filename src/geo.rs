//! Great-circle distance on a spherical Earth.

/// Earth radius in meters used throughout the converter.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two (longitude, latitude) pairs in degrees.
///
/// Returns meters. Pure function with no side effects.
pub fn haversine(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lon1 = lon1.to_radians();
    let lat1 = lat1.to_radians();
    let lon2 = lon2.to_radians();
    let lat2 = lat2.to_radians();

    let dlon = lon2 - lon1;
    let dlat = lat2 - lat1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    c * EARTH_RADIUS_M
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine(10.5, 52.25, 10.5, 52.25), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let ab = haversine(10.538761725, 52.252495764, 10.55, 52.26);
        let ba = haversine(10.55, 52.26, 10.538761725, 52.252495764);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_one_degree_latitude() {
        // One degree of latitude is ~111.2 km on a 6371 km sphere
        let d = haversine(10.0, 52.0, 10.0, 53.0);
        assert!((d - 111_194.9).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_short_hop_magnitude() {
        // ~765 m east of the Braunschweig reference point at this latitude
        let d = haversine(10.538761725, 52.252495764, 10.55, 52.252495764);
        assert!(d > 700.0 && d < 850.0, "got {}", d);
    }
}
