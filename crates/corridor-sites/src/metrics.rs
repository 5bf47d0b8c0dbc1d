//! Geodesic distances between site coordinates
//!
//! Distances are measured on the WGS-84 ellipsoid with Karney's algorithm
//! (`geo::GeodesicDistance`), accurate to a few nanometres. Values are not
//! rounded here; see [`crate::record::round_km`].

use geo::{GeodesicDistance, Point};

use crate::Coordinate;

const METRES_PER_KM: f64 = 1000.0;

/// Geodesic distance between two coordinates in km.
///
/// Exactly symmetric and exactly zero for identical points. Out-of-range
/// coordinates are rejected when the catalogue is built, not here.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    // Canonical endpoint order keeps distance_km(a, b) == distance_km(b, a) bit-for-bit.
    let (first, second) = if (a.lat, a.lon) <= (b.lat, b.lon) {
        (a, b)
    } else {
        (b, a)
    };

    let p1 = Point::new(first.lon, first.lat);
    let p2 = Point::new(second.lon, second.lat);
    p1.geodesic_distance(&p2) / METRES_PER_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate_strategy() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    #[test]
    fn test_site_distances() {
        let station = Coordinate::new(30.5445, 76.8215);
        let substation = Coordinate::new(30.5488, 76.8260);
        let solar = Coordinate::new(30.5502, 76.8185);

        assert!((distance_km(station, substation) - 0.643187).abs() < 1e-5);
        assert!((distance_km(station, solar) - 0.694388).abs() < 1e-5);
    }

    #[test]
    fn test_long_baseline() {
        // New York to London on the ellipsoid: ~5585 km
        let nyc = Coordinate::new(40.7128, -74.0060);
        let london = Coordinate::new(51.5074, -0.1278);
        assert!((distance_km(nyc, london) - 5585.23).abs() < 0.01);
    }

    #[test]
    fn test_zero_distance() {
        let c = Coordinate::new(29.9679, 76.8783);
        assert_eq!(distance_km(c, c), 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2000))]

        #[test]
        fn prop_symmetric(a in coordinate_strategy(), b in coordinate_strategy()) {
            prop_assert_eq!(distance_km(a, b), distance_km(b, a));
        }

        #[test]
        fn prop_zero_for_same_point(a in coordinate_strategy()) {
            prop_assert_eq!(distance_km(a, a), 0.0);
        }

        #[test]
        fn prop_non_negative_and_bounded(a in coordinate_strategy(), b in coordinate_strategy()) {
            let d = distance_km(a, b);
            // Half the meridian circumference is the longest geodesic
            prop_assert!(d >= 0.0);
            prop_assert!(d <= 20_004.0, "distance {} km too long", d);
        }
    }
}
