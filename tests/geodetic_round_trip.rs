mod common;

use geoframe::ellipsoid::Ellipsoid;
use geoframe::geodetic::{EllipsoidalConverter, GeodeticPoint};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::{assert_point_close, random_geodetic};

fn round_trip(converter: &EllipsoidalConverter, lat: f64, lon: f64, h: f64, epsilon: f64) {
    let start = GeodeticPoint::new(lat, lon, h).unwrap();
    let xyz = converter.geodetic_to_cartesian(&start);
    let blh = converter.cartesian_to_geodetic(&xyz).unwrap();
    let back = converter.geodetic_to_cartesian(&blh);

    assert_point_close(&back, &xyz, epsilon);
}

#[test]
fn test_ground_stations_round_trip() {
    let mut rng = StdRng::seed_from_u64(42_u64);
    let converter = EllipsoidalConverter::default();

    for _ in 0..2000 {
        let (lat, lon, h) = random_geodetic(&mut rng, -500.0..10_000.0);
        round_trip(&converter, lat, lon, h, 1e-6);
    }
}

#[test]
fn test_ground_stations_round_trip_cgcs2000() {
    let mut rng = StdRng::seed_from_u64(7_u64);
    let converter = EllipsoidalConverter::new(Ellipsoid::CGCS2000).unwrap();

    for _ in 0..2000 {
        let (lat, lon, h) = random_geodetic(&mut rng, -500.0..10_000.0);
        round_trip(&converter, lat, lon, h, 1e-6);
    }
}

#[test]
fn test_satellite_altitudes_round_trip() {
    let mut rng = StdRng::seed_from_u64(2017_u64);
    let converter = EllipsoidalConverter::default();

    for _ in 0..20_000 {
        let (lat, lon, h) = random_geodetic(&mut rng, 19_000_000.0..36_000_000.0);
        round_trip(&converter, lat, lon, h, 1e-6);
    }

    let tight = EllipsoidalConverter::builder()
        .latitude_tolerance(1e-12)
        .build()
        .unwrap();
    for _ in 0..2000 {
        let (lat, lon, h) = random_geodetic(&mut rng, 19_000_000.0..36_000_000.0);
        round_trip(&tight, lat, lon, h, 1e-6);
    }
}

#[test]
fn test_geodetic_round_trip_recovers_coordinates() {
    let converter = EllipsoidalConverter::default();
    let start = GeodeticPoint::new(-33.8688, 151.2093, 58.0).unwrap();

    let blh = converter
        .cartesian_to_geodetic(&converter.geodetic_to_cartesian(&start))
        .unwrap();

    approx::assert_abs_diff_eq!(blh.latitude(), start.latitude(), epsilon = 1e-9);
    approx::assert_abs_diff_eq!(blh.longitude(), start.longitude(), epsilon = 1e-9);
    approx::assert_abs_diff_eq!(blh.height(), start.height(), epsilon = 1e-6);
}
