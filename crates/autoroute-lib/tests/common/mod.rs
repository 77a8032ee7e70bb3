#![allow(dead_code)]

use std::path::PathBuf;

use autoroute_lib::{Coordinate, DistanceMetric, RoutePoint};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn solent_fixture() -> PathBuf {
    fixtures_dir().join("solent_routes.json")
}

/// Metric that reports the latitude delta, so a point's latitude doubles as
/// its distance along a test chain.
pub struct LatitudeDelta;

impl DistanceMetric for LatitudeDelta {
    fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        (a.lat - b.lat).abs()
    }
}

pub fn pt(name: &str, lat: f64) -> RoutePoint {
    RoutePoint::new(name, lat, 0.0)
}

pub fn point_names(points: &[RoutePoint]) -> Vec<&str> {
    points.iter().map(RoutePoint::display_name).collect()
}
