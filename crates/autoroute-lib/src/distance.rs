use geo::{Distance, Haversine, Point};

use crate::document::Coordinate;

/// Source of edge weights for the waypoint graph.
///
/// Implementations must be symmetric and non-negative, returning zero only for
/// identical coordinates.
pub trait DistanceMetric {
    /// Distance in metres between two coordinates.
    fn distance(&self, a: Coordinate, b: Coordinate) -> f64;
}

/// Great-circle distance on a spherical Earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMetric;

impl DistanceMetric for HaversineMetric {
    fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        Haversine.distance(to_point(a), to_point(b))
    }
}

fn to_point(coordinate: Coordinate) -> Point<f64> {
    Point::new(coordinate.lon, coordinate.lat)
}
