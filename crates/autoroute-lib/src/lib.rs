//! Autoroute library entry points.
//!
//! This crate loads a route document, builds an undirected waypoint graph from
//! its manually defined reference routes, and rewrites every auto-route (a
//! route whose label contains `(auto)`) into the shortest chain of waypoints
//! connecting its named stops. Higher-level consumers (the CLI) should only
//! depend on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod autoroute;
pub mod distance;
pub mod document;
pub mod error;
pub mod graph;
pub mod path;
pub mod registry;
pub mod resolve;

pub use autoroute::{annotate_error, classify, clear_stale_error, AutoRouteEntry, AUTO_MARKER};
pub use distance::{DistanceMetric, HaversineMetric};
pub use document::{
    load_document, save_document, Coordinate, Document, PointKey, Route, RoutePoint,
};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, EdgeKey, Graph};
pub use path::shortest_path;
pub use registry::{Vertex, VertexId, VertexRegistry};
pub use resolve::{
    resolve_document, resolve_entry, ResolutionReport, ResolveError, ResolvedPath, RouteContext,
    RouteOutcome, RouteReport,
};
