//! Auto-route resolution.
//!
//! Resolution runs in two passes over a [`Document`]:
//!
//! 1. [`RouteContext::scan`] walks every route once. Reference routes feed the
//!    waypoint [`Graph`]; auto-routes are collected as [`AutoRouteEntry`]s.
//! 2. Each entry is resolved against the finished graph. Consecutive waypoint
//!    pairs are joined by their shortest path and the stitched point sequence
//!    replaces the route's points. Failures are written into the route label
//!    instead of aborting the run.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::autoroute::{annotate_error, classify, clear_stale_error, AutoRouteEntry};
use crate::distance::DistanceMetric;
use crate::document::{Document, Route, RoutePoint};
use crate::graph::Graph;
use crate::path::shortest_path;
use crate::registry::VertexId;

/// Maximum suggestions offered per unknown waypoint name.
const MAX_SUGGESTIONS: usize = 3;

/// Why a single auto-route could not be resolved.
///
/// The `Display` output is the diagnostic written into the route label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Non-unique waypoint name(s): {}", join_names(.0))]
    NonUniqueNames(Vec<String>),

    #[error("Unknown waypoint name(s): {}", join_names(.0))]
    UnknownNames(Vec<String>),

    #[error("No route found from: \"{from}\" to \"{to}\"")]
    NoRoute { from: String, to: String },
}

fn join_names(names: &[String]) -> String {
    names.join(", ")
}

/// Stitched point sequence for one auto-route.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub points: Vec<RoutePoint>,
    /// Sum of the traversed edge weights, in metres.
    pub distance: f64,
}

/// Result of resolving one auto-route.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The route's points were replaced.
    Resolved { points: usize, distance: f64 },
    /// Fewer than two waypoint names, all of them valid; the route was left
    /// untouched.
    Skipped,
    /// The label was annotated with `error`; points were left untouched.
    Failed {
        error: ResolveError,
        suggestions: Vec<String>,
    },
}

/// Outcome of one auto-route within a [`ResolutionReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReport {
    pub route_index: usize,
    pub names: Vec<String>,
    pub outcome: RouteOutcome,
}

/// Summary of a whole-document resolution run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    pub reference_routes: usize,
    pub vertices: usize,
    pub edges: usize,
    pub routes: Vec<RouteReport>,
}

impl ResolutionReport {
    pub fn resolved_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RouteOutcome::Resolved { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RouteOutcome::Failed { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RouteOutcome::Skipped))
    }

    fn count(&self, predicate: impl Fn(&RouteOutcome) -> bool) -> usize {
        self.routes
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// Graph state for a single resolution run.
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    graph: Graph,
    reference_routes: usize,
}

impl RouteContext {
    /// Build the graph from every reference route and collect the
    /// auto-routes, in one pass over the document.
    pub fn scan<M>(document: &Document, metric: &M) -> (Self, Vec<AutoRouteEntry>)
    where
        M: DistanceMetric + ?Sized,
    {
        let mut context = Self::default();
        let mut entries = Vec::new();

        for (index, route) in document.routes.iter().enumerate() {
            match classify(index, route) {
                Some(entry) => entries.push(entry),
                None => {
                    context.graph.add_route(&route.points, metric);
                    context.reference_routes += 1;
                }
            }
        }

        (context, entries)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn reference_routes(&self) -> usize {
        self.reference_routes
    }

    /// Resolve `entry` and write the result onto `route`.
    ///
    /// On success the route's points are replaced; on failure only the label
    /// changes.
    pub fn resolve(&self, entry: &AutoRouteEntry, route: &mut Route) -> RouteOutcome {
        let result = validate_names(&self.graph, entry).and_then(|stops| {
            if entry.has_pairs() {
                stitch(&self.graph, &stops, &entry.names).map(Some)
            } else {
                Ok(None)
            }
        });

        match result {
            Ok(None) => {
                debug!(
                    route = entry.route_index,
                    names = entry.names.len(),
                    "auto-route names fewer than two waypoints; leaving it untouched"
                );
                RouteOutcome::Skipped
            }
            Ok(Some(resolved)) => {
                let points = resolved.points.len();
                route.points = resolved.points;
                clear_stale_error(route);
                info!(
                    route = entry.route_index,
                    label = route.label(),
                    points,
                    distance = resolved.distance,
                    "resolved auto-route"
                );
                RouteOutcome::Resolved {
                    points,
                    distance: resolved.distance,
                }
            }
            Err(error) => {
                let suggestions = self.suggestions_for(&error);
                warn!(
                    route = entry.route_index,
                    label = route.label(),
                    %error,
                    ?suggestions,
                    "failed to resolve auto-route"
                );
                annotate_error(route, &error.to_string());
                RouteOutcome::Failed { error, suggestions }
            }
        }
    }

    fn suggestions_for(&self, error: &ResolveError) -> Vec<String> {
        let ResolveError::UnknownNames(names) = error else {
            return Vec::new();
        };
        let registry = self.graph.registry();
        let mut suggestions: Vec<String> = Vec::new();
        for name in names {
            for candidate in registry.fuzzy_name_matches(name, MAX_SUGGESTIONS) {
                if !suggestions.contains(&candidate) {
                    suggestions.push(candidate);
                }
            }
        }
        suggestions
    }
}

/// Resolve every auto-route in `document` in place.
///
/// Per-route failures are annotated on the route labels and reported; they
/// never abort the run.
pub fn resolve_document<M>(document: &mut Document, metric: &M) -> ResolutionReport
where
    M: DistanceMetric + ?Sized,
{
    let (context, entries) = RouteContext::scan(document, metric);
    info!(
        reference_routes = context.reference_routes,
        auto_routes = entries.len(),
        vertices = context.graph.vertex_count(),
        edges = context.graph.edge_count(),
        "built waypoint graph"
    );

    let mut report = ResolutionReport {
        reference_routes: context.reference_routes,
        vertices: context.graph.vertex_count(),
        edges: context.graph.edge_count(),
        routes: Vec::with_capacity(entries.len()),
    };

    for entry in entries {
        let route = &mut document.routes[entry.route_index];
        let outcome = context.resolve(&entry, route);
        report.routes.push(RouteReport {
            route_index: entry.route_index,
            names: entry.names,
            outcome,
        });
    }

    report
}

/// Validate an entry's names and stitch the shortest path through them.
///
/// Checks run in order and stop at the first failure: barred names, then
/// unknown names, then each consecutive pair's reachability. Junction
/// waypoints shared by two pairs appear once in the result, and every point
/// is an independent copy of the vertex's retained record.
pub fn resolve_entry(graph: &Graph, entry: &AutoRouteEntry) -> Result<ResolvedPath, ResolveError> {
    let stops = validate_names(graph, entry)?;
    stitch(graph, &stops, &entry.names)
}

/// Map every name to its vertex, failing on barred names first and unknown
/// names second.
fn validate_names(
    graph: &Graph,
    entry: &AutoRouteEntry,
) -> Result<Vec<VertexId>, ResolveError> {
    let registry = graph.registry();

    let non_unique = offending(&entry.names, |name| registry.is_non_unique(name));
    if !non_unique.is_empty() {
        return Err(ResolveError::NonUniqueNames(non_unique));
    }

    let unknown = offending(&entry.names, |name| registry.lookup(name).is_none());
    if !unknown.is_empty() {
        return Err(ResolveError::UnknownNames(unknown));
    }

    Ok(entry
        .names
        .iter()
        .filter_map(|name| registry.lookup(name))
        .collect())
}

fn stitch(
    graph: &Graph,
    stops: &[VertexId],
    names: &[String],
) -> Result<ResolvedPath, ResolveError> {
    let mut points: Vec<RoutePoint> = Vec::new();
    let mut distance = 0.0;

    for (pair, names) in stops.windows(2).zip(names.windows(2)) {
        let (start, stop) = (pair[0], pair[1]);
        let path = shortest_path(graph, start, stop).ok_or_else(|| ResolveError::NoRoute {
            from: names[0].clone(),
            to: names[1].clone(),
        })?;
        debug!(from = %names[0], to = %names[1], edges = path.len(), "joined waypoint pair");

        if points.is_empty() {
            points.push(graph.vertex(start).point().clone());
        }

        let mut current = start;
        for edge_id in path {
            let edge = graph.edge(edge_id);
            let next = edge.other(current);
            points.push(graph.vertex(next).point().clone());
            distance += edge.distance;
            current = next;
        }
    }

    Ok(ResolvedPath { points, distance })
}

/// Names matching `predicate`, deduplicated in first-seen order.
fn offending(names: &[String], predicate: impl Fn(&str) -> bool) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for name in names {
        if predicate(name.as_str()) && !found.contains(name) {
            found.push(name.clone());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Coordinate;

    struct LatitudeDelta;

    impl DistanceMetric for LatitudeDelta {
        fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
            (a.lat - b.lat).abs()
        }
    }

    fn pt(name: &str, lat: f64) -> RoutePoint {
        RoutePoint::new(name, lat, 0.0)
    }

    fn entry(names: &[&str]) -> AutoRouteEntry {
        AutoRouteEntry {
            route_index: 0,
            names: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    fn chain_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_route(&[pt("A", 0.0), pt("B", 1.0), pt("C", 2.0)], &LatitudeDelta);
        graph.add_route(&[pt("C", 2.0), pt("D", 4.0)], &LatitudeDelta);
        graph
    }

    fn names(points: &[RoutePoint]) -> Vec<&str> {
        points.iter().map(RoutePoint::display_name).collect()
    }

    #[test]
    fn junction_waypoint_appears_once() {
        let resolved = resolve_entry(&chain_graph(), &entry(&["A", "C", "D"])).unwrap();
        assert_eq!(names(&resolved.points), vec!["A", "B", "C", "D"]);
        assert_eq!(resolved.distance, 4.0);
    }

    #[test]
    fn reverse_travel_walks_edges_backwards() {
        let resolved = resolve_entry(&chain_graph(), &entry(&["D", "A"])).unwrap();
        assert_eq!(names(&resolved.points), vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn repeated_waypoint_keeps_start_point() {
        let resolved = resolve_entry(&chain_graph(), &entry(&["B", "B"])).unwrap();
        assert_eq!(names(&resolved.points), vec!["B"]);
        assert_eq!(resolved.distance, 0.0);
    }

    #[test]
    fn every_unknown_name_is_listed_once() {
        let error = resolve_entry(&chain_graph(), &entry(&["Ghost", "A", "Wraith", "Ghost"]))
            .unwrap_err();
        assert_eq!(
            error,
            ResolveError::UnknownNames(vec!["Ghost".into(), "Wraith".into()])
        );
        assert_eq!(error.to_string(), "Unknown waypoint name(s): Ghost, Wraith");
    }

    #[test]
    fn non_unique_check_runs_before_unknown_check() {
        let mut graph = chain_graph();
        graph.add_route(
            &[pt("Twin", 9.0).with_id("t-1"), pt("Twin", 9.5).with_id("t-2")],
            &LatitudeDelta,
        );

        let error = resolve_entry(&graph, &entry(&["Ghost", "Twin"])).unwrap_err();
        assert_eq!(error.to_string(), "Non-unique waypoint name(s): Twin");
    }

    #[test]
    fn every_barred_name_is_listed_once() {
        let mut graph = chain_graph();
        graph.add_route(
            &[pt("Twin", 9.0).with_id("t-1"), pt("Twin", 9.5).with_id("t-2")],
            &LatitudeDelta,
        );
        graph.add_route(
            &[pt("Mark", 20.0).with_id("m-1"), pt("Mark", 21.0).with_id("m-2")],
            &LatitudeDelta,
        );

        let error = resolve_entry(&graph, &entry(&["Twin", "A", "Mark", "Twin", "Ghost"]))
            .unwrap_err();
        assert_eq!(
            error,
            ResolveError::NonUniqueNames(vec!["Twin".into(), "Mark".into()])
        );
        assert_eq!(error.to_string(), "Non-unique waypoint name(s): Twin, Mark");
    }

    #[test]
    fn disconnected_pair_names_both_waypoints() {
        let mut graph = chain_graph();
        graph.add_route(&[pt("X", 50.0), pt("Y", 51.0)], &LatitudeDelta);

        let error = resolve_entry(&graph, &entry(&["A", "B", "X"])).unwrap_err();
        assert_eq!(error.to_string(), "No route found from: \"B\" to \"X\"");
    }

    #[test]
    fn empty_name_is_reported_as_unknown() {
        let error = resolve_entry(&chain_graph(), &entry(&["A", ""])).unwrap_err();
        assert_eq!(error, ResolveError::UnknownNames(vec![String::new()]));
    }

    #[test]
    fn emitted_points_do_not_alias_vertices() {
        let graph = chain_graph();
        let mut resolved = resolve_entry(&graph, &entry(&["A", "B"])).unwrap();
        resolved.points[0].lat = 77.0;

        let a = graph.registry().lookup("A").unwrap();
        assert_eq!(graph.vertex(a).point().lat, 0.0);
    }

    #[test]
    fn failed_resolution_leaves_points_and_suggests_names() {
        let mut document = Document::new(vec![
            Route::new("ref", vec![pt("Anchorage", 0.0), pt("Breakwater", 1.0)]),
            Route::new("Anchorge, Breakwater (auto)", vec![pt("keep", 3.0)]),
        ]);

        let report = resolve_document(&mut document, &LatitudeDelta);

        assert_eq!(report.failed_count(), 1);
        let RouteOutcome::Failed { suggestions, .. } = &report.routes[0].outcome else {
            panic!("expected failure");
        };
        assert_eq!(suggestions, &vec!["Anchorage".to_string()]);
        assert_eq!(names(&document.routes[1].points), vec!["keep"]);
        assert_eq!(
            document.routes[1].label(),
            "Anchorge, Breakwater (auto) Error: Unknown waypoint name(s): Anchorge"
        );
    }

    #[test]
    fn single_name_auto_route_is_skipped() {
        let mut document = Document::new(vec![
            Route::new("ref", vec![pt("A", 0.0), pt("B", 1.0)]),
            Route::new("A (auto)", vec![pt("keep", 3.0)]),
        ]);

        let report = resolve_document(&mut document, &LatitudeDelta);

        assert_eq!(report.skipped_count(), 1);
        assert_eq!(document.routes[1].label(), "A (auto)");
        assert_eq!(names(&document.routes[1].points), vec!["keep"]);
    }

    #[test]
    fn single_name_auto_route_is_still_validated() {
        let mut document = Document::new(vec![
            Route::new("ref", vec![pt("A", 0.0), pt("B", 1.0)]),
            Route::new(
                "Twins",
                vec![pt("Twin", 5.0).with_id("t-1"), pt("Twin", 6.0).with_id("t-2")],
            ),
            Route::new("Ghost (auto)", vec![pt("keep", 3.0)]),
            Route::new("(auto)", vec![pt("keep", 3.0)]),
            Route::new("Twin (auto)", Vec::new()),
        ]);

        let report = resolve_document(&mut document, &LatitudeDelta);

        assert_eq!(report.failed_count(), 3);
        assert_eq!(report.skipped_count(), 0);
        assert_eq!(
            document.routes[2].label(),
            "Ghost (auto) Error: Unknown waypoint name(s): Ghost"
        );
        assert_eq!(
            document.routes[3].label(),
            "(auto) Error: Unknown waypoint name(s): "
        );
        assert_eq!(
            report.routes[1].outcome,
            RouteOutcome::Failed {
                error: ResolveError::UnknownNames(vec![String::new()]),
                suggestions: Vec::new(),
            }
        );
        assert_eq!(
            document.routes[4].label(),
            "Twin (auto) Error: Non-unique waypoint name(s): Twin"
        );
        assert_eq!(names(&document.routes[2].points), vec!["keep"]);
    }
}
