//! Plain-text rendering of a resolution run.

use std::fmt::Write;

use autoroute_lib::{Document, ResolutionReport, RouteOutcome};

/// Render one line per auto-route followed by a totals line.
///
/// The label shown is the route's label after resolution, so failed routes
/// display the same diagnostic that was written into the document.
pub fn render_report(report: &ResolutionReport, document: &Document) -> String {
    let mut out = String::new();

    for route in &report.routes {
        let label = document
            .routes
            .get(route.route_index)
            .map(|r| r.label())
            .unwrap_or("<missing>");
        let status = match &route.outcome {
            RouteOutcome::Resolved { points, distance } => {
                format!("resolved, {points} points, {}", format_distance(*distance))
            }
            RouteOutcome::Skipped => "skipped, fewer than two waypoints".to_string(),
            RouteOutcome::Failed { suggestions, .. } if !suggestions.is_empty() => {
                format!("failed, did you mean: {}?", suggestions.join(", "))
            }
            RouteOutcome::Failed { .. } => "failed".to_string(),
        };
        let _ = writeln!(out, "- {label} [{status}]");
    }

    let _ = writeln!(
        out,
        "resolved {}, failed {}, skipped {} ({} reference routes, {} waypoints, {} legs)",
        report.resolved_count(),
        report.failed_count(),
        report.skipped_count(),
        report.reference_routes,
        report.vertices,
        report.edges,
    );
    out
}

fn format_distance(metres: f64) -> String {
    if metres < 1_000.0 {
        format!("{metres:.0} m")
    } else {
        format!("{:.2} km", metres / 1_000.0)
    }
}
