//! Detection of auto-routes and in-band error reporting on their labels.
//!
//! An auto-route is any route whose label contains [`AUTO_MARKER`]. The text
//! before the marker is a comma-separated list of waypoint names, e.g.
//! `"Harbour, Lighthouse, Reef (auto)"`.

use crate::document::Route;

/// Literal label marker requesting automatic route derivation.
pub const AUTO_MARKER: &str = "(auto)";

const ERROR_SEPARATOR: &str = " Error: ";

/// Auto-route found in a document, with its requested waypoint chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoRouteEntry {
    /// Index of the route within [`crate::Document::routes`].
    pub route_index: usize,
    /// Waypoint names in travel order, trimmed but otherwise verbatim.
    pub names: Vec<String>,
}

impl AutoRouteEntry {
    /// Whether the entry names at least one pair of waypoints to connect.
    pub fn has_pairs(&self) -> bool {
        self.names.len() >= 2
    }
}

/// Classify a route, returning `None` for reference routes.
///
/// Duplicate and empty names are kept as-is; they are validated during
/// resolution.
pub fn classify(route_index: usize, route: &Route) -> Option<AutoRouteEntry> {
    let prefix = label_prefix(route.label())?;
    let names = prefix
        .split(',')
        .map(|name| name.trim().to_string())
        .collect();
    Some(AutoRouteEntry { route_index, names })
}

/// Rewrite an auto-route's label to carry a diagnostic.
///
/// Any text after the marker, including an earlier error, is discarded.
pub fn annotate_error(route: &mut Route, message: &str) {
    let prefix = label_prefix(route.label()).unwrap_or(route.label());
    let label = format!("{prefix}{AUTO_MARKER}{ERROR_SEPARATOR}{message}");
    route.set_label(label);
}

/// Drop a diagnostic left on the label by an earlier run.
///
/// Returns `true` when the label changed.
pub fn clear_stale_error(route: &mut Route) -> bool {
    let label = route.label();
    let Some(start) = label.find(AUTO_MARKER) else {
        return false;
    };
    let end = start + AUTO_MARKER.len();
    if !label[end..].starts_with(ERROR_SEPARATOR) {
        return false;
    }
    let cleaned = label[..end].to_string();
    route.set_label(cleaned);
    true
}

fn label_prefix(label: &str) -> Option<&str> {
    label.find(AUTO_MARKER).map(|start| &label[..start])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(label: &str) -> Route {
        Route::new(label, Vec::new())
    }

    #[test]
    fn reference_routes_are_not_classified() {
        assert_eq!(classify(0, &route("Harbour to Reef")), None);
        assert_eq!(classify(0, &Route::default()), None);
    }

    #[test]
    fn names_are_split_and_trimmed() {
        let entry = classify(4, &route(" Harbour ,Lighthouse,  Reef (auto)")).unwrap();
        assert_eq!(entry.route_index, 4);
        assert_eq!(entry.names, vec!["Harbour", "Lighthouse", "Reef"]);
        assert!(entry.has_pairs());
    }

    #[test]
    fn empty_and_duplicate_names_are_preserved() {
        let entry = classify(0, &route("A,, A (auto)")).unwrap();
        assert_eq!(entry.names, vec!["A", "", "A"]);

        let bare = classify(0, &route("(auto)")).unwrap();
        assert_eq!(bare.names, vec![""]);
        assert!(!bare.has_pairs());
    }

    #[test]
    fn earlier_error_text_is_ignored_when_classifying() {
        let entry = classify(0, &route("A, B (auto) Error: Unknown waypoint name(s): B")).unwrap();
        assert_eq!(entry.names, vec!["A", "B"]);
    }

    #[test]
    fn annotate_replaces_previous_error() {
        let mut r = route("Ghost, W1 (auto)");
        annotate_error(&mut r, "Unknown waypoint name(s): Ghost");
        assert_eq!(r.label(), "Ghost, W1 (auto) Error: Unknown waypoint name(s): Ghost");

        annotate_error(&mut r, "No route found from: \"Ghost\" to \"W1\"");
        assert_eq!(
            r.label(),
            "Ghost, W1 (auto) Error: No route found from: \"Ghost\" to \"W1\""
        );
    }

    #[test]
    fn stale_error_is_cleared_but_other_suffixes_are_kept() {
        let mut stale = route("A, B (auto) Error: Unknown waypoint name(s): B");
        assert!(clear_stale_error(&mut stale));
        assert_eq!(stale.label(), "A, B (auto)");

        let mut annotated = route("A, B (auto) scenic");
        assert!(!clear_stale_error(&mut annotated));
        assert_eq!(annotated.label(), "A, B (auto) scenic");
    }
}
