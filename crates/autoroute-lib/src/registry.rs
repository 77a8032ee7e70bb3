use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::debug;

use crate::document::{Coordinate, PointKey, RoutePoint};

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Index of a vertex within its [`VertexRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Graph node wrapping the first point seen for an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    id: VertexId,
    key: PointKey,
    point: RoutePoint,
}

impl Vertex {
    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn key(&self) -> &PointKey {
        &self.key
    }

    /// The retained point record. Callers that emit it into a route must
    /// clone it.
    pub fn point(&self) -> &RoutePoint {
        &self.point
    }

    pub fn name(&self) -> &str {
        self.point.display_name()
    }

    pub fn coordinate(&self) -> Coordinate {
        self.point.coordinate()
    }
}

/// Deduplicates points into vertices and indexes them by display name.
///
/// A name shared by two or more distinct identities is recorded as non-unique
/// and can no longer be looked up, even though every vertex carrying it stays
/// reachable through the graph.
#[derive(Debug, Clone, Default)]
pub struct VertexRegistry {
    vertices: Vec<Vertex>,
    by_key: HashMap<PointKey, VertexId>,
    by_name: HashMap<String, VertexId>,
    non_unique: BTreeSet<String>,
}

impl VertexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the vertex for `point`'s identity, creating it on first sight.
    ///
    /// The first point instance registered for an identity is the one the
    /// vertex keeps; later points with the same identity are not stored.
    pub fn register(&mut self, point: &RoutePoint) -> VertexId {
        let key = point.key();
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }

        let id = VertexId(self.vertices.len());
        self.by_key.insert(key.clone(), id);
        self.vertices.push(Vertex {
            id,
            key,
            point: point.clone(),
        });

        let name = point.display_name();
        if !name.is_empty() {
            match self.by_name.entry(name.to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
                Entry::Occupied(existing) => {
                    debug!(
                        waypoint = name,
                        first = %self.vertices[existing.get().0].key,
                        second = %self.vertices[id.0].key,
                        "waypoint name shared by distinct identities"
                    );
                    self.non_unique.insert(name.to_string());
                }
            }
        }

        id
    }

    /// Lookup a usable vertex by its exact display name.
    ///
    /// Non-unique and unknown names both return `None`.
    pub fn lookup(&self, name: &str) -> Option<VertexId> {
        if self.non_unique.contains(name) {
            return None;
        }
        self.by_name.get(name).copied()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn is_non_unique(&self, name: &str) -> bool {
        self.non_unique.contains(name)
    }

    /// Names barred from lookup, in sorted order.
    pub fn non_unique_names(&self) -> impl Iterator<Item = &str> {
        self.non_unique.iter().map(String::as_str)
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Usable names similar to `name`, best match first.
    pub fn fuzzy_name_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let mut scored: Vec<(f64, &str)> = self
            .by_name
            .keys()
            .filter(|candidate| !self.non_unique.contains(*candidate))
            .map(|candidate| (strsim::jaro_winkler(name, candidate), candidate.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}
