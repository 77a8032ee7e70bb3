use std::collections::HashMap;

use tracing::debug;

use crate::distance::DistanceMetric;
use crate::document::RoutePoint;
use crate::registry::{Vertex, VertexId, VertexRegistry};

/// Index of an edge within its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

/// Unordered pair of vertices.
///
/// `EdgeKey::new(a, b)` and `EdgeKey::new(b, a)` compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    low: VertexId,
    high: VertexId,
}

impl EdgeKey {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.low, self.high)
    }
}

/// Undirected, weighted edge within the waypoint graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub key: EdgeKey,
    pub distance: f64,
}

impl Edge {
    /// The endpoint that is not `from`.
    ///
    /// Returns `from` itself only if it is not an endpoint of this edge, which
    /// callers walking a path never observe.
    pub fn other(&self, from: VertexId) -> VertexId {
        let (a, b) = self.key.endpoints();
        if from == a {
            b
        } else if from == b {
            a
        } else {
            from
        }
    }

    pub fn touches(&self, vertex: VertexId) -> bool {
        let (a, b) = self.key.endpoints();
        vertex == a || vertex == b
    }
}

/// Undirected waypoint graph accumulated from reference routes.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    registry: VertexRegistry,
    edges: Vec<Edge>,
    edge_index: HashMap<EdgeKey, EdgeId>,
    adjacency: Vec<Vec<EdgeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a reference route in order, registering each point and linking
    /// consecutive vertices.
    ///
    /// Returns the number of edges newly created. Existing edges keep their
    /// original weight and consecutive points sharing an identity never
    /// produce a self-loop.
    pub fn add_route<M>(&mut self, points: &[RoutePoint], metric: &M) -> usize
    where
        M: DistanceMetric + ?Sized,
    {
        let mut previous: Option<VertexId> = None;
        let mut added = 0;

        for point in points {
            let current = self.registry.register(point);
            if self.adjacency.len() < self.registry.len() {
                self.adjacency.resize_with(self.registry.len(), Vec::new);
            }

            if let Some(previous) = previous.filter(|&previous| previous != current) {
                if self.ensure_edge(previous, current, metric).1 {
                    added += 1;
                }
            }
            previous = Some(current);
        }

        added
    }

    /// Return the edge between `a` and `b`, creating it if needed.
    ///
    /// The boolean is `true` when a new edge was inserted.
    fn ensure_edge<M>(&mut self, a: VertexId, b: VertexId, metric: &M) -> (EdgeId, bool)
    where
        M: DistanceMetric + ?Sized,
    {
        let key = EdgeKey::new(a, b);
        if let Some(&existing) = self.edge_index.get(&key) {
            return (existing, false);
        }

        let distance = metric.distance(
            self.registry.vertex(a).coordinate(),
            self.registry.vertex(b).coordinate(),
        );
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge { key, distance });
        self.edge_index.insert(key, id);
        self.adjacency[a.0].push(id);
        self.adjacency[b.0].push(id);

        debug!(
            from = self.registry.vertex(a).name(),
            to = self.registry.vertex(b).name(),
            distance,
            "added edge"
        );
        (id, true)
    }

    pub fn registry(&self) -> &VertexRegistry {
        &self.registry
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        self.registry.vertex(id)
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<&Edge> {
        self.edge_index
            .get(&EdgeKey::new(a, b))
            .map(|&id| &self.edges[id.0])
    }

    /// Edges incident to a vertex.
    pub fn neighbours(&self, vertex: VertexId) -> &[EdgeId] {
        self.adjacency
            .get(vertex.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn vertex_count(&self) -> usize {
        self.registry.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
