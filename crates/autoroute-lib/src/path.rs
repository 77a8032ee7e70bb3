use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::{EdgeId, Graph};
use crate::registry::VertexId;

/// Run Dijkstra's algorithm from `start` and return the edges of the
/// lowest-cost path to `goal`, in travel order.
///
/// Returns `Some(vec![])` when `start == goal` and `None` when `goal` is not
/// reachable.
pub fn shortest_path(graph: &Graph, start: VertexId, goal: VertexId) -> Option<Vec<EdgeId>> {
    if start == goal {
        return Some(Vec::new());
    }

    let mut distances: HashMap<VertexId, f64> = HashMap::new();
    let mut parents: HashMap<VertexId, (VertexId, EdgeId)> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(&entry.node) {
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        for &edge_id in graph.neighbours(entry.node) {
            let edge = graph.edge(edge_id);
            let next = edge.other(entry.node);
            let next_cost = current_distance + edge.distance;
            if next_cost < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, (entry.node, edge_id));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

fn reconstruct_path(
    parents: &HashMap<VertexId, (VertexId, EdgeId)>,
    start: VertexId,
    goal: VertexId,
) -> Vec<EdgeId> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        let Some(&(parent, edge)) = parents.get(&current) else {
            break;
        };
        path.push(edge);
        current = parent;
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: VertexId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: VertexId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
