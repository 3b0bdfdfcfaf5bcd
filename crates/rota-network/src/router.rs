//! Shortest-path trait and the default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Callers go through the [`Router`] trait so a different algorithm (A*,
//! contraction hierarchies) can be dropped in without touching the
//! multi-waypoint layer.  [`DijkstraRouter`] is the default.
//!
//! # "No route" is not an error
//!
//! An unreachable target yields an empty [`PathResult`] with zero cost.  Errors
//! are reserved for malformed queries (node ids outside the network).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::str::FromStr;

use rota_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::{NetworkError, NetworkResult};

// ── Weight ────────────────────────────────────────────────────────────────────

/// Which edge attribute is used as traversal cost.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Weight {
    /// Current (possibly perturbed) length in metres.
    #[default]
    Length,
    /// Length at load time, ignoring randomization.
    OriginalLength,
    /// Traversal time in seconds; edges without one fall back to `Length`.
    TravelTime,
}

impl Weight {
    #[inline]
    pub fn cost(self, network: &RoadNetwork, edge: EdgeId) -> f64 {
        match self {
            Weight::Length => network.length_m(edge),
            Weight::OriginalLength => network.original_length_m(edge),
            Weight::TravelTime => network
                .travel_secs(edge)
                .unwrap_or_else(|| network.length_m(edge)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weight::Length => "length",
            Weight::OriginalLength => "original_length",
            Weight::TravelTime => "travel_time",
        }
    }
}

impl FromStr for Weight {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(Weight::Length),
            "original_length" | "length_original" => Ok(Weight::OriginalLength),
            "travel_time" => Ok(Weight::TravelTime),
            other => Err(NetworkError::Parse(format!(
                "unknown weight {other:?}: expected length, original_length, or travel_time"
            ))),
        }
    }
}

// ── PathResult ────────────────────────────────────────────────────────────────

/// Outcome of a shortest-path query.
///
/// Non-empty results start at the source, end at the target, and `cost` is
/// the sum of the weights of `edges`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathResult {
    /// Nodes in travel order.
    pub nodes: Vec<NodeId>,
    /// Edges actually traversed; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    pub cost: f64,
}

impl PathResult {
    /// The "no route" outcome.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Source and target coincide.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be stateless across calls and `Send + Sync`: many
/// requests query one frozen network concurrently.
pub trait Router: Send + Sync {
    fn find_path(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weight: Weight,
    ) -> NetworkResult<PathResult>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm with a binary min-heap and lazy deletion.
///
/// Disabled edges are invisible.  Parallel edges are relaxed individually.
/// Entries with equal distance pop in insertion order.  Time
/// O((V + E) log V), space O(V).
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn find_path(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weight: Weight,
    ) -> NetworkResult<PathResult> {
        dijkstra(network, from, to, weight)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry ordered so that `BinaryHeap` (a max-heap) pops the smallest
/// distance first, then the earliest push.
struct QueueEntry {
    dist: f64,
    seq:  u64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn dijkstra(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    weight: Weight,
) -> NetworkResult<PathResult> {
    for node in [from, to] {
        if !network.contains_node(node) {
            return Err(NetworkError::NodeNotFound(node));
        }
    }

    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut visited   = vec![false; n];

    dist[from.index()] = 0.0;

    let mut seq = 0u64;
    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry { dist: 0.0, seq, node: from });

    while let Some(QueueEntry { dist: d, node, .. }) = heap.pop() {
        // Stale entry.
        if visited[node.index()] {
            continue;
        }
        visited[node.index()] = true;

        if node == to {
            break;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            if visited[neighbor.index()] || network.is_disabled(edge) {
                continue;
            }
            let candidate = d + weight.cost(network, edge);
            if candidate < dist[neighbor.index()] {
                dist[neighbor.index()] = candidate;
                prev_edge[neighbor.index()] = edge;
                seq += 1;
                heap.push(QueueEntry { dist: candidate, seq, node: neighbor });
            }
        }
    }

    let total = dist[to.index()];
    if total.is_infinite() {
        tracing::debug!(%from, %to, "no path");
        return Ok(PathResult::empty());
    }

    let path = reconstruct(network, &prev_edge, from, to, total);
    tracing::debug!(%from, %to, nodes = path.nodes.len(), cost = path.cost, "path found");
    Ok(path)
}

fn reconstruct(
    network: &RoadNetwork,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    cost: f64,
) -> PathResult {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    PathResult { nodes, edges, cost }
}
