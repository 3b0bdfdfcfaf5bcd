//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the EdgeId range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! Edge columns are sorted by source node (stable, so parallel edges keep
//! their insertion order) and indexed by `EdgeId`.
//!
//! # Mutability
//!
//! Load-time columns (`node_pos`, `edge_from`, `edge_to`, geometry, ...) are
//! `pub` for direct indexed access on hot paths.  The three columns written
//! by the randomizer (current length, randomization factor, disabled flag)
//! are private; they change only through [`crate::randomize`] and are
//! frozen once the network is wrapped in a [`crate::NetworkSnapshot`].
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  It is
//! the unprojected fallback for snapping; see [`crate::project`] for the
//! metric index.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use rota_core::{EdgeId, GeoPoint, LonLat, NodeId};

use crate::{NetworkError, NetworkResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Edge attributes ───────────────────────────────────────────────────────────

/// Per-edge input to the builder.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    /// Length in metres at load time.
    pub length_m: f64,
    /// Optional traversal time in seconds.
    pub travel_secs: Option<f64>,
    /// Detailed path shape in `[lon, lat]` order, from source to target.
    pub geometry: Option<Vec<LonLat>>,
}

impl EdgeAttrs {
    pub fn length(length_m: f64) -> Self {
        Self { length_m, travel_secs: None, geometry: None }
    }

    pub fn with_travel_secs(mut self, secs: f64) -> Self {
        self.travel_secs = Some(secs);
        self
    }

    pub fn with_geometry(mut self, geometry: Vec<LonLat>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Attributes for the opposite direction: geometry is reversed.
    fn reversed(&self) -> Self {
        Self {
            length_m: self.length_m,
            travel_secs: self.travel_secs,
            geometry: self.geometry.as_ref().map(|g| g.iter().rev().copied().collect()),
        }
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Do not construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Identity of each node in the source dataset (OSM id, CSV id, ...).
    pub node_key: Vec<i64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Immutable edge data (indexed by EdgeId) ───────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Length at load time, in metres.  The only recoverable baseline once
    /// weights have been perturbed.
    pub edge_length_original_m: Vec<f64>,

    pub edge_travel_secs: Vec<Option<f64>>,

    /// Detailed geometry in `[lon, lat]` order, when the source had it.
    pub edge_geometry: Vec<Option<Box<[LonLat]>>>,

    // ── Randomizer-owned edge data ────────────────────────────────────────
    edge_length_m: Vec<f64>,
    edge_factor: Vec<Option<f64>>,
    edge_disabled: Vec<bool>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        // An empty builder has nothing to validate.
        RoadNetworkBuilder::new().build_unchecked()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.node_pos.get(node.index()).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`,
    /// disabled edges included.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// All edge ids in CSR order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edge_count() as u32).map(EdgeId)
    }

    /// First enabled edge from `from` to `to`, in insertion order.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains_node(from) {
            return None;
        }
        self.out_edges(from)
            .find(|&e| self.edge_to[e.index()] == to && !self.edge_disabled[e.index()])
    }

    // ── Edge attributes ───────────────────────────────────────────────────

    /// Current traversal length in metres (perturbed once randomized).
    #[inline]
    pub fn length_m(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()]
    }

    #[inline]
    pub fn original_length_m(&self, edge: EdgeId) -> f64 {
        self.edge_length_original_m[edge.index()]
    }

    /// Multiplier applied by weight randomization, if it has run.
    #[inline]
    pub fn randomization_factor(&self, edge: EdgeId) -> Option<f64> {
        self.edge_factor[edge.index()]
    }

    #[inline]
    pub fn is_disabled(&self, edge: EdgeId) -> bool {
        self.edge_disabled[edge.index()]
    }

    #[inline]
    pub fn travel_secs(&self, edge: EdgeId) -> Option<f64> {
        self.edge_travel_secs[edge.index()]
    }

    #[inline]
    pub fn geometry(&self, edge: EdgeId) -> Option<&[LonLat]> {
        self.edge_geometry[edge.index()].as_deref()
    }

    pub fn randomized_edge_count(&self) -> usize {
        self.edge_factor.iter().filter(|f| f.is_some()).count()
    }

    pub fn disabled_edge_count(&self) -> usize {
        self.edge_disabled.iter().filter(|&&d| d).count()
    }

    // ── Randomizer hooks ──────────────────────────────────────────────────

    pub(crate) fn apply_factor(&mut self, edge: EdgeId, factor: f64) {
        let i = edge.index();
        self.edge_length_m[i] = self.edge_length_original_m[i] * factor;
        self.edge_factor[i] = Some(factor);
    }

    pub(crate) fn disable(&mut self, edge: EdgeId) {
        self.edge_disabled[edge.index()] = true;
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`, measured in
    /// unprojected degrees.
    ///
    /// Returns `None` if the network has no nodes or `pos` is not finite.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        if !pos.is_finite() {
            return None;
        }
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    /// Arithmetic mean of node positions.
    pub fn mean_position(&self) -> Option<GeoPoint> {
        if self.node_pos.is_empty() {
            return None;
        }
        let n = self.node_pos.len() as f64;
        let (lat, lon) = self
            .node_pos
            .iter()
            .fold((0.0, 0.0), |(la, lo), p| (la + p.lat, lo + p.lon));
        Some(GeoPoint::new(lat / n, lon / n))
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rota_core::GeoPoint;
/// use rota_network::{EdgeAttrs, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(-22.918, -42.819));
/// let c = b.add_node(GeoPoint::new(-22.920, -42.830));
/// b.add_road(a, c, EdgeAttrs::length(1_150.0));
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    keys:      Vec<i64>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttrs,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), keys: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            keys:      Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node keyed by its own index and return its `NodeId`.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let key = self.nodes.len() as i64;
        self.add_keyed_node(key, pos)
    }

    /// Add a node carrying the source dataset's identifier.
    pub fn add_keyed_node(&mut self, key: i64, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.keys.push(key);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) {
        self.raw_edges.push(RawEdge { from, to, attrs });
    }

    /// Add edges in **both directions**; the reverse edge gets the reversed
    /// geometry.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        let back = attrs.reversed();
        self.add_directed_edge(a, b, attrs);
        self.add_directed_edge(b, a, back);
    }

    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and produce a [`RoadNetwork`].
    ///
    /// Every edge must reference existing nodes and carry a finite, strictly
    /// positive length.  A travel time, when present, obeys the same rule.
    pub fn build(self) -> NetworkResult<RoadNetwork> {
        let n = self.nodes.len();
        for e in &self.raw_edges {
            if e.from.index() >= n || e.to.index() >= n {
                return Err(NetworkError::DanglingEdge { from: e.from, to: e.to });
            }
            let len = e.attrs.length_m;
            if !len.is_finite() || len <= 0.0 {
                return Err(NetworkError::InvalidLength { from: e.from, to: e.to, length_m: len });
            }
            if let Some(secs) = e.attrs.travel_secs {
                if !secs.is_finite() || secs <= 0.0 {
                    return Err(NetworkError::InvalidTravelTime { from: e.from, to: e.to, travel_secs: secs });
                }
            }
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort: parallel edges keep insertion order within a row.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let mut edge_from              = Vec::with_capacity(edge_count);
        let mut edge_to                = Vec::with_capacity(edge_count);
        let mut edge_length_original_m = Vec::with_capacity(edge_count);
        let mut edge_travel_secs       = Vec::with_capacity(edge_count);
        let mut edge_geometry          = Vec::with_capacity(edge_count);
        for e in raw {
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_length_original_m.push(e.attrs.length_m);
            edge_travel_secs.push(e.attrs.travel_secs);
            edge_geometry.push(e.attrs.geometry.map(Vec::into_boxed_slice));
        }

        // Bulk-load R-tree for O(N log N) construction.
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_pos: self.nodes,
            node_key: self.keys,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m: edge_length_original_m.clone(),
            edge_length_original_m,
            edge_travel_secs,
            edge_geometry,
            edge_factor: vec![None; edge_count],
            edge_disabled: vec![false; edge_count],
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
