//! Metric projection and projected nearest-node lookup.
//!
//! Nearest-node search in raw degrees stretches longitude distances by
//! `1 / cos(lat)`.  [`ProjectedIndex`] projects every node with a local
//! equirectangular projection centred on the network's mean position and
//! indexes the result in metres.  For a single municipality the projection
//! error is negligible.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use rota_core::{GeoPoint, NodeId};

use crate::network::RoadNetwork;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Local equirectangular projection around `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    origin: GeoPoint,
    cos_lat0: f64,
}

impl LocalProjection {
    pub fn new(origin: GeoPoint) -> Self {
        Self { origin, cos_lat0: origin.lat.to_radians().cos() }
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// `[x, y]` in metres east/north of the origin; `None` for non-finite
    /// input.
    pub fn project(&self, p: GeoPoint) -> Option<[f64; 2]> {
        if !p.is_finite() {
            return None;
        }
        let x = EARTH_RADIUS_M * (p.lon - self.origin.lon).to_radians() * self.cos_lat0;
        let y = EARTH_RADIUS_M * (p.lat - self.origin.lat).to_radians();
        Some([x, y])
    }

    pub fn unproject(&self, xy: [f64; 2]) -> GeoPoint {
        let lat = self.origin.lat + (xy[1] / EARTH_RADIUS_M).to_degrees();
        let lon = self.origin.lon + (xy[0] / (EARTH_RADIUS_M * self.cos_lat0)).to_degrees();
        GeoPoint::new(lat, lon)
    }
}

#[derive(Clone)]
struct ProjectedEntry {
    xy: [f64; 2],
    id: NodeId,
}

impl RTreeObject for ProjectedEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xy)
    }
}

impl PointDistance for ProjectedEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.xy[0] - point[0];
        let dy = self.xy[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Node positions in projected metres, indexed for nearest-node queries.
pub struct ProjectedIndex {
    projection: LocalProjection,
    tree: RTree<ProjectedEntry>,
}

impl ProjectedIndex {
    /// Project `network`.  Returns `None` for an empty network.
    pub fn build(network: &RoadNetwork) -> Option<Self> {
        let projection = LocalProjection::new(network.mean_position()?);
        let entries: Vec<ProjectedEntry> = network
            .node_pos
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| {
                projection
                    .project(p)
                    .map(|xy| ProjectedEntry { xy, id: NodeId(i as u32) })
            })
            .collect();
        if entries.is_empty() {
            return None;
        }
        Some(Self { projection, tree: RTree::bulk_load(entries) })
    }

    pub fn projection(&self) -> &LocalProjection {
        &self.projection
    }

    /// Nearest node by metric distance; `None` when `pos` cannot be
    /// projected.
    pub fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        let xy = self.projection.project(pos)?;
        self.tree.nearest_neighbor(&xy).map(|e| e.id)
    }
}
