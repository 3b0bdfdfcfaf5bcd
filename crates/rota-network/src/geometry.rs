//! Node path → display polyline.
//!
//! Each consecutive node pair contributes the detailed geometry of the first
//! enabled edge between them (converted from `[lon, lat]` to `(lat, lon)`),
//! or the two endpoint positions when the edge has no geometry.  Segments
//! are joined without repeating the shared point, then the whole line is
//! normalised: non-finite points are discarded and near-duplicates collapse.
//!
//! Pure and re-entrant; the same path always yields the same polyline.

use rota_core::{GeoPoint, NodeId, Polyline};

use crate::network::RoadNetwork;

/// Build the polyline for `nodes`.
///
/// - 0 nodes → empty polyline.
/// - 1 node  → that node's position.
/// - ≥ 2     → at least two points, unless every coordinate was invalid, in
///   which case the result is empty and the route must be treated as
///   unusable.
pub fn reconstruct(network: &RoadNetwork, nodes: &[NodeId]) -> Polyline {
    let mut line = Polyline::with_capacity(nodes.len() * 2);

    if let [only] = nodes {
        if let Some(pos) = network.position(*only) {
            line.push(pos);
        }
        line.normalize();
        return line;
    }

    for pair in nodes.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        match network.edge_between(a, b).and_then(|e| network.geometry(e)) {
            Some(shape) if !shape.is_empty() => {
                line.extend_joined(shape.iter().map(|&p| GeoPoint::from_lon_lat(p)));
            }
            _ => {
                let ends = [network.position(a), network.position(b)];
                line.extend_joined(ends.into_iter().flatten());
            }
        }
    }

    let dropped = line.normalize();
    if dropped > 0 {
        tracing::debug!(dropped, kept = line.len(), "discarded non-finite coordinates");
    }
    line
}
