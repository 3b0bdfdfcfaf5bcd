//! 40×40 synthetic street grid over central Maricá, RJ.
//!
//! Node layout (1 600 nodes, row=south→north, col=west→east):
//!
//! ```text
//!  row 39  ·  ·  ·  …  ·
//!   …
//!  row 0   ·  ·  ·  …  ·
//!        col 0         col 39
//! ```
//!
//! ~220 m between rows, ~205 m between columns.  Every fifth row is a
//! one-way eastbound street; all other streets run both ways.  Each edge
//! carries a slightly bent three-point geometry so reconstructed polylines
//! follow more than the node positions.

use rota_core::{GeoPoint, NodeId};
use rota_network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder};

pub const ROWS: usize = 40;
pub const COLS: usize = 40;

/// Southern latitude and step between rows (~220 m/step).
const LAT_MIN:  f64 = -22.955;
const LAT_STEP: f64 = 0.002;

/// Western longitude and step between columns (~205 m/step at -22.9°).
const LON_MIN:  f64 = -42.860;
const LON_STEP: f64 = 0.002;

/// ~40 km/h in m/s.
const SPEED_MPS: f64 = 11.1;

/// Build the grid.  `nodes[row * COLS + col]` is the `NodeId` at that cell.
pub fn build_network() -> anyhow::Result<(RoadNetwork, Vec<NodeId>)> {
    let mut bldr = RoadNetworkBuilder::with_capacity(ROWS * COLS, ROWS * COLS * 4);
    let mut nodes = vec![NodeId::INVALID; ROWS * COLS];

    for row in 0..ROWS {
        for col in 0..COLS {
            let pos = GeoPoint::new(LAT_MIN + row as f64 * LAT_STEP, LON_MIN + col as f64 * LON_STEP);
            nodes[row * COLS + col] = bldr.add_node(pos);
        }
    }

    // East-west streets.
    for row in 0..ROWS {
        for col in 0..COLS - 1 {
            let a = nodes[row * COLS + col];
            let b = nodes[row * COLS + col + 1];
            let attrs = street(&bldr, a, b);
            if row % 5 == 0 {
                bldr.add_directed_edge(a, b, attrs);
            } else {
                bldr.add_road(a, b, attrs);
            }
        }
    }

    // North-south avenues.
    for row in 0..ROWS - 1 {
        for col in 0..COLS {
            let a = nodes[row * COLS + col];
            let b = nodes[(row + 1) * COLS + col];
            let attrs = street(&bldr, a, b);
            bldr.add_road(a, b, attrs);
        }
    }

    Ok((bldr.build()?, nodes))
}

/// Edge attributes for a street from `a` to `b`: a midpoint nudged
/// sideways, haversine length, and travel time at the grid speed.
fn street(bldr: &RoadNetworkBuilder, a: NodeId, b: NodeId) -> EdgeAttrs {
    let (Some(pa), Some(pb)) = (bldr.node_pos(a), bldr.node_pos(b)) else {
        return EdgeAttrs::length(1.0);
    };
    let mid = GeoPoint::new(
        (pa.lat + pb.lat) / 2.0 + 0.0001,
        (pa.lon + pb.lon) / 2.0 + 0.0001,
    );
    let length_m = pa.distance_m(mid) + mid.distance_m(pb);
    EdgeAttrs::length(length_m)
        .with_travel_secs(length_m / SPEED_MPS)
        .with_geometry(vec![pa.to_lon_lat(), mid.to_lon_lat(), pb.to_lon_lat()])
}

/// Town centre, near the cell at row 20, col 20.
pub fn centre() -> GeoPoint {
    GeoPoint::new(LAT_MIN + 20.0 * LAT_STEP, LON_MIN + 20.0 * LON_STEP)
}
