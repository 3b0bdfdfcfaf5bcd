//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use rota_network::osm::load_from_pbf;
//!
//! let network = load_from_pbf(Path::new("marica.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Every `highway=*` way, footways and paths included (the routable network
//! is multi-modal).  Ways are **simplified**: graph nodes are only the
//! intersections and way endpoints, and each edge carries the intermediate
//! OSM nodes as detailed geometry.  Edge length is the haversine length of
//! that geometry.
//!
//! One-way roads add a single directed edge (`oneway=-1` reverses it); all
//! others add both directions.

use std::path::Path;

use osmpbf::{Element, ElementReader};
use rustc_hash::{FxHashMap, FxHashSet};

use rota_core::{GeoPoint, NodeId};

use crate::network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder};
use crate::NetworkError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Load a simplified road network from an OSM PBF file.
///
/// # Errors
///
/// Returns [`NetworkError::Osm`] on read or parse errors.
pub fn load_from_pbf(path: &Path) -> Result<RoadNetwork, NetworkError> {
    // ── Phase 1: collect all OSM nodes + highway ways in one pass ─────────
    let reader = ElementReader::from_path(path).map_err(|e| NetworkError::Osm(e.to_string()))?;

    let mut all_nodes: FxHashMap<i64, GeoPoint> = FxHashMap::default();
    let mut ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let Some(highway) = tag(&tags, "highway") else { return };
                if tag(&tags, "area") == Some("yes") {
                    return;
                }
                ways.push(OsmWay {
                    refs: w.refs().collect(),
                    speed_mps: speed_mps(highway),
                    direction: direction(highway, &tags),
                });
            }
            _ => {}
        })
        .map_err(|e| NetworkError::Osm(e.to_string()))?;

    // Drop refs without coordinates (clipped extracts).
    for way in &mut ways {
        way.refs.retain(|r| all_nodes.contains_key(r));
    }
    ways.retain(|w| w.refs.len() >= 2);

    // ── Phase 2: find graph nodes (intersections + way endpoints) ─────────
    let mut seen: FxHashSet<i64> = FxHashSet::default();
    let mut junctions: FxHashSet<i64> = FxHashSet::default();
    for way in &ways {
        junctions.insert(way.refs[0]);
        junctions.insert(way.refs[way.refs.len() - 1]);
        for &r in &way.refs {
            if !seen.insert(r) {
                junctions.insert(r);
            }
        }
    }
    drop(seen);

    // ── Phase 3: build simplified network ─────────────────────────────────
    let mut builder = RoadNetworkBuilder::with_capacity(junctions.len(), junctions.len() * 3);
    let mut osm_to_rota: FxHashMap<i64, NodeId> =
        FxHashMap::with_capacity_and_hasher(junctions.len(), Default::default());

    let mut node_for = |osm: i64, builder: &mut RoadNetworkBuilder| -> NodeId {
        *osm_to_rota
            .entry(osm)
            .or_insert_with(|| builder.add_keyed_node(osm, all_nodes[&osm]))
    };

    for way in &ways {
        let mut start = way.refs[0];
        let mut shape = vec![all_nodes[&start]];
        for &r in &way.refs[1..] {
            shape.push(all_nodes[&r]);
            if !junctions.contains(&r) {
                continue;
            }
            let length_m: f64 = shape.windows(2).map(|w| w[0].distance_m(w[1])).sum();
            if length_m > 0.0 {
                let from = node_for(start, &mut builder);
                let to = node_for(r, &mut builder);
                let attrs = EdgeAttrs::length(length_m)
                    .with_travel_secs(length_m / way.speed_mps)
                    .with_geometry(shape.iter().map(|p| p.to_lon_lat()).collect());
                match way.direction {
                    Direction::Both => builder.add_road(from, to, attrs),
                    Direction::Forward => builder.add_directed_edge(from, to, attrs),
                    Direction::Backward => {
                        let mut back = attrs;
                        if let Some(g) = back.geometry.as_mut() {
                            g.reverse();
                        }
                        builder.add_directed_edge(to, from, back);
                    }
                }
            }
            start = r;
            shape = vec![all_nodes[&r]];
        }
    }

    tracing::debug!(
        osm_nodes = all_nodes.len(),
        ways = ways.len(),
        graph_nodes = builder.node_count(),
        "simplified OSM network"
    );
    builder.build()
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:      Vec<i64>,
    speed_mps: f64,
    direction: Direction,
}

#[derive(Clone, Copy)]
enum Direction {
    Both,
    Forward,
    Backward,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

fn tag<'a>(tags: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Nominal speed (m/s) for a `highway` class.  Pedestrian classes use
/// walking speed.
fn speed_mps(highway: &str) -> f64 {
    match highway {
        "motorway" | "motorway_link"         => 29.1,
        "trunk"    | "trunk_link"            => 24.6,
        "primary"  | "primary_link"          => 20.1,
        "secondary"| "secondary_link"        => 17.9,
        "tertiary" | "tertiary_link"         => 13.4,
        "residential" | "living_street"      => 8.9,
        "service"  | "unclassified"          => 6.7,
        "footway" | "path" | "pedestrian"
        | "steps" | "track" | "cycleway"     => 1.4,
        _                                    => 8.9,
    }
}

/// Motorways and roundabouts are implicitly one-way in OSM convention.
fn direction(highway: &str, tags: &[(&str, &str)]) -> Direction {
    match tag(tags, "oneway") {
        Some("yes" | "1" | "true") => return Direction::Forward,
        Some("-1" | "reverse") => return Direction::Backward,
        Some("no" | "0" | "false") => return Direction::Both,
        _ => {}
    }
    let implicit = matches!(highway, "motorway" | "motorway_link")
        || tag(tags, "junction") == Some("roundabout");
    if implicit { Direction::Forward } else { Direction::Both }
}
