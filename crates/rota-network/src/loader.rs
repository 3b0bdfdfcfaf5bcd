//! Network loading from external map data.
//!
//! # CSV format
//!
//! Two files.  `nodes.csv`:
//!
//! ```csv
//! id,lat,lon
//! 101,-22.9189,-42.8194
//! 102,-22.9200,-42.8300
//! ```
//!
//! `edges.csv` — `oneway`, `travel_secs`, and `geometry` are optional
//! columns:
//!
//! ```csv
//! from,to,length_m,oneway,travel_secs,geometry
//! 101,102,1150.0,no,,"LINESTRING (-42.8194 -22.9189, -42.8250 -22.9195, -42.8300 -22.9200)"
//! ```
//!
//! - `oneway`: `yes`/`true`/`1` adds only `from → to`; anything else (or
//!   absent) adds both directions, the reverse with reversed geometry.
//! - `geometry`: WKT `LINESTRING` in `lon lat` order, as exported by common
//!   OSM toolchains.  An unparseable or degenerate geometry is logged and
//!   dropped; the edge then draws as a straight segment between its nodes.
//!
//! Node ids are the dataset's own keys; edges referring to unknown keys are
//! rejected.

use std::io::Read;
use std::path::{Path, PathBuf};

use geo_types::LineString;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use wkt::TryFromWkt;

use rota_core::{GeoPoint, LonLat, NodeId};

use crate::network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder};
use crate::{NetworkError, NetworkResult};

// ── Sources ───────────────────────────────────────────────────────────────────

/// Where to load a network from.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkSource {
    Csv { nodes: PathBuf, edges: PathBuf },
    /// OSM PBF extract; requires the `osm` feature.
    Pbf(PathBuf),
}

/// Load a network from `source`.
pub fn load_network(source: &NetworkSource) -> NetworkResult<RoadNetwork> {
    let network = match source {
        NetworkSource::Csv { nodes, edges } => load_csv(nodes, edges)?,
        NetworkSource::Pbf(path) => load_pbf(path)?,
    };
    tracing::info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        "network loaded"
    );
    Ok(network)
}

#[cfg(feature = "osm")]
fn load_pbf(path: &Path) -> NetworkResult<RoadNetwork> {
    crate::osm::load_from_pbf(path)
}

#[cfg(not(feature = "osm"))]
fn load_pbf(path: &Path) -> NetworkResult<RoadNetwork> {
    Err(NetworkError::Parse(format!(
        "cannot load {}: built without the `osm` feature",
        path.display()
    )))
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  i64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     i64,
    to:       i64,
    length_m: f64,
    #[serde(default)]
    oneway:   Option<String>,
    #[serde(default)]
    travel_secs: Option<f64>,
    #[serde(default)]
    geometry: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from a nodes CSV and an edges CSV.
pub fn load_csv(nodes: &Path, edges: &Path) -> NetworkResult<RoadNetwork> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    load_csv_readers(nodes, edges)
}

/// Like [`load_csv`] but accepts any `Read` sources.
pub fn load_csv_readers<N: Read, E: Read>(nodes: N, edges: E) -> NetworkResult<RoadNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut by_key: FxHashMap<i64, NodeId> = FxHashMap::default();

    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let pos = GeoPoint::try_new(row.lat, row.lon)
            .map_err(|e| NetworkError::Parse(format!("node {}: {e}", row.id)))?;
        let id = builder.add_keyed_node(row.id, pos);
        if by_key.insert(row.id, id).is_some() {
            return Err(NetworkError::Parse(format!("duplicate node id {}", row.id)));
        }
    }

    let mut edge_reader = csv::Reader::from_reader(edges);
    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let from = *by_key.get(&row.from).ok_or(NetworkError::UnknownNodeKey(row.from))?;
        let to = *by_key.get(&row.to).ok_or(NetworkError::UnknownNodeKey(row.to))?;

        let mut attrs = EdgeAttrs::length(row.length_m);
        attrs.travel_secs = row.travel_secs;
        attrs.geometry = match row.geometry.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => match parse_wkt_linestring(text) {
                Ok(points) if points.len() >= 2 => Some(points),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(from = row.from, to = row.to, error = %e, "dropping edge geometry");
                    None
                }
            },
        };

        if row.oneway.as_deref().is_some_and(is_truthy) {
            builder.add_directed_edge(from, to, attrs);
        } else {
            builder.add_road(from, to, attrs);
        }
    }

    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn is_truthy(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "yes" | "true" | "1")
}

/// Parse a WKT `LINESTRING` into `[lon, lat]` pairs.
///
/// Z and M ordinates are accepted and dropped.  `LINESTRING EMPTY` yields an
/// empty vector.
pub fn parse_wkt_linestring(text: &str) -> NetworkResult<Vec<LonLat>> {
    let line = LineString::<f64>::try_from_wkt_str(text.trim())
        .map_err(|e| NetworkError::Parse(format!("invalid WKT linestring {text:?}: {e}")))?;
    Ok(line.coords().map(|c| [c.x, c.y]).collect())
}
