//! Serialisable status reports and the static landmark table.

use serde::Serialize;

use rota_core::GeoPoint;
use rota_network::{NetworkSnapshot, Weight};

/// What the local engine is and what randomization did to the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmReport {
    pub algorithm: &'static str,
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
    pub weight: Weight,
    pub graph_kind: &'static str,
    pub place: String,
    pub snapshot_version: u64,
    pub nodes: usize,
    pub edges: usize,
    pub randomized_edges: usize,
    pub disabled_edges: usize,
    pub disable_proportion: f64,
    pub randomization_active: bool,
}

impl AlgorithmReport {
    pub fn from_snapshot(snapshot: &NetworkSnapshot, weight: Weight) -> Self {
        let stats = snapshot.stats();
        Self {
            algorithm: "Dijkstra (binary heap, lazy deletion)",
            time_complexity: "O((V + E) log V)",
            space_complexity: "O(V)",
            weight,
            graph_kind: "directed multigraph",
            place: snapshot.place().to_string(),
            snapshot_version: snapshot.version(),
            nodes: stats.nodes,
            edges: stats.edges,
            randomized_edges: stats.randomized_edges,
            disabled_edges: stats.disabled_edges,
            disable_proportion: stats.disable_proportion,
            randomization_active: stats.randomized_edges > 0 || stats.disabled_edges > 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub ok: bool,
    pub graph_loaded: bool,
    pub place: String,
}

/// A named landmark consumers can offer as a route endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointOfInterest {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub kind: &'static str,
    pub description: &'static str,
}

impl PointOfInterest {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Landmarks of Maricá, RJ.
pub const MARICA_POINTS_OF_INTEREST: &[PointOfInterest] = &[
    PointOfInterest {
        name: "Praia de Maricá",
        lat: -22.9189,
        lon: -42.8194,
        kind: "beach",
        description: "Main town beach",
    },
    PointOfInterest {
        name: "Lagoa de Maricá",
        lat: -22.9200,
        lon: -42.8300,
        kind: "lagoon",
        description: "Coastal lagoon with calm water",
    },
    PointOfInterest {
        name: "Centro de Maricá",
        lat: -22.9180,
        lon: -42.8190,
        kind: "centre",
        description: "Commercial town centre",
    },
    PointOfInterest {
        name: "Barra de Maricá",
        lat: -22.9300,
        lon: -42.8100,
        kind: "beach",
        description: "Far end of the beach",
    },
];
