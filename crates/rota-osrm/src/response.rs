//! OSRM `route` service wire format.
//!
//! Only the fields the client reads are modelled; unknown fields are
//! ignored.  Error bodies share the envelope (`code` + `message`, no
//! `routes`).

use serde::{Deserialize, Serialize};

use rota_core::{LonLat, Polyline};

#[derive(Debug, Deserialize)]
pub(crate) struct RouteResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRoute {
    pub distance: f64,
    pub duration: f64,
    pub geometry: GeoJsonLineString,
    #[serde(default)]
    pub legs: Vec<WireLeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLeg {
    #[serde(default)]
    pub steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireStep {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    pub maneuver: WireManeuver,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireManeuver {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub modifier: Option<String>,
}

/// GeoJSON `LineString`, coordinates in `[lon, lat]` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonLineString {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<LonLat>,
}

impl GeoJsonLineString {
    pub fn from_polyline(line: &Polyline) -> Self {
        Self { kind: "LineString".to_string(), coordinates: line.to_lon_lat_pairs() }
    }

    /// Swap to `(lat, lon)` and normalise.
    pub fn to_polyline(&self) -> Polyline {
        let mut line = Polyline::from_lon_lat(&self.coordinates);
        line.normalize();
        line
    }
}
