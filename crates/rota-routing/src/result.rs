//! The route shape shared by local and external routing.

use serde::Serialize;

use rota_core::{Polyline, TravelProfile, format_duration};
use rota_osrm::RouteStep;

/// Which strategy produced a route.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    LocalGraph,
    External,
}

impl RouteSource {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteSource::LocalGraph => "local_graph",
            RouteSource::External => "external",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// `(lat, lon)` points, origin first, no consecutive duplicates.
    pub polyline: Polyline,
    pub distance_m: f64,
    /// Provider duration, or a nominal-speed estimate for local routes.
    pub duration_s: f64,
    pub distance_km: f64,
    /// `duration_s` rendered as `"N min"` or `"H h M min"`.
    pub duration_text: String,
    /// Sum of traversed weights.  Equals `distance_m` for the length weights.
    pub cost: f64,
    /// Nodes visited, counting each leg joint once.  Zero for external routes.
    pub node_count: usize,
    pub source: RouteSource,
    pub profile: TravelProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<RouteStep>>,
}

/// `(distance_km, duration_text)` for a route summary.
pub(crate) fn summary(distance_m: f64, duration_s: f64) -> (f64, String) {
    (distance_m / 1000.0, format_duration(duration_s))
}
