//! External routing fallback.
//!
//! One call per route: every waypoint goes into a single request, in caller
//! order.  The first (best) route of the response is normalised into an
//! [`ExternalRoute`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use rota_core::{MAX_EXTERNAL_WAYPOINTS, Polyline, TravelProfile, Waypoints};

use crate::instructions::RouteStep;
use crate::response::{GeoJsonLineString, RouteResponse, WireRoute};
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport};
use crate::{OsrmError, OsrmResult};

pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;
pub const DEFAULT_USER_AGENT: &str = "rota/0.1";

/// Provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl OsrmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Normalised provider route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalRoute {
    pub distance_m: f64,
    pub duration_s: f64,
    /// `(lat, lon)` polyline, deduplicated.
    pub geometry: Polyline,
    /// Present only when steps were requested.
    pub steps: Option<Vec<RouteStep>>,
}

impl ExternalRoute {
    pub fn geojson(&self) -> GeoJsonLineString {
        GeoJsonLineString::from_polyline(&self.geometry)
    }
}

pub struct OsrmClient<T: HttpTransport = ReqwestTransport> {
    base_url: String,
    transport: T,
}

impl OsrmClient<ReqwestTransport> {
    /// Client over a real HTTP connection.
    pub fn new(config: &OsrmConfig) -> OsrmResult<Self> {
        let transport = ReqwestTransport::new(config.timeout(), &config.user_agent)?;
        Ok(Self::with_transport(&config.base_url, transport))
    }
}

impl<T: HttpTransport> OsrmClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/route/v1/{profile}/{lon,lat;...}?overview=full&geometries=geojson&steps={bool}`
    pub fn route_url(&self, profile: TravelProfile, waypoints: &Waypoints, include_steps: bool) -> String {
        let coords = waypoints
            .as_slice()
            .iter()
            .map(|p| format!("{},{}", p.lon, p.lat))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps={}",
            self.base_url,
            profile.as_str(),
            coords,
            include_steps
        )
    }

    /// Route through every waypoint with a single provider call.
    ///
    /// # Errors
    ///
    /// - [`OsrmError::TooManyWaypoints`] above the 7-point ceiling, before any
    ///   request is sent.
    /// - [`OsrmError::Transport`] when no response was obtained.
    /// - [`OsrmError::NoRoutes`] for an empty route list.
    /// - [`OsrmError::Provider`] / [`OsrmError::Status`] /
    ///   [`OsrmError::Malformed`] for error or unparseable bodies.
    pub fn route(
        &self,
        profile: TravelProfile,
        waypoints: &Waypoints,
        include_steps: bool,
    ) -> OsrmResult<ExternalRoute> {
        check_ceiling(waypoints.len())?;

        let url = self.route_url(profile, waypoints, include_steps);
        tracing::debug!(%url, waypoints = waypoints.len(), "calling routing provider");

        let response = self.transport.get(&url).inspect_err(|e| {
            tracing::warn!(error = %e, "routing provider unreachable");
        })?;
        let route = parse_best_route(&response).inspect_err(|e| {
            tracing::warn!(status = response.status, error = %e, "routing provider call failed");
        })?;

        let geometry = route.geometry.to_polyline();
        let steps = include_steps.then(|| collect_steps(&route));
        Ok(ExternalRoute {
            distance_m: route.distance,
            duration_s: route.duration,
            geometry,
            steps,
        })
    }
}

/// Waypoint-count ceiling shared by every provider-backed operation.
pub fn check_ceiling(count: usize) -> OsrmResult<()> {
    if count > MAX_EXTERNAL_WAYPOINTS {
        return Err(OsrmError::TooManyWaypoints { count, max: MAX_EXTERNAL_WAYPOINTS });
    }
    Ok(())
}

fn parse_best_route(response: &HttpResponse) -> OsrmResult<WireRoute> {
    let parsed: Result<RouteResponse, _> = serde_json::from_str(&response.body);

    if !response.is_success() {
        return Err(match parsed {
            Ok(RouteResponse { code: Some(code), .. }) if code == "NoRoute" => OsrmError::NoRoutes,
            Ok(RouteResponse { code: Some(code), message, .. }) => OsrmError::Provider {
                code,
                message: message.unwrap_or_default(),
            },
            _ => OsrmError::Status { status: response.status, body: truncate(&response.body) },
        });
    }

    let parsed = parsed.map_err(|e| OsrmError::Malformed(e.to_string()))?;
    if let Some(code) = parsed.code.as_deref() {
        if code != "Ok" && code != "NoRoute" {
            return Err(OsrmError::Provider {
                code: code.to_string(),
                message: parsed.message.unwrap_or_default(),
            });
        }
    }
    parsed.routes.into_iter().next().ok_or(OsrmError::NoRoutes)
}

fn collect_steps(route: &WireRoute) -> Vec<RouteStep> {
    route
        .legs
        .iter()
        .flat_map(|leg| &leg.steps)
        .map(|st| {
            RouteStep::new(
                &st.maneuver.kind,
                st.maneuver.modifier.as_deref(),
                st.name.as_deref().unwrap_or(""),
                st.distance,
                st.duration,
            )
        })
        .collect()
}

/// Error bodies can be whole HTML pages.
fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &body[..i]),
        None => body.to_string(),
    }
}
