//! Local-graph vs external-provider routing.
//!
//! The strategy is chosen once per request from whether a network snapshot
//! is loaded; both variants answer through [`RoutingStrategy::route`] with
//! the same [`RouteResult`] shape.

use std::sync::Arc;

use rota_core::{TravelProfile, Waypoints};
use rota_network::{DijkstraRouter, NetworkSnapshot, Router};
use rota_osrm::{HttpTransport, OsrmClient, ReqwestTransport};

use crate::multi::MultiWaypointRouter;
use crate::result::{RouteResult, RouteSource, summary};
use crate::{RouteError, RoutingResult};

pub enum RoutingStrategy<'a, R: Router = DijkstraRouter, T: HttpTransport = ReqwestTransport> {
    /// Shortest paths over the loaded network, one leg per waypoint pair.
    LocalGraph {
        snapshot: Arc<NetworkSnapshot>,
        router: &'a MultiWaypointRouter<R>,
    },
    /// The whole waypoint list forwarded to the provider in one call.
    ExternalFallback { client: &'a OsrmClient<T> },
}

impl<'a, R: Router, T: HttpTransport> RoutingStrategy<'a, R, T> {
    /// Local when a snapshot is loaded, external otherwise.
    pub fn select(
        snapshot: Option<Arc<NetworkSnapshot>>,
        router: &'a MultiWaypointRouter<R>,
        client: &'a OsrmClient<T>,
    ) -> Self {
        match snapshot {
            Some(snapshot) => RoutingStrategy::LocalGraph { snapshot, router },
            None => RoutingStrategy::ExternalFallback { client },
        }
    }

    pub fn source(&self) -> RouteSource {
        match self {
            RoutingStrategy::LocalGraph { .. } => RouteSource::LocalGraph,
            RoutingStrategy::ExternalFallback { .. } => RouteSource::External,
        }
    }

    /// `include_steps` applies to the external provider only; local routes
    /// carry no turn-by-turn steps.
    pub fn route(
        &self,
        waypoints: &Waypoints,
        profile: TravelProfile,
        include_steps: bool,
    ) -> RoutingResult<RouteResult> {
        match self {
            RoutingStrategy::LocalGraph { snapshot, router } => {
                router.route(snapshot, waypoints, profile)
            }
            RoutingStrategy::ExternalFallback { client } => {
                route_external(client, waypoints, profile, include_steps)
            }
        }
    }
}

/// One provider call for all of `waypoints`.
pub fn route_external<T: HttpTransport>(
    client: &OsrmClient<T>,
    waypoints: &Waypoints,
    profile: TravelProfile,
    include_steps: bool,
) -> RoutingResult<RouteResult> {
    let route = client.route(profile, waypoints, include_steps)?;
    if route.geometry.is_empty() {
        return Err(RouteError::UnusableGeometry);
    }
    let (distance_km, duration_text) = summary(route.distance_m, route.duration_s);
    Ok(RouteResult {
        polyline: route.geometry,
        distance_m: route.distance_m,
        duration_s: route.duration_s,
        distance_km,
        duration_text,
        cost: route.distance_m,
        node_count: 0,
        source: RouteSource::External,
        profile,
        steps: route.steps,
    })
}
