//! Multi-waypoint routing over the local network.
//!
//! Each consecutive waypoint pair is one leg: snap both ends, find the
//! shortest path, reconstruct its geometry, then append it to the running
//! polyline without repeating the joint point.  Legs run strictly in order
//! and the first failing leg fails the whole route.

use rota_core::{Polyline, TravelProfile, Waypoints};
use rota_network::{DijkstraRouter, NetworkSnapshot, Router, Weight, reconstruct};

use crate::result::{RouteResult, RouteSource, summary};
use crate::{RouteError, RoutingResult};

pub struct MultiWaypointRouter<R: Router = DijkstraRouter> {
    router: R,
    weight: Weight,
}

impl Default for MultiWaypointRouter {
    fn default() -> Self {
        Self::new(DijkstraRouter, Weight::Length)
    }
}

impl<R: Router> MultiWaypointRouter<R> {
    pub fn new(router: R, weight: Weight) -> Self {
        Self { router, weight }
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Route through `waypoints` in the order given.
    pub fn route(
        &self,
        snapshot: &NetworkSnapshot,
        waypoints: &Waypoints,
        profile: TravelProfile,
    ) -> RoutingResult<RouteResult> {
        let network = snapshot.network();
        let mut polyline = Polyline::new();
        let mut cost = 0.0;
        let mut distance_m = 0.0;
        let mut node_count = 0;

        for (leg, (a, b)) in waypoints.legs().enumerate() {
            let from = snapshot.snap(a).ok_or(RouteError::SnapFailure { leg, point: a })?;
            let to = snapshot.snap(b).ok_or(RouteError::SnapFailure { leg, point: b })?;

            let path = self.router.find_path(network, from, to, self.weight)?;
            if path.is_empty() {
                tracing::debug!(leg, %from, %to, "leg has no path");
                return Err(RouteError::NoPath { leg, from, to });
            }

            let segment = reconstruct(network, &path.nodes);
            if segment.is_empty() {
                return Err(RouteError::UnusableGeometry);
            }
            polyline.extend_joined(segment.into_points());

            cost += path.cost;
            distance_m += path.edges.iter().map(|&e| network.length_m(e)).sum::<f64>();
            // The joint node was already counted by the previous leg.
            node_count += if leg == 0 { path.nodes.len() } else { path.nodes.len() - 1 };

            tracing::debug!(leg, nodes = path.nodes.len(), cost = path.cost, "leg routed");
        }

        let duration_s = profile.estimate_duration_secs(distance_m);
        let (distance_km, duration_text) = summary(distance_m, duration_s);
        Ok(RouteResult {
            polyline,
            distance_m,
            duration_s,
            distance_km,
            duration_text,
            cost,
            node_count,
            source: RouteSource::LocalGraph,
            profile,
            steps: None,
        })
    }
}
