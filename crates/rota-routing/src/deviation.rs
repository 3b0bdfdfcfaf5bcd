//! Marginal cost of inserting one stop before the destination.
//!
//! Two provider calls: the base itinerary, then the same itinerary with the
//! candidate inserted just before the final waypoint.  Both must succeed.
//! The 7-waypoint ceiling is checked on the extended list before either
//! call is made.

use serde::Serialize;

use rota_core::{GeoPoint, Polyline, TravelProfile, Waypoints};
use rota_osrm::{HttpTransport, OsrmClient, ReqwestTransport, check_ceiling};

use crate::RoutingResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationReport {
    pub delta_distance_m: f64,
    pub delta_duration_s: f64,
    pub base_distance_m: f64,
    pub base_duration_s: f64,
    /// Geometry of the route with the candidate stop.
    pub preview: Polyline,
}

pub struct DeviationEvaluator<'a, T: HttpTransport = ReqwestTransport> {
    client: &'a OsrmClient<T>,
}

impl<'a, T: HttpTransport> DeviationEvaluator<'a, T> {
    pub fn new(client: &'a OsrmClient<T>) -> Self {
        Self { client }
    }

    pub fn evaluate(
        &self,
        profile: TravelProfile,
        base: &Waypoints,
        candidate: GeoPoint,
    ) -> RoutingResult<DeviationReport> {
        let extended = base.with_stop_before_destination(candidate)?;
        check_ceiling(extended.len())?;

        let without = self.client.route(profile, base, false)?;
        let with = self.client.route(profile, &extended, false)?;

        let report = DeviationReport {
            delta_distance_m: with.distance_m - without.distance_m,
            delta_duration_s: with.duration_s - without.duration_s,
            base_distance_m: without.distance_m,
            base_duration_s: without.duration_s,
            preview: with.geometry,
        };
        tracing::debug!(
            delta_m = report.delta_distance_m,
            delta_s = report.delta_duration_s,
            "deviation evaluated"
        );
        Ok(report)
    }
}
