//! Unit tests for rota-routing.

#[cfg(test)]
mod helpers {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use rota_core::{GeoPoint, NodeId, Waypoints};
    use rota_network::{EdgeAttrs, NetworkSnapshot, RoadNetworkBuilder};
    use rota_osrm::{HttpResponse, HttpTransport, OsrmClient, OsrmError, OsrmResult};

    use crate::MultiWaypointRouter;

    pub fn pos(i: usize) -> GeoPoint {
        GeoPoint::new(-22.9, -42.8 + i as f64 * 0.001)
    }

    /// Nodes 0..5 in a line with 100 m roads between neighbours, plus node
    /// 5 that can only be left (5 → 4), never reached.
    pub fn snapshot() -> Arc<NetworkSnapshot> {
        let mut b = RoadNetworkBuilder::new();
        let ids: Vec<NodeId> = (0..6).map(|i| b.add_node(pos(i))).collect();
        for w in ids[..5].windows(2) {
            b.add_road(w[0], w[1], EdgeAttrs::length(100.0));
        }
        b.add_directed_edge(ids[5], ids[4], EdgeAttrs::length(100.0));
        NetworkSnapshot::unrandomized(b.build().unwrap(), "test")
    }

    pub fn router() -> MultiWaypointRouter {
        MultiWaypointRouter::default()
    }

    pub fn at(nodes: &[usize]) -> Waypoints {
        Waypoints::new(nodes.iter().map(|&i| pos(i)).collect()).unwrap()
    }

    #[derive(Default)]
    pub struct FakeTransport {
        urls: Mutex<Vec<String>>,
        replies: Mutex<VecDeque<OsrmResult<HttpResponse>>>,
    }

    impl FakeTransport {
        pub fn reply(&self, body: &str) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse { status: 200, body: body.to_string() }));
        }

        pub fn calls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn get(&self, url: &str) -> OsrmResult<HttpResponse> {
            self.urls.lock().unwrap().push(url.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(OsrmError::Transport("connection refused".into())))
        }
    }

    pub fn client() -> (OsrmClient<Arc<FakeTransport>>, Arc<FakeTransport>) {
        let fake = Arc::new(FakeTransport::default());
        (OsrmClient::with_transport("http://osrm.test", Arc::clone(&fake)), fake)
    }

    pub fn body(distance: f64, duration: f64) -> String {
        format!(
            r#"{{"code":"Ok","routes":[{{"distance":{distance},"duration":{duration},
                "geometry":{{"type":"LineString","coordinates":[[-42.80,-22.90],[-42.79,-22.91]]}}}}]}}"#
        )
    }
}

// ── Multi-waypoint routing ────────────────────────────────────────────────────

#[cfg(test)]
mod multi {
    use rota_core::{GeoPoint, NodeId, TravelProfile, Waypoints};
    use rota_network::{NetworkSnapshot, RoadNetwork};

    use super::helpers::{at, pos, router, snapshot};
    use crate::{RouteError, RouteSource};

    #[test]
    fn legs_stitched_without_duplicate_joints() {
        let snap = snapshot();
        let route = router()
            .route(&snap, &at(&[0, 2, 4]), TravelProfile::Driving)
            .unwrap();

        assert_eq!(route.cost, 400.0);
        assert_eq!(route.distance_m, 400.0);
        assert_eq!(route.node_count, 5);
        assert_eq!(route.polyline.len(), 5);
        assert!(route.polyline.is_deduplicated());
        assert_eq!(route.polyline.first(), Some(pos(0)));
        assert_eq!(route.polyline.last(), Some(pos(4)));
        assert_eq!(route.source, RouteSource::LocalGraph);
        assert!(route.steps.is_none());
    }

    #[test]
    fn duration_estimated_from_profile() {
        let snap = snapshot();
        let router = router();
        let driving = router.route(&snap, &at(&[0, 3]), TravelProfile::Driving).unwrap();
        let walking = router.route(&snap, &at(&[0, 3]), TravelProfile::Walking).unwrap();
        // 300 m at 30 km/h and 5 km/h.
        assert!((driving.duration_s - 36.0).abs() < 1e-9);
        assert!((walking.duration_s - 216.0).abs() < 1e-9);
        assert_eq!(driving.duration_text, "1 min");
        assert_eq!(walking.duration_text, "4 min");
        assert!((walking.distance_km - 0.3).abs() < 1e-12);
    }

    #[test]
    fn failing_leg_fails_route() {
        let snap = snapshot();
        let err = router()
            .route(&snap, &at(&[0, 4, 5]), TravelProfile::Driving)
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::NoPath { leg: 1, from: NodeId(4), to: NodeId(5) }
        ));
    }

    #[test]
    fn snap_failure_on_empty_network() {
        let snap = NetworkSnapshot::unrandomized(RoadNetwork::empty(), "empty");
        let err = router()
            .route(&snap, &at(&[0, 1]), TravelProfile::Driving)
            .unwrap_err();
        assert!(matches!(err, RouteError::SnapFailure { leg: 0, .. }));
    }

    #[test]
    fn repeated_waypoint_is_a_zero_leg() {
        let snap = snapshot();
        let route = router()
            .route(&snap, &at(&[1, 1, 2]), TravelProfile::Driving)
            .unwrap();
        assert_eq!(route.cost, 100.0);
        assert_eq!(route.node_count, 2);
        assert_eq!(route.polyline.len(), 2);
    }

    #[test]
    fn off_network_points_snap_to_nearest() {
        let snap = snapshot();
        let wps = Waypoints::new(vec![
            GeoPoint::new(-22.9001, -42.8001),
            GeoPoint::new(-22.8999, -42.7979),
        ])
        .unwrap();
        let route = router()
            .route(&snap, &wps, TravelProfile::Driving)
            .unwrap();
        assert_eq!(route.cost, 200.0);
    }
}

// ── Strategy selection ────────────────────────────────────────────────────────

#[cfg(test)]
mod strategy {
    use rota_core::TravelProfile;

    use super::helpers::{at, body, client, router, snapshot};
    use crate::{RouteError, RouteSource, RoutingStrategy};

    #[test]
    fn loaded_snapshot_routes_locally() {
        let (client, fake) = client();
        let router = router();
        let strategy = RoutingStrategy::select(Some(snapshot()), &router, &client);
        assert_eq!(strategy.source(), RouteSource::LocalGraph);
        let route = strategy.route(&at(&[0, 1]), TravelProfile::Driving, true).unwrap();
        assert_eq!(route.source, RouteSource::LocalGraph);
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn absent_graph_makes_one_external_call() {
        let (client, fake) = client();
        fake.reply(&body(2500.0, 300.0));
        let router = router();
        let strategy = RoutingStrategy::select(None, &router, &client);
        assert_eq!(strategy.source(), RouteSource::External);

        let route = strategy.route(&at(&[0, 2, 4]), TravelProfile::Cycling, false).unwrap();
        assert_eq!(route.distance_m, 2500.0);
        assert_eq!(route.duration_s, 300.0);
        assert_eq!(route.distance_km, 2.5);
        assert_eq!(route.duration_text, "5 min");
        assert_eq!(route.node_count, 0);
        assert_eq!(route.polyline.len(), 2);

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("/route/v1/cycling/"));
        assert_eq!(calls[0].matches(';').count(), 2);
    }

    #[test]
    fn zero_routes_surface_verbatim() {
        let (client, fake) = client();
        fake.reply(r#"{"code":"Ok","routes":[]}"#);
        let router = router();
        let err = RoutingStrategy::select(None, &router, &client)
            .route(&at(&[0, 1]), TravelProfile::Driving, false)
            .unwrap_err();
        assert!(matches!(err, RouteError::Upstream(_)));
        assert_eq!(err.to_string(), "no routes returned");
    }
}

// ── Deviation ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod deviation {
    use rota_core::TravelProfile;
    use rota_osrm::OsrmError;

    use super::helpers::{at, body, client, pos};
    use crate::{DeviationEvaluator, RouteError};

    #[test]
    fn deltas_between_base_and_extended() {
        let (client, fake) = client();
        fake.reply(&body(1000.0, 120.0));
        fake.reply(&body(1450.0, 170.0));
        let report = DeviationEvaluator::new(&client)
            .evaluate(TravelProfile::Driving, &at(&[0, 4]), pos(2))
            .unwrap();
        assert_eq!(report.delta_distance_m, 450.0);
        assert_eq!(report.delta_duration_s, 50.0);
        assert_eq!(report.base_distance_m, 1000.0);
        assert_eq!(report.preview.len(), 2);

        let calls = fake.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].matches(';').count(), 1);
        // Candidate sits just before the destination.
        let candidate = format!("{},{};", pos(2).lon, pos(2).lat);
        let destination = format!(";{},{}", pos(4).lon, pos(4).lat);
        assert!(calls[1].contains(&candidate));
        assert!(calls[1].contains(&destination));
    }

    #[test]
    fn ceiling_checked_after_insertion() {
        let (client, fake) = client();
        let err = DeviationEvaluator::new(&client)
            .evaluate(TravelProfile::Driving, &at(&[0, 1, 2, 3, 4, 5, 0]), pos(2))
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::Upstream(OsrmError::TooManyWaypoints { count: 8, max: 7 })
        ));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn second_call_failure_fails_evaluation() {
        let (client, fake) = client();
        fake.reply(&body(1000.0, 120.0));
        let err = DeviationEvaluator::new(&client)
            .evaluate(TravelProfile::Driving, &at(&[0, 4]), pos(2))
            .unwrap_err();
        assert!(matches!(err, RouteError::Upstream(OsrmError::Transport(_))));
        assert_eq!(fake.calls().len(), 2);
    }

    #[test]
    fn invalid_candidate_rejected() {
        let (client, fake) = client();
        let err = DeviationEvaluator::new(&client)
            .evaluate(TravelProfile::Driving, &at(&[0, 4]), rota_core::GeoPoint::new(f64::NAN, 0.0))
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidInput(_)));
        assert!(fake.calls().is_empty());
    }
}
