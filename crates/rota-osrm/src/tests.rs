//! Unit tests for rota-osrm.
//!
//! No network access: requests go through a recording in-memory transport.

#[cfg(test)]
mod helpers {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use rota_core::{GeoPoint, Waypoints};

    use crate::{HttpResponse, HttpTransport, OsrmClient, OsrmError, OsrmResult};

    /// Replays queued responses and records every requested URL.
    #[derive(Default)]
    pub struct FakeTransport {
        pub urls: Mutex<Vec<String>>,
        replies: Mutex<VecDeque<OsrmResult<HttpResponse>>>,
    }

    impl FakeTransport {
        pub fn reply(&self, status: u16, body: &str) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse { status, body: body.to_string() }));
        }

        pub fn fail(&self, msg: &str) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(OsrmError::Transport(msg.to_string())));
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
                .unwrap_or_else(|| Err(OsrmError::Transport("no reply queued".into())))
        }
    }

    pub fn client() -> (OsrmClient<Arc<FakeTransport>>, Arc<FakeTransport>) {
        let fake = Arc::new(FakeTransport::default());
        (OsrmClient::with_transport("http://osrm.test/", Arc::clone(&fake)), fake)
    }

    const POINTS: [(f64, f64); 8] = [
        (-22.91, -42.82),
        (-22.92, -42.81),
        (-22.93, -42.80),
        (-22.94, -42.79),
        (-22.95, -42.78),
        (-22.96, -42.77),
        (-22.97, -42.76),
        (-22.98, -42.75),
    ];

    /// The first `n` points of a fixed track through Maricá.
    pub fn waypoints(n: usize) -> Waypoints {
        Waypoints::new(POINTS[..n].iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect())
            .unwrap()
    }

    pub const OK_BODY: &str = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 1520.4,
            "duration": 187.2,
            "geometry": {
                "type": "LineString",
                "coordinates": [[-42.82, -22.91], [-42.815, -22.915], [-42.815, -22.915], [-42.81, -22.92]]
            },
            "legs": [{
                "steps": [
                    {"name": "Rua Abreu Rangel", "distance": 0, "duration": 0,
                     "maneuver": {"type": "depart"}},
                    {"name": "", "distance": 800.0, "duration": 90.0,
                     "maneuver": {"type": "turn", "modifier": "slight left"}},
                    {"name": "Avenida Roberto Silveira", "distance": 720.4, "duration": 97.2,
                     "maneuver": {"type": "arrive"}}
                ]
            }]
        }]
    }"#;
}

// ── Request shape ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod request {
    use rota_core::TravelProfile;

    use super::helpers::{OK_BODY, client, waypoints};
    use crate::OsrmError;

    #[test]
    fn url_uses_lon_lat_order_and_flags() {
        let (client, _) = client();
        let url = client.route_url(TravelProfile::Walking, &waypoints(2), true);
        assert_eq!(
            url,
            "http://osrm.test/route/v1/walking/-42.82,-22.91;-42.81,-22.92\
             ?overview=full&geometries=geojson&steps=true"
        );
    }

    #[test]
    fn all_waypoints_in_one_call() {
        let (client, fake) = client();
        fake.reply(200, OK_BODY);
        client.route(TravelProfile::Driving, &waypoints(3), false).unwrap();
        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].matches(';').count(), 2);
        assert!(calls[0].ends_with("steps=false"));
    }

    #[test]
    fn ceiling_checked_before_request() {
        let (client, fake) = client();
        let err = client.route(TravelProfile::Driving, &waypoints(8), false).unwrap_err();
        assert!(matches!(err, OsrmError::TooManyWaypoints { count: 8, max: 7 }));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn seven_waypoints_allowed() {
        let (client, fake) = client();
        fake.reply(200, OK_BODY);
        assert!(client.route(TravelProfile::Driving, &waypoints(7), false).is_ok());
    }
}

// ── Response handling ─────────────────────────────────────────────────────────

#[cfg(test)]
mod response {
    use rota_core::{GeoPoint, TravelProfile};

    use super::helpers::{OK_BODY, client, waypoints};
    use crate::OsrmError;

    #[test]
    fn best_route_normalised() {
        let (client, fake) = client();
        fake.reply(200, OK_BODY);
        let route = client.route(TravelProfile::Driving, &waypoints(2), false).unwrap();
        assert_eq!(route.distance_m, 1520.4);
        assert_eq!(route.duration_s, 187.2);
        // Swapped to (lat, lon), duplicate collapsed.
        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.geometry.first(), Some(GeoPoint::new(-22.91, -42.82)));
        assert!(route.steps.is_none());
        assert_eq!(route.geojson().coordinates[0], [-42.82, -22.91]);
    }

    #[test]
    fn steps_mapped_to_instructions() {
        let (client, fake) = client();
        fake.reply(200, OK_BODY);
        let route = client.route(TravelProfile::Driving, &waypoints(2), true).unwrap();
        let steps = route.steps.unwrap();
        let text: Vec<_> = steps.iter().map(|s| s.instruction.as_str()).collect();
        assert_eq!(
            text,
            vec![
                "Depart on Rua Abreu Rangel",
                "Slight left",
                "Arrive at destination on Avenida Roberto Silveira",
            ]
        );
        assert_eq!(steps[1].modifier.as_deref(), Some("slight left"));
        assert_eq!(steps[1].distance_m, 800.0);
    }

    #[test]
    fn zero_routes_is_no_routes() {
        let (client, fake) = client();
        fake.reply(200, r#"{"code":"Ok","routes":[]}"#);
        let err = client.route(TravelProfile::Driving, &waypoints(2), false).unwrap_err();
        assert!(matches!(err, OsrmError::NoRoutes));
        assert_eq!(err.to_string(), "no routes returned");
    }

    #[test]
    fn provider_error_body() {
        let (client, fake) = client();
        fake.reply(400, r#"{"code":"InvalidQuery","message":"Query string malformed"}"#);
        let err = client.route(TravelProfile::Driving, &waypoints(2), false).unwrap_err();
        assert!(matches!(err, OsrmError::Provider { ref code, .. } if code == "InvalidQuery"));
        assert!(err.to_string().contains("Query string malformed"));
    }

    #[test]
    fn no_route_code_is_no_routes() {
        let (client, fake) = client();
        fake.reply(400, r#"{"code":"NoRoute","message":"Impossible route"}"#);
        let err = client.route(TravelProfile::Driving, &waypoints(2), false).unwrap_err();
        assert!(matches!(err, OsrmError::NoRoutes));
    }

    #[test]
    fn non_json_error_status() {
        let (client, fake) = client();
        fake.reply(502, "<html>Bad Gateway</html>");
        let err = client.route(TravelProfile::Driving, &waypoints(2), false).unwrap_err();
        assert!(matches!(err, OsrmError::Status { status: 502, .. }));
    }

    #[test]
    fn malformed_success_body() {
        let (client, fake) = client();
        fake.reply(200, "not json");
        let err = client.route(TravelProfile::Driving, &waypoints(2), false).unwrap_err();
        assert!(matches!(err, OsrmError::Malformed(_)));
    }

    #[test]
    fn transport_failure_reported() {
        let (client, fake) = client();
        fake.fail("connection refused");
        let err = client.route(TravelProfile::Driving, &waypoints(2), false).unwrap_err();
        assert!(matches!(err, OsrmError::Transport(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}

// ── Instruction table ─────────────────────────────────────────────────────────

#[cfg(test)]
mod instructions {
    use crate::{describe, instruction};

    #[test]
    fn turn_modifiers() {
        assert_eq!(instruction("turn", Some("left")), "Turn left");
        assert_eq!(instruction("turn", Some("right")), "Turn right");
        assert_eq!(instruction("turn", Some("slight_left")), "Slight left");
        assert_eq!(instruction("turn", Some("slight right")), "Slight right");
        assert_eq!(instruction("turn", Some("straight")), "Continue straight");
        assert_eq!(instruction("turn", Some("uturn")), "Turn");
        assert_eq!(instruction("turn", None), "Turn");
    }

    #[test]
    fn maneuver_types() {
        assert_eq!(instruction("roundabout", Some("right")), "Enter the roundabout");
        assert_eq!(instruction("merge", None), "Merge onto the road");
        assert_eq!(instruction("fork", Some("left")), "Keep at the fork");
        assert_eq!(instruction("on ramp", None), "Take the ramp");
        assert_eq!(instruction("off_ramp", None), "Take the exit");
        assert_eq!(instruction("new name", None), "Continue");
        assert_eq!(instruction("end of road", Some("left")), "Continue");
    }

    #[test]
    fn street_suffix() {
        assert_eq!(describe("turn", Some("left"), "Rua Ribeiro"), "Turn left on Rua Ribeiro");
        assert_eq!(describe("turn", Some("left"), "   "), "Turn left");
    }
}
