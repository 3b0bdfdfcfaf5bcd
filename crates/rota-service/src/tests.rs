//! Unit tests for rota-service.

#[cfg(test)]
mod helpers {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use rota_core::{GeoPoint, NodeId, Waypoints};
    use rota_network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder};
    use rota_osrm::{HttpResponse, HttpTransport, OsrmClient, OsrmError, OsrmResult};

    #[derive(Default)]
    pub struct FakeTransport {
        urls: Mutex<Vec<String>>,
        replies: Mutex<VecDeque<String>>,
    }

    impl FakeTransport {
        pub fn reply(&self, body: &str) {
            self.replies.lock().unwrap().push_back(body.to_string());
        }

        pub fn call_count(&self) -> usize {
            self.urls.lock().unwrap().len()
        }
    }

    impl HttpTransport for FakeTransport {
        fn get(&self, url: &str) -> OsrmResult<HttpResponse> {
            self.urls.lock().unwrap().push(url.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(body) => Ok(HttpResponse { status: 200, body }),
                None => Err(OsrmError::Transport("connection refused".into())),
            }
        }
    }

    pub fn client() -> (OsrmClient<Arc<FakeTransport>>, Arc<FakeTransport>) {
        let fake = Arc::new(FakeTransport::default());
        (OsrmClient::with_transport("http://osrm.test", Arc::clone(&fake)), fake)
    }

    pub const ROUTE_BODY: &str = r#"{"code":"Ok","routes":[{"distance":1800.0,"duration":210.0,
        "geometry":{"type":"LineString","coordinates":[[-42.80,-22.90],[-42.79,-22.91]]}}]}"#;

    pub fn pos(i: usize) -> GeoPoint {
        GeoPoint::new(-22.9, -42.8 + i as f64 * 0.001)
    }

    /// 10 nodes in a line; 18 directed edges.
    pub fn line_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let ids: Vec<NodeId> = (0..10).map(|i| b.add_node(pos(i))).collect();
        for w in ids.windows(2) {
            b.add_road(w[0], w[1], EdgeAttrs::length(100.0));
        }
        b.build().unwrap()
    }

    pub fn at(nodes: &[usize]) -> Waypoints {
        Waypoints::new(nodes.iter().map(|&i| pos(i)).collect()).unwrap()
    }

    pub const NODES_CSV: &str = "id,lat,lon\n1,-22.9,-42.800\n2,-22.9,-42.801\n3,-22.9,-42.802\n";
    pub const EDGES_CSV: &str = "from,to,length_m\n1,2,100.0\n2,3,100.0\n";
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::path::PathBuf;

    use rota_network::{NetworkSource, Weight};

    use crate::{ConfigBuilder, ConfigError, ServiceConfig};

    #[test]
    fn defaults() {
        let c = ServiceConfig::default();
        assert_eq!(c.place, "Maricá, Rio de Janeiro, Brazil");
        assert_eq!(c.disable_proportion, 0.05);
        assert_eq!(c.osrm.base_url, "https://router.project-osrm.org");
        assert_eq!(c.osrm.timeout_secs, 12);
        assert_eq!(c.weight, Weight::Length);
        assert!(c.seed.is_none());
        assert!(!c.init_graph_on_start);
        assert!(c.validate().is_ok());
        assert!(c.network.source().unwrap().is_none());
    }

    #[test]
    fn toml_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rota.toml");
        std::fs::write(
            &path,
            r#"
                place = "Niterói"
                disable_proportion = 0.1
                weight = "travel_time"

                [osrm]
                base_url = "http://localhost:5000"
            "#,
        )
        .unwrap();

        let c = ConfigBuilder::new()
            .with_file(&path)
            .with_env_vars([("ROTA_RANDOMIZE_EDGES_PROP", "0.2"), ("ROTA_SEED", "42")])
            .build()
            .unwrap();
        assert_eq!(c.place, "Niterói");
        assert_eq!(c.disable_proportion, 0.2);
        assert_eq!(c.seed, Some(42));
        assert_eq!(c.weight, Weight::TravelTime);
        assert_eq!(c.osrm.base_url, "http://localhost:5000");
        // Untouched fields keep their defaults.
        assert_eq!(c.osrm.timeout_secs, 12);
    }

    #[test]
    fn env_overlay_all_fields() {
        let c = ConfigBuilder::new()
            .with_env_vars([
                ("ROTA_PLACE", "Maricá"),
                ("ROTA_NETWORK_NODES", "/data/nodes.csv"),
                ("ROTA_NETWORK_EDGES", "/data/edges.csv"),
                ("ROTA_WEIGHT", "original_length"),
                ("ROTA_OSRM_URL", "http://osrm.local/"),
                ("ROTA_OSRM_TIMEOUT_SECS", "30"),
                ("ROTA_OSRM_USER_AGENT", "test-agent"),
                ("ROTA_INIT_GRAPH_ON_START", "yes"),
                ("HOME", "/root"),
            ])
            .build()
            .unwrap();
        assert_eq!(c.place, "Maricá");
        assert_eq!(c.weight, Weight::OriginalLength);
        assert_eq!(c.osrm.timeout_secs, 30);
        assert_eq!(c.osrm.user_agent, "test-agent");
        assert!(c.init_graph_on_start);
        assert_eq!(
            c.network.source().unwrap(),
            Some(NetworkSource::Csv {
                nodes: PathBuf::from("/data/nodes.csv"),
                edges: PathBuf::from("/data/edges.csv"),
            })
        );
    }

    #[test]
    fn bad_env_value_names_variable() {
        let err = ConfigBuilder::new()
            .with_env_vars([("ROTA_OSRM_TIMEOUT_SECS", "soon")])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref var, .. } if var == "ROTA_OSRM_TIMEOUT_SECS"));
        assert!(err.to_string().contains("ROTA_OSRM_TIMEOUT_SECS"));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_env_entries_skipped() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let garbage = || OsString::from_vec(vec![0x66, 0x6f, 0xff, 0x6f]);
        let config = ConfigBuilder::new()
            .with_os_env_vars([
                (garbage(), OsString::from("x")),
                (OsString::from("ROTA_PLACE"), garbage()),
                (OsString::from("ROTA_SEED"), OsString::from("77")),
            ])
            .build()
            .unwrap();
        assert_eq!(config.seed, Some(77));
        assert_eq!(config.place, ServiceConfig::default().place);
    }

    #[test]
    fn validation() {
        let out_of_range = ConfigBuilder::new()
            .with_env_vars([("ROTA_RANDOMIZE_EDGES_PROP", "1.5")])
            .build();
        assert!(matches!(out_of_range, Err(ConfigError::Invalid(_))));

        let zero_timeout = ConfigBuilder::new()
            .with_env_vars([("ROTA_OSRM_TIMEOUT_SECS", "0")])
            .build();
        assert!(zero_timeout.is_err());

        let empty_url = ConfigBuilder::new().with_env_vars([("ROTA_OSRM_URL", " ")]).build();
        assert!(empty_url.is_err());

        let half_csv = ConfigBuilder::new()
            .with_env_vars([("ROTA_NETWORK_NODES", "nodes.csv")])
            .build();
        assert!(half_csv.is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ConfigBuilder::new().with_file("/nonexistent/rota.toml").build().unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rota.toml");
        std::fs::write(&path, "disable_proportion = \"lots\"").unwrap();
        let err = ConfigBuilder::new().with_file(&path).build().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

// ── Service ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod service {
    use rota_core::TravelProfile;
    use rota_routing::RouteSource;

    use super::helpers::{EDGES_CSV, NODES_CSV, ROUTE_BODY, at, client, line_network, pos};
    use crate::{ApiResponse, RoutingService, ServiceConfig, ServiceError};

    fn seeded() -> ServiceConfig {
        ServiceConfig { seed: Some(9), ..ServiceConfig::default() }
    }

    #[test]
    fn local_network_routes_locally() {
        let (client, fake) = client();
        let svc = RoutingService::with_network(seeded(), client, line_network()).unwrap();
        assert!(svc.is_graph_loaded());

        // Randomization disables one edge, so the path may not exist; route
        // along the whole line in whichever direction survived.
        let forward = svc.route(&at(&[0, 9]), TravelProfile::Driving, false);
        let backward = svc.route(&at(&[9, 0]), TravelProfile::Driving, false);
        let route = forward.or(backward).unwrap();
        assert_eq!(route.source, RouteSource::LocalGraph);
        assert!(route.distance_m >= 900.0 * 0.8 && route.distance_m <= 900.0 * 1.2);
        assert_eq!(fake.call_count(), 0);
    }

    #[test]
    fn algorithm_report_counts() {
        let (client, _) = client();
        let svc = RoutingService::with_network(seeded(), client, line_network()).unwrap();
        let report = svc.algorithm_report().unwrap();
        assert_eq!(report.nodes, 10);
        assert_eq!(report.edges, 18);
        assert_eq!(report.randomized_edges, 18);
        // max(1, floor(18 * 0.05)) = 1
        assert_eq!(report.disabled_edges, 1);
        assert!(report.randomization_active);
        assert_eq!(report.place, "Maricá, Rio de Janeiro, Brazil");
    }

    #[test]
    fn no_network_falls_back_to_provider() {
        let (client, fake) = client();
        fake.reply(ROUTE_BODY);
        let svc = RoutingService::with_client(ServiceConfig::default(), client);

        let route = svc.route(&at(&[0, 3, 6]), TravelProfile::Driving, false).unwrap();
        assert_eq!(route.source, RouteSource::External);
        assert_eq!(route.distance_m, 1800.0);
        assert_eq!(fake.call_count(), 1);

        assert!(matches!(svc.algorithm_report(), Err(ServiceError::NoNetwork)));
        let health = svc.health();
        assert!(health.ok);
        assert!(!health.graph_loaded);
    }

    #[test]
    fn route_json_carries_summary() {
        let (client, fake) = client();
        fake.reply(ROUTE_BODY);
        let svc = RoutingService::with_client(ServiceConfig::default(), client);

        let resp = ApiResponse::from(svc.route(&at(&[0, 3]), TravelProfile::Driving, false));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["distance_km"], 1.8);
        assert_eq!(json["data"]["duration_text"], "4 min");
        assert_eq!(json["data"]["source"], "external");
    }

    #[test]
    fn provider_failure_is_reported() {
        let (client, _) = client();
        let svc = RoutingService::with_client(ServiceConfig::default(), client);
        let err = svc.route(&at(&[0, 1]), TravelProfile::Driving, false).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn lazy_load_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = seeded();
        config.network.nodes = Some(dir.path().join("nodes.csv"));
        config.network.edges = Some(dir.path().join("edges.csv"));
        std::fs::write(config.network.nodes.as_ref().unwrap(), NODES_CSV).unwrap();
        std::fs::write(config.network.edges.as_ref().unwrap(), EDGES_CSV).unwrap();

        let (client, _) = client();
        let svc = RoutingService::with_client(config, client);
        assert!(!svc.is_graph_loaded());
        assert!(svc.initialize());
        assert!(svc.is_graph_loaded());
        assert_eq!(svc.algorithm_report().unwrap().nodes, 3);
    }

    #[test]
    fn eager_load_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = seeded();
        config.init_graph_on_start = true;
        config.network.nodes = Some(dir.path().join("nodes.csv"));
        config.network.edges = Some(dir.path().join("edges.csv"));
        std::fs::write(config.network.nodes.as_ref().unwrap(), NODES_CSV).unwrap();
        std::fs::write(config.network.edges.as_ref().unwrap(), EDGES_CSV).unwrap();

        let (client, _) = client();
        let svc = RoutingService::with_client(config, client);
        assert!(svc.is_graph_loaded());
        assert!(svc.health().graph_loaded);
    }

    #[test]
    fn failed_load_keeps_serving_externally() {
        let mut config = seeded();
        config.init_graph_on_start = true;
        config.network.nodes = Some("/nonexistent/nodes.csv".into());
        config.network.edges = Some("/nonexistent/edges.csv".into());

        let (client, fake) = client();
        fake.reply(ROUTE_BODY);
        let svc = RoutingService::with_client(config, client);
        assert!(!svc.is_graph_loaded());
        let route = svc.route(&at(&[0, 1]), TravelProfile::Walking, false).unwrap();
        assert_eq!(route.source, RouteSource::External);
    }

    #[test]
    fn deviation_through_provider() {
        let (client, fake) = client();
        fake.reply(ROUTE_BODY);
        fake.reply(&ROUTE_BODY.replace("1800.0", "2100.0"));
        let svc = RoutingService::with_client(ServiceConfig::default(), client);
        let report = svc.deviation(TravelProfile::Driving, &at(&[0, 5]), pos(3)).unwrap();
        assert_eq!(report.delta_distance_m, 300.0);
        assert_eq!(report.delta_duration_s, 0.0);
    }

    #[test]
    fn external_even_with_network() {
        let (client, fake) = client();
        fake.reply(ROUTE_BODY);
        let svc = RoutingService::with_network(seeded(), client, line_network()).unwrap();
        let route = svc.route_external(&at(&[0, 2]), TravelProfile::Driving, false).unwrap();
        assert_eq!(route.source, RouteSource::External);
        assert_eq!(fake.call_count(), 1);
    }
}

// ── Response envelope ─────────────────────────────────────────────────────────

#[cfg(test)]
mod response {
    use crate::{ApiResponse, ServiceError};

    #[test]
    fn success_shape() {
        let json = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 3 }));
    }

    #[test]
    fn error_uses_display() {
        let resp: ApiResponse<u32> = Err::<u32, _>(ServiceError::NoNetwork).into();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("no network loaded"));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "message": "no network loaded" }));
    }
}

// ── Landmarks ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod landmarks {
    use crate::{ApiResponse, MARICA_POINTS_OF_INTEREST};

    #[test]
    fn table_is_valid_and_near_town() {
        assert_eq!(MARICA_POINTS_OF_INTEREST.len(), 4);
        let centre = MARICA_POINTS_OF_INTEREST[2].position();
        for poi in MARICA_POINTS_OF_INTEREST {
            assert!(poi.position().is_valid(), "{} has invalid coordinates", poi.name);
            assert!(poi.position().distance_m(centre) < 5_000.0, "{} is out of town", poi.name);
        }
    }

    #[test]
    fn serialized_in_envelope() {
        let json = serde_json::to_value(ApiResponse::ok(MARICA_POINTS_OF_INTEREST)).unwrap();
        assert_eq!(json["data"][0]["name"], "Praia de Maricá");
        assert_eq!(json["data"][0]["lat"], -22.9189);
        assert_eq!(json["data"][3]["kind"], "beach");
    }
}
