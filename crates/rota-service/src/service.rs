//! The routing service facade.
//!
//! Owns the configuration, the provider client, and the network snapshot.
//! The snapshot is loaded at most once: eagerly when `init_graph_on_start`
//! is set, otherwise on the first request that needs it.  A load failure is
//! logged and leaves the service routing through the external provider.

use std::sync::{Arc, OnceLock};

use rota_core::{GeoPoint, NetworkRng, TravelProfile, Waypoints};
use rota_network::{
    DijkstraRouter, NetworkResult, NetworkSnapshot, RoadNetwork, WeightRandomizer, load_network,
};
use rota_osrm::{HttpTransport, OsrmClient, ReqwestTransport};
use rota_routing::{
    DeviationEvaluator, DeviationReport, MultiWaypointRouter, RouteResult, RoutingStrategy,
    route_external,
};

use crate::config::ServiceConfig;
use crate::report::{AlgorithmReport, HealthReport};
use crate::{ServiceError, ServiceResult};

pub struct RoutingService<T: HttpTransport = ReqwestTransport> {
    config: ServiceConfig,
    client: OsrmClient<T>,
    router: MultiWaypointRouter,
    snapshot: OnceLock<Option<Arc<NetworkSnapshot>>>,
}

impl RoutingService {
    /// Service over a real HTTP client built from `config.osrm`.
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        config.validate()?;
        let client = OsrmClient::new(&config.osrm)?;
        Ok(Self::with_client(config, client))
    }
}

impl<T: HttpTransport> RoutingService<T> {
    pub fn with_client(config: ServiceConfig, client: OsrmClient<T>) -> Self {
        let service = Self {
            router: MultiWaypointRouter::new(DijkstraRouter, config.weight),
            config,
            client,
            snapshot: OnceLock::new(),
        };
        if service.config.init_graph_on_start {
            service.initialize();
        }
        service
    }

    /// Service over an already-built network, randomized per `config`.
    pub fn with_network(
        config: ServiceConfig,
        client: OsrmClient<T>,
        network: RoadNetwork,
    ) -> ServiceResult<Self> {
        let snapshot = prepare_snapshot(&config, network)?;
        Ok(Self {
            router: MultiWaypointRouter::new(DijkstraRouter, config.weight),
            config,
            client,
            snapshot: OnceLock::from(Some(snapshot)),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Load the network now if it has not been attempted yet.  Returns
    /// whether a local network is available.
    pub fn initialize(&self) -> bool {
        self.snapshot().is_some()
    }

    /// The frozen network, loading it on first call.
    pub fn snapshot(&self) -> Option<Arc<NetworkSnapshot>> {
        self.snapshot.get_or_init(|| self.load()).clone()
    }

    /// Whether a network is loaded, without triggering a load.
    pub fn is_graph_loaded(&self) -> bool {
        matches!(self.snapshot.get(), Some(Some(_)))
    }

    fn load(&self) -> Option<Arc<NetworkSnapshot>> {
        let source = match self.config.network.source() {
            Ok(Some(source)) => source,
            Ok(None) => {
                tracing::info!("no local network configured; routing through external provider");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "invalid network configuration");
                return None;
            }
        };
        match load_network(&source).and_then(|net| prepare_snapshot(&self.config, net)) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "network load failed; falling back to external provider");
                None
            }
        }
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Route through `waypoints`: locally when a network is loaded, else with
    /// one provider call.
    pub fn route(
        &self,
        waypoints: &Waypoints,
        profile: TravelProfile,
        include_steps: bool,
    ) -> ServiceResult<RouteResult> {
        let strategy = RoutingStrategy::select(self.snapshot(), &self.router, &self.client);
        let source = strategy.source();
        let route = strategy.route(waypoints, profile, include_steps)?;
        tracing::debug!(
            source = source.as_str(),
            waypoints = waypoints.len(),
            distance_m = route.distance_m,
            "route computed"
        );
        Ok(route)
    }

    /// Provider route regardless of whether a network is loaded.
    pub fn route_external(
        &self,
        waypoints: &Waypoints,
        profile: TravelProfile,
        include_steps: bool,
    ) -> ServiceResult<RouteResult> {
        Ok(route_external(&self.client, waypoints, profile, include_steps)?)
    }

    pub fn deviation(
        &self,
        profile: TravelProfile,
        base: &Waypoints,
        candidate: GeoPoint,
    ) -> ServiceResult<DeviationReport> {
        Ok(DeviationEvaluator::new(&self.client).evaluate(profile, base, candidate)?)
    }

    pub fn algorithm_report(&self) -> ServiceResult<AlgorithmReport> {
        let snapshot = self.snapshot().ok_or(ServiceError::NoNetwork)?;
        Ok(AlgorithmReport::from_snapshot(&snapshot, self.router.weight()))
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            ok: true,
            graph_loaded: self.is_graph_loaded(),
            place: self.config.place.clone(),
        }
    }
}

fn prepare_snapshot(config: &ServiceConfig, network: RoadNetwork) -> NetworkResult<Arc<NetworkSnapshot>> {
    let randomizer = WeightRandomizer::new(config.disable_proportion)?;
    let mut rng = NetworkRng::from_seed_opt(config.seed);
    NetworkSnapshot::prepare(network, config.place.clone(), &randomizer, &mut rng)
}
