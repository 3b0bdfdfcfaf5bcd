//! Maricá routing demo.
//!
//! Drives `RoutingService` from the command line and prints every result in
//! the `{success, message, data}` envelope.  The network comes from a config
//! file, `--nodes/--edges` CSV, `--pbf` (with the `osm` feature), or the
//! built-in synthetic grid (`--synthetic`).
//!
//! ```text
//! marica --synthetic route -- -22.915,-42.82 -22.93,-42.80 --stop -22.92,-42.81
//! marica external -- -22.915,-42.82 -22.93,-42.80 --steps
//! marica --synthetic bench --requests 2000
//! RUST_LOG=debug marica --config rota.toml stats
//! ```

mod network;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use rota_core::{GeoPoint, NetworkRng, NodeId, TravelProfile, Waypoints};
use rota_osrm::OsrmClient;
use rota_service::{ApiResponse, ConfigBuilder, MARICA_POINTS_OF_INTEREST, RoutingService, ServiceConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

// ── Constants ─────────────────────────────────────────────────────────────

const DEFAULT_BENCH_REQUESTS: usize = 1_000;
const DEFAULT_BENCH_SEED: u64 = 42;

// ── CLI ───────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "marica", about = "Multi-waypoint routing over a Maricá road network")]
struct Cli {
    /// TOML configuration file; `ROTA_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SourceArgs {
    /// Node CSV (`id,lat,lon`).
    #[arg(long, requires = "edges")]
    nodes: Option<PathBuf>,

    /// Edge CSV (`from,to,length_m[,oneway][,travel_secs][,geometry]`).
    #[arg(long, requires = "nodes")]
    edges: Option<PathBuf>,

    /// OpenStreetMap PBF extract.
    #[arg(long, conflicts_with_all = ["nodes", "edges"])]
    pbf: Option<PathBuf>,

    /// Use the built-in synthetic street grid.
    #[arg(long, conflicts_with_all = ["nodes", "edges", "pbf"])]
    synthetic: bool,

    /// Fraction of edges to disable after loading.
    #[arg(long)]
    disable: Option<f64>,

    /// Seed for the randomization pass.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Route origin → stops → destination, locally when a network is loaded.
    Route {
        #[arg(allow_hyphen_values = true)]
        origin: GeoPoint,
        #[arg(allow_hyphen_values = true)]
        destination: GeoPoint,
        /// Intermediate stop, in visiting order; repeatable.
        #[arg(long = "stop", allow_hyphen_values = true)]
        stops: Vec<GeoPoint>,
        #[arg(long, default_value = "driving")]
        profile: TravelProfile,
        /// Skip the local network and ask the provider.
        #[arg(long)]
        external: bool,
        /// Include turn-by-turn steps (provider routes only).
        #[arg(long)]
        steps: bool,
    },
    /// Provider route through the given points.
    External {
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true)]
        points: Vec<GeoPoint>,
        #[arg(long, default_value = "driving")]
        profile: TravelProfile,
        #[arg(long)]
        steps: bool,
    },
    /// Cost of inserting a candidate stop before the destination.
    Deviation {
        /// Base route points, origin first.
        #[arg(long = "base", required = true, num_args = 2.., allow_hyphen_values = true)]
        base: Vec<GeoPoint>,
        #[arg(long, allow_hyphen_values = true)]
        candidate: GeoPoint,
        #[arg(long, default_value = "driving")]
        profile: TravelProfile,
    },
    /// Algorithm and network statistics.
    Stats,
    /// Liveness and network status.
    Health,
    /// Maricá landmarks usable as route endpoints.
    Places,
    /// Route random node pairs in parallel over the loaded network.
    Bench {
        #[arg(long, default_value_t = DEFAULT_BENCH_REQUESTS)]
        requests: usize,
        #[arg(long, default_value_t = DEFAULT_BENCH_SEED)]
        seed: u64,
        #[arg(long, default_value = "driving")]
        profile: TravelProfile,
    },
}

// ── Main ──────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let service = build_service(config, cli.source.synthetic)?;

    match cli.command {
        Command::Route { origin, destination, stops, profile, external, steps } => {
            let waypoints = Waypoints::from_parts(origin, &stops, destination)?;
            let result = if external {
                service.route_external(&waypoints, profile, steps)
            } else {
                service.route(&waypoints, profile, steps)
            };
            print(&ApiResponse::from(result))
        }
        Command::External { points, profile, steps } => {
            let waypoints = Waypoints::new(points)?;
            print(&ApiResponse::from(service.route_external(&waypoints, profile, steps)))
        }
        Command::Deviation { base, candidate, profile } => {
            let base = Waypoints::new(base)?;
            print(&ApiResponse::from(service.deviation(profile, &base, candidate)))
        }
        Command::Stats => print(&ApiResponse::from(service.algorithm_report())),
        Command::Health => print(&ApiResponse::ok(service.health())),
        Command::Places => print(&ApiResponse::ok(MARICA_POINTS_OF_INTEREST)),
        Command::Bench { requests, seed, profile } => {
            let summary = bench(&service, requests, seed, profile)?;
            print(&ApiResponse::ok(summary))
        }
    }
}

fn load_config(cli: &Cli) -> Result<ServiceConfig> {
    let mut builder = ConfigBuilder::new();
    if let Some(path) = &cli.config {
        builder = builder.with_file(path);
    }
    let mut config = builder.with_env().build().context("loading configuration")?;

    let src = &cli.source;
    if let (Some(nodes), Some(edges)) = (&src.nodes, &src.edges) {
        config.network.nodes = Some(nodes.clone());
        config.network.edges = Some(edges.clone());
        config.network.pbf = None;
    }
    if let Some(pbf) = &src.pbf {
        config.network.pbf = Some(pbf.clone());
        config.network.nodes = None;
        config.network.edges = None;
    }
    if let Some(p) = src.disable {
        config.disable_proportion = p;
    }
    if src.seed.is_some() {
        config.seed = src.seed;
    }
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn build_service(config: ServiceConfig, synthetic: bool) -> Result<RoutingService> {
    if !synthetic {
        return Ok(RoutingService::new(config)?);
    }
    let t0 = Instant::now();
    let (net, nodes) = network::build_network().context("building synthetic grid")?;
    tracing::info!(
        nodes = nodes.len(),
        edges = net.edge_count(),
        centre = %network::centre(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "synthetic grid built"
    );
    let client = OsrmClient::new(&config.osrm)?;
    Ok(RoutingService::with_network(config, client, net)?)
}

fn print<T: Serialize>(response: &ApiResponse<T>) -> Result<()> {
    println!("{}", response.to_json_pretty()?);
    Ok(())
}

// ── Bench ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct BenchSummary {
    requests: usize,
    routed: usize,
    failed: usize,
    elapsed_ms: u64,
    routes_per_sec: f64,
    mean_distance_km: f64,
    threads: usize,
}

fn bench(service: &RoutingService, requests: usize, seed: u64, profile: TravelProfile) -> Result<BenchSummary> {
    let Some(snapshot) = service.snapshot() else {
        bail!("bench needs a local network; pass --synthetic, --nodes/--edges or --pbf");
    };
    let net = snapshot.network();
    if net.node_count() < 2 {
        bail!("network has fewer than two nodes");
    }

    let mut rng = NetworkRng::new(seed);
    let pairs: Vec<(GeoPoint, GeoPoint)> = (0..requests)
        .filter_map(|_| {
            let a = net.position(NodeId::try_from(rng.gen_range(0..net.node_count())).ok()?)?;
            let b = net.position(NodeId::try_from(rng.gen_range(0..net.node_count())).ok()?)?;
            Some((a, b))
        })
        .collect();

    let t0 = Instant::now();
    let distances: Vec<Option<f64>> = pairs
        .par_iter()
        .map(|&(a, b)| {
            let waypoints = Waypoints::new(vec![a, b]).ok()?;
            match service.route(&waypoints, profile, false) {
                Ok(route) => Some(route.distance_m),
                Err(e) => {
                    tracing::debug!(error = %e, "bench route failed");
                    None
                }
            }
        })
        .collect();
    let elapsed = t0.elapsed();

    let routed: Vec<f64> = distances.into_iter().flatten().collect();
    let mean_distance_km = if routed.is_empty() {
        0.0
    } else {
        routed.iter().sum::<f64>() / routed.len() as f64 / 1000.0
    };
    let secs = elapsed.as_secs_f64();

    Ok(BenchSummary {
        requests: pairs.len(),
        routed: routed.len(),
        failed: pairs.len() - routed.len(),
        elapsed_ms: elapsed.as_millis() as u64,
        routes_per_sec: if secs > 0.0 { routed.len() as f64 / secs } else { 0.0 },
        mean_distance_km,
        threads: rayon::current_num_threads(),
    })
}
