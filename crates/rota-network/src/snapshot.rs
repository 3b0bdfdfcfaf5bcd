//! The frozen, shareable network.
//!
//! [`NetworkSnapshot::prepare`] is the only way to obtain one: it projects
//! the network, runs both randomization passes, and wraps the result in an
//! `Arc`.  From then on the network is read-only; the `Arc` hand-off is the
//! happens-before edge between initialisation and concurrent readers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rota_core::{GeoPoint, NetworkRng, NodeId};

use crate::network::RoadNetwork;
use crate::project::ProjectedIndex;
use crate::randomize::{RandomizationReport, WeightRandomizer};
use crate::NetworkResult;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Graph counts for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,
    pub randomized_edges: usize,
    pub disabled_edges: usize,
    pub disable_proportion: f64,
}

pub struct NetworkSnapshot {
    version: u64,
    place: String,
    network: RoadNetwork,
    projected: Option<ProjectedIndex>,
    randomization: RandomizationReport,
}

impl NetworkSnapshot {
    /// Randomize `network` once and freeze it.
    pub fn prepare(
        mut network: RoadNetwork,
        place: impl Into<String>,
        randomizer: &WeightRandomizer,
        rng: &mut NetworkRng,
    ) -> NetworkResult<Arc<Self>> {
        let randomization = randomizer.apply(&mut network, rng)?;
        Ok(Self::freeze(network, place.into(), randomization))
    }

    /// Freeze `network` as-is, without randomization.
    pub fn unrandomized(network: RoadNetwork, place: impl Into<String>) -> Arc<Self> {
        Self::freeze(network, place.into(), RandomizationReport::default())
    }

    fn freeze(network: RoadNetwork, place: String, randomization: RandomizationReport) -> Arc<Self> {
        let projected = ProjectedIndex::build(&network);
        let version = NEXT_VERSION.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            version,
            place = %place,
            nodes = network.node_count(),
            edges = network.edge_count(),
            projected = projected.is_some(),
            "network snapshot frozen"
        );
        Arc::new(Self { version, place, network, projected, randomization })
    }

    /// Process-unique, increasing with each prepared snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn projected(&self) -> Option<&ProjectedIndex> {
        self.projected.as_ref()
    }

    pub fn randomization(&self) -> RandomizationReport {
        self.randomization
    }

    /// Resolve `pos` to a node: projected lookup first, unprojected lookup
    /// when no projection exists or it cannot place the point.
    pub fn snap(&self, pos: GeoPoint) -> Option<NodeId> {
        if let Some(index) = &self.projected {
            if let Some(node) = index.nearest(pos) {
                return Some(node);
            }
            tracing::warn!(%pos, "projected snap failed; falling back to unprojected lookup");
        }
        self.network.snap_to_node(pos)
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            nodes: self.network.node_count(),
            edges: self.network.edge_count(),
            randomized_edges: self.network.randomized_edge_count(),
            disabled_edges: self.network.disabled_edge_count(),
            disable_proportion: self.randomization.disable_proportion,
        }
    }
}
