//! One-shot load-time randomization of the network.
//!
//! Two passes, applied in order before the network is frozen:
//!
//! 1. **Weight perturbation**: every edge gets a factor drawn uniformly from
//!    `[0.8, 1.2]`; its current length becomes `original * factor`.  Factors
//!    are strictly positive, so weights stay > 0.
//! 2. **Structural disabling**: `max(1, floor(|E| * p))` edges, drawn
//!    uniformly without replacement, become invisible to routing.
//!
//! Neither pass may be re-applied: the original length is the only
//! recoverable baseline, so a second pass returns an error instead of
//! compounding.  A network with zero edges is a no-op for both.

use std::ops::RangeInclusive;

use rota_core::{EdgeId, NetworkRng};

use crate::network::RoadNetwork;
use crate::{NetworkError, NetworkResult};

pub const DEFAULT_FACTOR_RANGE: RangeInclusive<f64> = 0.8..=1.2;
pub const DEFAULT_DISABLE_PROPORTION: f64 = 0.05;

/// Summary of what the randomizer changed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RandomizationReport {
    pub randomized_edges: usize,
    pub disabled_edges:   usize,
    pub disable_proportion: f64,
}

#[derive(Debug, Clone)]
pub struct WeightRandomizer {
    factor_range: RangeInclusive<f64>,
    disable_proportion: f64,
}

impl Default for WeightRandomizer {
    fn default() -> Self {
        Self {
            factor_range: DEFAULT_FACTOR_RANGE,
            disable_proportion: DEFAULT_DISABLE_PROPORTION,
        }
    }
}

impl WeightRandomizer {
    /// Randomizer with the default factor range and the given disable
    /// proportion, which must lie in `[0, 1]`.
    pub fn new(disable_proportion: f64) -> NetworkResult<Self> {
        if !(0.0..=1.0).contains(&disable_proportion) {
            return Err(NetworkError::InvalidProportion(disable_proportion));
        }
        Ok(Self { disable_proportion, ..Self::default() })
    }

    pub fn disable_proportion(&self) -> f64 {
        self.disable_proportion
    }

    /// Number of edges the structural pass disables for `edge_count` edges.
    pub fn disable_target(&self, edge_count: usize) -> usize {
        if edge_count == 0 {
            return 0;
        }
        let raw = (edge_count as f64 * self.disable_proportion).floor() as usize;
        raw.max(1).min(edge_count)
    }

    /// Run both passes.
    pub fn apply(
        &self,
        network: &mut RoadNetwork,
        rng: &mut NetworkRng,
    ) -> NetworkResult<RandomizationReport> {
        let randomized_edges = self.perturb_weights(network, rng)?;
        let disabled_edges = self.disable_edges(network, rng)?;
        tracing::info!(
            randomized_edges,
            disabled_edges,
            proportion = self.disable_proportion,
            "network randomized"
        );
        Ok(RandomizationReport {
            randomized_edges,
            disabled_edges,
            disable_proportion: self.disable_proportion,
        })
    }

    /// Weight perturbation pass.  Returns the number of edges perturbed.
    pub fn perturb_weights(
        &self,
        network: &mut RoadNetwork,
        rng: &mut NetworkRng,
    ) -> NetworkResult<usize> {
        if network.randomized_edge_count() > 0 {
            return Err(NetworkError::AlreadyRandomized);
        }
        let edges = network.edge_count();
        for i in 0..edges {
            let factor = rng.gen_range(self.factor_range.clone());
            network.apply_factor(EdgeId(i as u32), factor);
        }
        Ok(edges)
    }

    /// Structural disabling pass.  Returns the number of edges disabled.
    pub fn disable_edges(
        &self,
        network: &mut RoadNetwork,
        rng: &mut NetworkRng,
    ) -> NetworkResult<usize> {
        if network.disabled_edge_count() > 0 {
            return Err(NetworkError::AlreadyDisabled);
        }
        let target = self.disable_target(network.edge_count());
        for i in rng.sample_indices(network.edge_count(), target) {
            network.disable(EdgeId(i as u32));
        }
        Ok(target)
    }
}
