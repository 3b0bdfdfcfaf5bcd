//! Seedable RNG for load-time network randomization.
//!
//! Randomization runs once, single-threaded, before the network is shared.
//! A fixed seed reproduces the exact same perturbation factors and disabled
//! edge set; without one the RNG is seeded from OS entropy.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct NetworkRng(SmallRng);

impl NetworkRng {
    pub fn new(seed: u64) -> Self {
        NetworkRng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        NetworkRng(SmallRng::from_entropy())
    }

    /// `Some(seed)` → reproducible, `None` → entropy.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::from_entropy(),
        }
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `amount` distinct indices drawn uniformly from `0..len`.
    ///
    /// `amount` is clamped to `len`.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.0, len, amount.min(len)).into_vec()
    }
}
