//! Reviewer selection strategy for new pull requests

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Draws reviewers from an eligible pool
pub trait ReviewerPicker: Send + Sync {
    /// Pick `count` distinct ids from `pool`
    ///
    /// `pool` holds distinct ids and `count <= pool.len()`.
    fn pick(&self, pool: &[String], count: usize) -> Vec<String>;
}

/// Uniform draw without replacement
#[derive(Debug)]
pub struct RandomPicker {
    rng: Mutex<StdRng>,
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPicker {
    /// Create a picker seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a picker whose draws are reproducible
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ReviewerPicker for RandomPicker {
    fn pick(&self, pool: &[String], count: usize) -> Vec<String> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        pool.choose_multiple(&mut *rng, count).cloned().collect()
    }
}
