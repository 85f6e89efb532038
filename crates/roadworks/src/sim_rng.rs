//! Deterministic RNG resource.
//!
//! Wraps `ChaCha8Rng` so that identical seeds produce identical road edits.
//! The road tool draws one seed per drag gesture from here and re-seeds a
//! local generator from it on every preview rebuild.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

#[derive(Resource)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seed for one drag gesture.
    pub fn next_drag_seed(&mut self) -> u64 {
        self.0.gen()
    }
}

/// Generator for a single preview rebuild.
pub fn drag_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
