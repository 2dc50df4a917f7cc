//! Seedable randomness for the simulation.
//!
//! Every random decision (tile layout, drop jitter) draws from this one
//! `ChaCha8Rng`-backed resource, so a run is fully reproducible from its
//! seed. Systems never touch `rand::thread_rng()`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG resource. `rng.0` is the generator; `seed` remembers
/// what it was last seeded with, for logs and bug reports.
#[derive(Resource)]
pub struct SimRng(pub ChaCha8Rng, pub u64);

impl Default for SimRng {
    fn default() -> Self {
        Self::from_seed_u64(DEFAULT_SEED)
    }
}

impl SimRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed), seed)
    }

    /// Restart the stream from a new seed (a `NewGame` action).
    pub fn reseed(&mut self, seed: u64) {
        self.0 = ChaCha8Rng::seed_from_u64(seed);
        self.1 = seed;
    }

    pub fn seed(&self) -> u64 {
        self.1
    }
}

pub struct SimRngPlugin;

impl Plugin for SimRngPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimRng>();
    }
}
