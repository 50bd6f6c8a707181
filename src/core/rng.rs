//! Seedable random source shared by AI, effects and level population.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The one random stream of a run.
///
/// Seeded from configuration so tests and replays of the same inputs make
/// the same branch choices.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
