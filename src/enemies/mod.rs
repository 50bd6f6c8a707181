//! Enemies module - archetypes, AI brains, bosses and spawning.

mod archetype;
mod bosses;
mod brain;
mod components;
mod driver;
mod plugin;

pub use archetype::{Archetype, EnemyStats, Locomotion};
pub use bosses::*;
pub use brain::{Brain, HarpyBrain};
pub use components::*;
pub use driver::update_enemy;
pub use plugin::{spawn_enemy, spawn_level_enemies, EnemyPlugin};
