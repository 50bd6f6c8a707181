//! Retrocorn - the simulation core of a 2D unicorn platformer in Bevy.
//!
//! The crate runs headless. A host (renderer, audio, input) drives it by
//! writing an [`core::InputSnapshot`], submitting a timestamp to the
//! [`core::FrameClock`] and calling `App::update` once per displayed frame.
//! It reads back sound cues, banners, screen effects, the camera and the
//! HUD snapshot.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, host events, frame clock, RNG, the side-effect outbox
//! - **World**: Level descriptors, runtime geometry, moving platforms
//! - **Player**: The unicorn controller
//! - **Enemies**: Archetype stats, per-archetype brains and the update driver
//! - **Projectiles**: Bolts, bones, fireballs, skulls and rocks
//! - **Combat**: Health, damage passes, screen effects
//! - **Items**: Power-ups, gems, level pickups
//! - **Game**: Session, level flow, high scores, camera and HUD state
//!
//! `physics` has no plugin: it is pure data and functions used by the
//! actor systems.

pub mod combat;
pub mod core;
pub mod enemies;
pub mod game;
pub mod items;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
///
/// Needs `MinimalPlugins` (or `DefaultPlugins`) and `StatesPlugin` on the
/// app already.
#[derive(Default)]
pub struct RetrocornPlugin {
    pub config: core::GameConfig,
}

impl Plugin for RetrocornPlugin {
    fn build(&self, app: &mut App) {
        app
            // Read by the plugins below while they build
            .insert_resource(self.config.clone())

            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Level data and geometry
            .add_plugins(world::WorldPlugin)

            // Actors
            .add_plugins(player::PlayerPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(projectiles::ProjectilePlugin)

            // Damage and pickups
            .add_plugins(combat::CombatPlugin)
            .add_plugins(items::ItemsPlugin)

            // Session and flow
            .add_plugins(game::GamePlugin);
    }
}
