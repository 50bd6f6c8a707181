//! Combat plugin - orders the pairwise damage passes.

use bevy::prelude::*;

use super::pipeline::*;
use crate::core::TickSet;

/// Groups of combat passes, in execution order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Enemy bodies against the player, then the player's melee swing
    Contact,
    /// Player bolts, enemy shots, shots against platforms
    Projectiles,
    /// Hazards and gems
    Environment,
}

/// Combat plugin - runs every damage pass once per tick.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                CombatSet::Contact,
                CombatSet::Projectiles,
                CombatSet::Environment,
            )
                .chain()
                .in_set(TickSet::Combat),
        )
        .add_systems(
            Update,
            (contact_damage, melee_hits)
                .chain()
                .in_set(CombatSet::Contact),
        )
        .add_systems(
            Update,
            (
                player_projectile_hits,
                enemy_projectile_hits,
                projectile_platform_hits,
            )
                .chain()
                .in_set(CombatSet::Projectiles),
        )
        .add_systems(
            Update,
            (hazard_damage, gem_hits)
                .chain()
                .in_set(CombatSet::Environment),
        );
    }
}
