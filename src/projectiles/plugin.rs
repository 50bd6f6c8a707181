//! Projectile plugin - motion, ageing and removal.

use bevy::prelude::*;

use super::components::Projectile;
use crate::core::{FrameClock, TickSet};
use crate::game::GameCamera;

/// Projectile plugin - moves projectiles and despawns spent ones.
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update_projectiles.in_set(TickSet::Projectiles))
            .add_systems(Update, reap_projectiles.in_set(TickSet::Reap));
    }
}

fn update_projectiles(clock: Res<FrameClock>, mut projectiles: Query<&mut Projectile>) {
    for mut projectile in projectiles.iter_mut() {
        projectile.update(clock.sim_dt);
    }
}

/// Despawn projectiles that expired, hit something, or left the view.
fn reap_projectiles(
    mut commands: Commands,
    camera: Res<GameCamera>,
    projectiles: Query<(Entity, &Projectile)>,
) {
    let view = camera.view();
    for (entity, projectile) in projectiles.iter() {
        if projectile.marked || projectile.is_off_screen(view) {
            commands.entity(entity).despawn();
        }
    }
}

/// Remove every projectile (level load, respawn).
pub fn clear_projectiles(commands: &mut Commands, projectiles: &Query<Entity, With<Projectile>>) {
    for entity in projectiles.iter() {
        commands.entity(entity).despawn();
    }
}
