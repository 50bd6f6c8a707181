//! Items plugin - collection, magnet pull and timed effects.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::components::{Gem, PowerUp, PowerUpKind};
use super::manager::PowerUpManager;
use crate::combat::{EffectCue, Health};
use crate::core::{Banner, FrameClock, Outbox, SoundId, TickSet};
use crate::game::{GameStats, Session};
use crate::physics::Body;
use crate::player::{Player, PlayerConfig};
use crate::world::{Level, PickupKind};

/// Most random power-ups a level gets.
pub const MAX_RANDOM_POWER_UPS: usize = 5;

/// Items plugin - level pickups, power-ups and gems.
pub struct ItemsPlugin;

impl Plugin for ItemsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PowerUpManager>()
            .add_systems(Update, tick_items.in_set(TickSet::Prelude))
            .add_systems(
                Update,
                (collect_pickups, collect_power_ups)
                    .chain()
                    .in_set(TickSet::Pickups),
            );
    }
}

/// Place the level's power-ups: its explicit list if it has one, otherwise a
/// few random ones on top of random static platforms.
pub fn spawn_power_ups(
    commands: &mut Commands,
    level: &Level,
    level_index: usize,
    rng: &mut impl Rng,
) -> usize {
    let placed: Vec<(PowerUpKind, Vec2)> = match &level.power_up_spawns {
        Some(spawns) => spawns.iter().map(|s| (s.kind, Vec2::new(s.x, s.y))).collect(),
        None => {
            let count = (2 + level_index).min(MAX_RANDOM_POWER_UPS);
            let mut placed = Vec::with_capacity(count);
            for _ in 0..count {
                let Some(platform) = level.platforms.choose(rng) else {
                    break;
                };
                let Some(&kind) = PowerUpKind::ALL.choose(rng) else {
                    break;
                };
                let b = platform.bounds;
                let x = b.x + rng.gen::<f32>() * (b.width - PowerUp::SIZE);
                placed.push((kind, Vec2::new(x, b.y - 48.0)));
            }
            placed
        }
    };

    for &(kind, pos) in &placed {
        let bob = rng.gen::<f32>() * std::f32::consts::TAU;
        commands.spawn(PowerUp::new(kind, pos, bob));
    }
    placed.len()
}

/// Place the level's destructible gems, if any.
pub fn spawn_gems(commands: &mut Commands, level: &Level) -> usize {
    for &pos in &level.gem_spawns {
        commands.spawn(Gem::new(pos));
    }
    level.gem_spawns.len()
}

fn tick_items(
    clock: Res<FrameClock>,
    config: Res<PlayerConfig>,
    mut manager: ResMut<PowerUpManager>,
    mut players: Query<&mut Player>,
    mut power_ups: Query<&mut PowerUp>,
    mut gems: Query<&mut Gem>,
) {
    let dt = clock.sim_dt;
    if let Ok(mut player) = players.get_single_mut() {
        manager.update(dt, &mut player, &config);
    }
    for mut power_up in power_ups.iter_mut() {
        power_up.update(dt);
    }
    for mut gem in gems.iter_mut() {
        gem.update(dt);
    }
}

fn collect_pickups(
    mut level: ResMut<Level>,
    mut session: ResMut<Session>,
    mut stats: ResMut<GameStats>,
    mut out: ResMut<Outbox>,
    mut players: Query<(&mut Player, &Body, &mut Health)>,
) {
    let Ok((mut player, body, mut health)) = players.get_single_mut() else {
        return;
    };
    let hitbox = body.hitbox();

    for pickup in level.pickups.iter_mut() {
        if pickup.collected || !hitbox.overlaps(&pickup.bounds()) {
            continue;
        }
        pickup.collected = true;
        stats.pickups_collected += 1;
        out.sound(SoundId::Pickup);

        match pickup.kind {
            PickupKind::Heart => {
                health.heal(2);
            }
            PickupKind::Star => session.score += 500,
            PickupKind::Crystal => {
                session.score += 1000;
                player.grant_invincibility(3.0);
            }
        }
    }
}

fn collect_power_ups(
    mut commands: Commands,
    clock: Res<FrameClock>,
    config: Res<PlayerConfig>,
    mut manager: ResMut<PowerUpManager>,
    mut stats: ResMut<GameStats>,
    mut out: ResMut<Outbox>,
    mut players: Query<(&mut Player, &Body)>,
    mut power_ups: Query<(Entity, &mut PowerUp)>,
) {
    let Ok((mut player, body)) = players.get_single_mut() else {
        return;
    };
    let hitbox = body.hitbox();

    for (entity, mut power_up) in power_ups.iter_mut() {
        if power_up.collected {
            continue;
        }
        if player.magnet {
            power_up.attract(hitbox.center(), clock.sim_dt);
        }
        if !hitbox.overlaps(&power_up.bounds()) {
            continue;
        }

        power_up.collected = true;
        stats.powerups_used += 1;
        manager.apply(power_up.kind, &mut player, &config);
        out.sound(SoundId::PowerUp);
        out.effect(EffectCue::PowerUp);
        out.banner(Banner::new(power_up.kind.title()).with_subtitle(power_up.kind.description()));
        info!("Collected power-up {:?}", power_up.kind);
        commands.entity(entity).despawn();
    }
}

/// Despawn every power-up and gem (level load).
pub fn clear_items(
    commands: &mut Commands,
    power_ups: &Query<Entity, With<PowerUp>>,
    gems: &Query<Entity, With<Gem>>,
) {
    for entity in power_ups.iter().chain(gems.iter()) {
        commands.entity(entity).despawn();
    }
}
