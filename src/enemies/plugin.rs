//! Enemy plugin - spawning and the per-tick AI system.

use std::collections::VecDeque;

use bevy::prelude::*;
use rand::Rng;

use super::archetype::Archetype;
use super::brain::Brain;
use super::components::{AiContext, Enemy, Target};
use super::driver::update_enemy;
use crate::combat::Health;
use crate::core::{FrameClock, GameRng, Outbox, SpawnCounter, SpawnSeq, SummonRequest, TickSet};
use crate::physics::{AnimationLibrary, Body, Rig};
use crate::player::Player;
use crate::world::Level;

/// Enemy plugin - runs every enemy's update in spawn order.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, drive_enemies.in_set(TickSet::Enemies));
    }
}

/// Fresh components for one enemy with its top-left corner at `pos`.
fn enemy_parts(
    archetype: Archetype,
    pos: Vec2,
    library: &AnimationLibrary,
    rng: &mut impl Rng,
) -> (Enemy, Brain, Body, Health) {
    let stats = archetype.stats();
    let anim = library.animator(archetype.key(), Rig::Enemy);
    (
        Enemy::new(archetype),
        Brain::new(archetype, rng),
        Body::new(pos, stats.size, stats.hitbox, anim),
        Health::new(stats.health),
    )
}

/// Spawn one enemy with its top-left corner at `pos`.
pub fn spawn_enemy(
    commands: &mut Commands,
    archetype: Archetype,
    pos: Vec2,
    library: &AnimationLibrary,
    counter: &mut SpawnCounter,
    rng: &mut impl Rng,
) -> Entity {
    let parts = enemy_parts(archetype, pos, library, rng);
    commands.spawn((parts, counter.next())).id()
}

/// Spawn the level's starting enemies. Unknown type keys fall back to a
/// baby dragon.
pub fn spawn_level_enemies(
    commands: &mut Commands,
    level: &Level,
    library: &AnimationLibrary,
    counter: &mut SpawnCounter,
    rng: &mut impl Rng,
) -> usize {
    for spawn in &level.spawns {
        let archetype = Archetype::resolve(&spawn.kind);
        spawn_enemy(
            commands,
            archetype,
            Vec2::new(spawn.x, spawn.y),
            library,
            counter,
            rng,
        );
    }
    debug!("Spawned {} enemies for level '{}'", level.spawns.len(), level.key);
    level.spawns.len()
}

/// Update every enemy in spawn order. Summons requested during the pass
/// join at the back of the order and get their first update in the same
/// tick, so they spawn already moving.
fn drive_enemies(
    mut commands: Commands,
    clock: Res<FrameClock>,
    level: Res<Level>,
    library: Res<AnimationLibrary>,
    mut counter: ResMut<SpawnCounter>,
    mut rng: ResMut<GameRng>,
    mut out: ResMut<Outbox>,
    players: Query<&Body, (With<Player>, Without<Enemy>)>,
    mut enemies: Query<(&SpawnSeq, &mut Enemy, &mut Brain, &mut Body, &Health)>,
) {
    let Ok(player_body) = players.get_single() else {
        return;
    };

    let mut ctx = AiContext {
        dt: clock.sim_dt,
        target: Target::of(player_body),
        arena: level.arena(),
        solids: level.solids(),
        rng: &mut rng.0,
        out: &mut *out,
    };

    let mut ordered: Vec<_> = enemies.iter_mut().collect();
    ordered.sort_by_key(|(seq, ..)| **seq);

    let earlier = ctx.out.summons.len();
    for (_, mut enemy, mut brain, mut body, health) in ordered {
        update_enemy(&mut enemy, &mut brain, &mut body, health, &mut ctx);
    }

    let mut pending: VecDeque<SummonRequest> = ctx.out.summons.drain(earlier..).collect();
    while let Some(summon) = pending.pop_front() {
        let (mut enemy, mut brain, mut body, health) =
            enemy_parts(summon.archetype, summon.pos, &library, &mut *ctx.rng);
        let queued = ctx.out.summons.len();
        update_enemy(&mut enemy, &mut brain, &mut body, &health, &mut ctx);
        pending.extend(ctx.out.summons.drain(queued..));
        commands.spawn((enemy, brain, body, health, counter.next()));
    }
}
