//! Pairwise combat passes, run once per tick after every actor moved.
//!
//! Pass order: enemy contact, player melee, player projectiles, enemy
//! projectiles, projectile vs platforms, hazards, gems. Each pass is
//! self-contained; a hit in one pass does not suppress the next.
//!
//! Contact and hazard passes stop at the first hit of the tick. The
//! enemy-projectile pass does not: every overlapping projectile is
//! processed, so a shield can absorb one projectile and the next one in
//! the same tick still wounds. Hazards go around the shield entirely.

use bevy::prelude::*;

use super::components::Health;
use super::effects::EffectCue;
use crate::core::{Bounds, Outbox, SoundId, SpawnSeq};
use crate::enemies::{Brain, Enemy};
use crate::game::{GameStats, Session};
use crate::items::Gem;
use crate::physics::Body;
use crate::player::{Player, PlayerConfig};
use crate::projectiles::{Owner, Projectile};
use crate::world::Level;

/// What became of a hit aimed at the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    /// The shield took it and is gone
    Absorbed,
    /// Health went down
    Wounded,
    /// Invincible, dead or mid-swing
    Ignored,
}

/// Deliver `amount` damage to the player, letting a shield absorb it.
pub fn strike_player(
    amount: i32,
    player: &mut Player,
    body: &mut Body,
    health: &mut Health,
    config: &PlayerConfig,
    stats: &mut GameStats,
    out: &mut Outbox,
) -> Strike {
    if player.shield {
        player.shield = false;
        out.sound(SoundId::Hit);
        out.effect(EffectCue::Shake {
            intensity: 5.0,
            duration: 0.1,
        });
        return Strike::Absorbed;
    }

    if player.take_damage(amount, body, health, config, out) {
        out.sound(SoundId::Hurt);
        out.effect(EffectCue::PlayerHit);
        stats.damage_taken += amount.max(0) as u32;
        Strike::Wounded
    } else {
        Strike::Ignored
    }
}

fn hit_feedback(enemy: &Enemy, out: &mut Outbox) {
    out.sound(SoundId::Hit);
    out.effect(if enemy.is_boss() {
        EffectCue::BossHit
    } else {
        EffectCue::EnemyHit
    });
}

type PlayerParts<'a> = (&'a mut Player, &'a mut Body, &'a mut Health);
type EnemyParts<'a> = (
    &'a SpawnSeq,
    &'a mut Enemy,
    &'a mut Brain,
    &'a mut Body,
    &'a mut Health,
);

/// Enemy bodies (and the goblin club) against the player. At most one hit
/// per tick.
pub(crate) fn contact_damage(
    config: Res<PlayerConfig>,
    mut stats: ResMut<GameStats>,
    mut out: ResMut<Outbox>,
    mut players: Query<PlayerParts, Without<Enemy>>,
    enemies: Query<(&SpawnSeq, &Enemy, &Brain, &Body)>,
) {
    let Ok((mut player, mut body, mut health)) = players.get_single_mut() else {
        return;
    };
    if player.is_untouchable() {
        return;
    }
    let hitbox = body.hitbox();

    let mut ordered: Vec<_> = enemies.iter().filter(|(_, e, ..)| !e.dead).collect();
    ordered.sort_by_key(|(seq, ..)| **seq);

    for (_, enemy, brain, enemy_body) in ordered {
        let touching = enemy_body.hitbox().overlaps(&hitbox)
            || brain
                .melee_strike(enemy, enemy_body)
                .is_some_and(|strike| strike.overlaps(&hitbox));
        if touching {
            strike_player(
                enemy.damage,
                &mut player,
                &mut body,
                &mut health,
                &config,
                &mut stats,
                &mut out,
            );
            return;
        }
    }
}

/// The player's melee swing hits every overlapping enemy that is not
/// already flinching.
pub(crate) fn melee_hits(
    config: Res<PlayerConfig>,
    mut stats: ResMut<GameStats>,
    mut out: ResMut<Outbox>,
    players: Query<(&Player, &Body), Without<Enemy>>,
    mut enemies: Query<EnemyParts>,
) {
    let Ok((player, body)) = players.get_single() else {
        return;
    };
    if !player.is_melee_active(&config) {
        return;
    }
    let swing = player.melee_box(body, &config);
    let damage = player.melee_damage;

    let mut ordered: Vec<_> = enemies.iter_mut().collect();
    ordered.sort_by_key(|(seq, ..)| **seq);

    for (_, mut enemy, mut brain, mut enemy_body, mut health) in ordered {
        if enemy.dead || enemy.hurt || !swing.overlaps(&enemy_body.hitbox()) {
            continue;
        }
        let landed = brain.take_damage(
            damage,
            true,
            &mut enemy,
            &mut enemy_body,
            &mut health,
            &mut out,
        );
        if landed {
            stats.damage_dealt += damage.max(0) as u32;
            hit_feedback(&enemy, &mut out);
        }
    }
}

/// Player bolts, newest first. Each bolt hits at most one enemy.
pub(crate) fn player_projectile_hits(
    mut stats: ResMut<GameStats>,
    mut out: ResMut<Outbox>,
    mut projectiles: Query<(&SpawnSeq, &mut Projectile)>,
    mut enemies: Query<EnemyParts>,
) {
    let mut bolts: Vec<_> = projectiles
        .iter_mut()
        .filter(|(_, p)| p.owner == Owner::Player)
        .collect();
    if bolts.is_empty() {
        return;
    }
    bolts.sort_by_key(|(seq, _)| std::cmp::Reverse(**seq));

    let mut ordered: Vec<_> = enemies.iter_mut().collect();
    ordered.sort_by_key(|(seq, ..)| **seq);

    for (_, bolt) in bolts.iter_mut() {
        let bounds = bolt.bounds();
        let target = ordered
            .iter_mut()
            .find(|(_, enemy, _, body, _)| !enemy.dead && bounds.overlaps(&body.hitbox()));
        let Some((_, enemy, brain, body, health)) = target else {
            continue;
        };

        bolt.marked = true;
        let landed = brain.take_damage(bolt.damage, false, enemy, body, health, &mut out);
        if landed {
            stats.damage_dealt += bolt.damage.max(0) as u32;
            hit_feedback(enemy, &mut out);
        }
    }
}

/// Enemy shots against the player, newest first. Every overlapping shot is
/// processed.
pub(crate) fn enemy_projectile_hits(
    config: Res<PlayerConfig>,
    mut stats: ResMut<GameStats>,
    mut out: ResMut<Outbox>,
    mut players: Query<PlayerParts, Without<Enemy>>,
    mut projectiles: Query<(&SpawnSeq, &mut Projectile)>,
) {
    let Ok((mut player, mut body, mut health)) = players.get_single_mut() else {
        return;
    };
    if player.is_untouchable() {
        return;
    }
    let hitbox = body.hitbox();

    let mut shots: Vec<_> = projectiles
        .iter_mut()
        .filter(|(_, p)| p.owner == Owner::Enemy)
        .collect();
    shots.sort_by_key(|(seq, _)| std::cmp::Reverse(**seq));

    for (_, mut shot) in shots {
        if !shot.bounds().overlaps(&hitbox) {
            continue;
        }
        shot.marked = true;
        strike_player(
            shot.damage,
            &mut player,
            &mut body,
            &mut health,
            &config,
            &mut stats,
            &mut out,
        );
    }
}

/// Any projectile touching a platform, moving ones included, is spent.
pub(crate) fn projectile_platform_hits(level: Res<Level>, mut projectiles: Query<&mut Projectile>) {
    let solids = level.solids();
    for mut projectile in projectiles.iter_mut() {
        let bounds = projectile.bounds();
        if solids.iter().any(|solid| bounds.overlaps(solid)) {
            projectile.marked = true;
        }
    }
}

/// First overlapping hazard hurts the player. Hazards ignore the shield
/// and are not counted as damage taken.
pub(crate) fn hazard_damage(
    level: Res<Level>,
    config: Res<PlayerConfig>,
    mut out: ResMut<Outbox>,
    mut players: Query<PlayerParts, Without<Enemy>>,
) {
    let Ok((mut player, mut body, mut health)) = players.get_single_mut() else {
        return;
    };
    if player.is_untouchable() {
        return;
    }
    let hitbox = body.hitbox();

    let Some(hazard) = level.hazards.iter().find(|h| hitbox.overlaps(&h.bounds)) else {
        return;
    };
    if player.take_damage(hazard.damage, &mut body, &mut health, &config, &mut out) {
        out.sound(SoundId::Hurt);
        out.effect(EffectCue::PlayerHit);
    }
}

/// Melee and bolts against gems. When the last gem shatters, any
/// Pyromancer loses its protection.
pub(crate) fn gem_hits(
    config: Res<PlayerConfig>,
    mut session: ResMut<Session>,
    mut out: ResMut<Outbox>,
    players: Query<(&Player, &Body), Without<Enemy>>,
    mut projectiles: Query<&mut Projectile>,
    mut gems: Query<&mut Gem>,
    mut brains: Query<&mut Brain>,
) {
    if gems.is_empty() {
        return;
    }

    if let Ok((player, body)) = players.get_single() {
        if player.is_melee_active(&config) {
            let swing = player.melee_box(body, &config);
            for mut gem in gems.iter_mut() {
                if gem.destroyed || gem.hurt || !swing.overlaps(&gem.bounds()) {
                    continue;
                }
                if gem.take_damage(player.melee_damage, &mut out) {
                    session.score += Gem::SCORE;
                }
            }
        }
    }

    for mut bolt in projectiles.iter_mut() {
        if bolt.owner != Owner::Player {
            continue;
        }
        let bounds: Bounds = bolt.bounds();
        let Some(mut gem) = gems
            .iter_mut()
            .find(|gem| !gem.destroyed && bounds.overlaps(&gem.bounds()))
        else {
            continue;
        };
        bolt.marked = true;
        if gem.take_damage(bolt.damage, &mut out) {
            session.score += Gem::SCORE;
        }
    }

    if gems.iter().all(|gem| gem.destroyed) {
        for mut brain in brains.iter_mut() {
            if brain.notify_gems_destroyed() {
                info!("All gems destroyed, the Pyromancer is grounded");
            }
        }
    }
}
