//! Generic per-tick enemy update shared by every archetype.

use super::archetype::Locomotion;
use super::brain::Brain;
use super::components::{AiContext, Enemy};
use crate::combat::Health;
use crate::physics::{move_flying, move_grounded, Body, Pose, SweepReport};

pub const ENEMY_GRAVITY: f32 = 1200.0;
pub const ENEMY_MAX_FALL: f32 = 600.0;

/// Advance one enemy by `ctx.dt`.
///
/// Dead enemies only run their death timer; hurt and stunned enemies skip
/// the AI. Summons requested during the tick are queued at the end,
/// whatever path the update took.
pub fn update_enemy(
    enemy: &mut Enemy,
    brain: &mut Brain,
    body: &mut Body,
    health: &Health,
    ctx: &mut AiContext,
) {
    if matches!(brain, Brain::Pyromancer(_)) {
        scripted_step(enemy, brain, body, health, ctx);
    } else {
        step(enemy, brain, body, health, ctx);
    }
    brain.flush_requests(body, ctx);
}

fn step(enemy: &mut Enemy, brain: &mut Brain, body: &mut Body, health: &Health, ctx: &mut AiContext) {
    let dt = ctx.dt;

    if enemy.dead {
        enemy.death_timer += dt;
        body.anim.advance(dt);
        if enemy.death_timer > enemy.archetype.death_delay() {
            enemy.marked = true;
        }
        return;
    }

    if enemy.hurt {
        enemy.hurt_timer -= dt;
        if enemy.hurt_timer <= 0.0 {
            enemy.hurt = false;
        }
        body.anim.advance(dt);
        return;
    }

    if enemy.stun_timer > 0.0 {
        enemy.stun_timer -= dt;
        body.vel.x = 0.0;
        if enemy.is_flying() {
            body.vel.y = 0.0;
        }
        body.anim.play(Pose::Hurt);
        body.anim.advance(dt);
        return;
    }

    brain.think(enemy, body, health, ctx);

    let report = match enemy.locomotion {
        Locomotion::Ground => {
            body.vel.y = (body.vel.y + ENEMY_GRAVITY * dt).min(ENEMY_MAX_FALL);
            move_grounded(body, dt, ctx.solids, ctx.arena)
        }
        Locomotion::Flying(band) => move_flying(body, dt, band, ctx.arena),
        Locomotion::Scripted => SweepReport::default(),
    };

    if let Some(direction) = report.turn_direction() {
        enemy.patrol_direction = direction;
    }
    if report.fell_out {
        enemy.discard();
        return;
    }

    body.anim.play(choose_pose(enemy, body));
    body.anim.advance(dt);
}

/// Position-scripted bosses: no gravity, no animation, and a flinch does
/// not interrupt the AI.
fn scripted_step(
    enemy: &mut Enemy,
    brain: &mut Brain,
    body: &mut Body,
    health: &Health,
    ctx: &mut AiContext,
) {
    let dt = ctx.dt;

    if enemy.dead {
        enemy.death_timer += dt;
        if enemy.death_timer > enemy.archetype.death_delay() {
            enemy.marked = true;
        }
        return;
    }

    if enemy.hurt {
        enemy.hurt_timer -= dt;
        if enemy.hurt_timer <= 0.0 {
            enemy.hurt = false;
        }
    }

    if enemy.stun_timer > 0.0 {
        enemy.stun_timer -= dt;
        return;
    }

    brain.think(enemy, body, health, ctx);
    enemy.attacking = enemy.attack_cooldown > enemy.attack_cooldown_max - 0.3;
}

fn choose_pose(enemy: &Enemy, body: &Body) -> Pose {
    if enemy.hurt {
        Pose::Hurt
    } else if enemy.attacking {
        Pose::Attack
    } else if body.vel.x != 0.0 || (enemy.is_flying() && body.vel.y != 0.0) {
        Pose::Walk
    } else {
        Pose::Idle
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::core::{Bounds, Outbox};
    use crate::enemies::{Archetype, Target};
    use crate::physics::{AnimationSet, Animator, Rig};

    struct Actor {
        enemy: Enemy,
        brain: Brain,
        body: Body,
        health: Health,
        rng: StdRng,
        out: Outbox,
    }

    fn spawn(archetype: Archetype, pos: Vec2) -> Actor {
        let mut rng = StdRng::seed_from_u64(7);
        let stats = archetype.stats();
        Actor {
            enemy: Enemy::new(archetype),
            brain: Brain::new(archetype, &mut rng),
            body: Body::new(
                pos,
                stats.size,
                stats.hitbox,
                Animator::new(Rig::Enemy, AnimationSet::placeholder(Rig::Enemy)),
            ),
            health: Health::new(stats.health),
            rng,
            out: Outbox::default(),
        }
    }

    fn tick(rig: &mut Actor, player: Vec2, solids: &[Bounds], dt: f32) {
        let mut ctx = AiContext {
            dt,
            target: Target {
                pos: player,
                size: Vec2::splat(96.0),
            },
            arena: Vec2::new(2000.0, 600.0),
            solids,
            rng: &mut rig.rng,
            out: &mut rig.out,
        };
        update_enemy(&mut rig.enemy, &mut rig.brain, &mut rig.body, &rig.health, &mut ctx);
    }

    fn floor() -> Vec<Bounds> {
        vec![Bounds::new(0.0, 500.0, 2000.0, 100.0)]
    }

    #[test]
    fn walker_lands_and_patrols() {
        let mut rig = spawn(Archetype::Goblin, Vec2::new(400.0, 420.0));
        let solids = floor();
        for _ in 0..30 {
            tick(&mut rig, Vec2::new(1500.0, 404.0), &solids, 1.0 / 60.0);
        }
        assert!(rig.body.grounded);
        assert!(rig.body.vel.x > 0.0);
        assert_eq!(rig.body.anim.pose(), Some(Pose::Walk));
    }

    #[test]
    fn hurt_enemy_stands_still() {
        let mut rig = spawn(Archetype::Skeleton, Vec2::new(400.0, 428.0));
        let solids = floor();
        let mut out = Outbox::default();
        assert!(rig.brain.take_damage(
            1,
            true,
            &mut rig.enemy,
            &mut rig.body,
            &mut rig.health,
            &mut out
        ));
        let before = rig.body.pos;
        tick(&mut rig, Vec2::new(1500.0, 404.0), &solids, 0.1);
        assert_eq!(rig.body.pos, before);
        assert!(rig.enemy.hurt);
        tick(&mut rig, Vec2::new(1500.0, 404.0), &solids, 0.15);
        assert!(!rig.enemy.hurt);
    }

    #[test]
    fn dead_enemy_is_marked_after_delay() {
        let mut rig = spawn(Archetype::Goblin, Vec2::new(400.0, 428.0));
        let solids = floor();
        let mut out = Outbox::default();
        rig.brain
            .take_damage(5, false, &mut rig.enemy, &mut rig.body, &mut rig.health, &mut out);
        assert!(rig.enemy.dead);
        tick(&mut rig, Vec2::ZERO, &solids, 0.6);
        assert!(!rig.enemy.marked);
        tick(&mut rig, Vec2::ZERO, &solids, 0.6);
        assert!(rig.enemy.marked);
        assert!(rig.enemy.rewarded);
    }

    #[test]
    fn walker_off_the_map_is_discarded() {
        let mut rig = spawn(Archetype::Goblin, Vec2::new(400.0, 700.0));
        tick(&mut rig, Vec2::ZERO, &[], 0.1);
        assert!(rig.enemy.marked);
        assert!(!rig.enemy.rewarded);
    }

    #[test]
    fn skeleton_throws_bone_at_range() {
        let mut rig = spawn(Archetype::Skeleton, Vec2::new(400.0, 428.0));
        let solids = floor();
        tick(&mut rig, Vec2::new(550.0, 404.0), &solids, 1.0 / 60.0);
        assert_eq!(rig.out.projectiles.len(), 1);
        assert!(rig.out.projectiles[0].vel.x > 0.0);
        assert!(rig.enemy.attacking);
    }

    #[test]
    fn stunned_enemy_skips_ai() {
        let mut rig = spawn(Archetype::Skeleton, Vec2::new(400.0, 428.0));
        let solids = floor();
        rig.enemy.stun(1.0, &mut rig.body);
        tick(&mut rig, Vec2::new(550.0, 404.0), &solids, 0.5);
        assert!(rig.out.projectiles.is_empty());
        assert_eq!(rig.body.anim.pose(), Some(Pose::Hurt));
    }
}
