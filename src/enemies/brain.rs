//! Per-archetype AI state and the regular enemy behaviours.
//!
//! Every archetype owns its auxiliary state inside a [`Brain`] variant. The
//! generic driver calls [`Brain::think`] once per tick while the enemy is
//! alive, not hurt and not stunned; the brain only sets velocities, facing,
//! attack flags and queues projectiles. Movement resolution happens after.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::archetype::Archetype;
use super::bosses::{
    DemonLordBrain, DragonBrain, GargoyleBrain, HorsemanBrain, MinotaurBrain, PyromancerBrain,
};
use super::components::{AiContext, Enemy, Target};
use crate::combat::Health;
use crate::core::{Bounds, Outbox};
use crate::physics::{Body, Pose};
use crate::projectiles::{ProjectileKind, ProjectileSpawn};

/// Harpy swoop bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarpyBrain {
    pub wave: f32,
    pub swoop_cooldown: f32,
    pub swoop_target: Option<Vec2>,
}

impl HarpyBrain {
    pub fn is_swooping(&self) -> bool {
        self.swoop_target.is_some()
    }
}

/// AI state of one enemy.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum Brain {
    BabyDragon { hop_cooldown: f32 },
    Goblin,
    FlyingEye { wave: f32 },
    Skeleton,
    SkeletonMage,
    Lizardman,
    Imp { hover: f32 },
    Harpy(HarpyBrain),
    Dragon(DragonBrain),
    Gargoyle(GargoyleBrain),
    DemonLord(DemonLordBrain),
    Minotaur(MinotaurBrain),
    HeadlessHorseman(HorsemanBrain),
    Pyromancer(PyromancerBrain),
}

impl Brain {
    /// Fresh brain for `archetype`. Wave-driven flyers start at a random
    /// point of their cycle.
    pub fn new(archetype: Archetype, rng: &mut impl Rng) -> Self {
        match archetype {
            Archetype::BabyDragon => Brain::BabyDragon { hop_cooldown: 0.0 },
            Archetype::Goblin => Brain::Goblin,
            Archetype::FlyingEye => Brain::FlyingEye {
                wave: rng.gen::<f32>() * TAU,
            },
            Archetype::Skeleton => Brain::Skeleton,
            Archetype::SkeletonMage => Brain::SkeletonMage,
            Archetype::Lizardman => Brain::Lizardman,
            Archetype::Imp => Brain::Imp {
                hover: rng.gen::<f32>() * TAU,
            },
            Archetype::Harpy => Brain::Harpy(HarpyBrain {
                wave: rng.gen::<f32>() * TAU,
                ..Default::default()
            }),
            Archetype::Dragon => Brain::Dragon(DragonBrain::default()),
            Archetype::Gargoyle => Brain::Gargoyle(GargoyleBrain::default()),
            Archetype::DemonLord => Brain::DemonLord(DemonLordBrain::default()),
            Archetype::Minotaur => Brain::Minotaur(MinotaurBrain::default()),
            Archetype::HeadlessHorseman => Brain::HeadlessHorseman(HorsemanBrain::default()),
            Archetype::Pyromancer => Brain::Pyromancer(PyromancerBrain::default()),
        }
    }

    /// One AI decision step.
    pub fn think(&mut self, enemy: &mut Enemy, body: &mut Body, health: &Health, ctx: &mut AiContext) {
        match self {
            Brain::BabyDragon { hop_cooldown } => hopper(hop_cooldown, enemy, body, ctx),
            Brain::Goblin | Brain::Lizardman => brawler(enemy, body, ctx),
            Brain::Skeleton => thrower(enemy, body, ctx, 80.0, bone_throw),
            Brain::SkeletonMage => thrower(enemy, body, ctx, 100.0, aimed_fireball),
            Brain::FlyingEye { wave } => flying_eye(wave, enemy, body, ctx),
            Brain::Imp { hover } => imp(hover, enemy, body, ctx),
            Brain::Harpy(harpy) => harpy_ai(harpy, enemy, body, ctx),
            Brain::Dragon(dragon) => dragon.think(enemy, body, ctx),
            Brain::Gargoyle(gargoyle) => gargoyle.think(enemy, body, health, ctx),
            Brain::DemonLord(demon) => demon.think(enemy, body, health, ctx),
            Brain::Minotaur(minotaur) => minotaur.think(enemy, body, health, ctx),
            Brain::HeadlessHorseman(horseman) => horseman.think(enemy, body, health, ctx),
            Brain::Pyromancer(pyro) => pyro.think(enemy, body, health, ctx),
        }
    }

    /// Apply `amount` damage. Returns `true` if the hit landed.
    ///
    /// Some bosses ignore hits during a damage cooldown or while shielded,
    /// and some react to melee hits differently from ranged ones.
    pub fn take_damage(
        &mut self,
        amount: i32,
        melee: bool,
        enemy: &mut Enemy,
        body: &mut Body,
        health: &mut Health,
        out: &mut Outbox,
    ) -> bool {
        if enemy.dead {
            return false;
        }

        match self {
            Brain::Dragon(_) | Brain::Gargoyle(_) => {
                if enemy.damage_cooldown > 0.0 {
                    return false;
                }
                enemy.damage_cooldown = if matches!(self, Brain::Dragon(_)) { 0.5 } else { 0.4 };
                enemy.wound(amount, 0.3, body, health, out);
            }
            Brain::DemonLord(demon) => {
                enemy.wound(amount, 0.2, body, health, out);
                if !enemy.dead {
                    demon.register_hit();
                }
            }
            Brain::Minotaur(minotaur) => minotaur.take_hit(amount, melee, enemy, body, health, out),
            Brain::Pyromancer(pyro) => {
                if pyro.floating {
                    return false;
                }
                enemy.wound(amount, 0.2, body, health, out);
            }
            _ => enemy.wound(amount, 0.2, body, health, out),
        }
        true
    }

    /// Queue summons requested during this tick or by a hit since the
    /// last one.
    pub fn flush_requests(&mut self, body: &Body, ctx: &mut AiContext) {
        match self {
            Brain::DemonLord(demon) => demon.flush_summons(body, ctx),
            Brain::HeadlessHorseman(horseman) => horseman.flush_summons(body, ctx),
            _ => {}
        }
    }

    /// Goblin club swing is on its striking frames.
    pub fn melee_strike(&self, enemy: &Enemy, body: &Body) -> Option<Bounds> {
        if !matches!(self, Brain::Goblin) || !enemy.attacking {
            return None;
        }
        if body.anim.pose() != Some(Pose::Attack) || !(1..=2).contains(&body.anim.frame()) {
            return None;
        }
        let hitbox = body.hitbox();
        let x = if body.facing_right { hitbox.right() } else { hitbox.x - 40.0 };
        Some(Bounds::new(x, hitbox.y, 40.0, hitbox.height))
    }

    /// Tell a Pyromancer its gems are gone. Returns `true` the first time.
    pub fn notify_gems_destroyed(&mut self) -> bool {
        match self {
            Brain::Pyromancer(pyro) if !pyro.gems_destroyed => {
                pyro.gems_destroyed = true;
                true
            }
            _ => false,
        }
    }
}

/// Spawn point in front of `body` for straight shots.
fn muzzle(body: &Body, y_offset: f32) -> Vec2 {
    let x = if body.facing_right {
        body.pos.x + body.size.x
    } else {
        body.pos.x - 16.0
    };
    Vec2::new(x, body.pos.y + y_offset)
}

/// Unit vector from `from` toward `to`, or `fallback` if they coincide.
pub(crate) fn direction(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(fallback)
}

fn hopper(hop_cooldown: &mut f32, enemy: &mut Enemy, body: &mut Body, ctx: &mut AiContext) {
    let dist = ctx.target.distance_from(body);
    if *hop_cooldown > 0.0 {
        *hop_cooldown -= ctx.dt;
    }

    if dist < enemy.detection_range {
        ctx.target.face(body);
        if *hop_cooldown <= 0.0 && body.vel.y == 0.0 {
            body.vel.y = -300.0;
            body.vel.x = body.facing_sign() * enemy.speed * 2.0;
            *hop_cooldown = 1.5;
        }
    } else {
        body.vel.x = 0.0;
    }

    // Momentum only while airborne
    if body.vel.y != 0.0 {
        body.vel.x *= 0.98;
    } else {
        body.vel.x = 0.0;
    }
}

/// Walk up and hit: goblins and lizardmen.
fn brawler(enemy: &mut Enemy, body: &mut Body, ctx: &mut AiContext) {
    let dist = ctx.target.distance_from(body);
    enemy.tick_attack(body, ctx.dt);

    if enemy.attacking {
        body.vel.x = 0.0;
        return;
    }

    if dist < enemy.attack_range {
        ctx.target.face(body);
        enemy.try_attack(body);
        body.vel.x = 0.0;
    } else if dist < enemy.detection_range {
        ctx.target.face(body);
        body.vel.x = body.facing_sign() * enemy.speed;
    } else {
        enemy.patrol(body, ctx.dt);
    }
}

type Shot = fn(&Body, Target) -> ProjectileSpawn;

fn bone_throw(body: &Body, _target: Target) -> ProjectileSpawn {
    ProjectileSpawn::enemy(
        ProjectileKind::Bone,
        muzzle(body, 20.0),
        Vec2::new(body.facing_sign() * 200.0, 0.0),
    )
}

fn aimed_fireball(body: &Body, target: Target) -> ProjectileSpawn {
    let origin = muzzle(body, 30.0);
    let dir = direction(origin, target.center(), Vec2::X);
    ProjectileSpawn::enemy(ProjectileKind::Fireball, origin, dir * 180.0)
}

/// Keep a middle distance and shoot: skeletons and skeleton mages.
fn thrower(enemy: &mut Enemy, body: &mut Body, ctx: &mut AiContext, too_close: f32, shot: Shot) {
    let dist = ctx.target.distance_from(body);
    enemy.tick_attack(body, ctx.dt);

    if enemy.attacking {
        body.vel.x = 0.0;
        return;
    }

    if dist < enemy.attack_range && dist > too_close {
        ctx.target.face(body);
        if enemy.try_attack(body) {
            ctx.out.projectile(shot(body, ctx.target));
        }
        body.vel.x = 0.0;
    } else if dist < too_close {
        ctx.target.face(body);
        body.vel.x = -body.facing_sign() * enemy.speed;
    } else if dist < enemy.detection_range {
        ctx.target.face(body);
        body.vel.x = body.facing_sign() * enemy.speed;
    } else {
        enemy.patrol(body, ctx.dt);
    }
}

fn flying_eye(wave: &mut f32, enemy: &mut Enemy, body: &mut Body, ctx: &mut AiContext) {
    let dist = ctx.target.distance_from(body);
    *wave += ctx.dt * 3.0;

    if dist < enemy.detection_range * 1.5 {
        ctx.target.face(body);
        body.vel.x = body.facing_sign() * enemy.speed;
        body.vel.y = (ctx.target.pos.y - 50.0 - body.pos.y) * 2.0;
    } else {
        enemy.drift(body);
        body.vel.y = wave.sin() * 30.0;
    }
}

fn imp(hover: &mut f32, enemy: &mut Enemy, body: &mut Body, ctx: &mut AiContext) {
    let dist = ctx.target.distance_from(body);
    enemy.tick_attack(body, ctx.dt);
    *hover += ctx.dt * 2.0;

    if dist < enemy.attack_range {
        ctx.target.face(body);
        if enemy.try_attack(body) {
            let origin = muzzle(body, body.size.y / 2.0);
            let dir = direction(origin, ctx.target.center(), Vec2::X);
            ctx.out.projectile(ProjectileSpawn::enemy(
                ProjectileKind::Fireball,
                origin,
                dir * 180.0,
            ));
        }
        body.vel.x = 0.0;
        body.vel.y = hover.sin() * 20.0;
    } else {
        enemy.drift(body);
        body.vel.y = hover.sin() * 30.0;
    }
}

fn harpy_ai(harpy: &mut HarpyBrain, enemy: &mut Enemy, body: &mut Body, ctx: &mut AiContext) {
    let dist = ctx.target.distance_from(body);
    harpy.wave += ctx.dt * 2.5;
    if harpy.swoop_cooldown > 0.0 {
        harpy.swoop_cooldown -= ctx.dt;
    }

    if let Some(goal) = harpy.swoop_target {
        let offset = goal - body.pos;
        let len = offset.length();
        if len > 20.0 {
            body.vel = offset / len * enemy.speed * 2.0;
        } else {
            harpy.swoop_target = None;
            harpy.swoop_cooldown = 3.0;
            enemy.attacking = false;
        }
    } else if dist < enemy.detection_range * 1.5 {
        ctx.target.face(body);
        if harpy.swoop_cooldown <= 0.0 && dist < 200.0 {
            harpy.swoop_target = Some(ctx.target.pos);
            enemy.begin_attack(body);
        } else {
            // Circle above the player
            body.vel.x = body.facing_sign() * enemy.speed * 0.6;
            body.vel.y = (ctx.target.pos.y - 100.0 - body.pos.y) * 2.0 + harpy.wave.sin() * 20.0;
        }
    } else {
        enemy.drift(body);
        body.vel.y = harpy.wave.sin() * 40.0;
    }
}
