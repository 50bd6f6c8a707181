//! Boss state machines.
//!
//! Each boss cycles through a small set of named states driven by
//! `Enemy::state_timer`, which resets on every transition. Bosses with a
//! second phase switch once, the first tick their health is at or below
//! half.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::archetype::Archetype;
use super::brain::direction;
use super::components::{AiContext, Enemy};
use crate::combat::{EffectCue, Health, Tint};
use crate::core::{Banner, Outbox, SoundId};
use crate::physics::{Body, Pose};
use crate::projectiles::{ProjectileKind, ProjectileSpawn};

/// Floor line the Pyromancer lands on once its gems are gone.
pub const PYROMANCER_GROUND_Y: f32 = 294.0;

fn pick<S: Copy>(rng: &mut impl Rng, options: &[S], fallback: S) -> S {
    options.choose(rng).copied().unwrap_or(fallback)
}

fn shake(out: &mut Outbox, intensity: f32, duration: f32) {
    out.effect(EffectCue::Shake {
        intensity,
        duration,
    });
}

fn toward_player_x(body: &Body, ctx: &AiContext) -> f32 {
    if ctx.target.pos.x > body.pos.x {
        1.0
    } else {
        -1.0
    }
}

fn random_side(rng: &mut impl Rng) -> f32 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

fn transition<S>(enemy: &mut Enemy, state: &mut S, next: S) {
    *state = next;
    enemy.state_timer = 0.0;
}

fn tick_damage_cooldown(enemy: &mut Enemy, dt: f32) {
    if enemy.damage_cooldown > 0.0 {
        enemy.damage_cooldown -= dt;
    }
}

// Dragon

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragonState {
    #[default]
    Hover,
    Fire,
    Dive,
    Recover,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragonBrain {
    pub state: DragonState,
    pub dive_target: Option<Vec2>,
}

impl DragonBrain {
    pub fn think(&mut self, enemy: &mut Enemy, body: &mut Body, ctx: &mut AiContext) {
        tick_damage_cooldown(enemy, ctx.dt);
        enemy.tick_attack(body, ctx.dt);
        enemy.state_timer += ctx.dt;
        ctx.target.face(body);
        let t = enemy.state_timer;

        match self.state {
            DragonState::Hover => {
                body.vel.y = (t * 2.0).sin() * 30.0;
                body.vel.x = toward_player_x(body, ctx) * 50.0;
                if t > 3.0 {
                    let next = if ctx.rng.gen_bool(0.5) {
                        DragonState::Fire
                    } else {
                        DragonState::Dive
                    };
                    transition(enemy, &mut self.state, next);
                }
            }
            DragonState::Fire => {
                body.vel = Vec2::ZERO;
                if !enemy.attacking && enemy.try_attack(body) {
                    let x = if body.facing_right {
                        body.pos.x + body.size.x
                    } else {
                        body.pos.x - 16.0
                    };
                    for i in -1..=1 {
                        ctx.out.projectile(ProjectileSpawn::enemy(
                            ProjectileKind::Fireball,
                            Vec2::new(x, body.pos.y + 50.0),
                            Vec2::new(body.facing_sign() * 250.0, i as f32 * 50.0),
                        ));
                    }
                }
                if t > 1.5 {
                    transition(enemy, &mut self.state, DragonState::Hover);
                }
            }
            DragonState::Dive => {
                let goal = *self.dive_target.get_or_insert(ctx.target.pos);
                let offset = goal - body.pos;
                let len = offset.length();
                if len > 20.0 {
                    body.vel = offset / len * enemy.speed * 2.0;
                } else {
                    self.recover(enemy);
                }
                if enemy.state_timer > 2.0 {
                    self.recover(enemy);
                }
            }
            DragonState::Recover => {
                body.vel = Vec2::new(0.0, -80.0);
                if body.pos.y < 150.0 || t > 1.5 {
                    transition(enemy, &mut self.state, DragonState::Hover);
                }
            }
        }
    }

    fn recover(&mut self, enemy: &mut Enemy) {
        self.dive_target = None;
        transition(enemy, &mut self.state, DragonState::Recover);
    }
}

// Gargoyle

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GargoyleState {
    #[default]
    Hover,
    Swipe,
    RockThrow,
    Swoop,
    Recover,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GargoyleBrain {
    pub state: GargoyleState,
    pub swoop_target: Option<Vec2>,
}

impl GargoyleBrain {
    pub fn think(
        &mut self,
        enemy: &mut Enemy,
        body: &mut Body,
        health: &Health,
        ctx: &mut AiContext,
    ) {
        tick_damage_cooldown(enemy, ctx.dt);
        enemy.tick_attack(body, ctx.dt);
        enemy.state_timer += ctx.dt;
        ctx.target.face(body);
        enemy.enter_phase_two(health);

        let enraged = enemy.phase == 2;
        let mult = if enraged { 1.5 } else { 1.0 };
        let t = enemy.state_timer;

        match self.state {
            GargoyleState::Hover => {
                body.vel.y = (t * 2.5).sin() * 40.0;
                body.vel.x = toward_player_x(body, ctx) * 60.0 * mult;
                if t > 2.5 {
                    let mut options = vec![
                        GargoyleState::Swoop,
                        GargoyleState::RockThrow,
                        GargoyleState::Swipe,
                    ];
                    if enraged {
                        options.extend([GargoyleState::Swoop, GargoyleState::Swipe]);
                    }
                    let next = pick(ctx.rng, &options, GargoyleState::Swoop);
                    transition(enemy, &mut self.state, next);
                }
            }
            GargoyleState::Swipe => {
                let offset = ctx.target.pos - body.pos;
                let len = offset.length();
                if len > 50.0 {
                    body.vel = offset / len * enemy.speed * 1.8 * mult;
                } else {
                    body.vel = Vec2::ZERO;
                    if !enemy.attacking {
                        enemy.try_attack(body);
                    }
                    if body.anim.is_finished() || t > 1.5 {
                        self.recover(enemy);
                    }
                }
                if enemy.state_timer > 2.5 {
                    self.recover(enemy);
                }
            }
            GargoyleState::RockThrow => {
                body.vel = Vec2::ZERO;
                if !enemy.attacking && enemy.try_attack(body) {
                    let count = if enraged { 3 } else { 2 };
                    let x = if body.facing_right {
                        body.pos.x + body.size.x
                    } else {
                        body.pos.x
                    };
                    for i in 0..count {
                        let spread = (i as f32 - 1.0) * 40.0;
                        ctx.out.projectile(ProjectileSpawn::enemy(
                            ProjectileKind::Rock,
                            Vec2::new(x, body.pos.y + 40.0),
                            Vec2::new(body.facing_sign() * 180.0 + spread, -100.0 + i as f32 * 30.0),
                        ));
                    }
                }
                if t > 1.2 {
                    transition(enemy, &mut self.state, GargoyleState::Hover);
                }
            }
            GargoyleState::Swoop => {
                let goal = match self.swoop_target {
                    Some(goal) => goal,
                    None => {
                        let goal = ctx.target.pos + Vec2::new(0.0, 20.0);
                        self.swoop_target = Some(goal);
                        enemy.begin_attack(body);
                        goal
                    }
                };
                let offset = goal - body.pos;
                let len = offset.length();
                if len > 30.0 {
                    body.vel = offset / len * enemy.speed * 2.2 * mult;
                } else {
                    enemy.attacking = false;
                    self.recover(enemy);
                }
                if enemy.state_timer > 2.0 {
                    enemy.attacking = false;
                    self.recover(enemy);
                }
            }
            GargoyleState::Recover => {
                body.vel = Vec2::new(0.0, -100.0 * mult);
                if body.pos.y < 120.0 || t > 1.5 {
                    transition(enemy, &mut self.state, GargoyleState::Hover);
                }
            }
        }
    }

    fn recover(&mut self, enemy: &mut Enemy) {
        self.swoop_target = None;
        transition(enemy, &mut self.state, GargoyleState::Recover);
    }
}

// Demon lord

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DemonState {
    #[default]
    Idle,
    Attack,
    Teleport,
    Firewave,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemonLordBrain {
    pub state: DemonState,
    pub teleport_cooldown: f32,
    /// Hits taken without a pause of more than 1.5s
    pub consecutive_hits: u32,
    pub reactive_teleport: bool,
    pub imp_requested: bool,
}

impl DemonLordBrain {
    /// Every hit calls an imp; a third quick hit also forces a teleport.
    pub fn register_hit(&mut self) {
        self.imp_requested = true;
        self.consecutive_hits += 1;
        if self.consecutive_hits > 2 {
            self.reactive_teleport = true;
            self.consecutive_hits = 0;
        }
    }

    fn teleport_cooldown_max(enemy: &Enemy) -> f32 {
        if enemy.phase == 2 {
            1.2
        } else {
            2.0
        }
    }

    pub fn think(
        &mut self,
        enemy: &mut Enemy,
        body: &mut Body,
        health: &Health,
        ctx: &mut AiContext,
    ) {
        enemy.tick_attack(body, ctx.dt);
        if self.teleport_cooldown > 0.0 {
            self.teleport_cooldown -= ctx.dt;
        }

        if self.reactive_teleport {
            self.reactive_teleport = false;
            let side = random_side(ctx.rng);
            let reach = 200.0 + ctx.rng.gen::<f32>() * 100.0;
            body.pos = Vec2::new(ctx.target.pos.x + side * reach, ctx.target.pos.y - 50.0);
            self.teleport_cooldown = Self::teleport_cooldown_max(enemy);
            transition(enemy, &mut self.state, DemonState::Firewave);
            return;
        }

        enemy.state_timer += ctx.dt;
        ctx.target.face(body);
        if enemy.state_timer > 1.5 {
            self.consecutive_hits = 0;
        }

        if enemy.enter_phase_two(health) {
            enemy.attack_cooldown_max = 3.0;
            enemy.speed = 160.0;
        }

        let enraged = enemy.phase == 2;
        let t = enemy.state_timer;

        match self.state {
            DemonState::Idle => {
                body.vel.x = body.facing_sign() * enemy.speed * 0.5;
                let patience = if enraged { 1.0 } else { 2.0 };
                if t > patience {
                    let mut options = vec![
                        DemonState::Attack,
                        DemonState::Attack,
                        DemonState::Teleport,
                        DemonState::Firewave,
                    ];
                    if enraged {
                        options.extend([DemonState::Teleport, DemonState::Firewave]);
                    }
                    let next = pick(ctx.rng, &options, DemonState::Attack);
                    transition(enemy, &mut self.state, next);
                }
            }
            DemonState::Attack => {
                body.vel.x = body.facing_sign() * enemy.speed * 1.5;
                if ctx.target.distance_from(body) < 120.0 {
                    enemy.try_attack(body);
                }
                if t > 2.0 {
                    transition(enemy, &mut self.state, DemonState::Teleport);
                }
            }
            DemonState::Teleport => {
                if self.teleport_cooldown <= 0.0 {
                    let side = random_side(ctx.rng);
                    let reach = 80.0 + ctx.rng.gen::<f32>() * 80.0;
                    body.pos = Vec2::new(ctx.target.pos.x + side * reach, ctx.target.pos.y - 30.0);
                    self.teleport_cooldown = Self::teleport_cooldown_max(enemy);
                }
                transition(enemy, &mut self.state, DemonState::Attack);
            }
            DemonState::Firewave => {
                body.vel.x = 0.0;
                if !enemy.attacking && enemy.try_attack(body) {
                    let count = if enraged { 7 } else { 5 };
                    let origin = Vec2::new(body.pos.x + body.size.x / 2.0, body.pos.y + 40.0);
                    for i in 0..count {
                        let angle = FRAC_PI_4 + i as f32 * PI / (count as f32 + 1.0);
                        ctx.out.projectile(ProjectileSpawn::enemy(
                            ProjectileKind::Fireball,
                            origin,
                            Vec2::new(angle.cos() * 180.0 * body.facing_sign(), -angle.sin() * 180.0),
                        ));
                    }
                }
                if t > 0.8 {
                    transition(enemy, &mut self.state, DemonState::Idle);
                }
            }
        }
    }

    pub fn flush_summons(&mut self, body: &Body, ctx: &mut AiContext) {
        if !std::mem::take(&mut self.imp_requested) {
            return;
        }
        let side = random_side(ctx.rng);
        let pos = Vec2::new(body.pos.x + body.size.x / 2.0 + side * 100.0, body.pos.y);
        ctx.out.summon(Archetype::Imp, pos);
        ctx.out.banner(Banner::new("SUMMON IMP!"));
    }
}

// Minotaur

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MinotaurState {
    #[default]
    Idle,
    Charge,
    Stomp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinotaurBrain {
    pub state: MinotaurState,
    pub charge_speed: f32,
    pub charge_facing_right: bool,
    pub stomp_done: bool,
    /// Melee hits toward the next stun
    pub melee_hits: u32,
    /// Time left before `melee_hits` resets
    pub stun_bar_timer: f32,
    pub stunned: bool,
    /// Seconds left of the phase-two roar, if it is playing
    pub roar_timer: Option<f32>,
}

impl Default for MinotaurBrain {
    fn default() -> Self {
        Self {
            state: MinotaurState::Idle,
            charge_speed: 400.0,
            charge_facing_right: true,
            stomp_done: false,
            melee_hits: 0,
            stun_bar_timer: 0.0,
            stunned: false,
            roar_timer: None,
        }
    }
}

impl MinotaurBrain {
    /// Melee hits needed to stun.
    pub const STUN_HITS: u32 = 3;
    pub const STUN_SECONDS: f32 = 5.0;

    /// Only melee hits make it flinch, and three in a row stun it.
    pub fn take_hit(
        &mut self,
        amount: i32,
        melee: bool,
        enemy: &mut Enemy,
        body: &mut Body,
        health: &mut Health,
        out: &mut Outbox,
    ) {
        if melee && !self.stunned {
            self.melee_hits += 1;
            self.stun_bar_timer = 3.0;
            if self.melee_hits >= Self::STUN_HITS {
                self.stunned = true;
                self.melee_hits = 0;
                enemy.stun(Self::STUN_SECONDS, body);
                transition(enemy, &mut self.state, MinotaurState::Idle);
                out.banner(Banner::new("STUNNED!"));
            }
        }

        health.take_damage(amount);
        if melee {
            enemy.flinch(0.2, body);
        }
        if health.is_dead() {
            enemy.die(body, out);
        }
    }

    fn idle_duration(enemy: &Enemy) -> f32 {
        if enemy.phase == 2 {
            0.75
        } else {
            1.5
        }
    }

    fn rest(&mut self, enemy: &mut Enemy) {
        enemy.attacking = false;
        enemy.attack_cooldown = enemy.attack_cooldown_max;
        transition(enemy, &mut self.state, MinotaurState::Idle);
    }

    pub fn think(
        &mut self,
        enemy: &mut Enemy,
        body: &mut Body,
        health: &Health,
        ctx: &mut AiContext,
    ) {
        enemy.tick_attack(body, ctx.dt);

        if self.stun_bar_timer > 0.0 && !self.stunned {
            self.stun_bar_timer -= ctx.dt;
            if self.stun_bar_timer <= 0.0 {
                self.melee_hits = 0;
            }
        }

        // The stun countdown itself runs in the driver; the flag clears on
        // the first tick the AI gets control back.
        if self.stunned {
            self.stunned = false;
            enemy.stun_timer = 0.0;
            self.melee_hits = 0;
            body.vel.x = 0.0;
            return;
        }

        enemy.state_timer += ctx.dt;

        if let Some(remaining) = self.roar_timer.as_mut() {
            *remaining -= ctx.dt;
            if *remaining <= 0.0 {
                self.roar_timer = None;
            }
            body.vel.x = 0.0;
            return;
        }

        if enemy.enter_phase_two(health) {
            self.roar_timer = Some(3.0);
            self.charge_speed = 500.0;
            enemy.attacking = false;
            transition(enemy, &mut self.state, MinotaurState::Idle);
            body.vel.x = 0.0;
            ctx.out.banner(Banner::new("PHASE 2!"));
            shake(ctx.out, 10.0, 0.5);
            ctx.out.effect(EffectCue::Flash {
                tint: Tint::RED,
                duration: 0.3,
            });
            return;
        }

        let t = enemy.state_timer;
        match self.state {
            MinotaurState::Idle => {
                ctx.target.face(body);
                body.vel.x = body.facing_sign() * enemy.speed * 0.4;
                if t > Self::idle_duration(enemy) {
                    let next = if enemy.phase == 2 {
                        MinotaurState::Charge
                    } else {
                        pick(
                            ctx.rng,
                            &[MinotaurState::Charge, MinotaurState::Stomp],
                            MinotaurState::Charge,
                        )
                    };
                    self.charge_facing_right = body.facing_right;
                    transition(enemy, &mut self.state, next);
                }
            }
            MinotaurState::Charge => {
                body.facing_right = self.charge_facing_right;
                enemy.attacking = true;
                body.anim.play(Pose::Attack);
                body.vel.x = if t < 0.5 {
                    0.0
                } else {
                    body.facing_sign() * self.charge_speed
                };
                if t > 2.5 {
                    self.rest(enemy);
                }
            }
            MinotaurState::Stomp => {
                body.vel.x = 0.0;
                if t < 0.3 {
                    body.vel.y = -500.0;
                } else if body.vel.y >= 0.0 && !self.stomp_done && t > 0.5 {
                    self.stomp_done = true;
                    enemy.begin_attack(body);
                    let count = if enemy.phase == 2 { 6 } else { 4 };
                    let half = count / 2;
                    let origin = Vec2::new(
                        body.pos.x + body.size.x / 2.0,
                        body.pos.y + body.size.y - 10.0,
                    );
                    for i in 0..count {
                        let dir = if i < half { -1.0 } else { 1.0 };
                        let speed = 150.0 + (i % half) as f32 * 80.0;
                        ctx.out.projectile(ProjectileSpawn::enemy(
                            ProjectileKind::Fireball,
                            origin,
                            Vec2::new(dir * speed, -50.0),
                        ));
                    }
                    shake(ctx.out, 8.0, 0.3);
                }
                if t > 2.0 {
                    self.stomp_done = false;
                    self.rest(enemy);
                }
            }
        }
    }
}

// Headless horseman

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorsemanState {
    #[default]
    Idle,
    Gallop,
    ThrowHead,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HorsemanBrain {
    pub state: HorsemanState,
    pub gallop_direction: f32,
    pub summon_timer: f32,
    pub summon_interval: f32,
    pub skeletons_requested: bool,
}

impl Default for HorsemanBrain {
    fn default() -> Self {
        Self {
            state: HorsemanState::Idle,
            gallop_direction: 1.0,
            summon_timer: 0.0,
            summon_interval: 5.0,
            skeletons_requested: false,
        }
    }
}

impl HorsemanBrain {
    pub fn think(
        &mut self,
        enemy: &mut Enemy,
        body: &mut Body,
        health: &Health,
        ctx: &mut AiContext,
    ) {
        enemy.tick_attack(body, ctx.dt);
        enemy.state_timer += ctx.dt;
        ctx.target.face(body);

        self.summon_timer += ctx.dt;
        if self.summon_timer >= self.summon_interval {
            self.summon_timer = 0.0;
            self.skeletons_requested = true;
        }

        if enemy.enter_phase_two(health) {
            enemy.attack_cooldown_max = 1.2;
            enemy.speed = 200.0;
            self.summon_interval = 3.0;
        }

        let enraged = enemy.phase == 2;
        let t = enemy.state_timer;

        match self.state {
            HorsemanState::Idle => {
                body.vel.x = body.facing_sign() * enemy.speed * 0.3;
                if t > 1.5 {
                    let mut options = vec![HorsemanState::Gallop, HorsemanState::ThrowHead];
                    if enraged {
                        options.extend([HorsemanState::Gallop, HorsemanState::ThrowHead]);
                    }
                    let next = pick(ctx.rng, &options, HorsemanState::Gallop);
                    transition(enemy, &mut self.state, next);
                }
            }
            HorsemanState::Gallop => {
                body.vel.x = self.gallop_direction * enemy.speed * 1.5;
                body.facing_right = self.gallop_direction > 0.0;
                if t > 2.0 {
                    self.gallop_direction = -self.gallop_direction;
                    enemy.attack_cooldown = enemy.attack_cooldown_max;
                    transition(enemy, &mut self.state, HorsemanState::Idle);
                }
            }
            HorsemanState::ThrowHead => {
                body.vel.x = 0.0;
                if !enemy.attacking && enemy.try_attack(body) {
                    let origin = Vec2::new(body.pos.x + body.size.x / 2.0, body.pos.y + 30.0);
                    let aim = direction(origin, ctx.target.center(), Vec2::X) * 220.0;
                    let lob = Vec2::new(aim.x, aim.y - 60.0);
                    ctx.out
                        .projectile(ProjectileSpawn::enemy(ProjectileKind::Skull, origin, lob));
                    if enraged {
                        for spread in [Vec2::new(60.0, -80.0), Vec2::new(-60.0, -80.0)] {
                            ctx.out.projectile(ProjectileSpawn::enemy(
                                ProjectileKind::Skull,
                                origin,
                                lob + spread,
                            ));
                        }
                    }
                }
                if t > 1.0 {
                    transition(enemy, &mut self.state, HorsemanState::Idle);
                }
            }
        }
    }

    pub fn flush_summons(&mut self, body: &Body, ctx: &mut AiContext) {
        if !std::mem::take(&mut self.skeletons_requested) {
            return;
        }
        let center_x = body.pos.x + body.size.x / 2.0;
        let feet_y = body.pos.y + body.size.y - 80.0;
        for side in [-1.0, 1.0] {
            ctx.out
                .summon(Archetype::Skeleton, Vec2::new(center_x + side * 120.0, feet_y));
        }
        ctx.out.sound(SoundId::EnemyDeath);
        ctx.out.banner(Banner::new("ANIMATE DEAD!"));
    }
}

// Pyromancer

#[derive(Debug, Clone, PartialEq)]
pub struct PyromancerBrain {
    /// Immune and hovering while its gems stand
    pub floating: bool,
    pub gems_destroyed: bool,
    pub fall_speed: f32,
    pub hover_phase: f32,
}

impl Default for PyromancerBrain {
    fn default() -> Self {
        Self {
            floating: true,
            gems_destroyed: false,
            fall_speed: 0.0,
            hover_phase: 0.0,
        }
    }
}

impl PyromancerBrain {
    pub fn think(
        &mut self,
        enemy: &mut Enemy,
        body: &mut Body,
        health: &Health,
        ctx: &mut AiContext,
    ) {
        let dt = ctx.dt;
        if enemy.attack_cooldown > 0.0 {
            enemy.attack_cooldown -= dt;
        }
        enemy.state_timer += dt;
        self.hover_phase += dt * 2.0;

        if self.gems_destroyed && self.floating {
            self.floating = false;
            ctx.out.banner(Banner::new("POWER SOURCE DESTROYED!"));
            shake(ctx.out, 8.0, 0.3);
        }

        body.vel = Vec2::ZERO;
        if self.floating {
            let goal_x = ctx.target.center().x - body.size.x / 2.0;
            body.pos.x += (goal_x - body.pos.x) * 2.0 * dt;
            body.pos.y = 60.0 + self.hover_phase.sin() * 8.0;
        } else if body.pos.y < PYROMANCER_GROUND_Y {
            self.fall_speed += 400.0 * dt;
            body.pos.y += self.fall_speed * dt;
            if body.pos.y >= PYROMANCER_GROUND_Y {
                body.pos.y = PYROMANCER_GROUND_Y;
                self.fall_speed = 0.0;
                shake(ctx.out, 10.0, 0.2);
                ctx.out.banner(Banner::new("VULNERABLE!"));
            }
        } else {
            self.flee(enemy, body, ctx);
        }

        if enemy.enter_phase_two(health) {
            enemy.attack_cooldown_max = 0.6;
        }

        if enemy.attack_cooldown <= 0.0 {
            enemy.attack_cooldown = enemy.attack_cooldown_max;
            self.cast(enemy, body, ctx);
        }
    }

    /// Run away from the player along the floor, bouncing off the walls.
    fn flee(&self, enemy: &Enemy, body: &mut Body, ctx: &mut AiContext) {
        let max_x = ctx.arena.x - 250.0;
        let mut vx = if ctx.target.center().x < body.center().x {
            enemy.speed
        } else {
            -enemy.speed
        };
        body.facing_right = vx > 0.0;

        if body.pos.x < 50.0 {
            body.pos.x = 50.0;
            vx = enemy.speed;
        } else if body.pos.x > max_x {
            body.pos.x = max_x;
            vx = -enemy.speed;
        }
        body.vel.x = vx;
        body.pos.x += vx * ctx.dt;
    }

    fn cast(&self, enemy: &Enemy, body: &Body, ctx: &mut AiContext) {
        let enraged = enemy.phase == 2;
        let roll = ctx.rng.gen::<f32>();

        if roll < 0.4 {
            // Fan of fireballs straight down
            let count = if enraged { 5 } else { 3 };
            let middle = (count as f32 - 1.0) / 2.0;
            for i in 0..count {
                let angle = FRAC_PI_2 + (i as f32 - middle) * 0.3;
                ctx.out.projectile(ProjectileSpawn::enemy(
                    ProjectileKind::Fireball,
                    body.center(),
                    Vec2::new(angle.cos(), angle.sin()) * 180.0,
                ));
            }
        } else if roll < 0.7 {
            // Fire pillars around the player
            let count: i32 = if enraged { 5 } else { 3 };
            for i in 0..count {
                let x = ctx.target.pos.x + (i - count / 2) as f32 * 100.0;
                ctx.out.projectile(ProjectileSpawn::enemy(
                    ProjectileKind::Fireball,
                    Vec2::new(x, -20.0),
                    Vec2::new(0.0, 220.0),
                ));
            }
            shake(ctx.out, 3.0, 0.15);
        } else {
            // Meteor shower
            let count = if enraged { 6 } else { 4 };
            for i in 0..count {
                let x = ctx.target.pos.x - 250.0 + ctx.rng.gen::<f32>() * 500.0;
                let drift = (ctx.rng.gen::<f32>() - 0.5) * 30.0;
                let fall = 180.0 + ctx.rng.gen::<f32>() * 80.0;
                ctx.out.projectile(ProjectileSpawn::enemy(
                    ProjectileKind::Fireball,
                    Vec2::new(x, -20.0 - i as f32 * 30.0),
                    Vec2::new(drift, fall),
                ));
            }
            shake(ctx.out, 4.0, 0.2);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::core::Bounds;
    use crate::enemies::{update_enemy, Brain, Target};
    use crate::physics::{AnimationSet, Animator, Rig};

    fn boss(archetype: Archetype, pos: Vec2) -> (Enemy, Brain, Body, Health) {
        let stats = archetype.stats();
        let mut rng = StdRng::seed_from_u64(3);
        (
            Enemy::new(archetype),
            Brain::new(archetype, &mut rng),
            Body::new(
                pos,
                stats.size,
                stats.hitbox,
                Animator::new(Rig::Enemy, AnimationSet::placeholder(Rig::Enemy)),
            ),
            Health::new(stats.health),
        )
    }

    fn context<'a>(
        rng: &'a mut StdRng,
        out: &'a mut Outbox,
        solids: &'a [Bounds],
        player: Vec2,
        dt: f32,
    ) -> AiContext<'a> {
        AiContext {
            dt,
            target: Target {
                pos: player,
                size: Vec2::splat(96.0),
            },
            arena: Vec2::new(2000.0, 600.0),
            solids,
            rng,
            out,
        }
    }

    #[test]
    fn minotaur_stuns_after_three_melee_hits() {
        let (mut enemy, mut brain, mut body, mut health) =
            boss(Archetype::Minotaur, Vec2::new(600.0, 300.0));
        let mut out = Outbox::default();

        for _ in 0..3 {
            assert!(brain.take_damage(2, true, &mut enemy, &mut body, &mut health, &mut out));
        }

        let Brain::Minotaur(minotaur) = &brain else {
            panic!("not a minotaur");
        };
        assert!(minotaur.stunned);
        assert_eq!(minotaur.melee_hits, 0);
        assert_eq!(enemy.stun_timer, MinotaurBrain::STUN_SECONDS);
        assert_eq!(health.current, 114);
        assert!(out.banners.iter().any(|b| b.title == "STUNNED!"));
    }

    #[test]
    fn ranged_hits_do_not_build_the_stun_bar() {
        let (mut enemy, mut brain, mut body, mut health) =
            boss(Archetype::Minotaur, Vec2::new(600.0, 300.0));
        let mut out = Outbox::default();

        for _ in 0..4 {
            brain.take_damage(1, false, &mut enemy, &mut body, &mut health, &mut out);
        }
        let Brain::Minotaur(minotaur) = &brain else {
            panic!("not a minotaur");
        };
        assert!(!minotaur.stunned);
        assert!(!enemy.hurt);
        assert_eq!(health.current, 116);
    }

    #[test]
    fn stun_bar_decays_without_follow_up() {
        let (mut enemy, mut brain, mut body, mut health) =
            boss(Archetype::Minotaur, Vec2::new(600.0, 300.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Outbox::default();
        let solids = [Bounds::new(0.0, 500.0, 2000.0, 100.0)];

        brain.take_damage(2, true, &mut enemy, &mut body, &mut health, &mut out);
        for _ in 0..40 {
            let mut ctx = context(&mut rng, &mut out, &solids, Vec2::new(200.0, 404.0), 0.1);
            update_enemy(&mut enemy, &mut brain, &mut body, &health, &mut ctx);
        }
        let Brain::Minotaur(minotaur) = &brain else {
            panic!("not a minotaur");
        };
        assert_eq!(minotaur.melee_hits, 0);
    }

    #[test]
    fn dragon_ignores_hits_during_damage_cooldown() {
        let (mut enemy, mut brain, mut body, mut health) =
            boss(Archetype::Dragon, Vec2::new(600.0, 200.0));
        let mut out = Outbox::default();

        assert!(brain.take_damage(2, true, &mut enemy, &mut body, &mut health, &mut out));
        assert!(!brain.take_damage(2, false, &mut enemy, &mut body, &mut health, &mut out));
        assert_eq!(health.current, 33);
    }

    #[test]
    fn pyromancer_is_immune_until_gems_fall() {
        let (mut enemy, mut brain, mut body, mut health) =
            boss(Archetype::Pyromancer, Vec2::new(800.0, 60.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Outbox::default();

        assert!(!brain.take_damage(3, true, &mut enemy, &mut body, &mut health, &mut out));
        assert_eq!(health.current, 25);

        assert!(brain.notify_gems_destroyed());
        assert!(!brain.notify_gems_destroyed());
        let mut ctx = context(&mut rng, &mut out, &[], Vec2::new(400.0, 404.0), 1.0 / 60.0);
        update_enemy(&mut enemy, &mut brain, &mut body, &health, &mut ctx);

        assert!(brain.take_damage(3, true, &mut enemy, &mut body, &mut health, &mut out));
        assert_eq!(health.current, 22);
        assert!(out
            .banners
            .iter()
            .any(|b| b.title == "POWER SOURCE DESTROYED!"));
    }

    #[test]
    fn demon_lord_summons_an_imp_per_hit() {
        let (mut enemy, mut brain, mut body, mut health) =
            boss(Archetype::DemonLord, Vec2::new(600.0, 340.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Outbox::default();
        let solids = [Bounds::new(0.0, 500.0, 2000.0, 100.0)];

        brain.take_damage(1, true, &mut enemy, &mut body, &mut health, &mut out);
        let mut ctx = context(&mut rng, &mut out, &solids, Vec2::new(200.0, 404.0), 0.05);
        update_enemy(&mut enemy, &mut brain, &mut body, &health, &mut ctx);

        assert_eq!(out.summons.len(), 1);
        assert_eq!(out.summons[0].archetype, Archetype::Imp);
        assert!(out.banners.iter().any(|b| b.title == "SUMMON IMP!"));
    }

    #[test]
    fn third_quick_hit_forces_a_teleport() {
        let mut demon = DemonLordBrain::default();
        demon.register_hit();
        demon.register_hit();
        assert!(!demon.reactive_teleport);
        demon.register_hit();
        assert!(demon.reactive_teleport);
        assert_eq!(demon.consecutive_hits, 0);
    }

    #[test]
    fn horseman_enters_phase_two_once() {
        let (mut enemy, mut brain, mut body, mut health) =
            boss(Archetype::HeadlessHorseman, Vec2::new(600.0, 340.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Outbox::default();
        let solids = [Bounds::new(0.0, 500.0, 2000.0, 100.0)];

        health.current = 25;
        for _ in 0..3 {
            let mut ctx = context(&mut rng, &mut out, &solids, Vec2::new(200.0, 404.0), 0.05);
            update_enemy(&mut enemy, &mut brain, &mut body, &health, &mut ctx);
        }
        assert_eq!(enemy.phase, 2);
        assert_eq!(enemy.speed, 200.0);
        assert_eq!(enemy.attack_cooldown_max, 1.2);
        let Brain::HeadlessHorseman(horseman) = &brain else {
            panic!("not a horseman");
        };
        assert_eq!(horseman.summon_interval, 3.0);
    }

    #[test]
    fn dead_enemies_ignore_further_hits() {
        for archetype in [Archetype::Goblin, Archetype::Minotaur, Archetype::DemonLord] {
            let (mut enemy, mut brain, mut body, mut health) =
                boss(archetype, Vec2::new(600.0, 300.0));
            let mut out = Outbox::default();

            health.current = 1;
            assert!(brain.take_damage(1, true, &mut enemy, &mut body, &mut health, &mut out));
            assert!(enemy.dead, "{archetype:?} survived a lethal hit");

            let brain_before = brain.clone();
            let health_before = health;
            let hurt_timer = enemy.hurt_timer;
            let landed = brain.take_damage(5, true, &mut enemy, &mut body, &mut health, &mut out);

            assert!(!landed, "{archetype:?} took a hit after death");
            assert_eq!(health, health_before);
            assert_eq!(enemy.hurt_timer, hurt_timer);
            assert_eq!(brain, brain_before);
        }
    }
}
