//! Enemy-related components.

use bevy::prelude::*;
use rand::rngs::StdRng;

use super::archetype::{Archetype, Locomotion};
use crate::combat::{EffectCue, Health};
use crate::core::{distance, Bounds, Outbox, SoundId};
use crate::physics::{Body, Pose};

/// Seconds a patrolling walker keeps one direction.
pub const PATROL_DURATION: f32 = 2.0;

/// Shared lifecycle state of every enemy and boss.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub archetype: Archetype,
    /// Contact damage dealt to the player
    pub damage: i32,
    pub speed: f32,
    /// Awarded once, when the enemy is removed
    pub score_value: u32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub attack_cooldown_max: f32,
    pub attacking: bool,
    pub hurt: bool,
    pub hurt_timer: f32,
    /// AI is suspended while this is positive
    pub stun_timer: f32,
    /// Further damage is ignored while this is positive (some bosses)
    pub damage_cooldown: f32,
    /// Boss difficulty tier, 1 or 2
    pub phase: u8,
    pub state_timer: f32,
    pub patrol_direction: f32,
    pub patrol_timer: f32,
    pub locomotion: Locomotion,
    pub dead: bool,
    pub death_timer: f32,
    /// Ready for the reap pass
    pub marked: bool,
    /// Cleared when the enemy leaves the level without being defeated
    pub rewarded: bool,
}

impl Enemy {
    pub fn new(archetype: Archetype) -> Self {
        let stats = archetype.stats();
        Self {
            archetype,
            damage: stats.damage,
            speed: stats.speed,
            score_value: stats.score,
            detection_range: stats.detection_range,
            attack_range: stats.attack_range,
            attack_cooldown: 0.0,
            attack_cooldown_max: stats.attack_cooldown,
            attacking: false,
            hurt: false,
            hurt_timer: 0.0,
            stun_timer: 0.0,
            damage_cooldown: 0.0,
            phase: 1,
            state_timer: 0.0,
            patrol_direction: 1.0,
            patrol_timer: 0.0,
            locomotion: stats.locomotion,
            dead: false,
            death_timer: 0.0,
            marked: false,
            rewarded: true,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.archetype.is_boss()
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.locomotion, Locomotion::Flying(_))
    }

    /// Tick the shared attack cooldown and clear a finished attack pose.
    pub fn tick_attack(&mut self, body: &Body, dt: f32) {
        if self.attack_cooldown > 0.0 {
            self.attack_cooldown -= dt;
        }
        if self.attacking && body.anim.is_finished() {
            self.attacking = false;
        }
    }

    /// Start an attack if the cooldown allows. Returns `true` on success.
    pub fn try_attack(&mut self, body: &mut Body) -> bool {
        if self.attack_cooldown > 0.0 {
            return false;
        }
        self.begin_attack(body);
        self.attack_cooldown = self.attack_cooldown_max;
        true
    }

    /// Enter the attack pose without touching the cooldown.
    pub fn begin_attack(&mut self, body: &mut Body) {
        self.attacking = true;
        body.anim.play(Pose::Attack);
        body.anim.restart();
    }

    /// Walk back and forth, flipping direction every [`PATROL_DURATION`].
    pub fn patrol(&mut self, body: &mut Body, dt: f32) {
        self.patrol_timer += dt;
        if self.patrol_timer > PATROL_DURATION {
            self.patrol_timer = 0.0;
            self.patrol_direction = -self.patrol_direction;
        }
        self.drift(body);
    }

    /// Half-speed movement in the patrol direction.
    pub fn drift(&self, body: &mut Body) {
        body.vel.x = self.speed * 0.5 * self.patrol_direction;
        body.facing_right = self.patrol_direction > 0.0;
    }

    /// Move the health-driven phase from 1 to 2. Returns `true` only on the
    /// tick the transition happens.
    pub fn enter_phase_two(&mut self, health: &Health) -> bool {
        if self.phase == 1 && health.at_or_below_half() {
            self.phase = 2;
            return true;
        }
        false
    }

    /// Apply a wound: health loss, the hurt flinch, and death at zero.
    pub fn wound(
        &mut self,
        amount: i32,
        hurt_for: f32,
        body: &mut Body,
        health: &mut Health,
        out: &mut Outbox,
    ) {
        health.take_damage(amount);
        self.flinch(hurt_for, body);
        if health.is_dead() {
            self.die(body, out);
        }
    }

    /// Short hurt window that suspends the AI.
    pub fn flinch(&mut self, seconds: f32, body: &mut Body) {
        self.hurt = true;
        self.hurt_timer = seconds;
        body.anim.play(Pose::Hurt);
    }

    pub fn die(&mut self, body: &mut Body, out: &mut Outbox) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.death_timer = 0.0;
        self.attacking = false;
        body.vel = Vec2::ZERO;
        body.anim.play(Pose::Death);

        if self.is_boss() {
            out.sound(SoundId::BossDeath);
            out.effect(EffectCue::BossDeath);
        }
    }

    /// Freeze the AI for `seconds` (bosses hit by the rainbow blast).
    pub fn stun(&mut self, seconds: f32, body: &mut Body) {
        self.stun_timer = seconds;
        body.vel = Vec2::ZERO;
        self.attacking = false;
    }

    /// Drop out of the level without counting as a kill.
    pub fn discard(&mut self) {
        self.dead = true;
        self.marked = true;
        self.rewarded = false;
    }
}

/// What an enemy knows about the player this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Target {
    pub fn of(body: &Body) -> Self {
        Self {
            pos: body.pos,
            size: body.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Centre-to-centre distance from `body`.
    pub fn distance_from(&self, body: &Body) -> f32 {
        distance(body.center(), self.center())
    }

    /// Turn `body` toward the target.
    pub fn face(&self, body: &mut Body) {
        body.facing_right = self.center().x > body.center().x;
    }
}

/// Everything an enemy update reads or writes besides its own components.
pub struct AiContext<'a> {
    pub dt: f32,
    pub target: Target,
    pub arena: Vec2,
    pub solids: &'a [Bounds],
    pub rng: &'a mut StdRng,
    pub out: &'a mut Outbox,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{AnimationSet, Animator, Rig};

    fn goblin() -> (Enemy, Body, Health) {
        let archetype = Archetype::Goblin;
        let stats = archetype.stats();
        let body = Body::new(
            Vec2::new(300.0, 300.0),
            stats.size,
            stats.hitbox,
            Animator::new(Rig::Enemy, AnimationSet::placeholder(Rig::Enemy)),
        );
        (Enemy::new(archetype), body, Health::new(stats.health))
    }

    #[test]
    fn lethal_wound_kills_immediately() {
        let (mut enemy, mut body, mut health) = goblin();
        let mut out = Outbox::default();
        body.vel = Vec2::new(70.0, 30.0);

        enemy.wound(2, 0.2, &mut body, &mut health, &mut out);
        assert_eq!(health.current, 0);
        assert!(enemy.dead);
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(body.anim.pose(), Some(Pose::Death));
    }

    #[test]
    fn phase_two_triggers_once() {
        let (mut enemy, _, mut health) = goblin();
        health.maximum = 10;
        health.current = 6;
        assert!(!enemy.enter_phase_two(&health));
        health.current = 5;
        assert!(enemy.enter_phase_two(&health));
        health.current = 1;
        assert!(!enemy.enter_phase_two(&health));
        assert_eq!(enemy.phase, 2);
    }

    #[test]
    fn patrol_flips_after_duration() {
        let (mut enemy, mut body, _) = goblin();
        enemy.patrol(&mut body, 1.0);
        assert_eq!(body.vel.x, 35.0);
        enemy.patrol(&mut body, 1.5);
        assert_eq!(body.vel.x, -35.0);
        assert!(!body.facing_right);
    }
}
