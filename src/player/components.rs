//! Player-related components.

use bevy::prelude::*;

use crate::combat::Health;
use crate::core::{Bounds, Outbox, SoundId};
use crate::physics::{Body, Hitbox, Pose};

/// Visual size of the player sprite.
pub const PLAYER_SIZE: Vec2 = Vec2::new(96.0, 96.0);

/// Player collision box inside the sprite.
pub const PLAYER_HITBOX: Hitbox = Hitbox::new(32.0, 12.0, 32.0, 48.0);

/// Tunable movement and combat constants for the player.
#[derive(Resource, Debug, Clone)]
pub struct PlayerConfig {
    /// Horizontal run speed in px/s
    pub move_speed: f32,
    /// Upward velocity applied while a jump is held
    pub jump_force: f32,
    /// Upward speed a released jump is cut to
    pub jump_cut_speed: f32,
    /// How long holding jump keeps pushing upward
    pub max_jump_hold: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Starting (and reset) maximum health, in half hearts
    pub max_health: i32,
    pub melee_damage: i32,
    /// Reach of the melee box in front of the hitbox
    pub melee_range: f32,
    pub melee_cooldown: f32,
    pub melee_duration: f32,
    /// Remaining melee time above which the swing can hit
    pub melee_active_after: f32,
    pub shoot_cooldown: f32,
    pub rapid_fire_cooldown: f32,
    pub projectile_speed: f32,
    pub invincibility: f32,
    /// Upward pop on taking a hit
    pub knockback: f32,
    /// Seconds of death animation before a life is lost
    pub death_delay: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 250.0,
            jump_force: -450.0,
            jump_cut_speed: -200.0,
            max_jump_hold: 0.2,
            gravity: 1200.0,
            max_fall_speed: 600.0,
            max_health: 6,
            melee_damage: 2,
            melee_range: 40.0,
            melee_cooldown: 0.4,
            melee_duration: 0.25,
            melee_active_after: 0.1,
            shoot_cooldown: 0.25,
            rapid_fire_cooldown: 0.1,
            projectile_speed: 500.0,
            invincibility: 1.5,
            knockback: -200.0,
            death_delay: 1.5,
        }
    }
}

/// Player character variant chosen on the select screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Character {
    #[default]
    Rainbow,
    Pink,
    White,
}

impl Character {
    pub const ALL: [Character; 3] = [Character::Rainbow, Character::Pink, Character::White];

    /// Animation table key.
    pub fn animation_key(self) -> &'static str {
        match self {
            Character::Rainbow => "player_rainbow",
            Character::Pink => "player_pink",
            Character::White => "player_white",
        }
    }

    /// Next variant, wrapping in either direction.
    pub fn cycle(self, step: i32) -> Self {
        let index = Self::ALL.iter().position(|&c| c == self).unwrap_or(0) as i32;
        let len = Self::ALL.len() as i32;
        Self::ALL[(index + step).rem_euclid(len) as usize]
    }
}

/// Controller state of the player character.
#[derive(Component, Debug, Clone)]
pub struct Player {
    pub jumping: bool,
    pub can_jump: bool,
    pub jump_hold: f32,
    pub attacking: bool,
    pub attack_cooldown: f32,
    /// Remaining time of the current melee swing
    pub attack_duration: f32,
    pub shooting: bool,
    pub shoot_cooldown: f32,
    pub melee_damage: i32,
    pub projectile_damage: i32,
    /// Multiplier on run speed (speed boost)
    pub speed_multiplier: f32,
    /// Absorbs one hit, then is consumed
    pub shield: bool,
    pub rapid_fire: bool,
    pub magnet: bool,
    pub invincible: bool,
    pub invincible_timer: f32,
    pub flicker_timer: f32,
    /// Hurt pose requested by the last hit, held until the clip ends
    pub hurt_pose: bool,
    pub dead: bool,
    pub death_timer: f32,
    /// Index of the moving platform ridden last tick
    pub riding: Option<usize>,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            jumping: false,
            can_jump: true,
            jump_hold: 0.0,
            attacking: false,
            attack_cooldown: 0.0,
            attack_duration: 0.0,
            shooting: false,
            shoot_cooldown: 0.0,
            melee_damage: config.melee_damage,
            projectile_damage: 1,
            speed_multiplier: 1.0,
            shield: false,
            rapid_fire: false,
            magnet: false,
            invincible: false,
            invincible_timer: 0.0,
            flicker_timer: 0.0,
            hurt_pose: false,
            dead: false,
            death_timer: 0.0,
            riding: None,
        }
    }

    /// Melee swing is in its hitting window.
    pub fn is_melee_active(&self, config: &PlayerConfig) -> bool {
        self.attacking && self.attack_duration > config.melee_active_after
    }

    /// Still inside a melee swing (movement locked, damage ignored).
    pub fn is_swinging(&self) -> bool {
        self.attacking && self.attack_duration > 0.0
    }

    /// Cannot currently be hurt by contact, projectiles or hazards.
    pub fn is_untouchable(&self) -> bool {
        self.dead || self.invincible
    }

    /// Box in front of the hitbox that a melee swing covers.
    pub fn melee_box(&self, body: &Body, config: &PlayerConfig) -> Bounds {
        let hitbox = body.hitbox();
        let x = if body.facing_right {
            hitbox.right()
        } else {
            hitbox.x - config.melee_range
        };
        Bounds::new(x, hitbox.y, config.melee_range, hitbox.height)
    }

    /// Start an invincibility window with its flicker.
    pub fn grant_invincibility(&mut self, seconds: f32) {
        self.invincible = true;
        self.invincible_timer = seconds;
        self.flicker_timer = 0.0;
    }

    /// Apply a hit. Ignored while invincible, dead or mid-swing.
    ///
    /// Returns `true` if health changed.
    pub fn take_damage(
        &mut self,
        amount: i32,
        body: &mut Body,
        health: &mut Health,
        config: &PlayerConfig,
        out: &mut Outbox,
    ) -> bool {
        if self.invincible || self.dead || self.is_swinging() {
            return false;
        }

        health.take_damage(amount);
        if health.is_dead() {
            self.die(body, out);
        } else {
            self.grant_invincibility(config.invincibility);
            self.hurt_pose = true;
            body.anim.play(Pose::Hurt);
            body.vel.y = config.knockback;
        }
        true
    }

    fn die(&mut self, body: &mut Body, out: &mut Outbox) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.death_timer = 0.0;
        body.anim.play(Pose::Death);
        body.vel = Vec2::ZERO;
        out.sound(SoundId::Death);
    }

    /// Death animation has played long enough to lose a life.
    pub fn death_complete(&self, config: &PlayerConfig) -> bool {
        self.dead && self.death_timer > config.death_delay
    }

    /// Put the player back at `start` with full health and no modifiers.
    pub fn reset(&mut self, start: Vec2, body: &mut Body, health: &mut Health, config: &PlayerConfig) {
        *self = Self::new(config);
        body.pos = start;
        body.vel = Vec2::ZERO;
        body.grounded = false;
        body.visible = true;
        body.anim.play(Pose::Idle);
        health.current = health.maximum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{AnimationSet, Animator, Rig};

    fn setup() -> (Player, Body, Health, PlayerConfig, Outbox) {
        let config = PlayerConfig::default();
        let body = Body::new(
            Vec2::new(100.0, 100.0),
            PLAYER_SIZE,
            PLAYER_HITBOX,
            Animator::new(Rig::Player, AnimationSet::placeholder(Rig::Player)),
        );
        (Player::new(&config), body, Health::new(config.max_health), config, Outbox::default())
    }

    #[test]
    fn invincibility_blocks_further_damage() {
        let (mut player, mut body, mut health, config, mut out) = setup();
        assert!(player.take_damage(1, &mut body, &mut health, &config, &mut out));
        assert_eq!(health.current, 5);
        assert!(player.invincible);
        assert_eq!(body.vel.y, -200.0);

        assert!(!player.take_damage(3, &mut body, &mut health, &config, &mut out));
        assert_eq!(health.current, 5);
    }

    #[test]
    fn swinging_player_ignores_hits() {
        let (mut player, mut body, mut health, config, mut out) = setup();
        player.attacking = true;
        player.attack_duration = 0.2;
        assert!(!player.take_damage(2, &mut body, &mut health, &config, &mut out));
        assert_eq!(health.current, 6);
    }

    #[test]
    fn lethal_hit_kills_once() {
        let (mut player, mut body, mut health, config, mut out) = setup();
        body.vel = Vec2::new(100.0, 50.0);
        player.take_damage(10, &mut body, &mut health, &config, &mut out);
        assert!(player.dead);
        assert_eq!(health.current, 0);
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(out.sounds, vec![SoundId::Death]);

        assert!(!player.take_damage(1, &mut body, &mut health, &config, &mut out));
        assert_eq!(out.sounds.len(), 1);
    }

    #[test]
    fn melee_box_sits_in_front() {
        let (player, mut body, _, config, _) = setup();
        let right = player.melee_box(&body, &config);
        assert_eq!(right, Bounds::new(164.0, 112.0, 40.0, 48.0));
        body.facing_right = false;
        let left = player.melee_box(&body, &config);
        assert_eq!(left.x, 92.0);
    }

    #[test]
    fn character_cycle_wraps() {
        assert_eq!(Character::Rainbow.cycle(-1), Character::White);
        assert_eq!(Character::White.cycle(1), Character::Rainbow);
    }
}
