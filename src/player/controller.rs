//! Per-tick player update: input, jumping, attacks, platform riding and pose.

use bevy::prelude::*;

use super::components::{Player, PlayerConfig};
use crate::combat::Health;
use crate::core::{InputSnapshot, Outbox, SoundId};
use crate::physics::{move_grounded, Body, Pose};
use crate::projectiles::ProjectileSpawn;
use crate::world::Level;

/// Everything the controller reads from the rest of the frame.
pub struct PlayerTick<'a> {
    pub dt: f32,
    pub input: &'a InputSnapshot,
    pub level: &'a Level,
    pub config: &'a PlayerConfig,
}

/// Advance the player by one simulation step.
pub fn update_player(
    player: &mut Player,
    body: &mut Body,
    health: &mut Health,
    tick: &PlayerTick,
    out: &mut Outbox,
) {
    let dt = tick.dt;
    let config = tick.config;

    if player.dead {
        player.death_timer += dt;
        body.anim.advance(dt);
        return;
    }

    if player.attack_cooldown > 0.0 {
        player.attack_cooldown -= dt;
    }
    if player.shoot_cooldown > 0.0 {
        player.shoot_cooldown -= dt;
    }
    if player.attack_duration > 0.0 {
        player.attack_duration -= dt;
    }

    if player.invincible {
        player.invincible_timer -= dt;
        player.flicker_timer += dt;
        body.visible = (player.flicker_timer * 20.0).sin() > 0.0;
        if player.invincible_timer <= 0.0 {
            player.invincible = false;
            body.visible = true;
        }
    }

    handle_input(player, body, tick, out);

    body.vel.y = (body.vel.y + config.gravity * dt).min(config.max_fall_speed);

    // Releasing jump early cuts the ascent short
    if player.jumping && !tick.input.jump_held {
        body.vel.y = body.vel.y.max(config.jump_cut_speed);
        player.jumping = false;
    }

    let report = move_grounded(body, dt, tick.level.solids(), tick.level.arena());
    if report.fell_out {
        let lethal = health.current;
        player.take_damage(lethal, body, health, config, out);
    }

    ride_platform(player, body, tick.level);

    body.anim.advance(dt);
    choose_pose(player, body);
}

fn handle_input(player: &mut Player, body: &mut Body, tick: &PlayerTick, out: &mut Outbox) {
    let input = tick.input;
    let config = tick.config;

    // Rooted during a swing, but shooting still works
    if player.is_swinging() {
        body.vel.x = 0.0;
        if input.shoot_held && player.shoot_cooldown <= 0.0 {
            fire(player, body, config, out);
        }
        return;
    }

    if player.attacking {
        player.attacking = false;
    }
    if player.shooting && body.anim.is_finished() {
        player.shooting = false;
    }

    let speed = config.move_speed * player.speed_multiplier;
    body.vel.x = 0.0;
    if input.left {
        body.vel.x = -speed;
        body.facing_right = false;
    }
    if input.right {
        body.vel.x = speed;
        body.facing_right = true;
    }

    if input.jump_pressed && body.grounded && player.can_jump {
        body.vel.y = config.jump_force;
        body.grounded = false;
        player.jumping = true;
        player.can_jump = false;
        player.jump_hold = 0.0;
        out.sound(SoundId::Jump);
    }

    if input.jump_held && player.jumping && player.jump_hold < config.max_jump_hold {
        player.jump_hold += tick.dt;
        body.vel.y = config.jump_force;
    }

    if body.grounded {
        player.can_jump = true;
        player.jumping = false;
    }

    if input.melee_pressed && player.attack_cooldown <= 0.0 {
        player.attacking = true;
        player.attack_cooldown = config.melee_cooldown;
        player.attack_duration = config.melee_duration;
        body.anim.play(Pose::Attack);
        out.sound(SoundId::Melee);
    }

    if input.shoot_held && player.shoot_cooldown <= 0.0 {
        fire(player, body, config, out);
    }
}

/// Queue a bolt from the horn.
fn fire(player: &mut Player, body: &mut Body, config: &PlayerConfig, out: &mut Outbox) {
    player.shooting = true;
    player.shoot_cooldown = if player.rapid_fire {
        config.rapid_fire_cooldown
    } else {
        config.shoot_cooldown
    };
    body.anim.play(Pose::Shoot);
    out.sound(SoundId::Shoot);

    let x = if body.facing_right {
        body.pos.x + body.size.x - 10.0
    } else {
        body.pos.x - 22.0
    };
    let y = body.pos.y + body.hitbox.offset.y + 4.0;
    let vx = body.facing_sign() * config.projectile_speed;
    out.projectile(ProjectileSpawn::player(
        Vec2::new(x, y),
        Vec2::new(vx, 0.0),
        player.projectile_damage,
    ));
}

/// Carry a grounded player along with the moving platform under them.
fn ride_platform(player: &mut Player, body: &mut Body, level: &Level) {
    if !body.grounded {
        player.riding = None;
        return;
    }

    let Some(index) = level.platform_under(body.hitbox(), player.riding) else {
        player.riding = None;
        return;
    };
    let platform = &level.moving[index];
    player.riding = Some(index);

    body.pos += platform.delta;
    body.pos.y = platform.bounds.y - body.hitbox.size.y - body.hitbox.offset.y;

    let hitbox = body.hitbox();
    let span = platform.bounds;
    if hitbox.x < span.x {
        body.pos.x = span.x - body.hitbox.offset.x;
    } else if hitbox.right() > span.right() {
        body.pos.x = span.right() - hitbox.width - body.hitbox.offset.x;
    }
}

/// Pose priority: attack, shoot, hurt, airborne, run, idle.
fn choose_pose(player: &mut Player, body: &mut Body) {
    if player.is_swinging() {
        return;
    }
    if player.shooting && !body.anim.is_finished() {
        return;
    }
    if player.hurt_pose {
        if body.anim.pose() == Some(Pose::Hurt) && !body.anim.is_finished() {
            return;
        }
        player.hurt_pose = false;
    }

    if !body.grounded {
        let pose = if body.vel.y < 0.0 { Pose::Jump } else { Pose::Fall };
        body.anim.play(pose);
        body.anim.hold_frame(0);
    } else if body.vel.x != 0.0 {
        body.anim.play(Pose::Run);
    } else {
        body.anim.play(Pose::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{AnimationSet, Animator, Rig};
    use crate::player::{PLAYER_HITBOX, PLAYER_SIZE};
    use crate::projectiles::Owner;
    use crate::world::{LevelDescriptor, MovingPlatformDef, PlatformDef};

    const DT: f32 = 1.0 / 60.0;

    fn floor_level() -> Level {
        let mut descriptor = LevelDescriptor::blank("flat", 2000.0, 600.0);
        descriptor.platforms.push(PlatformDef {
            x: 0.0,
            y: 500.0,
            width: 2000.0,
            height: 100.0,
            ground: true,
        });
        Level::from_descriptor("flat", &descriptor)
    }

    fn standing_player() -> (Player, Body, Health, PlayerConfig) {
        let config = PlayerConfig::default();
        // Hitbox bottom rests on y = 500
        let body = Body::new(
            Vec2::new(200.0, 440.0),
            PLAYER_SIZE,
            PLAYER_HITBOX,
            Animator::new(Rig::Player, AnimationSet::placeholder(Rig::Player)),
        );
        (Player::new(&config), body, Health::new(config.max_health), config)
    }

    fn step(
        player: &mut Player,
        body: &mut Body,
        health: &mut Health,
        config: &PlayerConfig,
        level: &Level,
        input: &InputSnapshot,
        out: &mut Outbox,
    ) {
        let tick = PlayerTick {
            dt: DT,
            input,
            level,
            config,
        };
        update_player(player, body, health, &tick, out);
    }

    #[test]
    fn settles_on_floor_and_runs() {
        let level = floor_level();
        let (mut player, mut body, mut health, config) = standing_player();
        let mut out = Outbox::default();
        let mut input = InputSnapshot::default();

        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert!(body.grounded);
        assert_eq!(body.hitbox().bottom(), 500.0);

        input.right = true;
        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert!(body.pos.x > 200.0);
        assert!(body.facing_right);
        assert_eq!(body.anim.pose(), Some(Pose::Run));
    }

    #[test]
    fn jump_plays_sound_and_released_jump_is_cut() {
        let level = floor_level();
        let (mut player, mut body, mut health, config) = standing_player();
        let mut out = Outbox::default();
        let mut input = InputSnapshot::default();

        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        input.jump_pressed = true;
        input.jump_held = true;
        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert!(out.sounds.contains(&SoundId::Jump));
        assert!(!body.grounded);
        assert!(body.vel.y < -400.0);

        input.jump_pressed = false;
        input.jump_held = false;
        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert!(body.vel.y >= config.jump_cut_speed);
        assert!(!player.jumping);
        assert_eq!(body.anim.pose(), Some(Pose::Jump));
    }

    #[test]
    fn shooting_queues_bolt_at_the_horn() {
        let level = floor_level();
        let (mut player, mut body, mut health, config) = standing_player();
        let mut out = Outbox::default();
        let input = InputSnapshot {
            shoot_held: true,
            ..Default::default()
        };

        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert_eq!(out.projectiles.len(), 1);
        let bolt = out.projectiles[0];
        assert_eq!(bolt.owner, Owner::Player);
        assert_eq!(bolt.pos.x, body.pos.x + 96.0 - 10.0);
        assert_eq!(bolt.vel.x, 500.0);
        assert_eq!(bolt.damage, 1);

        // Cooldown blocks the next frame
        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert_eq!(out.projectiles.len(), 1);
    }

    #[test]
    fn rapid_fire_shortens_the_cooldown() {
        let level = floor_level();
        let (mut player, mut body, mut health, config) = standing_player();
        player.rapid_fire = true;
        let mut out = Outbox::default();
        let input = InputSnapshot {
            shoot_held: true,
            ..Default::default()
        };
        for _ in 0..30 {
            step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        }
        // 0.5s of held fire: 0.1s cooldown gives about 5 shots, 0.25s gives 2
        assert!(out.projectiles.len() >= 4);
    }

    #[test]
    fn melee_roots_the_player() {
        let level = floor_level();
        let (mut player, mut body, mut health, config) = standing_player();
        let mut out = Outbox::default();
        let input = InputSnapshot {
            right: true,
            melee_pressed: true,
            ..Default::default()
        };
        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert!(player.attacking);
        assert!(player.is_melee_active(&config));
        let x = body.pos.x;

        let hold = InputSnapshot {
            right: true,
            ..Default::default()
        };
        step(&mut player, &mut body, &mut health, &config, &level, &hold, &mut out);
        assert_eq!(body.pos.x, x);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn falling_out_of_the_level_is_lethal() {
        let level = Level::from_descriptor("void", &LevelDescriptor::blank("void", 800.0, 600.0));
        let (mut player, mut body, mut health, config) = standing_player();
        body.pos.y = 700.0;
        body.vel.y = 600.0;
        let mut out = Outbox::default();
        step(&mut player, &mut body, &mut health, &config, &level, &InputSnapshot::default(), &mut out);
        assert!(player.dead);
        assert_eq!(health.current, 0);
    }

    #[test]
    fn death_timer_runs_while_dead() {
        let level = floor_level();
        let (mut player, mut body, mut health, config) = standing_player();
        player.dead = true;
        let mut out = Outbox::default();
        for _ in 0..100 {
            step(&mut player, &mut body, &mut health, &config, &level, &InputSnapshot::default(), &mut out);
        }
        assert!(player.death_complete(&config));
    }

    #[test]
    fn rider_follows_moving_platform() {
        let mut descriptor = LevelDescriptor::blank("lift", 2000.0, 600.0);
        descriptor.moving_platforms.push(MovingPlatformDef {
            x: 150.0,
            y: 400.0,
            width: 200.0,
            height: 20.0,
            move_x: 100.0,
            move_y: 0.0,
            speed: 1.0,
            start_offset: 0.0,
        });
        let mut level = Level::from_descriptor("lift", &descriptor);
        let (mut player, mut body, mut health, config) = standing_player();
        body.pos.y = 400.0 - 60.0;
        let mut out = Outbox::default();
        let input = InputSnapshot::default();

        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert_eq!(player.riding, Some(0));

        let before = body.pos.x;
        level.update(0.1);
        step(&mut player, &mut body, &mut health, &config, &level, &input, &mut out);
        assert!(body.pos.x > before);
        assert_eq!(body.hitbox().bottom(), 400.0);
    }
}
