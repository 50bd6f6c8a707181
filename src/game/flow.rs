//! Run flow: menus, level loading, deaths, level completion and the boss
//! entrance, plus the per-frame bookkeeping around the gameplay stages.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::state::state::StateTransitionEvent;

use super::camera::GameCamera;
use super::scores::HighScores;
use super::session::*;
use crate::combat::{EffectCue, Health, ScreenEffects, Tint};
use crate::core::{
    Banner, FrameClock, GameConfig, GameRng, GameState, InputSnapshot, LoadLevel, Outbox,
    SimError, SoundCue, SoundId, SpawnCounter, StartGame,
};
use crate::enemies::{spawn_enemy, spawn_level_enemies, Archetype, Brain, Enemy};
use crate::items::{clear_items, spawn_gems, spawn_power_ups, Gem, PowerUp, PowerUpManager};
use crate::physics::{AnimationLibrary, Body, Rig};
use crate::player::{spawn_player, Player, PlayerConfig};
use crate::projectiles::{clear_projectiles, Projectile};
use crate::world::{Level, LevelRegistry};

/// Entities torn down when a level is rebuilt.
#[derive(SystemParam)]
pub(crate) struct LevelEntities<'w, 's> {
    enemies: Query<'w, 's, Entity, With<Enemy>>,
    projectiles: Query<'w, 's, Entity, With<Projectile>>,
    power_ups: Query<'w, 's, Entity, With<PowerUp>>,
    gems: Query<'w, 's, Entity, With<Gem>>,
}

impl LevelEntities<'_, '_> {
    fn clear(&self, commands: &mut Commands) {
        for entity in self.enemies.iter() {
            commands.entity(entity).despawn();
        }
        clear_projectiles(commands, &self.projectiles);
        clear_items(commands, &self.power_ups, &self.gems);
    }
}

/// Apply everything actors queued: new projectiles and summons join the
/// world with fresh spawn numbers, cues go out as events.
pub(crate) fn flush_outbox(
    mut commands: Commands,
    mut out: ResMut<Outbox>,
    mut effects: ResMut<ScreenEffects>,
    mut counter: ResMut<SpawnCounter>,
    mut rng: ResMut<GameRng>,
    library: Res<AnimationLibrary>,
    mut sounds: EventWriter<SoundCue>,
    mut banners: EventWriter<Banner>,
) {
    if out.is_empty() {
        return;
    }
    let queued = std::mem::take(&mut *out);

    for spawn in queued.projectiles {
        commands.spawn((Projectile::new(spawn), counter.next()));
    }
    for summon in queued.summons {
        spawn_enemy(
            &mut commands,
            summon.archetype,
            summon.pos,
            &library,
            &mut counter,
            &mut rng.0,
        );
    }
    for cue in queued.effects {
        effects.apply(cue);
    }
    sounds.send_batch(queued.sounds.into_iter().map(SoundCue));
    banners.send_batch(queued.banners);
}

/// Title screen: confirm opens character select.
pub(crate) fn title_screen(
    input: Res<InputSnapshot>,
    mut next_state: ResMut<NextState<GameState>>,
    mut sounds: EventWriter<SoundCue>,
) {
    if input.confirm_pressed {
        next_state.set(GameState::CharSelect);
        sounds.send(SoundCue(SoundId::Select));
    }
}

/// Left/right pick the unicorn, up/down the starting level, confirm starts.
pub(crate) fn character_select(
    input: Res<InputSnapshot>,
    config: Res<GameConfig>,
    mut session: ResMut<Session>,
    mut sounds: EventWriter<SoundCue>,
    mut starts: EventWriter<StartGame>,
) {
    let levels = config.level_order.len().max(1) as i32;
    let mut changed = false;

    if input.left_pressed {
        session.character = session.character.cycle(-1);
        changed = true;
    }
    if input.right_pressed {
        session.character = session.character.cycle(1);
        changed = true;
    }
    if input.up_pressed {
        session.start_level = (session.start_level as i32 - 1).rem_euclid(levels) as usize;
        changed = true;
    }
    if input.down_pressed {
        session.start_level = (session.start_level as i32 + 1).rem_euclid(levels) as usize;
        changed = true;
    }
    if changed {
        sounds.send(SoundCue(SoundId::Select));
    }

    if input.confirm_pressed {
        starts.send(StartGame {
            level: session.start_level,
        });
    }
}

/// Begin a fresh run: reset progress, make sure the player exists with the
/// chosen look, then load the first level.
pub(crate) fn start_game(
    mut commands: Commands,
    mut starts: EventReader<StartGame>,
    config: Res<GameConfig>,
    player_config: Res<PlayerConfig>,
    library: Res<AnimationLibrary>,
    mut session: ResMut<Session>,
    mut stats: ResMut<GameStats>,
    mut manager: ResMut<PowerUpManager>,
    mut loads: EventWriter<LoadLevel>,
    mut next_state: ResMut<NextState<GameState>>,
    mut players: Query<(&mut Body, &mut Health), With<Player>>,
) {
    let Some(request) = starts.read().last().copied() else {
        return;
    };

    session.begin(request.level, config.starting_lives);
    stats.reset();
    manager.clear();

    let character = session.character;
    match players.get_single_mut() {
        Ok((mut body, mut health)) => {
            body.anim
                .replace_set(library.set_for(character.animation_key(), Rig::Player));
            *health = Health::new(player_config.max_health);
        }
        Err(_) => {
            spawn_player(
                &mut commands,
                Vec2::ZERO,
                character,
                &library,
                &player_config,
            );
        }
    }

    info!("Starting run at level {} as {:?}", request.level, character);
    loads.send(LoadLevel {
        index: request.level,
    });
    next_state.set(GameState::Playing);
}

/// Rebuild the world from a level in the play order.
#[allow(clippy::too_many_arguments)]
pub(crate) fn load_level(
    mut commands: Commands,
    mut loads: EventReader<LoadLevel>,
    config: Res<GameConfig>,
    player_config: Res<PlayerConfig>,
    registry: Res<LevelRegistry>,
    library: Res<AnimationLibrary>,
    mut session: ResMut<Session>,
    mut level: ResMut<Level>,
    mut camera: ResMut<GameCamera>,
    mut counter: ResMut<SpawnCounter>,
    mut rng: ResMut<GameRng>,
    mut out: ResMut<Outbox>,
    mut manager: ResMut<PowerUpManager>,
    mut players: Query<(&mut Player, &mut Body, &mut Health)>,
    entities: LevelEntities,
) -> Result<(), SimError> {
    let Some(request) = loads.read().last().copied() else {
        return Ok(());
    };

    let key = config
        .level_order
        .get(request.index)
        .ok_or(SimError::LevelMissing {
            index: request.index,
        })?;
    let descriptor = registry
        .get(key)
        .ok_or_else(|| SimError::UnknownLevel(key.clone()))?;

    *level = Level::from_descriptor(key, descriptor);
    entities.clear(&mut commands);
    out.clear();

    let (mut player, mut body, mut health) =
        players.get_single_mut().map_err(|_| SimError::NoPlayer)?;
    player.reset(level.player_start, &mut body, &mut health, &player_config);
    manager.clear();

    let enemies = spawn_level_enemies(&mut commands, &level, &library, &mut counter, &mut rng.0);
    let power_ups = spawn_power_ups(&mut commands, &level, request.index, &mut rng.0);
    let gems = spawn_gems(&mut commands, &level);

    camera.viewport = config.viewport();
    camera.reset();
    session.level_index = request.index;
    session.boss_intro = BossIntroState::default();
    session.level_complete_timer = 0.0;

    if let Some(line) = Session::villain_line(request.index) {
        out.banner(Banner::new(line));
    }

    info!(
        "Loaded level {} '{}' ({} enemies, {} power-ups, {} gems)",
        request.index + 1,
        level.name,
        enemies,
        power_ups,
        gems
    );
    Ok(())
}

pub(crate) fn tick_stats(clock: Res<FrameClock>, mut stats: ResMut<GameStats>) {
    stats.time_played += clock.sim_dt;
}

/// Once the death animation has played out: lose a life, then respawn or
/// end the run.
pub(crate) fn handle_player_death(
    mut commands: Commands,
    config: Res<PlayerConfig>,
    level: Res<Level>,
    mut session: ResMut<Session>,
    mut manager: ResMut<PowerUpManager>,
    mut scores: ResMut<HighScores>,
    mut out: ResMut<Outbox>,
    mut next_state: ResMut<NextState<GameState>>,
    mut players: Query<(&mut Player, &mut Body, &mut Health)>,
    projectiles: Query<Entity, With<Projectile>>,
) {
    let Ok((mut player, mut body, mut health)) = players.get_single_mut() else {
        return;
    };
    if !player.death_complete(&config) {
        return;
    }

    session.lives = session.lives.saturating_sub(1);
    if session.lives == 0 {
        info!("Game over with {} points", session.score);
        out.sound(SoundId::GameOver);
        scores.submit(session.score);
        next_state.set(GameState::GameOver);
        return;
    }

    info!("Player died, {} lives left", session.lives);
    player.reset(level.player_start, &mut body, &mut health, &config);
    clear_projectiles(&mut commands, &projectiles);
    out.projectiles.clear();
    manager.clear();
}

/// End zone and boss entrance checks.
#[allow(clippy::too_many_arguments)]
pub(crate) fn check_level_complete(
    mut commands: Commands,
    level: Res<Level>,
    library: Res<AnimationLibrary>,
    mut session: ResMut<Session>,
    mut counter: ResMut<SpawnCounter>,
    mut rng: ResMut<GameRng>,
    mut out: ResMut<Outbox>,
    mut next_state: ResMut<NextState<GameState>>,
    mut players: Query<(&Player, &Body, &mut Health), Without<Enemy>>,
    enemies: Query<&Enemy>,
) {
    let Some(end_zone) = level.end_zone else {
        return;
    };
    let Ok((player, body, mut health)) = players.get_single_mut() else {
        return;
    };
    if player.dead {
        return;
    }

    let boss_alive = enemies.iter().any(|e| e.is_boss() && !e.dead);
    if level.is_boss_level && boss_alive {
        return;
    }

    if let Some(intro) = &level.boss_intro {
        if !session.boss_intro.triggered {
            if body.pos.x >= level.width / 2.0 {
                let archetype = Archetype::resolve(&intro.boss_type);
                let boss = spawn_enemy(
                    &mut commands,
                    archetype,
                    Vec2::new(body.pos.x, -200.0),
                    &library,
                    &mut counter,
                    &mut rng.0,
                );
                session.boss_intro = BossIntroState {
                    triggered: true,
                    timer: 0.0,
                    boss: Some(boss),
                };
                out.effect(EffectCue::Flash {
                    tint: Tint::CRIMSON,
                    duration: 0.3,
                });
                out.effect(EffectCue::Shake {
                    intensity: 6.0,
                    duration: 0.5,
                });
                let title = intro
                    .name
                    .clone()
                    .unwrap_or_else(|| archetype.key().to_uppercase());
                let banner = match &intro.subtitle {
                    Some(subtitle) => Banner::new(title).with_subtitle(subtitle.clone()),
                    None => Banner::new(title),
                };
                out.banner(banner);
                info!("Boss entrance: {:?}", archetype);
                next_state.set(GameState::BossIntro);
            }
            return;
        }
    }

    if body.hitbox().overlaps(&end_zone) {
        session.score += LEVEL_CLEAR_BONUS;
        session.level_complete_timer = 0.0;
        health.maximum += 2;
        health.heal(2);
        out.sound(SoundId::LevelComplete);
        out.effect(EffectCue::LevelComplete);
        out.banner(Banner::new("+1 HEART").at(body.pos));
        info!("Level {} complete", session.level_index + 1);
        next_state.set(GameState::LevelComplete);
    }
}

/// The special: every regular enemy dies, bosses are stunned.
pub(crate) fn rainbow_blast(
    input: Res<InputSnapshot>,
    mut session: ResMut<Session>,
    mut out: ResMut<Outbox>,
    mut enemies: Query<(&mut Enemy, &mut Brain, &mut Body, &mut Health)>,
) {
    if !input.special_pressed || !session.use_special() {
        return;
    }

    for (mut enemy, mut brain, mut body, mut health) in enemies.iter_mut() {
        if enemy.dead {
            continue;
        }
        if enemy.is_boss() {
            enemy.stun(3.0, &mut body);
        } else {
            let lethal = health.current;
            brain.take_damage(lethal, false, &mut enemy, &mut body, &mut health, &mut out);
        }
    }

    out.effect(EffectCue::RainbowBlast);
    out.sound(SoundId::PowerUp);
    out.banner(Banner::new("RAINBOW BLAST!"));
}

/// Remove finished enemies. Defeated ones pay out exactly here.
pub(crate) fn reap_enemies(
    mut commands: Commands,
    mut session: ResMut<Session>,
    mut stats: ResMut<GameStats>,
    mut out: ResMut<Outbox>,
    enemies: Query<(Entity, &Enemy)>,
) {
    for (entity, enemy) in enemies.iter() {
        if !enemy.marked {
            continue;
        }
        commands.entity(entity).despawn();

        if !enemy.rewarded {
            debug!("{:?} left the level", enemy.archetype);
            continue;
        }

        session.score += enemy.score_value;
        stats.enemies_killed += 1;
        if session.count_kill() {
            out.banner(Banner::new("RAINBOW BLAST READY!"));
        }
        out.sound(SoundId::EnemyDeath);

        if enemy.is_boss() {
            out.effect(EffectCue::BossDeath);
            out.banner(Banner::new("BOSS DEFEATED"));
            info!("{:?} defeated", enemy.archetype);
        } else {
            out.effect(EffectCue::EnemyDeath);
        }
    }
}

/// Countdown on real time, then the next level or the win screen.
pub(crate) fn level_complete_countdown(
    clock: Res<FrameClock>,
    config: Res<GameConfig>,
    mut session: ResMut<Session>,
    mut scores: ResMut<HighScores>,
    mut loads: EventWriter<LoadLevel>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    session.level_complete_timer += clock.real_dt;
    if session.level_complete_timer < LEVEL_COMPLETE_DELAY {
        return;
    }
    session.level_complete_timer = 0.0;

    let next = session.level_index + 1;
    if next >= config.level_order.len() {
        info!("Run complete with {} points", session.score);
        scores.submit(session.score);
        next_state.set(GameState::Win);
        return;
    }

    loads.send(LoadLevel { index: next });
    next_state.set(GameState::Playing);
}

/// The boss floats down while the title card shows, then play resumes.
pub(crate) fn boss_intro(
    clock: Res<FrameClock>,
    mut session: ResMut<Session>,
    mut effects: ResMut<ScreenEffects>,
    mut next_state: ResMut<NextState<GameState>>,
    mut bodies: Query<&mut Body, With<Enemy>>,
) {
    let dt = clock.real_dt;
    session.boss_intro.timer += dt;

    if let Some(mut body) = session.boss_intro.boss.and_then(|e| bodies.get_mut(e).ok()) {
        if body.pos.y < BOSS_INTRO_TARGET_Y {
            body.pos.y = (body.pos.y + BOSS_INTRO_DESCENT * dt).min(BOSS_INTRO_TARGET_Y);
        }
    }

    if session.boss_intro.timer >= BOSS_INTRO_DURATION {
        session.boss_intro.boss = None;
        effects.shake(10.0, 0.3);
        next_state.set(GameState::Playing);
    }
}

/// Restart from game over: same unicorn, first level.
pub(crate) fn restart_after_game_over(
    input: Res<InputSnapshot>,
    mut starts: EventWriter<StartGame>,
) {
    if input.restart_pressed {
        starts.send(StartGame { level: 0 });
    }
}

/// Restart from the win screen goes back to character select.
pub(crate) fn return_to_select(
    input: Res<InputSnapshot>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if input.restart_pressed {
        next_state.set(GameState::CharSelect);
    }
}

pub(crate) fn follow_camera(
    level: Res<Level>,
    effects: Res<ScreenEffects>,
    mut camera: ResMut<GameCamera>,
    players: Query<&Body, With<Player>>,
) {
    let Ok(body) = players.get_single() else {
        return;
    };
    camera.follow(body.center(), level.arena(), effects.shake_offset);
}

pub(crate) fn log_state_transitions(mut transitions: EventReader<StateTransitionEvent<GameState>>) {
    for transition in transitions.read() {
        info!("State: {:?} -> {:?}", transition.exited, transition.entered);
    }
}
