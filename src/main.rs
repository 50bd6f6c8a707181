//! Retrocorn - headless demo host.
//!
//! Runs the simulation core without a renderer or audio backend. A scripted
//! pilot plays the part of the keyboard, the Bevy clock plays the part of
//! the display refresh, and sound cues and banners are written to the log.
//!
//! Usage: `retrocorn [config.ron] [frames]`

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::time::Duration;

use retrocorn::core::{Banner, FrameClock, GameConfig, GameState, InputSnapshot, SoundCue};
use retrocorn::game::{GameStats, HudSnapshot, Session};
use retrocorn::RetrocornPlugin;

const DEFAULT_CONFIG: &str = "assets/data/config.ron";
const DEFAULT_FRAMES: u32 = 60 * 60;

/// How long the pilot plays before closing the app.
#[derive(Resource)]
struct FrameBudget(u32);

fn main() {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let frames = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let config = match GameConfig::from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Using default configuration: {}", e);
            GameConfig::default()
        }
    };

    App::new()
        // Headless host: a 60 Hz loop instead of a window
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(StatesPlugin)
        .add_plugins(LogPlugin::default())

        // The simulation core
        .add_plugins(RetrocornPlugin { config })

        // Host side of the contract
        .insert_resource(FrameBudget(frames))
        .add_systems(First, submit_timestamp)
        .add_systems(PreUpdate, pilot)
        .add_systems(PostUpdate, (log_sounds, log_banners))
        .run();
}

/// Feed the frame clock one timestamp per frame, like a refresh callback.
fn submit_timestamp(time: Res<Time<Real>>, mut clock: ResMut<FrameClock>) {
    clock.submit(time.elapsed_secs_f64() * 1000.0);
}

/// Scripted player: start a run, then run right, jumping, swinging and
/// shooting on a fixed rhythm. Restarts after a game over.
fn pilot(
    mut frame: Local<u32>,
    mut budget: ResMut<FrameBudget>,
    state: Res<State<GameState>>,
    mut input: ResMut<InputSnapshot>,
    session: Res<Session>,
    stats: Res<GameStats>,
    hud: Res<HudSnapshot>,
    mut exit: EventWriter<AppExit>,
) {
    *frame += 1;
    let tick = *frame;

    if budget.0 == 0 {
        info!(
            "Pilot done: level {} '{}', score {}, lives {}, {} kills, {:.1}s played",
            hud.level_number,
            hud.level_name,
            session.score,
            session.lives,
            stats.enemies_killed,
            stats.time_played
        );
        exit.send(AppExit::Success);
        return;
    }
    budget.0 -= 1;

    match state.get() {
        GameState::Start | GameState::CharSelect => {
            input.confirm_pressed = tick % 30 == 0;
        }
        GameState::Playing => {
            input.right = true;
            input.jump_held = tick % 90 < 20;
            input.jump_pressed = tick % 90 == 0;
            input.melee_pressed = tick % 25 == 0;
            input.shoot_pressed = tick % 40 == 10;
            input.special_pressed = true;
        }
        GameState::GameOver | GameState::Win => {
            *input = InputSnapshot::default();
            input.restart_pressed = tick % 120 == 0;
        }
        _ => {
            *input = InputSnapshot::default();
        }
    }
}

fn log_sounds(mut sounds: EventReader<SoundCue>) {
    for SoundCue(id) in sounds.read() {
        debug!("sound: {}", id.key());
    }
}

fn log_banners(mut banners: EventReader<Banner>) {
    for banner in banners.read() {
        match &banner.subtitle {
            Some(subtitle) => info!("banner: {} / {}", banner.title, subtitle),
            None => info!("banner: {}", banner.title),
        }
    }
}
