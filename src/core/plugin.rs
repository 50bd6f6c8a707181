//! Core plugin that sets up game states, events, timing and the frame
//! pipeline ordering.

use bevy::prelude::*;

use super::clock::FrameClock;
use super::config::GameConfig;
use super::events::*;
use super::input::{clear_input_edges, InputSnapshot};
use super::outbox::{Outbox, SpawnCounter};
use super::rng::GameRng;
use super::states::*;
use crate::combat::ScreenEffects;

/// Stages of one simulation frame, in execution order.
///
/// `Clock` runs in every state. The rest only run while `Playing` and are
/// chained, so each stage sees everything the previous stage did
/// (including spawns applied by `Spawn`).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Frame clock, time scale and screen effects
    Clock,
    /// Run timers and power-up bookkeeping
    Prelude,
    /// Moving platforms
    Level,
    /// Player controller and death handling
    Player,
    /// Enemy AI in spawn order
    Enemies,
    /// Apply projectiles, summons and cues queued by actors
    Spawn,
    /// Projectile motion and ageing
    Projectiles,
    /// Pairwise combat passes
    Combat,
    /// Pickups and power-up collection
    Pickups,
    /// Level end, boss intro trigger, special attack
    Progression,
    /// Remove dead actors and spent projectiles
    Reap,
    /// Camera and HUD
    Present,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, Start, Playing, etc.)
/// - Global events (SoundCue, Banner, LoadLevel, StartGame)
/// - Frame clock, input snapshot, RNG and the side-effect outbox
/// - Pause toggling
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let seed = app
            .world()
            .get_resource::<GameConfig>()
            .and_then(|config| config.seed);

        app
            // Initialize game states
            .init_state::<GameState>()

            // Register global events
            .add_event::<SoundCue>()
            .add_event::<Banner>()
            .add_event::<LoadLevel>()
            .add_event::<StartGame>()

            // Shared resources
            .init_resource::<GameConfig>()
            .init_resource::<FrameClock>()
            .init_resource::<InputSnapshot>()
            .init_resource::<Outbox>()
            .init_resource::<SpawnCounter>()
            .init_resource::<ScreenEffects>()
            .insert_resource(GameRng::from_seed(seed))

            // Frame ordering
            .configure_sets(Update, TickSet::Clock)
            .configure_sets(
                Update,
                (
                    TickSet::Prelude,
                    TickSet::Level,
                    TickSet::Player,
                    TickSet::Enemies,
                    TickSet::Spawn,
                    TickSet::Projectiles,
                    TickSet::Combat,
                    TickSet::Pickups,
                    TickSet::Progression,
                    TickSet::Reap,
                    TickSet::Present,
                )
                    .chain()
                    .after(TickSet::Clock)
                    .run_if(in_state(GameState::Playing)),
            )

            .add_systems(
                Update,
                (
                    advance_clock,
                    handle_pause_input
                        .run_if(in_state(GameState::Playing).or(in_state(GameState::Paused))),
                )
                    .chain()
                    .in_set(TickSet::Clock),
            )

            // One-shot input flags live for exactly one frame
            .add_systems(Last, clear_input_edges);
    }
}

/// Derive this frame's deltas, then advance screen effects on real time.
///
/// The time scale is sampled before the effects update, so a freeze
/// triggered last frame slows this whole frame.
fn advance_clock(
    mut clock: ResMut<FrameClock>,
    mut effects: ResMut<ScreenEffects>,
    mut rng: ResMut<GameRng>,
) {
    let scale = effects.time_scale();
    clock.advance(scale);
    effects.update(clock.real_dt, &mut rng.0);
}

/// Toggle pause on the pause edge.
fn handle_pause_input(
    input: Res<InputSnapshot>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut sounds: EventWriter<SoundCue>,
) {
    if !input.pause_pressed {
        return;
    }

    match current_state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
        _ => return,
    }
    sounds.send(SoundCue(SoundId::Pause));
}
