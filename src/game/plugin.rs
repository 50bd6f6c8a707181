//! Game plugin - run flow, scoring and presentation state.

use bevy::prelude::*;

use super::camera::GameCamera;
use super::flow::*;
use super::hud::{update_hud, HudSnapshot};
use super::scores::HighScores;
use super::session::{GameStats, Session};
use crate::core::{log_tick_error, GameConfig, GameState, TickSet};
use crate::player::drive_player;

/// Flow stages that run outside the gameplay pipeline.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlowSet {
    /// Menus, countdowns and the boss entrance
    Screens,
    /// New runs and level loads
    Load,
}

/// Game plugin - owns the session and drives state changes.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        let (viewport, scores_path) = app
            .world()
            .get_resource::<GameConfig>()
            .map(|config| (config.viewport(), config.scores_path.clone()))
            .unwrap_or_else(|| (GameConfig::default().viewport(), None));

        app.init_resource::<Session>()
            .init_resource::<GameStats>()
            .init_resource::<HudSnapshot>()
            .insert_resource(GameCamera::new(viewport))
            .insert_resource(HighScores::from_path(scores_path.as_deref()))
            .configure_sets(
                Update,
                (FlowSet::Screens, FlowSet::Load)
                    .chain()
                    .after(TickSet::Clock)
                    .before(TickSet::Prelude),
            )
            .add_systems(
                Update,
                (
                    title_screen.run_if(in_state(GameState::Start)),
                    character_select.run_if(in_state(GameState::CharSelect)),
                    level_complete_countdown.run_if(in_state(GameState::LevelComplete)),
                    boss_intro.run_if(in_state(GameState::BossIntro)),
                    restart_after_game_over.run_if(in_state(GameState::GameOver)),
                    return_to_select.run_if(in_state(GameState::Win)),
                )
                    .in_set(FlowSet::Screens),
            )
            .add_systems(
                Update,
                (start_game, load_level.pipe(log_tick_error))
                    .chain()
                    .in_set(FlowSet::Load),
            )
            // Gameplay bookkeeping
            .add_systems(Update, tick_stats.in_set(TickSet::Prelude))
            .add_systems(
                Update,
                handle_player_death
                    .after(drive_player)
                    .in_set(TickSet::Player),
            )
            .add_systems(Update, flush_outbox.in_set(TickSet::Spawn))
            .add_systems(
                Update,
                (check_level_complete, rainbow_blast)
                    .chain()
                    .in_set(TickSet::Progression),
            )
            .add_systems(
                Update,
                (reap_enemies, flush_outbox).chain().in_set(TickSet::Reap),
            )
            .add_systems(
                Update,
                (follow_camera, update_hud).chain().in_set(TickSet::Present),
            )
            .add_systems(Last, log_state_transitions);
    }
}
