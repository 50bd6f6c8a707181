//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Gameplay passes
//! only run in `Playing`; the cutscene and countdown states run their own
//! small systems on unscaled real time.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while data files are read
/// - `Start` is the title screen, `CharSelect` picks variant and level
/// - `Playing` runs the full simulation pipeline, `Paused` freezes it
/// - `LevelComplete` counts down before the next level loads
/// - `BossIntro` is the non-interactive boss entrance
/// - `Win` and `GameOver` wait for a restart
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Reading level descriptors and animation tables
    #[default]
    Loading,
    /// Title screen
    Start,
    /// Character and starting level selection
    CharSelect,
    /// Active gameplay
    Playing,
    /// Gameplay frozen, cosmetic effects keep running
    Paused,
    /// Short celebration before the next level
    LevelComplete,
    /// Scripted boss entrance
    BossIntro,
    /// Final level cleared
    Win,
    /// No lives left
    GameOver,
}
