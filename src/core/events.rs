//! Global events used for cross-system communication.
//!
//! The simulation never talks to audio or UI directly. It emits these
//! events and whichever host collaborator is attached reads them; with no
//! reader attached they are simply dropped after two frames.

use bevy::prelude::*;

/// Audio cue identifiers understood by the sound collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Shoot,
    Hit,
    Hurt,
    Death,
    Jump,
    Pickup,
    PowerUp,
    EnemyDeath,
    BossDeath,
    LevelComplete,
    GameOver,
    Melee,
    Select,
    Pause,
    Explosion,
}

impl SoundId {
    /// Stable key used by asset tables.
    pub fn key(self) -> &'static str {
        match self {
            SoundId::Shoot => "shoot",
            SoundId::Hit => "hit",
            SoundId::Hurt => "hurt",
            SoundId::Death => "death",
            SoundId::Jump => "jump",
            SoundId::Pickup => "pickup",
            SoundId::PowerUp => "powerup",
            SoundId::EnemyDeath => "enemyDeath",
            SoundId::BossDeath => "bossDeath",
            SoundId::LevelComplete => "levelComplete",
            SoundId::GameOver => "gameOver",
            SoundId::Melee => "melee",
            SoundId::Select => "select",
            SoundId::Pause => "pause",
            SoundId::Explosion => "explosion",
        }
    }
}

/// Fire-and-forget request to play a sound.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundCue(pub SoundId);

/// Floating text shown by the UI collaborator.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct Banner {
    /// Large headline
    pub title: String,
    /// Optional second line
    pub subtitle: Option<String>,
    /// Where the text should appear, in world units (`None` = screen centre)
    pub at: Option<Vec2>,
}

impl Banner {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            at: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.at = Some(position);
        self
    }
}

/// Request to (re)build the world from a level in the play order.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLevel {
    /// Index into the configured level order
    pub index: usize,
}

/// Request to begin a fresh run from character select or game over.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartGame {
    /// Index into the configured level order to start from
    pub level: usize,
}
