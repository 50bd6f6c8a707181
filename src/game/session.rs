//! Run-wide progress: score, lives, level position and run statistics.

use bevy::prelude::*;

use crate::player::Character;

/// Kills needed to arm the rainbow blast.
pub const SPECIAL_KILLS_REQUIRED: u32 = 10;
/// Real seconds between touching the end zone and the next level.
pub const LEVEL_COMPLETE_DELAY: f32 = 2.5;
/// Real seconds the boss entrance lasts.
pub const BOSS_INTRO_DURATION: f32 = 5.0;
/// Where the entering boss stops descending.
pub const BOSS_INTRO_TARGET_Y: f32 = 100.0;
/// Descent speed of the entering boss.
pub const BOSS_INTRO_DESCENT: f32 = 60.0;
/// Bonus for reaching the end zone.
pub const LEVEL_CLEAR_BONUS: u32 = 1000;

/// Boss entrance bookkeeping for the current level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BossIntroState {
    /// Fired at most once per level load
    pub triggered: bool,
    pub timer: f32,
    /// The boss descending into the arena
    pub boss: Option<Entity>,
}

/// The current run.
#[derive(Resource, Debug, Clone)]
pub struct Session {
    pub score: u32,
    pub lives: u32,
    /// Position in the configured level order
    pub level_index: usize,
    /// Kills since the special was last used
    pub special_kills: u32,
    pub special_ready: bool,
    /// Chosen on the select screen
    pub character: Character,
    pub start_level: usize,
    pub boss_intro: BossIntroState,
    pub level_complete_timer: f32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            lives: 3,
            level_index: 0,
            special_kills: 0,
            special_ready: false,
            character: Character::default(),
            start_level: 0,
            boss_intro: BossIntroState::default(),
            level_complete_timer: 0.0,
        }
    }
}

impl Session {
    /// Fresh run from `level`, keeping the select-screen choices.
    pub fn begin(&mut self, level: usize, lives: u32) {
        self.score = 0;
        self.lives = lives;
        self.level_index = level;
        self.special_kills = 0;
        self.special_ready = false;
        self.boss_intro = BossIntroState::default();
        self.level_complete_timer = 0.0;
    }

    /// Count a kill toward the special. Returns `true` when this kill armed it.
    pub fn count_kill(&mut self) -> bool {
        self.special_kills += 1;
        if !self.special_ready && self.special_kills >= SPECIAL_KILLS_REQUIRED {
            self.special_ready = true;
            return true;
        }
        false
    }

    /// Spend the armed special. Returns `false` if it was not ready.
    pub fn use_special(&mut self) -> bool {
        if !self.special_ready {
            return false;
        }
        self.special_ready = false;
        self.special_kills = 0;
        true
    }

    /// One-liner the villain taunts with when a level opens.
    pub fn villain_line(level_index: usize) -> Option<&'static str> {
        match level_index {
            2 => Some("Turn back, foolish horned horse!"),
            3 => Some("Muahahahahahahah!"),
            4 => Some("You dare enter MY labyrinth?!"),
            5 => Some("The dead shall feast on your soul!"),
            6 => Some("BURN IN ETERNAL FLAMES!"),
            _ => None,
        }
    }
}

/// Totals for the end-of-run screens.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct GameStats {
    pub enemies_killed: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub pickups_collected: u32,
    pub powerups_used: u32,
    /// Simulation seconds spent in `Playing`
    pub time_played: f32,
}

impl GameStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_arms_on_tenth_kill_and_resets_on_use() {
        let mut session = Session::default();
        for _ in 0..SPECIAL_KILLS_REQUIRED - 1 {
            assert!(!session.count_kill());
        }
        assert!(session.count_kill());
        assert!(session.special_ready);
        assert!(!session.count_kill());

        assert!(session.use_special());
        assert_eq!(session.special_kills, 0);
        assert!(!session.use_special());
    }

    #[test]
    fn begin_keeps_character_choice() {
        let mut session = Session {
            score: 4200,
            lives: 1,
            character: Character::Pink,
            ..default()
        };
        session.begin(3, 3);
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
        assert_eq!(session.level_index, 3);
        assert_eq!(session.character, Character::Pink);
    }
}
