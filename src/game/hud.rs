//! Aggregate UI state pushed once per frame.

use bevy::prelude::*;

use super::session::{Session, SPECIAL_KILLS_REQUIRED};
use crate::combat::Health;
use crate::items::{PowerUpKind, PowerUpManager};
use crate::player::Player;
use crate::world::Level;

/// Everything the HUD collaborator draws.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub health: i32,
    pub max_health: i32,
    pub score: u32,
    pub lives: u32,
    /// 1-based level number
    pub level_number: usize,
    pub level_name: String,
    /// Running power-ups with the fraction of time left
    pub power_ups: Vec<(PowerUpKind, f32)>,
    pub special_ready: bool,
    /// Charge of the special, 0..=1
    pub special_charge: f32,
}

pub(crate) fn update_hud(
    session: Res<Session>,
    level: Res<Level>,
    manager: Res<PowerUpManager>,
    players: Query<&Health, With<Player>>,
    mut hud: ResMut<HudSnapshot>,
) {
    if let Ok(health) = players.get_single() {
        hud.health = health.current;
        hud.max_health = health.maximum;
    }
    hud.score = session.score;
    hud.lives = session.lives;
    hud.level_number = session.level_index + 1;
    if hud.level_name != level.name {
        hud.level_name.clone_from(&level.name);
    }
    hud.power_ups = manager
        .active()
        .iter()
        .map(|p| (p.kind, p.fraction_left()))
        .collect();
    hud.special_ready = session.special_ready;
    hud.special_charge =
        (session.special_kills as f32 / SPECIAL_KILLS_REQUIRED as f32).min(1.0);
}
