//! World plugin - data loading and level geometry updates.

use bevy::prelude::*;

use super::data::{load_level_registry, LevelRegistry};
use super::level::Level;
use crate::core::{FrameClock, GameState, TickSet};
use crate::physics::{load_animation_library, AnimationLibrary};

/// World plugin - loads static data and animates level geometry.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelRegistry>()
            .init_resource::<AnimationLibrary>()
            .init_resource::<Level>()
            // Data files are read once, then the title screen opens
            .add_systems(
                OnEnter(GameState::Loading),
                (load_level_registry, load_animation_library, finish_loading).chain(),
            )
            .add_systems(Update, update_level.in_set(TickSet::Level));
    }
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Start);
}

/// Advance moving platforms on simulation time.
fn update_level(clock: Res<FrameClock>, mut level: ResMut<Level>) {
    level.update(clock.sim_dt);
}
