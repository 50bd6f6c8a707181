//! Player plugin - spawning and the per-tick controller system.

use bevy::prelude::*;

use super::components::*;
use super::controller::{update_player, PlayerTick};
use crate::combat::Health;
use crate::core::{FrameClock, InputSnapshot, Outbox, TickSet};
use crate::physics::{AnimationLibrary, Body, Rig};
use crate::world::Level;

/// Player plugin - owns the player tuning and runs the controller.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .add_systems(Update, drive_player.in_set(TickSet::Player));
    }
}

/// Spawn the player at `position` using `character`'s animation table.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec2,
    character: Character,
    library: &AnimationLibrary,
    config: &PlayerConfig,
) -> Entity {
    let anim = library.animator(character.animation_key(), Rig::Player);
    commands
        .spawn((
            Player::new(config),
            Body::new(position, PLAYER_SIZE, PLAYER_HITBOX, anim),
            Health::new(config.max_health),
        ))
        .id()
}

pub(crate) fn drive_player(
    clock: Res<FrameClock>,
    input: Res<InputSnapshot>,
    level: Res<Level>,
    config: Res<PlayerConfig>,
    mut out: ResMut<Outbox>,
    mut players: Query<(&mut Player, &mut Body, &mut Health)>,
) {
    let Ok((mut player, mut body, mut health)) = players.get_single_mut() else {
        return;
    };

    let tick = PlayerTick {
        dt: clock.sim_dt,
        input: &input,
        level: &level,
        config: &config,
    };
    update_player(&mut player, &mut body, &mut health, &tick, &mut out);
}
