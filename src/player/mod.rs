//! Player module - the unicorn's state, controller and spawning.

mod components;
mod controller;
mod plugin;

pub use components::*;
pub use controller::{update_player, PlayerTick};
pub use plugin::{spawn_player, PlayerPlugin};
pub(crate) use plugin::drive_player;
