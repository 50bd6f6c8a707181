//! Items module - pickups, power-ups and destructible gems.

mod components;
mod manager;
mod plugin;

pub use components::*;
pub use manager::*;
pub use plugin::{clear_items, spawn_gems, spawn_power_ups, ItemsPlugin, MAX_RANDOM_POWER_UPS};
