//! Combat module - health, damage passes and screen effects.

mod components;
mod effects;
mod pipeline;
mod plugin;

pub use components::*;
pub use effects::*;
pub use pipeline::{strike_player, Strike};
pub use plugin::{CombatPlugin, CombatSet};
