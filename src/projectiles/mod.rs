//! Projectiles module - bolts, bones, fireballs, skulls and rocks.

mod components;
mod plugin;

pub use components::*;
pub use plugin::{clear_projectiles, ProjectilePlugin};
