//! Core module - states, events, timing, input and shared utilities.
//!
//! This module provides the foundation that all other game systems build upon.

mod clock;
mod config;
mod error;
mod events;
mod geometry;
mod input;
mod outbox;
mod plugin;
mod rng;
mod states;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use geometry::*;
pub use input::*;
pub use outbox::*;
pub use plugin::{CorePlugin, TickSet};
pub use rng::*;
pub use states::*;
