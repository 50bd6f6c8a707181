//! Per-frame failure reporting.

use bevy::prelude::*;
use thiserror::Error;

/// Something a gameplay system could not do this frame.
///
/// These never stop the app: the system that hit the problem returns the
/// error, it is logged, and the next frame runs normally.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// The play order has no entry at this index.
    #[error("No level at index {index} in the play order")]
    LevelMissing { index: usize },

    /// A level named in the play order was never loaded.
    #[error("Level '{0}' is not in the registry")]
    UnknownLevel(String),

    /// Gameplay ran without a player entity.
    #[error("No player entity in the world")]
    NoPlayer,
}

/// Sink for fallible systems: `my_system.pipe(log_tick_error)`.
pub fn log_tick_error(In(result): In<Result<(), SimError>>) {
    if let Err(e) = result {
        error!("Frame error: {}", e);
    }
}
