//! Physics module - actor bodies, pose animation and platform resolution.
//!
//! Everything here is plain data plus pure functions; systems that move
//! actors live with the actors (player, enemies) and call into this module.

mod animation;
mod body;
mod resolve;

pub use animation::*;
pub use body::*;
pub use resolve::*;
