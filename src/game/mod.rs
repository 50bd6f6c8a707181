//! Game module - session, scoring, camera, HUD state and the run flow.

mod camera;
mod flow;
mod hud;
mod plugin;
mod scores;
mod session;

pub use camera::*;
pub use hud::HudSnapshot;
pub use plugin::{FlowSet, GamePlugin};
pub use scores::*;
pub use session::*;
