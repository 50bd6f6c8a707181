//! Frame-local input snapshot supplied by the host.

use bevy::prelude::*;

/// Movement intents and edge-triggered actions for one frame.
///
/// The host overwrites this before each update. `*_pressed` fields are
/// edges: they are cleared at the end of every frame so a host that only
/// writes on key-down still produces one-shot actions.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub left_pressed: bool,
    pub right_pressed: bool,
    pub up_pressed: bool,
    pub down_pressed: bool,
    pub jump_held: bool,
    pub jump_pressed: bool,
    pub melee_pressed: bool,
    pub shoot_pressed: bool,
    pub shoot_held: bool,
    pub special_pressed: bool,
    pub pause_pressed: bool,
    pub restart_pressed: bool,
    pub confirm_pressed: bool,
    /// Pointer position in screen space
    pub pointer: Vec2,
}

impl InputSnapshot {
    /// Horizontal intent: -1, 0 or 1.
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Drop all one-shot flags, keeping held state.
    pub fn end_frame(&mut self) {
        self.left_pressed = false;
        self.right_pressed = false;
        self.up_pressed = false;
        self.down_pressed = false;
        self.jump_pressed = false;
        self.melee_pressed = false;
        self.shoot_pressed = false;
        self.special_pressed = false;
        self.pause_pressed = false;
        self.restart_pressed = false;
        self.confirm_pressed = false;
    }
}

pub(crate) fn clear_input_edges(mut input: ResMut<InputSnapshot>) {
    input.end_frame();
}
