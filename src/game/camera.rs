//! Follow camera in world units.

use bevy::prelude::*;

use crate::core::{clamp, Bounds};

/// Fraction of the remaining distance covered each frame.
pub const CAMERA_SMOOTHING: f32 = 0.1;

/// Top-left corner of the visible area.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameCamera {
    /// Smoothed and clamped position, before shake
    pub anchor: Vec2,
    /// Shake offset added this frame
    pub shake: Vec2,
    pub viewport: Vec2,
}

impl Default for GameCamera {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

impl GameCamera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            anchor: Vec2::ZERO,
            shake: Vec2::ZERO,
            viewport,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.anchor + self.shake
    }

    /// Visible rectangle, shake included.
    pub fn view(&self) -> Bounds {
        Bounds::from_pos_size(self.position(), self.viewport)
    }

    /// Snap back to the level origin.
    pub fn reset(&mut self) {
        self.anchor = Vec2::ZERO;
        self.shake = Vec2::ZERO;
    }

    /// Ease toward centring `focus`, stay inside `level`, then add `shake`.
    pub fn follow(&mut self, focus: Vec2, level: Vec2, shake: Vec2) {
        let target = focus - self.viewport / 2.0;
        self.anchor += (target - self.anchor) * CAMERA_SMOOTHING;
        self.anchor.x = clamp(self.anchor.x, 0.0, level.x - self.viewport.x);
        self.anchor.y = clamp(self.anchor.y, 0.0, level.y - self.viewport.y);
        self.shake = shake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eases_toward_focus() {
        let mut camera = GameCamera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(1400.0, 300.0), Vec2::new(4000.0, 600.0), Vec2::ZERO);
        assert!((camera.anchor.x - 100.0).abs() < 1e-4);
        assert_eq!(camera.anchor.y, 0.0);
    }

    #[test]
    fn stays_inside_level() {
        let mut camera = GameCamera::new(Vec2::new(800.0, 600.0));
        camera.anchor = Vec2::new(3150.0, 0.0);
        camera.follow(Vec2::new(9000.0, 900.0), Vec2::new(4000.0, 600.0), Vec2::ZERO);
        assert_eq!(camera.anchor, Vec2::new(3200.0, 0.0));
    }

    #[test]
    fn shake_moves_the_view_only() {
        let mut camera = GameCamera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0), Vec2::new(3.0, -2.0));
        assert_eq!(camera.anchor, Vec2::ZERO);
        assert_eq!(camera.view().x, 3.0);
        assert_eq!(camera.view().y, -2.0);
    }
}
