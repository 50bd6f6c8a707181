//! Shared physical state of players and enemies.

use bevy::prelude::*;

use super::animation::Animator;
use crate::core::Bounds;

/// Collision rectangle relative to the body's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub offset: Vec2,
    pub size: Vec2,
}

impl Hitbox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            offset: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }
}

/// Position, motion and pose of an actor.
///
/// `size` is the visual box; every collision test uses [`Body::hitbox`],
/// which sits inside it.
#[derive(Component, Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub hitbox: Hitbox,
    pub facing_right: bool,
    pub grounded: bool,
    /// Cleared during invincibility flicker
    pub visible: bool,
    pub anim: Animator,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, hitbox: Hitbox, anim: Animator) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            hitbox,
            facing_right: true,
            grounded: false,
            visible: true,
            anim,
        }
    }

    /// World-space collision rectangle.
    pub fn hitbox(&self) -> Bounds {
        Bounds::from_pos_size(self.pos + self.hitbox.offset, self.hitbox.size)
    }

    /// World-space visual rectangle.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_pos_size(self.pos, self.size)
    }

    /// Centre of the visual box (used for distances and facing).
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn facing_sign(&self) -> f32 {
        crate::core::facing_sign(self.facing_right)
    }
}
