//! Axis-aligned rectangles and small numeric helpers shared by every actor.
//!
//! World coordinates are screen-like: `x` grows to the right, `y` grows
//! downward, and a rectangle's origin is its top-left corner.

use bevy::prelude::*;
use serde::Deserialize;

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` at `pos`.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Square of side `size` centred on `center`.
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict intersection: rectangles sharing only an edge do not overlap.
    ///
    /// Used by physics resolution, hazards, pickups and gems.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Inclusive intersection: touching edges count as contact.
    ///
    /// Used by the combat passes (contact, melee, projectiles).
    pub fn touches(&self, other: &Bounds) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Whether a point lies inside the rectangle (edges included).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Rectangle grown by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

/// `max(lo)` then `min(hi)`. Unlike `f32::clamp` this tolerates `lo > hi`,
/// in which case `hi` wins (small levels narrower than the viewport).
pub fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Horizontal sign for a facing flag.
pub fn facing_sign(facing_right: bool) -> f32 {
    if facing_right {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_contact_is_inclusive_only() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
    }

    #[test]
    fn overlapping_rects_match_both_tests() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(a.touches(&b));
        assert!(!a.overlaps(&Bounds::new(30.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn clamp_prefers_upper_bound_on_inverted_range() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(50.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(5.0, 8.0, 2.0), 2.0);
    }

    #[test]
    fn lerp_and_centered_box() {
        assert_eq!(lerp(0.0, 100.0, 0.1), 10.0);
        let b = Bounds::centered(Vec2::new(50.0, 50.0), 32.0);
        assert_eq!(b, Bounds::new(34.0, 34.0, 32.0, 32.0));
        assert_eq!(b.center(), Vec2::new(50.0, 50.0));
    }
}
