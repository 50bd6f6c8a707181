//! Axis-separated movement against platform rectangles.
//!
//! Grounded actors integrate X then Y, snapping to the first solid they
//! overlap on each axis, then run one "unstuck" pass that pushes an
//! embedded hitbox out along its shallowest overlap. Flying actors skip
//! platforms entirely and only respect a band inside the level.

use bevy::prelude::*;

use super::body::Body;
use crate::core::{clamp, Bounds};

/// How far below the level a body may drop before it counts as fallen out.
pub const FALL_OUT_MARGIN: f32 = 100.0;

/// What happened during one movement step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepReport {
    /// Horizontal travel direction that a solid stopped (+1 right, -1 left)
    pub blocked: Option<f32>,
    /// Ended the step standing on a solid
    pub landed: bool,
    /// Level edge the body was clamped against (-1 left, +1 right)
    pub edge: Option<f32>,
    /// Dropped more than [`FALL_OUT_MARGIN`] below the level
    pub fell_out: bool,
}

impl SweepReport {
    /// Direction a patrolling walker should take after this step, if the
    /// step forced a turn.
    pub fn turn_direction(&self) -> Option<f32> {
        self.edge.map(|side| -side).or(self.blocked.map(|dir| -dir))
    }
}

/// Allowed region for a flying body, expressed as margins from the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightBand {
    /// Horizontal inset from both level edges
    pub margin_x: f32,
    /// Smallest allowed `y`
    pub top: f32,
    /// `y` may not exceed `level_height - bottom_gap`
    pub bottom_gap: f32,
}

impl FlightBand {
    /// Regular flying enemies.
    pub const MINION: FlightBand = FlightBand {
        margin_x: 0.0,
        top: 50.0,
        bottom_gap: 150.0,
    };
}

/// Move a grounded body by its velocity and resolve it against `solids`.
///
/// `arena` is the level size; the body is kept within `[0, width - size.x]`.
pub fn move_grounded(body: &mut Body, dt: f32, solids: &[Bounds], arena: Vec2) -> SweepReport {
    let mut report = SweepReport::default();
    let offset = body.hitbox.offset;
    let hb = body.hitbox.size;

    // Horizontal pass
    body.pos.x += body.vel.x * dt;
    let hitbox = body.hitbox();
    if let Some(solid) = solids.iter().find(|solid| hitbox.overlaps(solid)) {
        let push_left = if body.vel.x > 0.0 {
            report.blocked = Some(1.0);
            true
        } else if body.vel.x < 0.0 {
            report.blocked = Some(-1.0);
            false
        } else {
            hitbox.center().x < solid.center().x
        };
        body.pos.x = if push_left {
            solid.x - hb.x - offset.x
        } else {
            solid.right() - offset.x
        };
        body.vel.x = 0.0;
    }

    // Vertical pass
    body.pos.y += body.vel.y * dt;
    body.grounded = false;
    let hitbox = body.hitbox();
    if let Some(solid) = solids.iter().find(|solid| hitbox.overlaps(solid)) {
        if body.vel.y < 0.0 {
            body.pos.y = solid.bottom() - offset.y;
        } else {
            body.pos.y = solid.y - hb.y - offset.y;
            body.grounded = true;
        }
        body.vel.y = 0.0;
    }

    // Unstuck pass
    let hitbox = body.hitbox();
    if let Some(solid) = solids.iter().find(|solid| hitbox.overlaps(solid)) {
        let from_left = hitbox.right() - solid.x;
        let from_right = solid.right() - hitbox.x;
        let from_top = hitbox.bottom() - solid.y;
        let from_bottom = solid.bottom() - hitbox.y;
        let min = from_left.min(from_right).min(from_top).min(from_bottom);

        if min == from_top {
            body.pos.y = solid.y - hb.y - offset.y - 1.0;
            body.grounded = true;
            body.vel.y = 0.0;
        } else if min == from_bottom {
            body.pos.y = solid.bottom() - offset.y + 1.0;
            body.vel.y = 0.0;
        } else if min == from_left {
            body.pos.x = solid.x - hb.x - offset.x - 1.0;
        } else {
            body.pos.x = solid.right() - offset.x + 1.0;
        }
    }

    // Level bounds
    if body.pos.x < 0.0 {
        body.pos.x = 0.0;
        report.edge = Some(-1.0);
    }
    if body.pos.x + body.size.x > arena.x {
        body.pos.x = arena.x - body.size.x;
        report.edge = Some(1.0);
    }

    report.landed = body.grounded;
    report.fell_out = body.pos.y > arena.y + FALL_OUT_MARGIN;
    report
}

/// Move a flying body by its velocity, clamped to `band` inside the level.
pub fn move_flying(body: &mut Body, dt: f32, band: FlightBand, arena: Vec2) -> SweepReport {
    let mut report = SweepReport::default();
    body.pos += body.vel * dt;

    if body.pos.x < band.margin_x {
        body.pos.x = band.margin_x;
        report.edge = Some(-1.0);
    }
    if body.pos.x + body.size.x > arena.x - band.margin_x {
        body.pos.x = arena.x - band.margin_x - body.size.x;
        report.edge = Some(1.0);
    }
    body.pos.y = clamp(body.pos.y, band.top, arena.y - band.bottom_gap);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{AnimationSet, Animator, Hitbox, Rig};

    const ARENA: Vec2 = Vec2::new(2000.0, 600.0);

    fn player_body(x: f32, y: f32) -> Body {
        Body::new(
            Vec2::new(x, y),
            Vec2::new(96.0, 96.0),
            Hitbox::new(32.0, 12.0, 32.0, 48.0),
            Animator::new(Rig::Player, AnimationSet::placeholder(Rig::Player)),
        )
    }

    #[test]
    fn free_motion_is_pure_integration() {
        let mut body = player_body(0.0, 100.0);
        body.vel.x = 250.0;
        let report = move_grounded(&mut body, 1.0, &[], ARENA);
        assert_eq!(body.pos.x, 250.0);
        assert_eq!(report, SweepReport::default());
    }

    #[test]
    fn falling_body_lands_on_top() {
        let floor = Bounds::new(0.0, 500.0, 800.0, 100.0);
        let mut body = player_body(100.0, 430.0);
        body.vel.y = 300.0;
        let report = move_grounded(&mut body, 0.1, &[floor], ARENA);
        assert!(report.landed);
        assert!(body.grounded);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.hitbox().bottom(), 500.0);
    }

    #[test]
    fn wall_stops_horizontal_motion() {
        let wall = Bounds::new(200.0, 0.0, 40.0, 600.0);
        let mut body = player_body(150.0, 100.0);
        body.vel.x = 250.0;
        let report = move_grounded(&mut body, 0.1, &[wall], ARENA);
        assert_eq!(report.blocked, Some(1.0));
        assert_eq!(report.turn_direction(), Some(-1.0));
        assert_eq!(body.vel.x, 0.0);
        assert_eq!(body.hitbox().right(), 200.0);
    }

    #[test]
    fn rising_body_bonks_ceiling() {
        let ceiling = Bounds::new(0.0, 0.0, 800.0, 50.0);
        let mut body = player_body(100.0, 45.0);
        body.vel.y = -400.0;
        move_grounded(&mut body, 0.05, &[ceiling], ARENA);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.hitbox().y, 50.0);
        assert!(!body.grounded);
    }

    #[test]
    fn second_overlap_is_pushed_out_shallowest_side() {
        let floor = Bounds::new(0.0, 500.0, 800.0, 100.0);
        let ledge = Bounds::new(150.0, 480.0, 100.0, 100.0);
        let mut body = player_body(100.0, 400.0);
        body.vel.y = 600.0;
        let report = move_grounded(&mut body, 0.1, &[floor, ledge], ARENA);
        assert!(report.landed);
        assert!(!body.hitbox().overlaps(&floor));
        assert!(!body.hitbox().overlaps(&ledge));
        assert_eq!(body.hitbox().right(), 149.0);
    }

    #[test]
    fn level_edges_clamp_and_report() {
        let mut body = player_body(10.0, 100.0);
        body.vel.x = -500.0;
        let report = move_grounded(&mut body, 0.1, &[], ARENA);
        assert_eq!(body.pos.x, 0.0);
        assert_eq!(report.edge, Some(-1.0));
        assert_eq!(report.turn_direction(), Some(1.0));

        let mut body = player_body(1900.0, 100.0);
        body.vel.x = 500.0;
        move_grounded(&mut body, 0.1, &[], ARENA);
        assert_eq!(body.pos.x, 2000.0 - 96.0);
    }

    #[test]
    fn dropping_below_level_reports_fall_out() {
        let mut body = player_body(100.0, 690.0);
        body.vel.y = 600.0;
        let report = move_grounded(&mut body, 0.1, &[], ARENA);
        assert!(report.fell_out);
    }

    #[test]
    fn flying_ignores_platforms_but_respects_band() {
        let mut body = player_body(100.0, 60.0);
        body.vel = Vec2::new(0.0, -500.0);
        move_flying(&mut body, 0.1, FlightBand::MINION, ARENA);
        assert_eq!(body.pos.y, 50.0);

        body.vel = Vec2::new(0.0, 5000.0);
        move_flying(&mut body, 0.1, FlightBand::MINION, ARENA);
        assert_eq!(body.pos.y, 450.0);
    }
}
