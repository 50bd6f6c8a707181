//! Host-driven frame clock.
//!
//! The host submits one wall-clock timestamp per displayed frame. The clock
//! turns consecutive timestamps into a real delta (clamped so a resumed
//! tab does not produce a huge step) and a simulation delta scaled by the
//! current slow-motion/freeze factor.

use bevy::prelude::*;

/// Largest real step the simulation will take, in seconds.
pub const MAX_FRAME_STEP: f32 = 0.1;

/// Per-frame timing derived from host timestamps.
#[derive(Resource, Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    pending_ms: Option<f64>,
    /// Unscaled delta for this frame (cosmetics, countdowns)
    pub real_dt: f32,
    /// Scaled delta consumed by gameplay updates
    pub sim_dt: f32,
    /// Scale applied this frame, in [0.1, 1.0]
    pub time_scale: f32,
    /// Frames advanced so far
    pub frame: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            last_ms: None,
            pending_ms: None,
            real_dt: 0.0,
            sim_dt: 0.0,
            time_scale: 1.0,
            frame: 0,
        }
    }
}

impl FrameClock {
    /// Record the host timestamp for the upcoming frame.
    pub fn submit(&mut self, now_ms: f64) {
        self.pending_ms = Some(now_ms);
    }

    /// Consume the pending timestamp and derive this frame's deltas.
    ///
    /// The first timestamp only primes the clock (delta 0). A frame with no
    /// submitted timestamp also advances by 0.
    pub fn advance(&mut self, time_scale: f32) {
        let raw = match (self.pending_ms.take(), self.last_ms) {
            (Some(now), Some(last)) => {
                self.last_ms = Some(now);
                ((now - last) / 1000.0) as f32
            }
            (Some(now), None) => {
                self.last_ms = Some(now);
                0.0
            }
            (None, _) => 0.0,
        };

        self.real_dt = raw.clamp(0.0, MAX_FRAME_STEP);
        self.time_scale = time_scale;
        self.sim_dt = self.real_dt * time_scale;
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frame_is_clamped() {
        let mut clock = FrameClock::default();
        clock.submit(1000.0);
        clock.advance(1.0);
        assert_eq!(clock.real_dt, 0.0);

        clock.submit(1500.0);
        clock.advance(1.0);
        assert!((clock.real_dt - 0.1).abs() < 1e-6);
        assert!((clock.sim_dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn scale_only_affects_sim_delta() {
        let mut clock = FrameClock::default();
        clock.submit(0.0);
        clock.advance(1.0);
        clock.submit(50.0);
        clock.advance(0.3);
        assert!((clock.real_dt - 0.05).abs() < 1e-6);
        assert!((clock.sim_dt - 0.015).abs() < 1e-6);
    }

    #[test]
    fn backwards_timestamp_yields_zero_step() {
        let mut clock = FrameClock::default();
        clock.submit(500.0);
        clock.advance(1.0);
        clock.submit(400.0);
        clock.advance(1.0);
        assert_eq!(clock.real_dt, 0.0);
    }
}
