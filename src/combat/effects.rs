//! Screen shake, flash, slow motion and freeze-frame.
//!
//! Effects advance on unscaled real time and feed back into the simulation
//! only through [`ScreenEffects::time_scale`] and the camera shake offset.

use bevy::prelude::*;
use rand::Rng;

/// Flash tint as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint(pub u32);

impl Tint {
    pub const WHITE: Tint = Tint(0xffffff);
    pub const RED: Tint = Tint(0xff0000);
    pub const YELLOW: Tint = Tint(0xffff00);
    pub const PINK: Tint = Tint(0xff88ff);
    pub const CRIMSON: Tint = Tint(0x440022);
}

/// Effect requests queued by gameplay code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectCue {
    Shake { intensity: f32, duration: f32 },
    Flash { tint: Tint, duration: f32 },
    SlowMo { factor: f32, duration: f32 },
    Freeze { duration: f32 },
    PlayerHit,
    EnemyHit,
    EnemyDeath,
    BossHit,
    BossDeath,
    LevelComplete,
    PowerUp,
    RainbowBlast,
}

/// Current state of every screen effect.
#[derive(Resource, Debug, Clone)]
pub struct ScreenEffects {
    pub shake_intensity: f32,
    pub shake_duration: f32,
    /// Camera offset for this frame
    pub shake_offset: Vec2,
    pub flash_tint: Option<Tint>,
    pub flash_alpha: f32,
    pub flash_duration: f32,
    pub slow_mo_factor: f32,
    pub slow_mo_duration: f32,
    pub freeze_time: f32,
    pub freeze_cooldown: f32,
}

impl Default for ScreenEffects {
    fn default() -> Self {
        Self {
            shake_intensity: 0.0,
            shake_duration: 0.0,
            shake_offset: Vec2::ZERO,
            flash_tint: None,
            flash_alpha: 0.0,
            flash_duration: 0.0,
            slow_mo_factor: 1.0,
            slow_mo_duration: 0.0,
            freeze_time: 0.0,
            freeze_cooldown: 0.0,
        }
    }
}

impl ScreenEffects {
    /// Longest freeze-frame allowed.
    pub const MAX_FREEZE: f32 = 0.1;
    /// Minimum gap between freeze-frames.
    pub const FREEZE_COOLDOWN: f32 = 0.15;
    /// Slowest the simulation will ever run.
    pub const MIN_TIME_SCALE: f32 = 0.1;

    /// Advance all effects by real (unscaled) time.
    pub fn update(&mut self, real_dt: f32, rng: &mut impl Rng) {
        if self.freeze_cooldown > 0.0 {
            self.freeze_cooldown -= real_dt;
        }

        if self.shake_duration > 0.0 {
            self.shake_duration -= real_dt;
            let intensity = self.shake_intensity;
            self.shake_offset = Vec2::new(
                (rng.gen::<f32>() - 0.5) * 2.0 * intensity,
                (rng.gen::<f32>() - 0.5) * 2.0 * intensity,
            );
            self.shake_intensity *= 0.9;
        } else {
            self.shake_offset = Vec2::ZERO;
            self.shake_intensity = 0.0;
        }

        if self.flash_duration > 0.0 {
            self.flash_duration -= real_dt;
            self.flash_alpha = self.flash_duration / 0.1;
        } else {
            self.flash_alpha = 0.0;
        }

        if self.slow_mo_duration > 0.0 {
            self.slow_mo_duration -= real_dt;
        } else {
            self.slow_mo_factor = 1.0;
        }

        if self.freeze_time > 0.0 {
            self.freeze_time -= real_dt;
        }
    }

    /// Stronger/longer of the current and requested shake.
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        self.shake_intensity = self.shake_intensity.max(intensity);
        self.shake_duration = self.shake_duration.max(duration);
    }

    pub fn flash(&mut self, tint: Tint, duration: f32) {
        self.flash_tint = Some(tint);
        self.flash_alpha = 1.0;
        self.flash_duration = duration;
    }

    pub fn slow_mo(&mut self, factor: f32, duration: f32) {
        self.slow_mo_factor = factor;
        self.slow_mo_duration = duration;
    }

    /// Brief near-stop. Ignored while the freeze cooldown runs.
    pub fn freeze(&mut self, duration: f32) {
        if self.freeze_cooldown > 0.0 {
            return;
        }
        self.freeze_time = duration.min(Self::MAX_FREEZE);
        self.freeze_cooldown = Self::FREEZE_COOLDOWN;
    }

    /// Multiplier for simulation time: freeze wins over slow motion and
    /// neither goes below [`Self::MIN_TIME_SCALE`].
    pub fn time_scale(&self) -> f32 {
        if self.freeze_time > 0.0 {
            return Self::MIN_TIME_SCALE;
        }
        self.slow_mo_factor.max(Self::MIN_TIME_SCALE)
    }

    pub fn apply(&mut self, cue: EffectCue) {
        match cue {
            EffectCue::Shake {
                intensity,
                duration,
            } => self.shake(intensity, duration),
            EffectCue::Flash { tint, duration } => self.flash(tint, duration),
            EffectCue::SlowMo { factor, duration } => self.slow_mo(factor, duration),
            EffectCue::Freeze { duration } => self.freeze(duration),
            EffectCue::PlayerHit => {
                self.shake(8.0, 0.2);
                self.flash(Tint::RED, 0.1);
                self.freeze(0.03);
            }
            EffectCue::EnemyHit => {
                self.shake(3.0, 0.1);
                self.freeze(0.02);
            }
            EffectCue::EnemyDeath => self.shake(5.0, 0.15),
            EffectCue::BossHit => {
                self.shake(6.0, 0.15);
                self.freeze(0.04);
            }
            EffectCue::BossDeath => {
                self.shake(10.0, 0.3);
                self.flash(Tint::WHITE, 0.2);
            }
            EffectCue::LevelComplete => self.flash(Tint::WHITE, 0.15),
            EffectCue::PowerUp => {
                self.shake(4.0, 0.1);
                self.flash(Tint::YELLOW, 0.08);
            }
            EffectCue::RainbowBlast => {
                self.shake(12.0, 0.4);
                self.flash(Tint::PINK, 0.25);
                self.freeze(0.08);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn freeze_overrides_slow_mo_and_scale_has_floor() {
        let mut effects = ScreenEffects::default();
        assert_eq!(effects.time_scale(), 1.0);

        effects.slow_mo(0.3, 0.5);
        assert!((effects.time_scale() - 0.3).abs() < 1e-6);

        effects.slow_mo(0.01, 0.5);
        assert_eq!(effects.time_scale(), 0.1);

        effects.slow_mo(0.5, 0.5);
        effects.freeze(0.05);
        assert_eq!(effects.time_scale(), 0.1);
    }

    #[test]
    fn freeze_is_capped_and_rate_limited() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut effects = ScreenEffects::default();
        effects.freeze(1.0);
        assert_eq!(effects.freeze_time, 0.1);

        effects.update(0.12, &mut rng);
        effects.freeze(0.05);
        // Cooldown (0.15) still has 0.03 left.
        assert!(effects.freeze_time <= 0.0);

        effects.update(0.05, &mut rng);
        effects.freeze(0.05);
        assert_eq!(effects.freeze_time, 0.05);
    }

    #[test]
    fn shake_merges_and_decays_to_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut effects = ScreenEffects::default();
        effects.shake(8.0, 0.2);
        effects.shake(4.0, 0.5);
        assert_eq!(effects.shake_intensity, 8.0);
        assert_eq!(effects.shake_duration, 0.5);

        effects.update(0.1, &mut rng);
        assert!(effects.shake_offset.x.abs() <= 8.0);
        assert!((effects.shake_intensity - 7.2).abs() < 1e-5);

        for _ in 0..10 {
            effects.update(0.1, &mut rng);
        }
        assert_eq!(effects.shake_offset, Vec2::ZERO);
    }

    #[test]
    fn slow_mo_expires_on_real_time() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut effects = ScreenEffects::default();
        effects.apply(EffectCue::SlowMo {
            factor: 0.3,
            duration: 0.2,
        });
        effects.update(0.1, &mut rng);
        assert!((effects.time_scale() - 0.3).abs() < 1e-6);
        for _ in 0..3 {
            effects.update(0.1, &mut rng);
        }
        assert_eq!(effects.time_scale(), 1.0);
    }
}
