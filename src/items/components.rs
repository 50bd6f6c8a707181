//! Power-up pickups and destructible gems.

use bevy::prelude::*;
use serde::Deserialize;

use crate::combat::EffectCue;
use crate::core::{Bounds, Outbox, SoundId};

/// Timed player modifier granted by a power-up pickup.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Speed,
    Shield,
    RapidFire,
    Damage,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Speed,
        PowerUpKind::Shield,
        PowerUpKind::RapidFire,
        PowerUpKind::Damage,
        PowerUpKind::Magnet,
    ];

    /// Seconds the effect lasts once collected.
    pub fn duration(self) -> f32 {
        match self {
            PowerUpKind::Speed | PowerUpKind::RapidFire => 8.0,
            PowerUpKind::Shield | PowerUpKind::Damage => 10.0,
            PowerUpKind::Magnet => 15.0,
        }
    }

    /// Banner headline shown on pickup.
    pub fn title(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "SPEED BOOST!",
            PowerUpKind::Shield => "SHIELD!",
            PowerUpKind::RapidFire => "RAPID FIRE!",
            PowerUpKind::Damage => "POWER UP!",
            PowerUpKind::Magnet => "MAGNET!",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "Move 50% faster",
            PowerUpKind::Shield => "Blocks one hit",
            PowerUpKind::RapidFire => "Shoot much faster",
            PowerUpKind::Damage => "2x damage dealt",
            PowerUpKind::Magnet => "Attracts pickups",
        }
    }
}

/// Power-up lying in the level.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    /// Phase of the cosmetic bobbing
    pub bob: f32,
    pub collected: bool,
}

impl PowerUp {
    pub const SIZE: f32 = 32.0;
    /// Magnet pull radius, centre to centre.
    pub const MAGNET_RANGE: f32 = 200.0;
    pub const MAGNET_SPEED: f32 = 200.0;

    pub fn new(kind: PowerUpKind, pos: Vec2, bob: f32) -> Self {
        Self {
            kind,
            pos,
            bob,
            collected: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.bob += dt * 3.0;
    }

    /// Collection box; the bob is visual only.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_pos_size(self.pos, Vec2::splat(Self::SIZE))
    }

    /// Drift toward `target` if within magnet range.
    pub fn attract(&mut self, target: Vec2, dt: f32) {
        let offset = target - self.bounds().center();
        let dist = offset.length();
        if dist > 0.0 && dist < Self::MAGNET_RANGE {
            self.pos += offset / dist * Self::MAGNET_SPEED * dt;
        }
    }
}

/// Destructible crystal that powers the Pyromancer.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Gem {
    pub pos: Vec2,
    pub health: i32,
    pub hurt: bool,
    pub hurt_timer: f32,
    pub destroyed: bool,
}

impl Gem {
    pub const SIZE: Vec2 = Vec2::new(48.0, 64.0);
    pub const HEALTH: i32 = 2;
    pub const SCORE: u32 = 500;

    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            health: Self::HEALTH,
            hurt: false,
            hurt_timer: 0.0,
            destroyed: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_pos_size(self.pos, Self::SIZE)
    }

    pub fn update(&mut self, dt: f32) {
        if self.destroyed || !self.hurt {
            return;
        }
        self.hurt_timer -= dt;
        if self.hurt_timer <= 0.0 {
            self.hurt = false;
        }
    }

    /// Apply a hit. Returns `true` if this hit shattered the gem.
    pub fn take_damage(&mut self, amount: i32, out: &mut Outbox) -> bool {
        if self.destroyed {
            return false;
        }
        self.health -= amount;
        self.hurt = true;
        self.hurt_timer = 0.2;
        out.sound(SoundId::Hit);

        if self.health <= 0 {
            self.destroyed = true;
            out.sound(SoundId::Explosion);
            out.effect(EffectCue::Shake {
                intensity: 5.0,
                duration: 0.15,
            });
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gem_shatters_on_second_hit() {
        let mut gem = Gem::new(Vec2::new(100.0, 100.0));
        let mut out = Outbox::default();
        assert!(!gem.take_damage(1, &mut out));
        assert!(gem.hurt);
        gem.update(0.25);
        assert!(!gem.hurt);
        assert!(gem.take_damage(1, &mut out));
        assert!(gem.destroyed);
        assert!(!gem.take_damage(1, &mut out));
        assert_eq!(out.sounds.last(), Some(&SoundId::Explosion));
    }

    #[test]
    fn magnet_pulls_only_within_range() {
        let mut near = PowerUp::new(PowerUpKind::Magnet, Vec2::new(100.0, 100.0), 0.0);
        near.attract(Vec2::new(216.0, 116.0), 0.5);
        assert_eq!(near.pos, Vec2::new(200.0, 100.0));

        let mut far = PowerUp::new(PowerUpKind::Speed, Vec2::new(100.0, 100.0), 0.0);
        far.attract(Vec2::new(600.0, 116.0), 0.5);
        assert_eq!(far.pos, Vec2::new(100.0, 100.0));
    }
}
