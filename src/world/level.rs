//! Runtime level geometry.

use bevy::prelude::*;

use super::data::{HazardDef, LevelDescriptor, PickupKind, PowerUpDef, SpawnDef};
use crate::core::Bounds;

/// Largest distance a moving platform may report travelling in one tick.
pub const MAX_PLATFORM_DELTA: f32 = 15.0;

/// Static rectangle the actors collide with.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub bounds: Bounds,
    pub ground: bool,
}

/// Platform whose position is a pure function of elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingPlatform {
    pub bounds: Bounds,
    pub start: Vec2,
    pub amplitude: Vec2,
    pub speed: f32,
    pub timer: f32,
    /// Movement during the last update, clamped to [`MAX_PLATFORM_DELTA`]
    pub delta: Vec2,
}

impl MovingPlatform {
    pub fn update(&mut self, dt: f32) {
        let prev = Vec2::new(self.bounds.x, self.bounds.y);
        self.timer += dt;

        let speed = if self.speed == 0.0 { 1.0 } else { self.speed };
        let wave = (self.timer * speed).sin();
        if self.amplitude.x != 0.0 {
            self.bounds.x = self.start.x + wave * self.amplitude.x;
        }
        if self.amplitude.y != 0.0 {
            self.bounds.y = self.start.y + wave * self.amplitude.y;
        }

        let moved = Vec2::new(self.bounds.x, self.bounds.y) - prev;
        self.delta = moved.clamp(Vec2::splat(-MAX_PLATFORM_DELTA), Vec2::splat(MAX_PLATFORM_DELTA));
    }
}

/// Collectible still lying in the level.
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub collected: bool,
}

impl Pickup {
    /// 32x32 collection box centred on the pickup position.
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, 32.0)
    }
}

/// Damaging region.
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub kind: String,
    pub bounds: Bounds,
    pub damage: i32,
}

impl From<&HazardDef> for Hazard {
    fn from(def: &HazardDef) -> Self {
        Self {
            kind: def.kind.clone(),
            bounds: Bounds::new(def.x, def.y, def.width, def.height),
            damage: if def.damage == 0 { 1 } else { def.damage },
        }
    }
}

/// Boss shown by the mid-level entrance cutscene.
#[derive(Debug, Clone, PartialEq)]
pub struct BossIntroDef {
    pub boss_type: String,
    pub name: Option<String>,
    pub subtitle: Option<String>,
}

/// The level currently being played.
///
/// Built from a [`LevelDescriptor`] on load. Only moving-platform positions
/// and pickup flags change afterwards.
#[derive(Resource, Debug, Clone, Default)]
pub struct Level {
    pub key: String,
    pub name: String,
    pub theme: String,
    pub width: f32,
    pub height: f32,
    pub player_start: Vec2,
    pub end_zone: Option<Bounds>,
    pub platforms: Vec<Platform>,
    pub moving: Vec<MovingPlatform>,
    pub spawns: Vec<SpawnDef>,
    pub pickups: Vec<Pickup>,
    pub hazards: Vec<Hazard>,
    pub gem_spawns: Vec<Vec2>,
    pub power_up_spawns: Option<Vec<PowerUpDef>>,
    pub is_boss_level: bool,
    pub is_final_level: bool,
    pub boss_intro: Option<BossIntroDef>,
    solids: Vec<Bounds>,
    statics: Vec<Bounds>,
}

impl Level {
    pub fn from_descriptor(key: &str, descriptor: &LevelDescriptor) -> Self {
        let platforms: Vec<Platform> = descriptor
            .platforms
            .iter()
            .map(|def| Platform {
                bounds: def.bounds(),
                ground: def.ground,
            })
            .collect();

        let moving = descriptor
            .moving_platforms
            .iter()
            .map(|def| MovingPlatform {
                bounds: Bounds::new(def.x, def.y, def.width, def.height),
                start: Vec2::new(def.x, def.y),
                amplitude: Vec2::new(def.move_x, def.move_y),
                speed: def.speed,
                timer: def.start_offset,
                delta: Vec2::ZERO,
            })
            .collect();

        let boss_intro = descriptor.has_boss_intro.then(|| BossIntroDef {
            boss_type: descriptor
                .boss_type
                .clone()
                .unwrap_or_else(|| "demon_lord".to_string()),
            name: descriptor.boss_name.clone(),
            subtitle: descriptor.boss_subtitle.clone(),
        });

        let mut level = Self {
            key: key.to_string(),
            name: descriptor.name.clone(),
            theme: descriptor.theme.clone(),
            width: descriptor.width,
            height: descriptor.height,
            player_start: descriptor.player_start.into(),
            end_zone: descriptor.level_end,
            statics: platforms.iter().map(|p| p.bounds).collect(),
            platforms,
            moving,
            spawns: descriptor.enemy_spawns.clone(),
            pickups: descriptor
                .pickups
                .iter()
                .map(|def| Pickup {
                    kind: def.kind,
                    pos: Vec2::new(def.x, def.y),
                    collected: false,
                })
                .collect(),
            hazards: descriptor.hazards.iter().map(Hazard::from).collect(),
            gem_spawns: descriptor.gem_spawns.iter().map(|&p| p.into()).collect(),
            power_up_spawns: descriptor.power_up_spawns.clone(),
            is_boss_level: descriptor.is_boss_level,
            is_final_level: descriptor.is_final_level,
            boss_intro,
            solids: Vec::new(),
        };
        level.refresh_solids();
        level
    }

    /// Level size as a vector.
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Static platforms followed by moving platforms at their current
    /// positions.
    pub fn solids(&self) -> &[Bounds] {
        &self.solids
    }

    /// Static platforms only.
    pub fn static_solids(&self) -> &[Bounds] {
        &self.statics
    }

    fn refresh_solids(&mut self) {
        self.solids.clear();
        self.solids.extend(self.statics.iter().copied());
        self.solids.extend(self.moving.iter().map(|p| p.bounds));
    }

    /// Advance moving platforms.
    pub fn update(&mut self, dt: f32) {
        if self.moving.is_empty() {
            return;
        }
        for platform in &mut self.moving {
            platform.update(dt);
        }
        self.refresh_solids();
    }

    /// Moving platform a grounded hitbox is resting on.
    ///
    /// The platform ridden last tick gets a looser tolerance so riders are
    /// not dropped by small snapping errors.
    pub fn platform_under(&self, hitbox: Bounds, current: Option<usize>) -> Option<usize> {
        let feet = hitbox.bottom();

        if let Some(index) = current {
            if let Some(platform) = self.moving.get(index) {
                let b = platform.bounds;
                let still_on = feet >= b.y - 10.0
                    && feet <= b.y + 12.0
                    && hitbox.right() > b.x - 5.0
                    && hitbox.x < b.right() + 5.0;
                if still_on {
                    return Some(index);
                }
            }
        }

        self.moving.iter().position(|platform| {
            let b = platform.bounds;
            feet >= b.y - 8.0 && feet <= b.y + 10.0 && hitbox.right() > b.x && hitbox.x < b.right()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::data::MovingPlatformDef;

    fn level_with(moving: Vec<MovingPlatformDef>) -> Level {
        let mut descriptor = LevelDescriptor::blank("test", 2000.0, 600.0);
        descriptor.platforms.push(crate::world::data::PlatformDef {
            x: 0.0,
            y: 500.0,
            width: 2000.0,
            height: 100.0,
            ground: true,
        });
        descriptor.moving_platforms = moving;
        Level::from_descriptor("test", &descriptor)
    }

    fn mover(move_x: f32, move_y: f32, speed: f32) -> MovingPlatformDef {
        MovingPlatformDef {
            x: 500.0,
            y: 300.0,
            width: 100.0,
            height: 20.0,
            move_x,
            move_y,
            speed,
            start_offset: 0.0,
        }
    }

    #[test]
    fn platform_delta_never_exceeds_clamp() {
        let mut level = level_with(vec![mover(5000.0, 8000.0, 40.0), mover(3.0, 0.0, 0.0)]);
        for _ in 0..200 {
            level.update(0.1);
            for platform in &level.moving {
                assert!(platform.delta.x.abs() <= MAX_PLATFORM_DELTA);
                assert!(platform.delta.y.abs() <= MAX_PLATFORM_DELTA);
            }
        }
    }

    #[test]
    fn solids_follow_moving_platforms() {
        let mut level = level_with(vec![mover(100.0, 0.0, 1.0)]);
        assert_eq!(level.solids().len(), 2);
        level.update(0.5);
        let expected = 500.0 + (0.5f32).sin() * 100.0;
        assert!((level.solids()[1].x - expected).abs() < 1e-3);
        assert_eq!(level.static_solids().len(), 1);
    }

    #[test]
    fn rider_lookup_uses_looser_tolerance_for_current_platform() {
        let level = level_with(vec![mover(0.0, 0.0, 1.0)]);
        // Feet 11 px below the surface: too far for a fresh landing.
        let hitbox = Bounds::new(520.0, 263.0, 32.0, 48.0);
        assert_eq!(level.platform_under(hitbox, None), None);
        assert_eq!(level.platform_under(hitbox, Some(0)), Some(0));

        let standing = Bounds::new(520.0, 252.0, 32.0, 48.0);
        assert_eq!(level.platform_under(standing, None), Some(0));
    }

    #[test]
    fn intro_boss_defaults_to_demon_lord() {
        let mut descriptor = LevelDescriptor::blank("boss", 1800.0, 600.0);
        descriptor.has_boss_intro = true;
        let level = Level::from_descriptor("boss", &descriptor);
        assert_eq!(level.boss_intro.unwrap().boss_type, "demon_lord");
    }
}
