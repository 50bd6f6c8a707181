//! Level descriptors and their RON loading.
//!
//! Descriptors are static data: the runtime [`Level`](super::Level) is
//! built from one when a level loads, and the descriptor itself is never
//! mutated.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;
use crate::core::{Bounds, GameConfig};

/// A point in level space.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(point: Point) -> Self {
        Vec2::new(point.x, point.y)
    }
}

fn default_player_start() -> Point {
    Point { x: 100.0, y: 100.0 }
}

fn default_theme() -> String {
    "forest".to_string()
}

fn default_speed() -> f32 {
    1.0
}

fn default_hazard_damage() -> i32 {
    1
}

/// Static platform rectangle.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Ground slab rather than a floating ledge (rendering only)
    #[serde(default)]
    pub ground: bool,
}

impl PlatformDef {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

/// Platform oscillating as `start + sin(t * speed) * amplitude`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct MovingPlatformDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub move_x: f32,
    #[serde(default)]
    pub move_y: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Initial phase time, to stagger platforms sharing a speed
    #[serde(default)]
    pub start_offset: f32,
}

/// Where an enemy appears when the level loads.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SpawnDef {
    /// Archetype key, e.g. `"goblin"`
    pub kind: String,
    pub x: f32,
    pub y: f32,
}

/// Collectible placed in the level.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Heart,
    Star,
    Crystal,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PickupDef {
    pub kind: PickupKind,
    pub x: f32,
    pub y: f32,
}

/// Damaging region (spike plants and the like).
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct HazardDef {
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_hazard_damage")]
    pub damage: i32,
}

/// Fixed power-up placement overriding random placement.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PowerUpDef {
    pub kind: crate::items::PowerUpKind,
    pub x: f32,
    pub y: f32,
}

/// Complete level definition loaded from a RON file.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LevelDescriptor {
    pub name: String,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_player_start")]
    pub player_start: Point,
    #[serde(default)]
    pub level_end: Option<Bounds>,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub moving_platforms: Vec<MovingPlatformDef>,
    #[serde(default)]
    pub enemy_spawns: Vec<SpawnDef>,
    #[serde(default)]
    pub pickups: Vec<PickupDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub gem_spawns: Vec<Point>,
    #[serde(default)]
    pub power_up_spawns: Option<Vec<PowerUpDef>>,
    #[serde(default)]
    pub is_boss_level: bool,
    #[serde(default)]
    pub is_final_level: bool,
    #[serde(default)]
    pub has_boss_intro: bool,
    #[serde(default)]
    pub boss_type: Option<String>,
    #[serde(default)]
    pub boss_name: Option<String>,
    #[serde(default)]
    pub boss_subtitle: Option<String>,
}

impl LevelDescriptor {
    /// Empty level of the given size, for tests and tools.
    pub fn blank(name: &str, width: f32, height: f32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            theme: default_theme(),
            player_start: default_player_start(),
            level_end: None,
            platforms: Vec::new(),
            moving_platforms: Vec::new(),
            enemy_spawns: Vec::new(),
            pickups: Vec::new(),
            hazards: Vec::new(),
            gem_spawns: Vec::new(),
            power_up_spawns: None,
            is_boss_level: false,
            is_final_level: false,
            has_boss_intro: false,
            boss_type: None,
            boss_name: None,
            boss_subtitle: None,
        }
    }

    /// Parse a descriptor and reject degenerate sizes.
    pub fn from_ron(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        let descriptor: LevelDescriptor =
            ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
                path: path.to_string(),
                details: e.to_string(),
            })?;
        if descriptor.width <= 0.0 || descriptor.height <= 0.0 {
            return Err(DataLoadError::InvalidSize {
                name: descriptor.name,
                width: descriptor.width,
                height: descriptor.height,
            });
        }
        Ok(descriptor)
    }
}

/// Resource holding every loaded level, keyed by file stem.
#[derive(Resource, Default, Debug)]
pub struct LevelRegistry {
    pub levels: HashMap<String, LevelDescriptor>,
}

impl LevelRegistry {
    pub fn get(&self, key: &str) -> Option<&LevelDescriptor> {
        self.levels.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, descriptor: LevelDescriptor) {
        self.levels.insert(key.into(), descriptor);
    }

    /// Read every `.ron` file in `dir`. Files that fail to parse are logged
    /// and skipped; only a missing directory is an error.
    pub fn load_dir(dir: &Path) -> Result<Self, DataLoadError> {
        if !dir.exists() {
            return Err(DataLoadError::FileNotFound(dir.display().to_string()));
        }

        let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
            path: dir.display().to_string(),
            details: e.to_string(),
        })?;

        let mut registry = Self::default();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }

            let key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            match fs::read_to_string(&path) {
                Ok(contents) => {
                    match LevelDescriptor::from_ron(&contents, &path.display().to_string()) {
                        Ok(descriptor) => {
                            debug!("Loaded level: {} ({})", descriptor.name, key);
                            registry.levels.insert(key, descriptor);
                        }
                        Err(e) => error!("{}", e),
                    }
                }
                Err(e) => {
                    error!("Failed to read level {:?}: {}", path, e);
                }
            }
        }

        Ok(registry)
    }
}

/// Load all level descriptors from the configured directory.
///
/// Tests may insert a registry up front; a non-empty registry is kept.
pub fn load_level_registry(config: Res<GameConfig>, mut registry: ResMut<LevelRegistry>) {
    if !registry.levels.is_empty() {
        return;
    }

    match LevelRegistry::load_dir(Path::new(&config.levels_dir)) {
        Ok(loaded) => *registry = loaded,
        Err(e) => {
            error!("Could not load levels: {}", e);
            return;
        }
    }

    for name in &config.level_order {
        if registry.get(name).is_none() {
            warn!("Level '{}' is in the play order but was not loaded", name);
        }
    }

    info!("Loaded {} level descriptors", registry.levels.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_descriptor_gets_defaults() {
        let level = LevelDescriptor::from_ron(
            r#"(name: "Tiny", width: 800.0, height: 600.0, platforms: [(x: 0.0, y: 500.0, width: 800.0, height: 100.0, ground: true)])"#,
            "tiny.ron",
        )
        .unwrap();
        assert_eq!(level.theme, "forest");
        assert_eq!(level.player_start, Point { x: 100.0, y: 100.0 });
        assert!(level.level_end.is_none());
        assert!(level.platforms[0].ground);
        assert!(level.power_up_spawns.is_none());
    }

    #[test]
    fn zero_sized_level_is_rejected() {
        let result = LevelDescriptor::from_ron(r#"(name: "Flat", width: 0.0, height: 600.0)"#, "flat.ron");
        assert!(matches!(result, Err(DataLoadError::InvalidSize { .. })));
    }

    #[test]
    fn shipped_levels_cover_the_play_order() {
        let registry = LevelRegistry::load_dir(Path::new("assets/data/levels")).unwrap();
        for name in crate::core::LEVEL_ORDER {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        let forge = registry.get("level8").unwrap();
        assert_eq!(forge.gem_spawns.len(), 5);
        assert_eq!(forge.boss_type.as_deref(), Some("pyromancer"));
    }
}
