//! Run-wide configuration, loadable from `assets/data/config.ron`.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::world::DataLoadError;

/// Level files in play order.
pub const LEVEL_ORDER: [&str; 10] = [
    "level1", "level2", "level6a", "level6", "level7a", "level7", "level8a", "level8", "level3",
    "level5",
];

/// Global settings for a run.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed; `None` draws from entropy
    pub seed: Option<u64>,
    /// Visible area in world units
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Lives at the start of a run
    pub starting_lives: u32,
    /// Level names (file stems) in play order
    pub level_order: Vec<String>,
    /// Directory holding one `.ron` descriptor per level
    pub levels_dir: String,
    /// Animation table file
    pub animations_path: String,
    /// High-score file; `None` keeps scores in memory only
    pub scores_path: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            viewport_width: 800.0,
            viewport_height: 600.0,
            starting_lives: 3,
            level_order: LEVEL_ORDER.iter().map(|name| name.to_string()).collect(),
            levels_dir: "assets/data/levels".to_string(),
            animations_path: "assets/data/animations.ron".to_string(),
            scores_path: None,
        }
    }
}

impl GameConfig {
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Read a config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(display));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: display.clone(),
            details: e.to_string(),
        })?;
        ron::from_str(&contents).map_err(|e| DataLoadError::ParseError {
            path: display,
            details: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: GameConfig = ron::from_str("(seed: Some(9), starting_lives: 5)").unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.viewport(), Vec2::new(800.0, 600.0));
        assert_eq!(config.level_order.len(), LEVEL_ORDER.len());
    }

    #[test]
    fn missing_file_is_reported() {
        let result = GameConfig::from_file("does/not/exist.ron");
        assert!(matches!(result, Err(DataLoadError::FileNotFound(_))));
    }
}
