//! High-score table with pluggable persistence.
//!
//! Persistence is best effort: a store that cannot read or write its file
//! logs a warning and keeps working from memory.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Entries kept in the table.
pub const MAX_SCORES: usize = 10;
/// Name recorded when none is given.
pub const DEFAULT_NAME: &str = "Player";

/// Persistence failures.
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("Score file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not encode scores: {0}")]
    Encode(#[from] ron::Error),

    #[error("Could not decode scores: {0}")]
    Decode(#[from] ron::error::SpannedError),
}

/// One row of the table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub score: u32,
    pub name: String,
    /// Seconds since the Unix epoch
    pub recorded_at: u64,
}

/// Where high scores live.
pub trait ScoreStore: Send + Sync {
    /// Entries, best first.
    fn scores(&self) -> Vec<ScoreEntry>;

    /// Insert an entry and return the updated table.
    fn add_score(&mut self, score: u32, name: &str) -> Vec<ScoreEntry>;

    fn clear(&mut self);

    /// Would `score` make the table?
    fn is_high_score(&self, score: u32) -> bool {
        let scores = self.scores();
        if scores.len() < MAX_SCORES {
            return true;
        }
        scores.last().is_some_and(|lowest| score > lowest.score)
    }

    fn high_score(&self) -> u32 {
        self.scores().first().map_or(0, |entry| entry.score)
    }
}

fn insert_sorted(scores: &mut Vec<ScoreEntry>, score: u32, name: &str) {
    let recorded_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    scores.push(ScoreEntry {
        score,
        name: if name.is_empty() { DEFAULT_NAME } else { name }.to_string(),
        recorded_at,
    });
    // Stable sort: equal scores keep arrival order
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(MAX_SCORES);
}

/// Table that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: Vec<ScoreEntry>,
}

impl ScoreStore for MemoryScoreStore {
    fn scores(&self) -> Vec<ScoreEntry> {
        self.scores.clone()
    }

    fn add_score(&mut self, score: u32, name: &str) -> Vec<ScoreEntry> {
        insert_sorted(&mut self.scores, score, name);
        self.scores.clone()
    }

    fn clear(&mut self) {
        self.scores.clear();
    }
}

/// Table mirrored to a RON file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    cache: Vec<ScoreEntry>,
}

impl FileScoreStore {
    /// Open the table at `path`. An unreadable file starts an empty table.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = match Self::read(&path) {
            Ok(scores) => scores,
            Err(e) => {
                warn!("Could not read high scores from {:?}: {}", path, e);
                Vec::new()
            }
        };
        Self { path, cache }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<Vec<ScoreEntry>, ScoreStoreError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(path)?;
        let mut scores: Vec<ScoreEntry> = ron::from_str(&contents)?;
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(MAX_SCORES);
        Ok(scores)
    }

    fn write(&self) -> Result<(), ScoreStoreError> {
        let encoded = ron::ser::to_string_pretty(&self.cache, ron::ser::PrettyConfig::default())?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encoded)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.write() {
            warn!("Could not save high scores to {:?}: {}", self.path, e);
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn scores(&self) -> Vec<ScoreEntry> {
        self.cache.clone()
    }

    fn add_score(&mut self, score: u32, name: &str) -> Vec<ScoreEntry> {
        insert_sorted(&mut self.cache, score, name);
        self.persist();
        self.cache.clone()
    }

    fn clear(&mut self) {
        self.cache.clear();
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("Could not remove high score file {:?}: {}", self.path, e);
            }
        }
    }
}

/// The run's score store.
#[derive(Resource)]
pub struct HighScores(pub Box<dyn ScoreStore>);

impl Default for HighScores {
    fn default() -> Self {
        Self(Box::new(MemoryScoreStore::default()))
    }
}

impl HighScores {
    /// File-backed if a path is configured, in-memory otherwise.
    pub fn from_path(path: Option<&str>) -> Self {
        match path {
            Some(path) => Self(Box::new(FileScoreStore::open(path))),
            None => Self::default(),
        }
    }

    /// Record `score` if it makes the table. Returns `true` if it did.
    pub fn submit(&mut self, score: u32) -> bool {
        if !self.0.is_high_score(score) {
            return false;
        }
        self.0.add_score(score, DEFAULT_NAME);
        info!("New high score entry: {}", score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_capped() {
        let mut store = MemoryScoreStore::default();
        for score in [300, 100, 900, 500, 700, 200, 800, 400, 600, 1000, 50] {
            store.add_score(score, "");
        }
        let scores = store.scores();
        assert_eq!(scores.len(), MAX_SCORES);
        assert_eq!(scores[0].score, 1000);
        assert_eq!(scores[9].score, 100);
        assert_eq!(scores[0].name, DEFAULT_NAME);
        assert_eq!(store.high_score(), 1000);
    }

    #[test]
    fn full_table_only_accepts_better_scores() {
        let mut store = MemoryScoreStore::default();
        assert!(store.is_high_score(0));
        for score in 1..=10 {
            store.add_score(score * 100, "ace");
        }
        assert!(!store.is_high_score(100));
        assert!(store.is_high_score(101));
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "retrocorn-scores-{}.ron",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let mut store = FileScoreStore::open(&path);
        store.add_score(1500, "Sparkle");
        store.add_score(2500, "Glitter");

        let reopened = FileScoreStore::open(&path);
        let names: Vec<_> = reopened.scores().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Glitter".to_string(), "Sparkle".to_string()]);

        let mut reopened = reopened;
        reopened.clear();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_degrades_to_empty_table() {
        let path = std::env::temp_dir().join(format!(
            "retrocorn-corrupt-{}.ron",
            std::process::id()
        ));
        fs::write(&path, "not ron at all [").unwrap();

        let mut store = FileScoreStore::open(&path);
        assert!(store.scores().is_empty());
        store.add_score(10, "Player");
        assert_eq!(store.high_score(), 10);
        let _ = fs::remove_file(&path);
    }
}
