//! Error types for world data loading.

use thiserror::Error;

/// Errors that can occur when loading level descriptors or data tables.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Path does not exist.
    #[error("No such file or directory: {0}")]
    FileNotFound(String),

    /// Path exists but could not be read.
    #[error("Could not read '{path}': {details}")]
    ReadError { path: String, details: String },

    /// Contents are not valid RON for the expected type.
    #[error("Malformed data in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A level has no room for its own geometry.
    #[error("Level '{name}' has invalid size {width}x{height}")]
    InvalidSize { name: String, width: f32, height: f32 },
}
