//! World module - level descriptors, runtime level geometry and data loading.

mod data;
mod error;
mod level;
mod plugin;

pub use data::*;
pub use error::DataLoadError;
pub use level::*;
pub use plugin::WorldPlugin;
