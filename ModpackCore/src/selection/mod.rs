//! Persisted mod selections: the excluded-mods list and named presets

mod excluded;
mod presets;

pub use excluded::{load_excluded, parse_excluded, save_excluded};
pub use presets::PresetStore;
