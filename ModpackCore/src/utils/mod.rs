//! Utility functions

pub mod fs;
pub mod path;

pub use fs::{copy_dir_all, remove_dir_all_force, timestamp};
pub use path::expand_path;
