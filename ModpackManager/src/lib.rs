//! ModpackManager - Balatro modpack manager
//!
//! Wraps [`modpack_core`] in an [`AppContext`] built once at startup and
//! exposes the operations a front-end needs. The `cli` feature adds the
//! `modpack-manager` command-line front-end.

// Re-export the engine
pub use modpack_core;

pub mod context;
pub mod error;
pub mod operations;

#[cfg(feature = "cli")]
pub mod cli;

pub use context::{AppContext, ContextOptions, OperationGuard};
pub use error::{Error, Result};
