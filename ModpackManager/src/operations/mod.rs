//! High-level operations composing the engine with the application context

pub mod download;
pub mod game;
pub mod install;
pub mod selection;

pub use download::{DownloadOutcome, download_all, download_modpack, update_modpack};
pub use install::{install_modpack, installed_info, uninstall_modpack, verify};
pub use selection::SelectionSession;
