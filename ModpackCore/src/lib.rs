//! # ModpackCore
//!
//! Engine of the Balatro modpack manager: everything needed to download a
//! modpack, pick which of its mods to install and put them where the game
//! loads them from.
//!
//! ## Features
//!
//! - **Registry** - Modpack list from the remote manifest, cached for offline use
//! - **Fetch** - Git clone/pull with submodules, or zip download over HTTP
//! - **Selection** - Dependency-aware excluded mods, persisted lists and presets
//! - **Install** - Copy a modpack's `Mods` folder into the game's mods directory
//! - **Backups** - Timestamped save file copies, on demand or on a timer
//! - **Time travel** - Check out an older modpack version by commit message
//! - **Game** - Lovely injector install, profile executables, launching
//!
//! ## Quick Start
//!
//! ### Resolving a selection
//!
//! ```
//! use modpack_core::resolver::{DependencyMap, DependencyResolver, ModSelection};
//!
//! let mut deps = DependencyMap::new();
//! deps.insert("Cryptid".into(), vec!["Talisman".into()]);
//! let resolver = DependencyResolver::new(deps);
//!
//! let mut selection = ModSelection::new(["Cryptid", "Talisman"], &[]);
//! let changes = resolver.toggle(&mut selection, "Talisman", true);
//!
//! assert_eq!(changes.len(), 2);
//! assert_eq!(selection.is_excluded("Cryptid"), Some(true));
//! ```
//!
//! ### Installing a downloaded modpack
//!
//! ```no_run
//! use modpack_core::install::{InstallOptions, install_modpack};
//!
//! let options = InstallOptions {
//!     remove_existing: true,
//!     ..Default::default()
//! };
//! let excluded = vec!["Cryptid".to_string()];
//! let report = install_modpack(
//!     "Modpacks/Dimserenes-Modpack".as_ref(),
//!     "/path/to/Balatro/Mods".as_ref(),
//!     &excluded,
//!     &options,
//!     &|p| println!("{} {}/{}", p.phase.as_str(), p.current, p.total),
//! )?;
//! println!("Installed {} mods", report.installed.len());
//! # Ok::<(), modpack_core::Error>(())
//! ```

pub mod error;
pub mod settings;
pub mod registry;
pub mod resolver;
pub mod selection;
pub mod fetch;
pub mod install;
pub mod backup;
pub mod time_travel;
pub mod game;
pub mod versions;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::settings::{ManagerPaths, Settings};

    pub use crate::registry::{
        LoadedManifest, Manifest, ManifestOrigin, ManifestSource, ModpackEntry, ModpackRegistry, folder_name,
    };
    pub use crate::resolver::{Change, DependencyMap, DependencyResolver, ModSelection, ModState};
    pub use crate::selection::{PresetStore, load_excluded, save_excluded};

    // Fetching
    pub use crate::fetch::{
        DefaultFetcher, FetchPhase, FetchProgress, FetchRequest, FetchSource, Fetcher, GitClient, HttpClient,
        batch_fetch, verify_modpack,
    };

    // Install
    pub use crate::install::{
        InstallOptions, InstallPhase, InstallProgress, InstallReport, install_modpack, read_installed_info, uninstall,
    };

    pub use crate::backup::{AutoBackup, SaveBackups};
    pub use crate::game::{InjectorAsset, LaunchMethod, launch_game};
    pub use crate::versions::{UpdateStatus, check_manager_update};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
