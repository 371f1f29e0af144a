//! Game launch, profile executables and the Lovely injector

mod injector;
mod launch;

pub use injector::{ArchiveKind, InjectorAsset, LOVELY_RELEASES, install_injector};
pub use launch::{
    BASE_EXECUTABLE, LaunchMethod, create_profile_executable, launch_game, list_profiles, profile_executable,
    requires_injector, steam_uri,
};
