pub mod backup;
pub mod definitions;
pub mod execute;
pub mod game;
pub mod modpack;
pub mod mods;
pub mod settings;
pub mod time_travel;

use clap::Subcommand;

use definitions::{
    BackupCommands, InjectorCommands, ModpackArgs, ModsCommands, PresetCommands, SettingsCommands, TimeTravelCommands,
};

#[derive(Subcommand)]
pub enum Commands {
    /// List the modpacks in the registry
    List {
        /// Fetch the registry again before listing
        #[arg(long)]
        refresh: bool,
    },

    /// Show the installed modpack and where files live
    Info,

    /// Download a modpack (or every modpack with --all)
    Download {
        #[command(flatten)]
        target: ModpackArgs,

        /// Replace an existing download
        #[arg(short, long)]
        force: bool,

        /// Download every modpack in the registry
        #[arg(long, conflicts_with = "modpack")]
        all: bool,
    },

    /// Update a downloaded modpack
    Update {
        #[command(flatten)]
        target: ModpackArgs,
    },

    /// Check a downloaded modpack for empty mod folders
    Verify {
        #[command(flatten)]
        target: ModpackArgs,
    },

    /// Install a downloaded modpack into the mods directory
    Install {
        #[command(flatten)]
        target: ModpackArgs,
    },

    /// Delete the mods directory
    Uninstall,

    /// Choose which mods get installed
    Mods {
        #[command(subcommand)]
        command: ModsCommands,
    },

    /// Saved mod selections
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },

    /// Save file backups
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },

    /// Switch a Git modpack to an older version and back
    #[command(name = "time-travel")]
    TimeTravel {
        #[command(subcommand)]
        command: TimeTravelCommands,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Switch to a profile (mods directory and game executable name)
    Profile {
        /// Profile name
        name: String,

        /// Do not create `<name>.exe` from balatro.exe
        #[arg(long)]
        no_executable: bool,
    },

    /// Launch the game
    Play,

    /// Lovely injector status and install
    Injector {
        #[command(subcommand)]
        command: InjectorCommands,
    },

    /// Latest published version of each modpack
    Versions,

    /// Check for a newer version of the manager
    #[command(name = "check-update")]
    CheckUpdate,
}

impl Commands {
    /// Whether the command needs an up-to-date registry from the network.
    pub fn needs_registry(&self) -> bool {
        matches!(
            self,
            Commands::List { .. }
                | Commands::Download { .. }
                | Commands::Update { .. }
                | Commands::Mods { .. }
                | Commands::Preset { .. }
                | Commands::Versions
                | Commands::CheckUpdate
        )
    }
}
