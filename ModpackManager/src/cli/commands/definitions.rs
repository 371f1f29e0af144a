//! Subcommand enum definitions for CLI

use clap::{Args, Subcommand};

use modpack_core::registry::DEFAULT_BRANCH;

/// Which downloaded modpack a command works on
#[derive(Args, Debug, Clone)]
pub struct ModpackArgs {
    /// Modpack name (defaults to the configured default modpack)
    #[arg(short, long)]
    pub modpack: Option<String>,

    /// Branch to use
    #[arg(short, long, default_value = DEFAULT_BRANCH)]
    pub branch: String,
}

/// Mod selection commands
#[derive(Subcommand)]
pub enum ModsCommands {
    /// Show every selectable mod and whether it is excluded
    List {
        #[command(flatten)]
        target: ModpackArgs,
    },

    /// Exclude or include mods, following dependencies
    Toggle {
        /// Mod folder name(s)
        #[arg(required = true)]
        mods: Vec<String>,

        /// Exclude the mods instead of flipping them
        #[arg(long, conflicts_with = "include")]
        exclude: bool,

        /// Include the mods instead of flipping them
        #[arg(long)]
        include: bool,

        #[command(flatten)]
        target: ModpackArgs,
    },

    /// Flip every mod
    Invert {
        #[command(flatten)]
        target: ModpackArgs,
    },

    /// Include every mod
    Reset {
        #[command(flatten)]
        target: ModpackArgs,
    },
}

/// Mod selection preset commands
#[derive(Subcommand)]
pub enum PresetCommands {
    /// List saved presets
    List,

    /// Save the current excluded mods as a preset
    Save {
        /// Preset name
        name: String,
    },

    /// Replace the excluded mods with a preset
    Load {
        /// Preset name
        name: String,

        #[command(flatten)]
        target: ModpackArgs,
    },

    /// Delete a preset
    Delete {
        /// Preset name
        name: String,
    },
}

/// Save file backup commands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Back up the save file now
    Now,

    /// List backups
    List,

    /// Restore a backup over the save file
    Restore {
        /// Backup file name (see `backup list`)
        name: String,
    },

    /// Delete every backup
    #[command(name = "delete-all")]
    DeleteAll,

    /// Back up on a timer until Enter is pressed
    Auto {
        /// Seconds between backups (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Open the backup folder
    Open,
}

/// Modpack version commands for Git downloads
#[derive(Subcommand)]
pub enum TimeTravelCommands {
    /// List versions of a downloaded modpack, newest first
    List {
        /// Modpack name (defaults to the configured default modpack)
        #[arg(short, long)]
        modpack: Option<String>,

        /// Number of versions to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Find the commit of a version (regular expression, whole message line)
    Find {
        /// Version to look for
        version: String,

        /// Modpack name (defaults to the configured default modpack)
        #[arg(short, long)]
        modpack: Option<String>,
    },

    /// Check out an older version; install again afterwards
    Go {
        /// Version to travel to
        version: String,

        /// Modpack name (defaults to the configured default modpack)
        #[arg(short, long)]
        modpack: Option<String>,
    },

    /// Return to the latest version
    Back {
        /// Modpack name (defaults to the configured default modpack)
        #[arg(short, long)]
        modpack: Option<String>,
    },
}

/// Settings commands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the current settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change one setting
    Set {
        /// Setting key
        key: String,

        /// New value
        value: String,
    },

    /// Restore the platform defaults
    Reset,
}

/// Lovely injector commands
#[derive(Subcommand)]
pub enum InjectorCommands {
    /// Check whether the injector is installed
    Status,

    /// Download and install the injector into the game directory
    Install,
}
