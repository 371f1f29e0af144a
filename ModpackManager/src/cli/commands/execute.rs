//! Command execution implementations

use super::Commands;
use super::definitions::{
    BackupCommands, InjectorCommands, ModsCommands, PresetCommands, SettingsCommands, TimeTravelCommands,
};
use super::{backup, game, modpack, mods, settings, time_travel};
use crate::context::AppContext;

impl Commands {
    /// Execute the selected command.
    ///
    /// `yes` answers confirmation prompts in advance.
    ///
    /// # Errors
    /// Returns an error if the underlying operation fails.
    pub fn execute(&self, ctx: &mut AppContext, yes: bool) -> anyhow::Result<()> {
        match self {
            Commands::List { refresh } => modpack::list(ctx, *refresh),
            Commands::Info => modpack::info(ctx),
            Commands::Download { target, force, all } => {
                if *all {
                    modpack::download_all(ctx, *force)
                } else {
                    modpack::download(ctx, target, *force)
                }
            }
            Commands::Update { target } => modpack::update(ctx, target),
            Commands::Verify { target } => modpack::verify(ctx, target),
            Commands::Install { target } => modpack::install(ctx, target),
            Commands::Uninstall => modpack::uninstall(ctx, yes),
            Commands::Mods { command } => command.execute(ctx),
            Commands::Preset { command } => command.execute(ctx),
            Commands::Backup { command } => command.execute(ctx, yes),
            Commands::TimeTravel { command } => command.execute(ctx),
            Commands::Settings { command } => command.execute(ctx, yes),
            Commands::Profile { name, no_executable } => game::profile(ctx, name, !*no_executable),
            Commands::Play => game::play(ctx),
            Commands::Injector { command } => command.execute(ctx, yes),
            Commands::Versions => modpack::versions(ctx),
            Commands::CheckUpdate => modpack::check_update(ctx),
        }
    }
}

impl ModsCommands {
    /// Execute the selected mod selection command.
    ///
    /// # Errors
    /// Returns an error if the modpack is not downloaded or a mod is unknown.
    pub fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        match self {
            ModsCommands::List { target } => mods::list(ctx, target),
            ModsCommands::Toggle {
                mods: names,
                exclude,
                include,
                target,
            } => {
                let state = match (*exclude, *include) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                mods::toggle(ctx, target, names, state)
            }
            ModsCommands::Invert { target } => mods::invert(ctx, target),
            ModsCommands::Reset { target } => mods::reset(ctx, target),
        }
    }
}

impl PresetCommands {
    /// Execute the selected preset command.
    ///
    /// # Errors
    /// Returns an error if the preset does not exist or cannot be written.
    pub fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        match self {
            PresetCommands::List => mods::preset_list(ctx),
            PresetCommands::Save { name } => mods::preset_save(ctx, name),
            PresetCommands::Load { name, target } => mods::preset_load(ctx, name, target),
            PresetCommands::Delete { name } => mods::preset_delete(ctx, name),
        }
    }
}

impl BackupCommands {
    /// Execute the selected backup command.
    ///
    /// # Errors
    /// Returns an error if the save file or backup folder is unusable.
    pub fn execute(&self, ctx: &AppContext, yes: bool) -> anyhow::Result<()> {
        match self {
            BackupCommands::Now => backup::now(ctx),
            BackupCommands::List => backup::list(ctx),
            BackupCommands::Restore { name } => backup::restore(ctx, name, yes),
            BackupCommands::DeleteAll => backup::delete_all(ctx, yes),
            BackupCommands::Auto { interval } => backup::auto(ctx, *interval),
            BackupCommands::Open => backup::open(ctx),
        }
    }
}

impl TimeTravelCommands {
    /// Execute the selected time travel command.
    ///
    /// # Errors
    /// Returns an error if the modpack is not a Git download or git fails.
    pub fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        match self {
            TimeTravelCommands::List { modpack, limit } => time_travel::list(ctx, modpack.as_deref(), *limit),
            TimeTravelCommands::Find { version, modpack } => time_travel::find(ctx, modpack.as_deref(), version),
            TimeTravelCommands::Go { version, modpack } => time_travel::go(ctx, modpack.as_deref(), version),
            TimeTravelCommands::Back { modpack } => time_travel::back(ctx, modpack.as_deref()),
        }
    }
}

impl SettingsCommands {
    /// Execute the selected settings command.
    ///
    /// # Errors
    /// Returns an error for unknown keys, bad values or write failures.
    pub fn execute(&self, ctx: &mut AppContext, yes: bool) -> anyhow::Result<()> {
        match self {
            SettingsCommands::Show { json } => settings::show(ctx, *json),
            SettingsCommands::Set { key, value } => settings::set(ctx, key, value),
            SettingsCommands::Reset => settings::reset(ctx, yes),
        }
    }
}

impl InjectorCommands {
    /// Execute the selected injector command.
    ///
    /// # Errors
    /// Returns an error if the platform is unsupported or the install fails.
    pub fn execute(&self, ctx: &AppContext, yes: bool) -> anyhow::Result<()> {
        match self {
            InjectorCommands::Status => game::injector_status(ctx),
            InjectorCommands::Install => game::injector_install(ctx, yes),
        }
    }
}
