//! CLI commands for profiles, the injector and launching

use std::time::Instant;

use modpack_core::fetch::FetchProgress;
use modpack_core::game::{BASE_EXECUTABLE, LaunchMethod, list_profiles};

use crate::cli::confirm;
use crate::cli::progress::{FetchDisplay, JOYSTICK, SPARKLE, print_done, print_step};
use crate::context::AppContext;
use crate::operations::game as game_ops;

/// Switch profile; the `.exe` copy only applies to Windows installs
pub fn profile(ctx: &mut AppContext, name: &str, create_exe: bool) -> anyhow::Result<()> {
    let create_exe = create_exe && cfg!(windows) && ctx.settings().game_dir().join(BASE_EXECUTABLE).is_file();
    let exe = game_ops::set_profile(ctx, name, create_exe)?;

    println!("Profile set to {name}");
    println!("Mods directory: {}", ctx.settings().mods_dir().display());
    if let Some(exe) = exe {
        println!("Executable: {}", exe.display());
    }

    let profiles = list_profiles(&ctx.settings().game_dir());
    if !profiles.is_empty() {
        println!("Profiles in the game directory: {}", profiles.join(", "));
    }
    Ok(())
}

pub fn play(ctx: &AppContext) -> anyhow::Result<()> {
    print_step(1, 1, JOYSTICK, "Launching Balatro...");
    match game_ops::play(ctx)? {
        LaunchMethod::Executable(exe) => println!("Started {}", exe.display()),
        LaunchMethod::Steam(uri) => println!("Started through Steam ({uri})"),
    }
    Ok(())
}

pub fn injector_status(ctx: &AppContext) -> anyhow::Result<()> {
    let game_dir = ctx.settings().game_dir();
    if game_ops::injector_installed(ctx)? {
        println!("Lovely injector is installed in {}", game_dir.display());
    } else {
        println!("Lovely injector is not installed in {}", game_dir.display());
        println!("Run `modpack-manager injector install` to install it.");
    }
    Ok(())
}

/// Install the injector, asking first if it is already present
pub fn injector_install(ctx: &AppContext, yes: bool) -> anyhow::Result<()> {
    if game_ops::injector_installed(ctx)? && !confirm("Lovely injector is already installed. Reinstall it?", yes)? {
        println!("Install cancelled.");
        return Ok(());
    }

    let start = Instant::now();
    print_step(1, 1, SPARKLE, "Installing Lovely injector...");
    let display = FetchDisplay::new("lovely");
    let result = game_ops::install_injector(ctx, &|p: &FetchProgress| display.update(p));
    display.finish();
    result?;

    println!("Lovely injector installed in {}", ctx.settings().game_dir().display());
    print_done(start.elapsed());
    Ok(())
}
