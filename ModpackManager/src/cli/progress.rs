//! CLI progress display utilities
//!
//! Step indicators for multi-stage commands, and progress bars driven by the
//! engine's fetch and install callbacks.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use modpack_core::fetch::{FetchPhase, FetchProgress};
use modpack_core::install::{InstallPhase, InstallProgress};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for checking/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Package - for downloads
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Floppy disk - for backups and saved files
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Gear - for installs
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Truck - for batch operations
pub static TRUCK: Emoji<'_, '_> = Emoji("🚚 ", "");
/// Clock - for time travel
pub static CLOCK: Emoji<'_, '_> = Emoji("🕰️  ", "");
/// Joystick - for launching the game
pub static JOYSTICK: Emoji<'_, '_> = Emoji("🕹️  ", "");

// =============================================================================
// Step-Based Progress
// =============================================================================

/// Print a step indicator: `[1/3] 📦 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

// =============================================================================
// Progress Styles
// =============================================================================

/// Spinner style for git output and other indeterminate steps
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {prefix:.bold.dim} {wide_msg}")
        .expect("valid template")
}

/// Progress bar style for counted steps
///
/// Format: `Copying [████████░░░░░░░░] 5/10`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
}

/// Progress bar style for downloads
///
/// Format: `Downloading [████████░░░░░░░░] 1.2 MiB/4.0 MiB (30%)`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bytes_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)")
        .expect("valid template")
}

// =============================================================================
// Engine Progress Adapters
// =============================================================================

/// Progress bar fed by [`FetchProgress`] callbacks.
///
/// Git output and unknown-size downloads show as a spinner with the latest
/// line; sized downloads and submodule updates switch to a bar.
pub struct FetchDisplay {
    pb: ProgressBar,
}

impl FetchDisplay {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.set_prefix(prefix.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn update(&self, progress: &FetchProgress) {
        match progress.phase {
            FetchPhase::Downloading if progress.total > 0 => {
                if self.pb.length() != Some(progress.total) {
                    self.pb.set_style(bytes_style());
                    self.pb.set_length(progress.total);
                }
                self.pb.set_message(progress.phase.as_str());
                self.pb.set_position(progress.current);
            }
            FetchPhase::Submodules if progress.total > 0 => {
                if self.pb.length() != Some(progress.total) {
                    self.pb.set_style(bar_style());
                    self.pb.set_length(progress.total);
                }
                self.pb.set_position(progress.current);
                self.pb
                    .set_message(progress.detail.clone().unwrap_or_else(|| progress.phase.as_str().to_string()));
            }
            _ => {
                let text = match &progress.detail {
                    Some(detail) => format!("{}: {detail}", progress.phase.as_str()),
                    None => progress.phase.as_str().to_string(),
                };
                self.pb.set_message(text);
            }
        }
    }

    /// Print above the spinner without breaking its line.
    pub fn suspend<F: FnOnce()>(&self, f: F) {
        self.pb.suspend(f);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

/// Progress bar fed by [`InstallProgress`] callbacks.
pub struct InstallDisplay {
    pb: ProgressBar,
}

impl InstallDisplay {
    #[must_use]
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(bar_style());
        Self { pb }
    }

    /// Copy callbacks come from a rayon pool, so `current` can arrive out
    /// of order; the bar counts callbacks instead.
    pub fn update(&self, progress: &InstallProgress) {
        if progress.phase == InstallPhase::Copying {
            self.pb.set_length(progress.total as u64);
            self.pb.inc(1);
            if let Some(ref name) = progress.current_file {
                self.pb.set_message(name.clone());
            }
        } else {
            self.pb.set_message(progress.phase.as_str());
        }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl Default for InstallDisplay {
    fn default() -> Self {
        Self::new()
    }
}
