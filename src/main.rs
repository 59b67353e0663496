//! `Lumina` - external monitor brightness control
//!
//! `lumina [BRIGHTNESS]` sets every external monitor once, `lumina --get`
//! prints the current level and `lumina --daemon` starts the tray icon with
//! global hotkeys.

// GUI module is only in the binary, not the library
mod gui;

use anyhow::{Context, Result};
use clap::Parser;
use lumina::{
    brightness::{BrightnessController, SystemBackend},
    cli::{self, Cli, Command},
    error::get_user_friendly_error,
    utils::{self, LogTarget},
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if matches!(cli.command(), Ok(Command::Daemon)) {
        run_daemon(&cli)?;
        return Ok(ExitCode::SUCCESS);
    }

    utils::init_logging(LogTarget::Console).context("Failed to initialize logging system")?;

    let controller = BrightnessController::new(SystemBackend::new());
    let outcome = cli::run_one_shot(&cli, &controller, &mut std::io::stdout().lock())
        .context("Brightness command failed")?;

    Ok(ExitCode::from(outcome.exit_code()))
}

/// Run the tray daemon until the user picks Exit
fn run_daemon(cli: &Cli) -> Result<()> {
    let config = cli.app_config();
    println!("{}", cli::daemon_banner(&config));

    utils::init_logging(LogTarget::File).context("Failed to initialize logging system")?;
    info!("Lumina v{} starting in daemon mode", env!("CARGO_PKG_VERSION"));

    // Only one daemon may own the hotkeys at a time
    let _single_instance_guard = match utils::SingleInstanceGuard::new() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Single instance check failed: {e}");
            show_error(
                "Another instance of Lumina is already running.\n\n\
                 Check the system tray for the Lumina icon.",
            );
            return Err(e).context("Failed to acquire single instance lock");
        }
    };

    let controller = Arc::new(BrightnessController::new(SystemBackend::new()));

    if let Err(e) = gui::run_tray(controller, config) {
        error!("Tray daemon failed: {e}");
        show_error(&get_user_friendly_error(&e));
        return Err(e).context("Tray daemon failed");
    }

    info!("Lumina daemon exited cleanly");
    Ok(())
}

/// Shows an error dialog.
#[cfg(windows)]
fn show_error(message: &str) {
    use rfd::MessageDialog;

    MessageDialog::new()
        .set_title("Lumina - Error")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .set_level(rfd::MessageLevel::Error)
        .show();
}

/// Shows an error message (non-Windows fallback).
#[cfg(not(windows))]
fn show_error(message: &str) {
    eprintln!("ERROR: {message}");
}
