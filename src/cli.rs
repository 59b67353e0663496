//! Command-line interface
//!
//! Parses arguments with `clap` and runs the one-shot modes (set and `--get`).
//! Daemon mode is only recognised here; the binary owns the tray event loop.

use crate::brightness::{BrightnessBackend, BrightnessController, DEFAULT_STEP, MAX_BRIGHTNESS};
use crate::config::{AppConfig, DEFAULT_DECREASE_HOTKEY, DEFAULT_INCREASE_HOTKEY, HotkeyConfig};
use crate::error::{LuminaError, Result, StringError};
use clap::Parser;
use std::io::Write;
use tracing::info;

/// Monitor brightness controller
#[derive(Debug, Clone, Parser)]
#[command(name = "lumina", version, about = "Monitor brightness controller")]
pub struct Cli {
    /// Brightness (0-100, default: 5)
    #[arg(default_value_t = 5, allow_negative_numbers = true)]
    pub brightness: i64,

    /// Show current brightness instead of setting it
    #[arg(long)]
    pub get: bool,

    /// Run in daemon mode (system tray)
    #[arg(short, long)]
    pub daemon: bool,

    /// Percentage points per tray action or hotkey press (daemon mode)
    #[arg(long, default_value_t = DEFAULT_STEP, value_parser = clap::value_parser!(u8).range(1..))]
    pub step: u8,

    /// Hotkey that lowers brightness (daemon mode)
    #[arg(long, value_name = "ACCELERATOR", default_value = DEFAULT_DECREASE_HOTKEY)]
    pub decrease_hotkey: String,

    /// Hotkey that raises brightness (daemon mode)
    #[arg(long, value_name = "ACCELERATOR", default_value = DEFAULT_INCREASE_HOTKEY)]
    pub increase_hotkey: String,

    /// Do not show a notification after each tray action (daemon mode)
    #[arg(long)]
    pub no_notifications: bool,
}

/// What the invocation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the tray daemon
    Daemon,
    /// Print the current brightness
    Get,
    /// Set brightness once and exit
    Set(u8),
}

/// Result of a one-shot invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliOutcome {
    /// The command ran
    Completed,
    /// The input was rejected before touching any display
    RejectedInput,
}

impl CliOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::RejectedInput => 1,
        }
    }
}

impl Cli {
    /// Resolve the flags into a command
    ///
    /// `--daemon` wins over everything else, then `--get`; the positional
    /// brightness is only validated when it will actually be used.
    pub fn command(&self) -> Result<Command> {
        if self.daemon {
            return Ok(Command::Daemon);
        }
        if self.get {
            return Ok(Command::Get);
        }
        u8::try_from(self.brightness)
            .ok()
            .filter(|value| *value <= MAX_BRIGHTNESS)
            .map(Command::Set)
            .ok_or(LuminaError::InvalidBrightness(self.brightness))
    }

    /// Runtime settings for the tray daemon
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            step: self.step,
            hotkeys: HotkeyConfig {
                decrease: self.decrease_hotkey.clone(),
                increase: self.increase_hotkey.clone(),
            },
            show_notifications: !self.no_notifications,
        }
    }
}

/// Run a set or `--get` invocation, writing user-facing lines to `out`
pub fn run_one_shot<B: BrightnessBackend>(
    cli: &Cli,
    controller: &BrightnessController<B>,
    out: &mut impl Write,
) -> Result<CliOutcome> {
    match cli.command() {
        Ok(Command::Get) => {
            let brightness = controller.get_brightness()?;
            writeln!(out, "Current brightness: {brightness}%")?;
        }
        Ok(Command::Set(value)) => {
            controller.set_brightness(value)?;
            info!("Brightness set to {value}%");
            writeln!(out, "Brightness set to: {value}%")?;
        }
        Ok(Command::Daemon) => {
            return Err(LuminaError::ConfigError(StringError::new(
                "daemon mode cannot run as a one-shot command",
            )));
        }
        Err(LuminaError::InvalidBrightness(_)) => {
            writeln!(out, "Error: Brightness must be between 0-100")?;
            return Ok(CliOutcome::RejectedInput);
        }
        Err(e) => return Err(e),
    }
    Ok(CliOutcome::Completed)
}

/// Banner printed when the daemon starts
pub fn daemon_banner(config: &AppConfig) -> String {
    format!(
        "Starting Lumina in daemon mode...\n\
         Keyboard shortcuts:\n  \
         {} - Decrease brightness by {}%\n  \
         {} - Increase brightness by {}%\n\
         System tray icon provides additional options.",
        config.hotkeys.decrease, config.step, config.hotkeys.increase, config.step
    )
}
