//! GUI module
//!
//! Platform adapters for the tray daemon: the tray icon and notifications,
//! global hotkey registration and the Win32 event pump feeding the
//! [`TrayPresenter`](lumina::tray::TrayPresenter).

#[cfg(windows)]
mod event_pump;
#[cfg(windows)]
mod hotkeys;
#[cfg(windows)]
mod tray;

use lumina::brightness::{BrightnessController, SystemBackend};
use lumina::config::AppConfig;
use lumina::error::Result;
use std::sync::Arc;

/// Run the tray daemon on the current thread until the user exits
#[cfg(windows)]
pub fn run_tray(
    controller: Arc<BrightnessController<SystemBackend>>,
    config: AppConfig,
) -> Result<()> {
    use event_pump::EventPump;
    use hotkeys::GlobalHotkeys;
    use lumina::tray::TrayPresenter;
    use tracing::info;
    use tray::SystemTray;

    let shell = SystemTray::new()?;
    let hotkeys = GlobalHotkeys::new()?;
    let events = EventPump::new(hotkeys.actions());

    let presenter = TrayPresenter::new(controller, shell, hotkeys, config)?;
    info!("Tray ready, entering event loop");
    presenter.run(events)
}

/// The tray daemon needs the Win32 tray and hotkey adapters
#[cfg(not(windows))]
pub fn run_tray(
    _controller: Arc<BrightnessController<SystemBackend>>,
    _config: AppConfig,
) -> Result<()> {
    use lumina::error::{LuminaError, StringError};

    Err(LuminaError::ConfigError(StringError::new(
        "The tray daemon is only available on Windows; use one-shot mode instead",
    )))
}
