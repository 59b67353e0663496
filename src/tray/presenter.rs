//! Tray presenter implementation
//!
//! Dispatches tray events to the brightness controller, notifies the user and
//! rebuilds the menu afterwards. Every callback catches its own errors: a
//! failed brightness change is logged and reported as a notification, a
//! failed menu rebuild keeps the previous menu. The tray never stops because
//! of a callback failure; only the exit action ends it.

use crate::brightness::{BrightnessBackend, BrightnessController};
use crate::config::{AppConfig, HotkeyBinding};
use crate::error::{LuminaError, Result};
use crate::tray::menu::{TrayAction, TrayEvent, TrayMenuState};
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Title used for tray notifications
pub const APP_TITLE: &str = "Lumina";

/// Icon, menu and notification capability of the host platform
pub trait TrayShell {
    /// Replace the tray menu with `menu`
    fn show_menu(&mut self, menu: &TrayMenuState) -> Result<()>;

    /// Show a transient notification
    fn notify(&mut self, title: &str, message: &str) -> Result<()>;

    /// Remove the tray icon
    fn stop(&mut self) -> Result<()>;
}

/// Global hotkey registration capability of the host platform
pub trait HotkeyRegistry {
    /// Register one hotkey
    fn register(&mut self, binding: &HotkeyBinding) -> Result<()>;

    /// Release every hotkey registered so far
    fn unregister_all(&mut self) -> Result<()>;
}

/// Lifecycle of the presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    /// Event loop active, hotkeys live
    Running,
    /// Terminal: hotkeys released, tray removed
    Stopped,
}

/// System tray presenter
///
/// Owns the hotkey registry for its whole lifetime: hotkeys are registered in
/// [`TrayPresenter::new`] and released exactly once, on the exit action, when
/// the event source runs dry, or when the presenter is dropped.
pub struct TrayPresenter<B, S, H>
where
    B: BrightnessBackend,
    S: TrayShell,
    H: HotkeyRegistry,
{
    controller: Arc<BrightnessController<B>>,
    shell: S,
    hotkeys: H,
    config: AppConfig,
    menu: TrayMenuState,
    state: PresenterState,
}

impl<B, S, H> TrayPresenter<B, S, H>
where
    B: BrightnessBackend,
    S: TrayShell,
    H: HotkeyRegistry,
{
    /// Show the initial menu and register the configured hotkeys
    ///
    /// A hotkey that fails to register aborts startup; anything registered
    /// before it is released again.
    pub fn new(
        controller: Arc<BrightnessController<B>>,
        mut shell: S,
        hotkeys: H,
        config: AppConfig,
    ) -> Result<Self> {
        config.validate()?;

        let current = match controller.get_brightness() {
            Ok(brightness) => Some(brightness),
            Err(e) => {
                warn!("Initial brightness unavailable: {e}");
                None
            }
        };
        let menu = TrayMenuState::build(current, config.step);
        shell.show_menu(&menu)?;

        let mut presenter = Self {
            controller,
            shell,
            hotkeys,
            config,
            menu,
            state: PresenterState::Running,
        };

        for binding in presenter.config.hotkey_bindings() {
            // On error the presenter is dropped here, which releases earlier bindings
            presenter.hotkeys.register(&binding)?;
            info!(
                "Registered hotkey {} -> {:?}",
                binding.accelerator, binding.action
            );
        }

        Ok(presenter)
    }

    /// Dispatch events until the exit action fires or the source ends
    pub fn run<I>(mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = TrayEvent>,
    {
        info!("Tray event loop started");
        for event in events {
            if self.handle_event(event).is_break() {
                break;
            }
        }
        self.stop()
    }

    /// Handle one event. Returns `Break` once the presenter has stopped.
    pub fn handle_event(&mut self, event: TrayEvent) -> ControlFlow<()> {
        if self.state == PresenterState::Stopped {
            debug!("Ignoring {:?} after stop", event);
            return ControlFlow::Break(());
        }

        let action = event.action();
        debug!("Handling {:?} from {}", action, event.origin());

        match action {
            TrayAction::ShowCurrent => self.show_current_brightness(),
            TrayAction::Increase => self.increase_brightness(),
            TrayAction::Decrease => self.decrease_brightness(),
            TrayAction::Exit => {
                if let Err(e) = self.stop() {
                    error!("Error while stopping tray: {e}");
                }
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    /// Release hotkeys and remove the tray icon. Only the first call has any effect.
    pub fn stop(&mut self) -> Result<()> {
        if self.state == PresenterState::Stopped {
            return Ok(());
        }
        self.state = PresenterState::Stopped;

        let hotkeys = self.hotkeys.unregister_all();
        let shell = self.shell.stop();
        info!("Tray stopped, hotkeys released");

        hotkeys.and(shell)
    }

    /// Current lifecycle state
    pub fn state(&self) -> PresenterState {
        self.state
    }

    /// Menu currently shown in the tray
    pub fn menu(&self) -> &TrayMenuState {
        &self.menu
    }

    /// The platform shell
    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// The hotkey registry
    pub fn hotkeys(&self) -> &H {
        &self.hotkeys
    }

    fn show_current_brightness(&mut self) {
        match self.controller.get_brightness() {
            Ok(brightness) => self.notify(&format!("Current brightness: {brightness}%")),
            Err(e) => self.report_failure(&e),
        }
        self.refresh_menu();
    }

    fn increase_brightness(&mut self) {
        match self.controller.increase_brightness(self.config.step) {
            Ok(brightness) => {
                self.notify(&format!("Increased brightness: {brightness}%"));
                self.refresh_menu();
            }
            Err(e) => self.report_failure(&e),
        }
    }

    fn decrease_brightness(&mut self) {
        match self.controller.decrease_brightness(self.config.step) {
            Ok(brightness) => {
                self.notify(&format!("Decreased brightness: {brightness}%"));
                self.refresh_menu();
            }
            Err(e) => self.report_failure(&e),
        }
    }

    /// Rebuild the menu from a fresh reading; keep the old one on any failure
    fn refresh_menu(&mut self) {
        let brightness = match self.controller.get_brightness() {
            Ok(brightness) => brightness,
            Err(e) => {
                warn!("Menu refresh skipped, keeping previous menu: {e}");
                return;
            }
        };

        let menu = TrayMenuState::build(Some(brightness), self.config.step);
        match self.shell.show_menu(&menu) {
            Ok(()) => self.menu = menu,
            Err(e) => warn!("Menu rebuild failed, keeping previous menu: {e}"),
        }
    }

    fn notify(&mut self, message: &str) {
        if !self.config.show_notifications {
            return;
        }
        if let Err(e) = self.shell.notify(APP_TITLE, message) {
            warn!("Failed to show notification '{message}': {e}");
        }
    }

    fn report_failure(&mut self, error: &LuminaError) {
        error!("Brightness action failed: {error}");
        self.notify(&format!("Brightness change failed: {error}"));
    }
}

impl<B, S, H> Drop for TrayPresenter<B, S, H>
where
    B: BrightnessBackend,
    S: TrayShell,
    H: HotkeyRegistry,
{
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Error releasing tray resources: {e}");
        }
    }
}
