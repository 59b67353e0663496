//! System tray integration
//!
//! Windows implementation of [`TrayShell`] on top of the `tray-icon` crate,
//! with toast notifications from `tauri-winrt-notification`.
//!
//! The menu is rebuilt from a [`TrayMenuState`] on every update. Item ids are
//! the stable [`TrayAction::menu_id`](lumina::tray::TrayAction::menu_id)
//! strings so that clicks can be mapped back to actions whatever menu
//! instance produced them.

use lumina::error::{LuminaError, Result, StringError};
use lumina::tray::{MenuEntry, TrayMenuState, TrayShell, render_icon};
use tracing::{debug, info};
use tray_icon::{
    Icon, TrayIconBuilder,
    menu::{Menu, MenuItem, PredefinedMenuItem},
};

/// Tooltip shown when hovering the tray icon
const TOOLTIP: &str = "Lumina - Brightness Controller";

/// System tray icon with context menu
pub struct SystemTray {
    /// The actual tray icon
    tray: tray_icon::TrayIcon,
}

impl SystemTray {
    /// Create the tray icon; the menu is attached by the presenter
    pub fn new() -> Result<Self> {
        info!("Creating system tray icon");

        let tray = TrayIconBuilder::new()
            .with_icon(Self::create_icon()?)
            .with_tooltip(TOOLTIP)
            .build()
            .map_err(|e| LuminaError::TrayError(Box::new(e)))?;

        info!("System tray icon created successfully");
        Ok(Self { tray })
    }

    fn create_icon() -> Result<Icon> {
        let image = render_icon();
        let (width, height) = image.dimensions();
        Icon::from_rgba(image.into_raw(), width, height)
            .map_err(|e| LuminaError::TrayError(Box::new(e)))
    }

    fn build_menu(state: &TrayMenuState) -> Result<Menu> {
        let tray_menu = Menu::new();

        for entry in state.entries() {
            let appended = match entry {
                MenuEntry::Item { label, action } => {
                    tray_menu.append(&MenuItem::with_id(action.menu_id(), label, true, None))
                }
                MenuEntry::Separator => tray_menu.append(&PredefinedMenuItem::separator()),
            };
            appended.map_err(|e| LuminaError::TrayError(Box::new(e)))?;
        }

        Ok(tray_menu)
    }
}

impl TrayShell for SystemTray {
    fn show_menu(&mut self, menu: &TrayMenuState) -> Result<()> {
        let tray_menu = Self::build_menu(menu)?;
        self.tray.set_menu(Some(Box::new(tray_menu)));
        debug!("Tray menu updated: {}", menu.current_label());
        Ok(())
    }

    fn notify(&mut self, title: &str, message: &str) -> Result<()> {
        use tauri_winrt_notification::{Duration, Toast};

        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(title)
            .text1(message)
            .duration(Duration::Short)
            .show()
            .map_err(|e| LuminaError::NotificationError(StringError::new(format!("{e:?}"))))
    }

    fn stop(&mut self) -> Result<()> {
        self.tray
            .set_visible(false)
            .map_err(|e| LuminaError::TrayError(Box::new(e)))
    }
}
