//! Configuration data models
//!
//! This module defines the runtime settings of the tray daemon.

use crate::brightness::DEFAULT_STEP;
use crate::error::{LuminaError, Result, StringError};
use crate::tray::TrayAction;

/// Default accelerator for lowering brightness
pub const DEFAULT_DECREASE_HOTKEY: &str = "shift+control+F2";

/// Default accelerator for raising brightness
pub const DEFAULT_INCREASE_HOTKEY: &str = "shift+control+F3";

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Percentage points per increase/decrease action
    pub step: u8,
    /// Global hotkey accelerators
    pub hotkeys: HotkeyConfig,
    /// Whether to show a notification after each tray action
    pub show_notifications: bool,
}

/// Global hotkey accelerators, e.g. `shift+control+F2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyConfig {
    /// Accelerator bound to decrease
    pub decrease: String,
    /// Accelerator bound to increase
    pub increase: String,
}

/// A single global hotkey and the tray action it triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    /// Accelerator string understood by the hotkey backend
    pub accelerator: String,
    /// Action dispatched when the hotkey is pressed
    pub action: TrayAction,
}

impl AppConfig {
    /// Check that the settings are usable before the tray starts
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(LuminaError::ConfigError(StringError::new(
                "Brightness step must be at least 1",
            )));
        }

        let decrease = self.hotkeys.decrease.trim();
        let increase = self.hotkeys.increase.trim();
        if decrease.is_empty() || increase.is_empty() {
            return Err(LuminaError::ConfigError(StringError::new(
                "Hotkey accelerators must not be empty",
            )));
        }
        if decrease.eq_ignore_ascii_case(increase) {
            return Err(LuminaError::ConfigError(StringError::new(format!(
                "Increase and decrease hotkeys must differ (both are '{decrease}')"
            ))));
        }

        Ok(())
    }

    /// Hotkey bindings in registration order (decrease, then increase)
    pub fn hotkey_bindings(&self) -> Vec<HotkeyBinding> {
        vec![
            HotkeyBinding {
                accelerator: self.hotkeys.decrease.clone(),
                action: TrayAction::Decrease,
            },
            HotkeyBinding {
                accelerator: self.hotkeys.increase.clone(),
                action: TrayAction::Increase,
            },
        ]
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            hotkeys: HotkeyConfig::default(),
            show_notifications: true,
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            decrease: DEFAULT_DECREASE_HOTKEY.to_string(),
            increase: DEFAULT_INCREASE_HOTKEY.to_string(),
        }
    }
}
