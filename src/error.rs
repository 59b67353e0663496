//! Error types for Lumina
//!
//! This module defines all error types used throughout the application,
//! providing clear error messages and proper error propagation.
//!
//! Error variants use `#[source]` to preserve error chains so that the
//! platform failure behind a brightness read or write stays visible in logs.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for Lumina
#[derive(Debug, Error)]
pub enum LuminaError {
    /// Reading brightness from the platform failed
    #[error("Failed to read brightness: {0}")]
    PlatformReadError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Writing brightness to the platform failed
    #[error("Failed to set brightness: {0}")]
    PlatformWriteError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The platform reported no displays at all
    #[error("No displays available for brightness control")]
    DisplayUnavailable,

    /// Brightness outside the 0-100 range
    #[error("Brightness must be between 0-100, got {0}")]
    InvalidBrightness(i64),

    /// Global hotkey parsing or registration error
    #[error("Hotkey error: {0}")]
    HotkeyError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Tray icon or menu error
    #[error("Tray error: {0}")]
    TrayError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Desktop notification error
    #[error("Notification error: {0}")]
    NotificationError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LuminaError {
    /// Whether the brightness controller may retry the operation once
    /// through its degraded path.
    pub fn is_platform_failure(&self) -> bool {
        matches!(
            self,
            Self::PlatformReadError(_) | Self::PlatformWriteError(_)
        )
    }
}

/// Result type alias for Lumina operations
pub type Result<T> = std::result::Result<T, LuminaError>;

/// Convert an error to a user-friendly message
///
/// Used for startup error dialogs and tray notifications, so the text
/// carries a short troubleshooting hint.
pub fn get_user_friendly_error(error: &LuminaError) -> String {
    match error {
        LuminaError::PlatformReadError(e) | LuminaError::PlatformWriteError(e) => {
            format!(
                "Unable to control monitor brightness:\n\n{e}\n\n\
                 Please ensure:\n\
                 - DDC/CI is enabled in your monitor's on-screen menu\n\
                 - Your display drivers are up to date\n\
                 - The monitor is connected directly (some docks block DDC/CI)"
            )
        }
        LuminaError::DisplayUnavailable => "No displays were detected.\n\n\
             Connect an external monitor that supports DDC/CI and try again."
            .to_string(),
        LuminaError::InvalidBrightness(value) => {
            format!("Brightness must be between 0-100 (got {value}).")
        }
        LuminaError::HotkeyError(e) => {
            format!(
                "Failed to register a global hotkey:\n\n{e}\n\n\
                 Another application may already be using the same shortcut."
            )
        }
        LuminaError::TrayError(_) => "Failed to create the system tray icon.\n\n\
             Try restarting Lumina."
            .to_string(),
        LuminaError::NotificationError(_) => "Failed to show a notification.\n\n\
             Brightness control is not affected."
            .to_string(),
        LuminaError::ConfigError(e) => format!("Invalid configuration:\n\n{e}"),
        LuminaError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
    }
}
