//! Lumina - external monitor brightness control
//!
//! Adjusts the brightness of external monitors while leaving the built-in
//! laptop panel alone. Usable as a one-shot command (`lumina 40`, `lumina --get`)
//! or as a system tray daemon with global hotkeys (`lumina --daemon`).
//!
//! `BrightnessController` applies the multi-monitor policy over a pluggable
//! `BrightnessBackend`; `TrayPresenter` drives it from menu clicks and hotkeys
//! through platform-provided `TrayShell` and `HotkeyRegistry` implementations.

// Module declarations
pub mod brightness;
pub mod cli;
pub mod config;
pub mod error;
pub mod tray;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use error::{LuminaError, Result};
