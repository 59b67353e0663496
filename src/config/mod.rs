//! Runtime configuration module
//!
//! Settings are assembled from command-line flags at startup and live only
//! for the current process; nothing is written to disk.

pub mod models;

pub use models::{
    AppConfig, DEFAULT_DECREASE_HOTKEY, DEFAULT_INCREASE_HOTKEY, HotkeyBinding, HotkeyConfig,
};
