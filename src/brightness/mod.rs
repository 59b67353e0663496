//! Brightness control module
//!
//! This module reads and writes monitor brightness through a pluggable
//! platform backend and applies Lumina's multi-monitor policy on top.
//!
//! # Overview
//!
//! - **Platform capability** (`BrightnessBackend`): "get brightness" returns
//!   either one value per display or a single scalar, "set brightness"
//!   accepts either form.
//! - **Aggregation policy** (`BrightnessController`): the built-in laptop panel
//!   at [`BUILT_IN_PANEL_INDEX`] is left alone; the external monitors are
//!   averaged when read and set uniformly when written.
//! - **Bounded stepping**: increase/decrease clamp the result to 0-100.
//!
//! # Architecture
//!
//! - `BrightnessController`: policy, clamping, retry and serialization
//! - `BrightnessBackend`: trait implemented by platform adapters
//! - `SystemBackend`: DDC/CI monitors (via `ddc-hi`) plus the built-in panel
//!   (sysfs backlight on Linux, WMI on Windows)
//! - `InMemoryBackend`: simulated displays with failure injection
//!
//! # Example Usage
//!
//! ```
//! use lumina::brightness::{BrightnessController, InMemoryBackend};
//!
//! let controller = BrightnessController::new(InMemoryBackend::new(vec![80, 40, 60]));
//! controller.set_brightness(50)?;
//! assert_eq!(controller.get_brightness()?, 50);
//! assert_eq!(controller.backend().displays(), vec![80, 50, 50]);
//! # Ok::<(), lumina::error::LuminaError>(())
//! ```

pub mod backend;
pub mod controller;
pub mod memory;
pub mod system;
#[cfg(windows)]
mod wmi;

pub use backend::{
    BUILT_IN_PANEL_INDEX, BrightnessBackend, BrightnessReading, BrightnessWrite, MAX_BRIGHTNESS,
};
pub use controller::{BrightnessController, DEFAULT_STEP};
pub use memory::InMemoryBackend;
pub use system::SystemBackend;
