//! System tray presenter module
//!
//! Platform-independent half of the tray daemon: the menu model, the icon
//! bitmap and the presenter that turns menu clicks and hotkey presses into
//! brightness changes.
//!
//! # Architecture
//!
//! - `TrayPresenter`: owns the menu state, a `TrayShell` and a `HotkeyRegistry`
//! - `TrayShell`: icon/menu/notification capability provided by the binary
//! - `HotkeyRegistry`: global hotkey registration, torn down when the presenter stops
//! - `TrayMenuState`: immutable snapshot of the menu, rebuilt after every action
//!
//! # Event Flow
//!
//! ```text
//! menu click ─┐
//!             ├─> TrayEvent ─> TrayPresenter ─> BrightnessController
//! hotkey ─────┘                      │
//!                                    └─> notification + rebuilt TrayMenuState
//! ```

pub mod icon;
pub mod menu;
pub mod presenter;

pub use icon::{ICON_SIZE, render_icon};
pub use menu::{MenuEntry, TrayAction, TrayEvent, TrayMenuState};
pub use presenter::{APP_TITLE, HotkeyRegistry, PresenterState, TrayPresenter, TrayShell};
