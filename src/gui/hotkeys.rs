//! Global hotkey registry
//!
//! Windows implementation of [`HotkeyRegistry`] backed by the `global-hotkey`
//! crate. The id-to-action table is shared with the event pump, which turns
//! raw hotkey events into tray events.

use global_hotkey::{GlobalHotKeyManager, hotkey::HotKey};
use lumina::config::HotkeyBinding;
use lumina::error::{LuminaError, Result};
use lumina::tray::{HotkeyRegistry, TrayAction};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registered hotkey ids and the action each one triggers
pub type HotkeyActions = Arc<RwLock<HashMap<u32, TrayAction>>>;

/// Hotkeys registered with the operating system
pub struct GlobalHotkeys {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
    actions: HotkeyActions,
}

impl GlobalHotkeys {
    /// Create the hotkey manager; must run on the thread that pumps messages
    pub fn new() -> Result<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| LuminaError::HotkeyError(Box::new(e)))?;
        Ok(Self {
            manager,
            registered: Vec::new(),
            actions: HotkeyActions::default(),
        })
    }

    /// Shared id-to-action table for the event pump
    pub fn actions(&self) -> HotkeyActions {
        Arc::clone(&self.actions)
    }
}

impl HotkeyRegistry for GlobalHotkeys {
    fn register(&mut self, binding: &HotkeyBinding) -> Result<()> {
        let hotkey: HotKey = binding
            .accelerator
            .parse()
            .map_err(|e| LuminaError::HotkeyError(Box::new(e)))?;

        self.manager
            .register(hotkey)
            .map_err(|e| LuminaError::HotkeyError(Box::new(e)))?;

        self.registered.push(hotkey);
        self.actions.write().insert(hotkey.id(), binding.action);
        debug!("Hotkey {} has id {}", binding.accelerator, hotkey.id());
        Ok(())
    }

    fn unregister_all(&mut self) -> Result<()> {
        self.actions.write().clear();
        if self.registered.is_empty() {
            return Ok(());
        }

        let result = self.manager.unregister_all(&self.registered);
        self.registered.clear();
        result.map_err(|e| LuminaError::HotkeyError(Box::new(e)))
    }
}
