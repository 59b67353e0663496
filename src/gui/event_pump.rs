//! Tray event source
//!
//! `tray-icon` and `global-hotkey` both deliver their events through hidden
//! Win32 windows, so the thread that created them must keep dispatching
//! window messages. [`EventPump`] blocks in the message loop and yields the
//! resulting [`TrayEvent`]s one at a time to the presenter.

use crate::gui::hotkeys::HotkeyActions;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use lumina::tray::{TrayAction, TrayEvent};
use tracing::{debug, info};
use tray_icon::TrayIconEvent;
use tray_icon::menu::MenuEvent;

/// Blocking iterator over menu clicks and hotkey presses
///
/// Ends when the thread receives `WM_QUIT`.
pub struct EventPump {
    hotkey_actions: HotkeyActions,
}

impl EventPump {
    /// Create a pump resolving hotkey ids through `hotkey_actions`
    pub fn new(hotkey_actions: HotkeyActions) -> Self {
        Self { hotkey_actions }
    }

    fn poll_menu() -> Option<TrayEvent> {
        first_menu_action(MenuEvent::receiver().try_iter()).map(TrayEvent::Menu)
    }

    fn poll_hotkey(&self) -> Option<TrayEvent> {
        first_hotkey_action(&self.hotkey_actions, GlobalHotKeyEvent::receiver().try_iter())
            .map(TrayEvent::Hotkey)
    }
}

/// First click on a known menu item; unknown items are consumed and skipped
fn first_menu_action(events: impl IntoIterator<Item = MenuEvent>) -> Option<TrayAction> {
    events.into_iter().find_map(|event| {
        let action = TrayAction::from_menu_id(&event.id.0);
        if action.is_none() {
            debug!("Ignoring click on unknown menu item {:?}", event.id);
        }
        action
    })
}

/// First press of a registered hotkey; releases and unknown ids are consumed
fn first_hotkey_action(
    actions: &HotkeyActions,
    events: impl IntoIterator<Item = GlobalHotKeyEvent>,
) -> Option<TrayAction> {
    events
        .into_iter()
        .filter(|event| event.state() == HotKeyState::Pressed)
        .find_map(|event| actions.read().get(&event.id()).copied())
}

impl Iterator for EventPump {
    type Item = TrayEvent;

    fn next(&mut self) -> Option<TrayEvent> {
        loop {
            if let Some(event) = Self::poll_menu().or_else(|| self.poll_hotkey()) {
                return Some(event);
            }

            // Icon clicks are not bound to anything
            while TrayIconEvent::receiver().try_recv().is_ok() {}

            // Menu and hotkey events are only produced while this thread dispatches
            // its window messages, so blocking here cannot miss one
            if !dispatch_next_message() {
                info!("Message loop received WM_QUIT");
                return None;
            }
        }
    }
}

/// Wait for the next window message on this thread and dispatch it.
/// Returns `false` on `WM_QUIT` or when the message queue fails.
#[expect(
    unsafe_code,
    reason = "Win32 message loop calls required by tray-icon and global-hotkey"
)]
fn dispatch_next_message() -> bool {
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, MSG, TranslateMessage,
    };

    let mut msg = MSG::default();
    // SAFETY: `msg` is a valid, writable MSG for the duration of each call and
    // the message is dispatched on the thread that retrieved it.
    unsafe {
        if GetMessageW(&raw mut msg, None, 0, 0).0 <= 0 {
            return false;
        }
        let _ = TranslateMessage(&raw const msg);
        DispatchMessageW(&raw const msg);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tray_icon::menu::MenuId;

    fn menu_event(id: &str) -> MenuEvent {
        MenuEvent {
            id: MenuId::new(id),
        }
    }

    fn hotkey_event(id: u32, state: HotKeyState) -> GlobalHotKeyEvent {
        GlobalHotKeyEvent { id, state }
    }

    #[test]
    fn test_unknown_menu_item_does_not_hide_later_click() {
        let events = vec![menu_event("about"), menu_event("increase")];
        assert_eq!(first_menu_action(events), Some(TrayAction::Increase));
        assert_eq!(first_menu_action(vec![menu_event("about")]), None);
    }

    #[test]
    fn test_hotkey_release_and_unknown_ids_are_skipped() {
        let actions = HotkeyActions::default();
        actions.write().insert(7, TrayAction::Decrease);

        let events = vec![
            hotkey_event(7, HotKeyState::Released),
            hotkey_event(99, HotKeyState::Pressed),
            hotkey_event(7, HotKeyState::Pressed),
        ];

        assert_eq!(
            first_hotkey_action(&actions, events),
            Some(TrayAction::Decrease)
        );
    }
}
