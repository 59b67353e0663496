//! Tray menu model

/// Something the user can ask the tray to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrayAction {
    /// Show the current brightness
    ShowCurrent,
    /// Raise brightness by one step
    Increase,
    /// Lower brightness by one step
    Decrease,
    /// Stop the tray
    Exit,
}

impl TrayAction {
    /// Stable menu item identifier
    pub fn menu_id(self) -> &'static str {
        match self {
            Self::ShowCurrent => "show",
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Exit => "exit",
        }
    }

    /// Inverse of [`TrayAction::menu_id`]
    pub fn from_menu_id(id: &str) -> Option<Self> {
        match id {
            "show" => Some(Self::ShowCurrent),
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// A tray action together with where it came from
///
/// Menu clicks and hotkey presses are handled identically; the origin only
/// shows up in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// Clicked in the tray menu
    Menu(TrayAction),
    /// Pressed as a global hotkey
    Hotkey(TrayAction),
}

impl TrayEvent {
    /// The requested action
    pub fn action(self) -> TrayAction {
        match self {
            Self::Menu(action) | Self::Hotkey(action) => action,
        }
    }

    /// Short name of the event source
    pub fn origin(self) -> &'static str {
        match self {
            Self::Menu(_) => "menu",
            Self::Hotkey(_) => "hotkey",
        }
    }
}

/// One row of the tray menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Clickable item
    Item {
        /// Displayed text
        label: String,
        /// Action dispatched on click
        action: TrayAction,
    },
    /// Separator line
    Separator,
}

/// Snapshot of the tray menu
///
/// Built from the live aggregate brightness and replaced wholesale after every
/// brightness-changing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMenuState {
    entries: Vec<MenuEntry>,
}

impl TrayMenuState {
    /// Build the menu for the given brightness (`None` when it could not be read)
    pub fn build(current: Option<u8>, step: u8) -> Self {
        let current_label = match current {
            Some(brightness) => format!("Current Brightness: {brightness}%"),
            None => "Current Brightness: unavailable".to_string(),
        };

        Self {
            entries: vec![
                MenuEntry::Item {
                    label: current_label,
                    action: TrayAction::ShowCurrent,
                },
                MenuEntry::Item {
                    label: format!("Increase Brightness (+{step}%)"),
                    action: TrayAction::Increase,
                },
                MenuEntry::Item {
                    label: format!("Decrease Brightness (-{step}%)"),
                    action: TrayAction::Decrease,
                },
                MenuEntry::Separator,
                MenuEntry::Item {
                    label: "Exit".to_string(),
                    action: TrayAction::Exit,
                },
            ],
        }
    }

    /// Menu rows in display order
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Text of the first item (the current brightness line)
    pub fn current_label(&self) -> &str {
        match self.entries.first() {
            Some(MenuEntry::Item { label, .. }) => label,
            _ => "",
        }
    }
}
