//! Input vocabulary the editor receives from its host.

use serde::{Deserialize, Serialize};

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Modifiers with only ctrl held.
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// Whether the selection should be extended instead of replaced.
    pub fn multi_select(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Delete,
    Backspace,
    Escape,
    Character(char),
}

impl KeyCode {
    /// Parse a host key name ("Delete", "Backspace", "Escape", or a single character).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Delete" => Some(KeyCode::Delete),
            "Backspace" => Some(KeyCode::Backspace),
            "Escape" => Some(KeyCode::Escape),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(KeyCode::Character(c)),
                    _ => None,
                }
            }
        }
    }

    /// Delete and Backspace both remove the selection.
    pub fn is_delete(self) -> bool {
        matches!(self, KeyCode::Delete | KeyCode::Backspace)
    }
}
