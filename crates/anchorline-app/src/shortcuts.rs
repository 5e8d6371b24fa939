//! Keyboard shortcut registry and documentation.

use anchorline_core::{Command, KeyCode, Modifiers, ToolKind};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+A").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("A", true, false, "Select all"),
            Shortcut::new("A", true, true, "Deselect all"),
            Shortcut::new("S", false, false, "Select tool"),
            Shortcut::new("R", false, false, "Rectangle tool"),
            Shortcut::new("O", false, false, "Ellipse tool"),
            Shortcut::new("H", false, false, "Horizontal line tool"),
            Shortcut::new("V", false, false, "Vertical line tool"),
            Shortcut::new("T", false, false, "Toggle spread on the selected line"),
            Shortcut::new("D", false, false, "Switch direction of selected lines"),
            Shortcut::new("Delete", false, false, "Delete selection"),
            Shortcut::new("Backspace", false, false, "Delete selection"),
            Shortcut::new("Escape", false, false, "Deselect all"),
            Shortcut::new("Ctrl+Click", false, false, "Add to selection and drag together"),
        ]
    }

    /// Toolbox command bound to a key press. Delete and Escape are handled
    /// by the scene itself and have no command.
    pub fn command_for(key: KeyCode, modifiers: Modifiers) -> Option<Command> {
        let KeyCode::Character(c) = key else {
            return None;
        };
        let c = c.to_ascii_lowercase();
        if modifiers.ctrl || modifiers.meta {
            return match c {
                'a' if modifiers.shift => Some(Command::DeselectAll),
                'a' => Some(Command::SelectAll),
                _ => None,
            };
        }
        let tool = match c {
            's' => ToolKind::Select,
            'r' => ToolKind::Rectangle,
            'o' => ToolKind::Ellipse,
            'h' => ToolKind::HorizontalLine,
            'v' => ToolKind::VerticalLine,
            't' => return Some(Command::ToggleSpread),
            'd' => return Some(Command::SwitchDirection),
            _ => return None,
        };
        Some(Command::SelectTool { tool })
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
