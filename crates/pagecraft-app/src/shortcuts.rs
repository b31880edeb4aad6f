//! Keyboard shortcut registry and documentation.

use crate::event_handler::BuilderAction;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutCommand {
    DeleteSelected,
    Cancel,
    BringToFront,
    SendToBack,
    ToggleGrid,
    ToggleSnap,
    NewPage,
    NormalizeZOrder,
    CopyJson,
    Validate,
}

impl ShortcutCommand {
    pub fn action(self) -> BuilderAction {
        match self {
            ShortcutCommand::DeleteSelected => BuilderAction::Delete { id: None },
            ShortcutCommand::Cancel => BuilderAction::Cancel,
            ShortcutCommand::BringToFront => BuilderAction::BringToFront { id: None },
            ShortcutCommand::SendToBack => BuilderAction::SendToBack { id: None },
            ShortcutCommand::ToggleGrid => BuilderAction::ToggleGrid,
            ShortcutCommand::ToggleSnap => BuilderAction::ToggleSnap,
            ShortcutCommand::NewPage => BuilderAction::NewPage,
            ShortcutCommand::NormalizeZOrder => BuilderAction::NormalizeZOrder,
            ShortcutCommand::CopyJson => BuilderAction::CopyJson,
            ShortcutCommand::Validate => BuilderAction::Validate,
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: ShortcutCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: ShortcutCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+G").
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

    /// Check if a key press triggers this shortcut. Letter keys match
    /// regardless of case.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutCommand::*;
        vec![
            Shortcut::new("Delete", false, false, DeleteSelected, "Delete selected element"),
            Shortcut::new("Backspace", false, false, DeleteSelected, "Delete selected element"),
            Shortcut::new("Escape", false, false, Cancel, "Cancel drag and clear selection"),
            Shortcut::new("]", true, false, BringToFront, "Bring selected element to front"),
            Shortcut::new("[", true, false, SendToBack, "Send selected element to back"),
            Shortcut::new("G", true, false, ToggleGrid, "Toggle grid"),
            Shortcut::new("G", true, true, ToggleSnap, "Toggle snap to grid"),
            Shortcut::new("N", true, false, NewPage, "New page"),
            Shortcut::new("N", true, true, NormalizeZOrder, "Renumber layers"),
            Shortcut::new("C", true, true, CopyJson, "Copy layout JSON"),
            Shortcut::new("V", true, true, Validate, "Validate layout"),
        ]
    }

    /// Action bound to a key press, if any.
    pub fn action_for(key: &str, ctrl: bool, shift: bool) -> Option<BuilderAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, ctrl, shift))
            .map(|shortcut| shortcut.command.action())
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
