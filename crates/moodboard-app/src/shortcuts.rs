//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push(if cfg!(target_os = "macos") { "Cmd" } else { "Ctrl" });
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

const SHORTCUTS: &[Shortcut] = &[
    Shortcut::new("S", true, false, "Save board"),
    Shortcut::new("O", true, false, "Load saved board"),
    Shortcut::new("Z", true, false, "Undo"),
    Shortcut::new("Z", true, true, "Redo"),
    Shortcut::new("Y", true, false, "Redo"),
    Shortcut::new("Delete", false, false, "Delete selected item"),
    Shortcut::new("Backspace", false, false, "Delete selected item"),
    Shortcut::new("Escape", false, false, "Cancel resize and clear selection"),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> &'static [Shortcut] {
        SHORTCUTS
    }

    /// Display string for the first shortcut with `description`, or "".
    pub fn label_for(description: &str) -> String {
        SHORTCUTS
            .iter()
            .find(|s| s.description == description)
            .map(Shortcut::format)
            .unwrap_or_default()
    }

    /// Log all shortcuts at startup.
    pub fn log_all() {
        for shortcut in SHORTCUTS {
            log::debug!("  {:20} {}", shortcut.format(), shortcut.description);
        }
    }
}
