//! Keyboard shortcut registry and key mapping.

use sketchpad_core::shapes::ShapeKind;
use winit::keyboard::{Key, NamedKey};

use crate::ui::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("L", false, "Line"),
            Shortcut::new("R", false, "Rectangle"),
            Shortcut::new("C", false, "Circle"),
            Shortcut::new("F", false, "Freehand"),
            Shortcut::new("D", false, "Toggle dashed stroke"),
            Shortcut::new("S", true, "Save drawing"),
            Shortcut::new("O", true, "Load drawing"),
            Shortcut::new("Delete", true, "Clear drawing"),
            Shortcut::new("Escape", false, "Cancel gesture / close notice"),
        ]
    }

    /// Map a pressed key to an action.
    ///
    /// Escape closes an open notice before it cancels a gesture.
    pub fn action_for(key: &Key, ctrl: bool, notice_open: bool) -> Option<UiAction> {
        match key {
            Key::Named(NamedKey::Escape) if notice_open => Some(UiAction::DismissNotice),
            Key::Named(NamedKey::Escape) => Some(UiAction::CancelGesture),
            Key::Named(NamedKey::Delete) if ctrl => Some(UiAction::Clear),
            Key::Character(c) => {
                let c = c.to_ascii_lowercase();
                match (c.as_str(), ctrl) {
                    ("s", true) => Some(UiAction::Save),
                    ("o", true) => Some(UiAction::Load),
                    ("l", false) => Some(UiAction::SetMode(ShapeKind::Line)),
                    ("r", false) => Some(UiAction::SetMode(ShapeKind::Rectangle)),
                    ("c", false) => Some(UiAction::SetMode(ShapeKind::Circle)),
                    ("f", false) => Some(UiAction::SetMode(ShapeKind::Freehand)),
                    ("d", false) => Some(UiAction::ToggleDash),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
