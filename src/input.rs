//! Keyboard shortcut mapping.

use egui::{Key, Modifiers};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Remove the selected object and clear the selection.
    Delete,
    Deselect,
    Undo,
    Redo,
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
}

/// Resolves a key press to an action.
///
/// `command` is ⌘ on macOS and Ctrl elsewhere, so both are accepted.
pub fn resolve(key: Key, modifiers: Modifiers) -> Option<ShortcutAction> {
    let cmd = modifiers.command || modifiers.ctrl || modifiers.mac_cmd;

    if cmd && modifiers.shift {
        return match key {
            Key::Z => Some(ShortcutAction::Redo),
            Key::OpenBracket => Some(ShortcutAction::SendToBack),
            Key::CloseBracket => Some(ShortcutAction::BringToFront),
            _ => None,
        };
    }

    if cmd {
        return match key {
            Key::Z => Some(ShortcutAction::Undo),
            Key::Y => Some(ShortcutAction::Redo),
            Key::OpenBracket => Some(ShortcutAction::SendBackward),
            Key::CloseBracket => Some(ShortcutAction::BringForward),
            _ => None,
        };
    }

    match key {
        Key::Delete | Key::Backspace => Some(ShortcutAction::Delete),
        Key::Escape => Some(ShortcutAction::Deselect),
        _ => None,
    }
}

/// Shortcut actions among this frame's input events, in order.
pub fn actions_from_events(events: &[egui::Event]) -> Vec<ShortcutAction> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => resolve(*key, *modifiers),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys() {
        assert_eq!(resolve(Key::Delete, Modifiers::NONE), Some(ShortcutAction::Delete));
        assert_eq!(resolve(Key::Backspace, Modifiers::NONE), Some(ShortcutAction::Delete));
        assert_eq!(resolve(Key::Escape, Modifiers::NONE), Some(ShortcutAction::Deselect));
        assert_eq!(resolve(Key::A, Modifiers::NONE), None);
    }

    #[test]
    fn undo_and_redo_with_ctrl_or_cmd() {
        assert_eq!(resolve(Key::Z, Modifiers::CTRL), Some(ShortcutAction::Undo));
        assert_eq!(resolve(Key::Z, Modifiers::MAC_CMD), Some(ShortcutAction::Undo));
        assert_eq!(resolve(Key::Y, Modifiers::CTRL), Some(ShortcutAction::Redo));
        assert_eq!(
            resolve(Key::Z, Modifiers::CTRL | Modifiers::SHIFT),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn only_pressed_keys_count() {
        let events = vec![
            egui::Event::Key {
                key: Key::Escape,
                physical_key: None,
                pressed: false,
                repeat: false,
                modifiers: Modifiers::NONE,
            },
            egui::Event::Key {
                key: Key::Delete,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: Modifiers::NONE,
            },
        ];
        assert_eq!(actions_from_events(&events), vec![ShortcutAction::Delete]);
    }
}
