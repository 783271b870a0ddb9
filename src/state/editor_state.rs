//! Tool mode and gesture state of the studio.
//!
//! ```text
//!              ┌──────────┐
//!        ┌─────►  Drawing ├──────┐
//!        │     └──────────┘      │
//! ┌──────┴─┐   ┌──────────┐   ┌──▼─────┐
//! │  Idle  ├───►  Erasing ├───►  Idle  │
//! └──────┬─┘   └──────────┘   └──▲─────┘
//!        │     ┌─────────────┐   │
//!        └─────► EditingText ├───┘
//!              └─────────────┘
//! ```
//!
//! Gestures only start from `Idle` and always return to it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::KindTag;
use crate::node::TextEditSession;

/// The active toolbar tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Select,
    Move,
    Text,
    Brush,
    Eraser,
}

impl ToolMode {
    pub const ALL: [ToolMode; 5] = [
        ToolMode::Select,
        ToolMode::Move,
        ToolMode::Text,
        ToolMode::Brush,
        ToolMode::Eraser,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::Select => "Select",
            ToolMode::Move => "Move",
            ToolMode::Text => "Text",
            ToolMode::Brush => "Brush",
            ToolMode::Eraser => "Eraser",
        }
    }

    /// Tool the studio switches to when an object of `kind` is clicked.
    pub fn for_kind(kind: KindTag) -> ToolMode {
        match kind {
            KindTag::Text => ToolMode::Text,
            KindTag::Rect | KindTag::Image | KindTag::Logo | KindTag::Path | KindTag::Brush => {
                ToolMode::Move
            }
        }
    }

    /// Pointer gestures manipulate objects rather than draw.
    pub fn manipulates_objects(&self) -> bool {
        matches!(self, ToolMode::Select | ToolMode::Move | ToolMode::Text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot start {to} while {from}")]
    Busy { from: &'static str, to: &'static str },
}

/// What the pointer or keyboard is currently doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Idle,
    Drawing,
    Erasing,
    EditingText(TextEditSession),
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::Drawing => "drawing",
            EditorState::Erasing => "erasing",
            EditorState::EditingText(_) => "editing text",
        }
    }

    pub fn can_transition_to(&self, next: &EditorState) -> bool {
        matches!(
            (self, next),
            (EditorState::Idle, _) | (_, EditorState::Idle)
        )
    }

    pub fn transition_to(&mut self, next: EditorState) -> Result<(), TransitionError> {
        if !self.can_transition_to(&next) {
            return Err(TransitionError::Busy {
                from: self.name(),
                to: next.name(),
            });
        }
        log::debug!("Editor state {} -> {}", self.name(), next.name());
        *self = next;
        Ok(())
    }

    pub fn return_to_idle(&mut self) {
        *self = EditorState::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_editing_text(&self) -> bool {
        matches!(self, EditorState::EditingText(_))
    }

    pub fn text_session(&self) -> Option<&TextEditSession> {
        match self {
            EditorState::EditingText(session) => Some(session),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SceneObject;
    use egui::Pos2;

    #[test]
    fn clicking_an_object_picks_its_tool() {
        assert_eq!(ToolMode::for_kind(KindTag::Text), ToolMode::Text);
        assert_eq!(ToolMode::for_kind(KindTag::Logo), ToolMode::Move);
        assert_eq!(ToolMode::for_kind(KindTag::Brush), ToolMode::Move);
    }

    #[test]
    fn gestures_do_not_overlap() {
        let text = SceneObject::text("Edit me", Pos2::ZERO);
        let mut state = EditorState::Idle;
        state.transition_to(EditorState::Drawing).unwrap();
        let session = TextEditSession::begin(&text).unwrap();
        assert_eq!(
            state.transition_to(EditorState::EditingText(session.clone())),
            Err(TransitionError::Busy { from: "drawing", to: "editing text" })
        );
        state.transition_to(EditorState::Idle).unwrap();
        state.transition_to(EditorState::EditingText(session)).unwrap();
        assert!(state.is_editing_text());
    }
}
