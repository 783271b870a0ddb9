use egui::{Pos2, Vec2};

use crate::element::{ObjectKind, ObjectPatch, SceneObject, TextAttrs};
use crate::id_generator::ObjectId;
use crate::surface::NodeShape;

pub(super) fn shape(t: &TextAttrs, size: Vec2) -> NodeShape {
    NodeShape::Text {
        text: t.text.clone(),
        font_family: t.font_family.clone(),
        font_size: t.font_size,
        color: t.fill,
        align: t.align,
        size,
    }
}

/// Placement of the inline text editor, matching the node it replaces.
///
/// The desktop shell's editor is an egui `TextEdit`, which cannot be
/// rotated: it honours position, scale, font and colour, and sits
/// axis-aligned at `position` even when the node is rotated.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub position: Pos2,
    /// Degrees, clockwise. Not applied by the egui editor.
    pub rotation: f32,
    pub scale: Vec2,
    pub size: Vec2,
    pub font_size: f32,
    pub font_family: String,
    pub color: egui::Color32,
    pub text: String,
}

/// An open inline edit of one text object.
///
/// Every keystroke becomes a `text` patch; there is no separate save step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditSession {
    target: ObjectId,
}

impl TextEditSession {
    /// Starts editing `obj` if it is a text object.
    pub fn begin(obj: &SceneObject) -> Option<Self> {
        matches!(obj.kind, ObjectKind::Text(_)).then(|| {
            log::debug!("Editing text {}", obj.id());
            Self { target: obj.id() }
        })
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    /// Overlay geometry for the current state of the edited object.
    pub fn overlay(&self, objects: &[SceneObject]) -> Option<TextOverlay> {
        let obj = objects.iter().find(|o| o.id() == self.target)?;
        let ObjectKind::Text(t) = &obj.kind else {
            return None;
        };
        Some(TextOverlay {
            position: obj.attrs.position(),
            rotation: obj.attrs.rotation,
            scale: obj.attrs.scale(),
            size: obj.local_bounds().size(),
            font_size: t.font_size,
            font_family: t.font_family.clone(),
            color: t.fill,
            text: t.text.clone(),
        })
    }

    /// Patch for the editor's new contents.
    pub fn input(&self, text: &str) -> ObjectPatch {
        ObjectPatch::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_text_objects_can_be_edited() {
        let rect = SceneObject::rect(Pos2::ZERO, Vec2::splat(10.0));
        assert!(TextEditSession::begin(&rect).is_none());

        let text = SceneObject::text("Edit me", Pos2::new(100.0, 100.0));
        let session = TextEditSession::begin(&text).unwrap();
        assert_eq!(session.target(), text.id());
    }

    #[test]
    fn overlay_tracks_the_node_transform() {
        let mut text = SceneObject::text("Edit me", Pos2::new(100.0, 100.0));
        text.attrs.rotation = 45.0;
        text.attrs.scale_x = 2.0;
        let session = TextEditSession::begin(&text).unwrap();
        let overlay = session.overlay(std::slice::from_ref(&text)).unwrap();
        assert_eq!(overlay.position, Pos2::new(100.0, 100.0));
        assert_eq!(overlay.rotation, 45.0);
        assert_eq!(overlay.scale, Vec2::new(2.0, 1.0));
        assert_eq!(overlay.font_size, 24.0);
        assert_eq!(overlay.text, "Edit me");
    }

    #[test]
    fn overlay_disappears_with_its_object() {
        let text = SceneObject::text("Edit me", Pos2::ZERO);
        let session = TextEditSession::begin(&text).unwrap();
        assert!(session.overlay(&[]).is_none());
    }
}
