//! Layer panel model: rows in visual order, toggles and reordering.
//!
//! The object list is paint order (last = top); the panel shows it reversed
//! and without the template. Every operation here yields a [`Command`] for
//! the studio to commit.

use crate::command::Command;
use crate::element::{KindTag, ObjectPatch, SceneObject};
use crate::id_generator::ObjectId;
use crate::surface::RenderSurface;

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRow {
    pub id: ObjectId,
    pub label: String,
    pub kind: KindTag,
    pub visible: bool,
    pub locked: bool,
    pub selected: bool,
}

/// Rows top to bottom. The template never gets one.
pub fn layer_rows(objects: &[SceneObject], selected: Option<ObjectId>) -> Vec<LayerRow> {
    objects
        .iter()
        .rev()
        .filter(|o| !o.is_template())
        .map(|o| LayerRow {
            id: o.id(),
            label: o.label(),
            kind: o.tag(),
            visible: o.attrs.visible,
            locked: o.is_locked(),
            selected: selected == Some(o.id()),
        })
        .collect()
}

/// Forward indices of everything that appears in the panel, bottom to top.
fn stackable_indices(objects: &[SceneObject]) -> Vec<usize> {
    objects
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.is_template())
        .map(|(i, _)| i)
        .collect()
}

/// Forward index of the object shown at visual row `visual`.
pub fn visual_to_forward(objects: &[SceneObject], visual: usize) -> Option<usize> {
    let indices = stackable_indices(objects);
    let n = indices.len();
    (visual < n).then(|| indices[n - 1 - visual])
}

fn forward_index(objects: &[SceneObject], id: ObjectId) -> Option<usize> {
    objects.iter().position(|o| o.id() == id)
}

/// Drag-and-drop in the panel: visual row `from` dropped at visual row `to`.
pub fn reorder(objects: &[SceneObject], from: usize, to: usize) -> Option<Command> {
    if from == to {
        return None;
    }
    let from = visual_to_forward(objects, from)?;
    let to = visual_to_forward(objects, to)?;
    Some(Command::Reorder { from, to })
}

pub fn toggle_visibility(objects: &[SceneObject], id: ObjectId) -> Option<Command> {
    let object = objects.iter().find(|o| o.id() == id)?;
    Some(Command::Patch {
        id,
        patch: ObjectPatch::visible(!object.attrs.visible),
    })
}

pub fn toggle_lock(objects: &[SceneObject], id: ObjectId) -> Option<Command> {
    let object = objects.iter().find(|o| o.id() == id && !o.is_template())?;
    Some(Command::Patch {
        id,
        patch: ObjectPatch::draggable(!object.attrs.draggable),
    })
}

pub fn delete(objects: &[SceneObject], id: ObjectId) -> Option<Command> {
    objects
        .iter()
        .any(|o| o.id() == id)
        .then_some(Command::Remove(id))
}

/// One step towards the top.
pub fn bring_forward(objects: &[SceneObject], id: ObjectId) -> Option<Command> {
    let indices = stackable_indices(objects);
    let from = forward_index(objects, id)?;
    let slot = indices.iter().position(|&i| i == from)?;
    let to = *indices.get(slot + 1)?;
    Some(Command::Reorder { from, to })
}

/// One step towards the bottom, never below the template.
pub fn send_backward(objects: &[SceneObject], id: ObjectId) -> Option<Command> {
    let indices = stackable_indices(objects);
    let from = forward_index(objects, id)?;
    let slot = indices.iter().position(|&i| i == from)?;
    let to = *indices.get(slot.checked_sub(1)?)?;
    Some(Command::Reorder { from, to })
}

pub fn bring_to_front(objects: &[SceneObject], id: ObjectId) -> Option<Command> {
    let indices = stackable_indices(objects);
    let from = forward_index(objects, id)?;
    let to = *indices.last()?;
    (from != to && indices.contains(&from)).then_some(Command::Reorder { from, to })
}

pub fn send_to_back(objects: &[SceneObject], id: ObjectId) -> Option<Command> {
    let indices = stackable_indices(objects);
    let from = forward_index(objects, id)?;
    let to = *indices.first()?;
    (from != to && indices.contains(&from)).then_some(Command::Reorder { from, to })
}

/// Resets every node's stacking position to its index in `objects`.
///
/// Surfaces keep their own z-order which drifts from the list after a
/// reorder unless each node is moved explicitly.
pub fn resync_z_order(surface: &mut dyn RenderSurface, objects: &[SceneObject]) {
    for (z, object) in objects.iter().enumerate() {
        if surface.contains_node(object.id()) {
            surface.set_z_index(object.id(), z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, Vec2};

    fn rect() -> SceneObject {
        SceneObject::rect(Pos2::ZERO, Vec2::splat(10.0))
    }

    #[test]
    fn rows_are_reversed_and_skip_the_template() {
        let template = SceneObject::template("/t.svg", Vec2::new(800.0, 600.0), None);
        let (a, b) = (rect(), rect());
        let objects = vec![template, a.clone(), b.clone()];
        let rows = layer_rows(&objects, Some(a.id()));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, b.id());
        assert_eq!(rows[1].id, a.id());
        assert!(rows[1].selected);
    }

    #[test]
    fn reorder_on_tiny_lists_or_onto_itself_is_none() {
        assert!(reorder(&[], 0, 1).is_none());
        assert!(reorder(&[rect()], 0, 0).is_none());
        assert!(reorder(&[rect(), rect()], 1, 1).is_none());
    }

    #[test]
    fn visual_reorder_maps_to_forward_indices() {
        let objects = vec![rect(), rect(), rect()];
        // Bottom row (a) dropped on the top row.
        assert_eq!(reorder(&objects, 2, 0), Some(Command::Reorder { from: 0, to: 2 }));
    }

    #[test]
    fn single_steps_respect_the_template() {
        let template = SceneObject::template("/t.svg", Vec2::new(800.0, 600.0), None);
        let (a, b) = (rect(), rect());
        let objects = vec![template.clone(), a.clone(), b.clone()];
        assert!(send_backward(&objects, a.id()).is_none());
        assert!(bring_forward(&objects, b.id()).is_none());
        assert_eq!(bring_forward(&objects, a.id()), Some(Command::Reorder { from: 1, to: 2 }));
        assert_eq!(send_to_back(&objects, b.id()), Some(Command::Reorder { from: 2, to: 1 }));
        assert!(bring_to_front(&objects, template.id()).is_none());
        assert!(toggle_lock(&objects, template.id()).is_none());
    }

    #[test]
    fn toggles_flip_the_current_value() {
        let a = rect();
        let objects = vec![a.clone()];
        assert_eq!(
            toggle_visibility(&objects, a.id()),
            Some(Command::Patch { id: a.id(), patch: ObjectPatch::visible(false) })
        );
        assert_eq!(
            toggle_lock(&objects, a.id()),
            Some(Command::Patch { id: a.id(), patch: ObjectPatch::draggable(false) })
        );
        assert_eq!(delete(&objects, a.id()), Some(Command::Remove(a.id())));
        assert!(delete(&objects, rect().id()).is_none());
    }
}
