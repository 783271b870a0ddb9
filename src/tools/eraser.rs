use egui::Pos2;

use super::Tool;
use crate::command::Command;
use crate::element::{ObjectKind, SceneObject};
use crate::id_generator::ObjectId;
use crate::node::stroke_hit;

/// Brush objects whose stroke passes within `radius` of `pos`.
pub fn erasable_at(objects: &[SceneObject], pos: Pos2, radius: f32) -> Vec<ObjectId> {
    objects
        .iter()
        .filter(|o| o.attrs.visible)
        .filter_map(|o| {
            let ObjectKind::Brush(b) = &o.kind else {
                return None;
            };
            // Test in the stroke's own space so moved or scaled strokes still erase.
            let local = o.to_local(pos);
            let scale = o.attrs.scale_x.abs().max(o.attrs.scale_y.abs()).max(f32::EPSILON);
            stroke_hit(&b.points, b.stroke_width, local, radius / scale).then(|| o.id())
        })
        .collect()
}

/// Removes brush strokes under the pointer. A whole gesture is one edit.
#[derive(Debug, Clone)]
pub struct EraserTool {
    pub radius: f32,
    erased: Option<Vec<ObjectId>>,
}

impl EraserTool {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            erased: None,
        }
    }

    /// Strokes already picked up by the current gesture; drawn hidden until release.
    pub fn pending(&self) -> &[ObjectId] {
        self.erased.as_deref().unwrap_or_default()
    }

    fn collect(&mut self, pos: Pos2, objects: &[SceneObject]) {
        let radius = self.radius;
        if let Some(erased) = &mut self.erased {
            for id in erasable_at(objects, pos, radius) {
                if !erased.contains(&id) {
                    erased.push(id);
                }
            }
        }
    }
}

impl Tool for EraserTool {
    fn name(&self) -> &'static str {
        "Eraser"
    }

    fn on_pointer_down(&mut self, pos: Pos2, objects: &[SceneObject]) -> Option<Command> {
        self.erased = Some(Vec::new());
        self.collect(pos, objects);
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, objects: &[SceneObject]) -> Option<Command> {
        self.collect(pos, objects);
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2, objects: &[SceneObject]) -> Option<Command> {
        self.collect(pos, objects);
        let erased = self.erased.take()?;
        if erased.is_empty() {
            return None;
        }
        log::debug!("Erasing {} strokes", erased.len());
        Some(Command::RemoveMany(erased))
    }

    fn cancel(&mut self) {
        self.erased = None;
    }

    fn is_active(&self) -> bool {
        self.erased.is_some()
    }
}
