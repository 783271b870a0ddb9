use egui::{Color32, Pos2};

use super::Tool;
use crate::command::Command;
use crate::element::SceneObject;

/// Collects pointer positions into a freehand stroke.
#[derive(Debug, Clone)]
pub struct BrushTool {
    pub color: Color32,
    pub width: f32,
    points: Option<Vec<Pos2>>,
}

impl BrushTool {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            points: None,
        }
    }

    /// Points of the stroke being drawn, for the live preview.
    pub fn preview(&self) -> Option<&[Pos2]> {
        self.points.as_deref()
    }
}

impl Tool for BrushTool {
    fn name(&self) -> &'static str {
        "Brush"
    }

    fn on_pointer_down(&mut self, pos: Pos2, _objects: &[SceneObject]) -> Option<Command> {
        self.points = Some(vec![pos]);
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, _objects: &[SceneObject]) -> Option<Command> {
        if let Some(points) = &mut self.points {
            if points.last() != Some(&pos) {
                points.push(pos);
            }
        }
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2, objects: &[SceneObject]) -> Option<Command> {
        self.on_pointer_move(pos, objects);
        let points = self.points.take()?;
        if points.len() < 2 {
            log::debug!("Discarding single-point stroke");
            return None;
        }
        Some(Command::Insert(SceneObject::brush(points, self.color, self.width)))
    }

    fn cancel(&mut self) {
        self.points = None;
    }

    fn is_active(&self) -> bool {
        self.points.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ObjectKind;

    #[test]
    fn stroke_becomes_a_brush_object() {
        let mut tool = BrushTool::new(Color32::RED, 4.0);
        tool.on_pointer_down(Pos2::new(0.0, 0.0), &[]);
        tool.on_pointer_move(Pos2::new(5.0, 5.0), &[]);
        let Some(Command::Insert(obj)) = tool.on_pointer_up(Pos2::new(10.0, 5.0), &[]) else {
            panic!("expected an insert");
        };
        let ObjectKind::Brush(b) = &obj.kind else {
            panic!("expected a brush object");
        };
        assert_eq!(b.points.len(), 3);
        assert_eq!(b.color, Color32::RED);
        assert_eq!(b.stroke_width, 4.0);
        assert!(!tool.is_active());
    }

    #[test]
    fn a_click_is_not_a_stroke() {
        let mut tool = BrushTool::new(Color32::BLACK, 5.0);
        tool.on_pointer_down(Pos2::new(3.0, 3.0), &[]);
        assert!(tool.on_pointer_up(Pos2::new(3.0, 3.0), &[]).is_none());
    }

    #[test]
    fn release_without_press_does_nothing() {
        let mut tool = BrushTool::new(Color32::BLACK, 5.0);
        assert!(tool.on_pointer_up(Pos2::new(3.0, 3.0), &[]).is_none());
    }
}
