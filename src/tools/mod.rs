use egui::Pos2;

use crate::command::Command;
use crate::element::SceneObject;

mod brush;
mod eraser;

pub use brush::BrushTool;
pub use eraser::{EraserTool, erasable_at};

/// A freehand pointer tool. Gestures produce at most one command, on release.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Handle pointer press on the canvas.
    fn on_pointer_down(&mut self, pos: Pos2, objects: &[SceneObject]) -> Option<Command>;

    /// Handle pointer drag while the pointer is held down.
    fn on_pointer_move(&mut self, pos: Pos2, objects: &[SceneObject]) -> Option<Command>;

    /// Handle pointer release. Returns the command finalizing the gesture.
    fn on_pointer_up(&mut self, pos: Pos2, objects: &[SceneObject]) -> Option<Command>;

    /// Drops any gesture in progress without committing it.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}
