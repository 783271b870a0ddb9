use egui::emath::Rot2;
use egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::element::MIN_ELEMENT_SIZE;
use crate::id_generator::ObjectId;

const HANDLE_SIZE: f32 = 8.0;
const ROTATION_HANDLE_OFFSET: f32 = 30.0;
const HANDLE_COLOR: Color32 = Color32::from_rgb(30, 144, 255);
const HANDLE_ACTIVE_COLOR: Color32 = Color32::from_rgb(135, 206, 250);
const HANDLE_STROKE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoHandle {
    Move,
    ScaleTopLeft,
    ScaleTopRight,
    ScaleBottomLeft,
    ScaleBottomRight,
    Rotate,
}

/// Position, rotation (degrees) and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Pos2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl NodeTransform {
    fn rot(&self) -> Rot2 {
        Rot2::from_angle(self.rotation.to_radians())
    }

    /// Local point to canvas space.
    pub fn apply(&self, local: Pos2) -> Pos2 {
        self.position + self.rot() * Vec2::new(local.x * self.scale.x, local.y * self.scale.y)
    }

    /// Canvas point to local space. Zero scale factors count as 1.
    pub fn invert(&self, canvas: Pos2) -> Pos2 {
        let v = self.rot().inverse() * (canvas - self.position);
        let sx = if self.scale.x == 0.0 { 1.0 } else { self.scale.x };
        let sy = if self.scale.y == 0.0 { 1.0 } else { self.scale.y };
        Pos2::new(v.x / sx, v.y / sy)
    }

    /// Corners of `local` in canvas space, clockwise from top-left.
    pub fn corners(&self, local: Rect) -> [Pos2; 4] {
        [
            local.left_top(),
            local.right_top(),
            local.right_bottom(),
            local.left_bottom(),
        ]
        .map(|p| self.apply(p))
    }
}

/// What the gizmo is attached to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoTarget {
    pub id: ObjectId,
    pub transform: NodeTransform,
    /// Untransformed bounds.
    pub local: Rect,
}

impl GizmoTarget {
    /// Canvas positions of the corner and rotation handles.
    pub fn handles(&self) -> [(GizmoHandle, Pos2); 5] {
        let [tl, tr, br, bl] = self.transform.corners(self.local);
        let top_mid = tl + (tr - tl) * 0.5;
        let up = self.transform.rot() * Vec2::new(0.0, -ROTATION_HANDLE_OFFSET);
        [
            (GizmoHandle::ScaleTopLeft, tl),
            (GizmoHandle::ScaleTopRight, tr),
            (GizmoHandle::ScaleBottomRight, br),
            (GizmoHandle::ScaleBottomLeft, bl),
            (GizmoHandle::Rotate, top_mid + up),
        ]
    }

    /// Handle under `pointer`, if any.
    pub fn handle_at(&self, pointer: Pos2) -> Option<GizmoHandle> {
        self.handles()
            .into_iter()
            .find(|(_, pos)| pos.distance(pointer) <= HANDLE_SIZE)
            .map(|(handle, _)| handle)
    }
}

/// Local corner a scale handle drags and the corner that stays fixed.
fn scale_corners(handle: GizmoHandle, local: Rect) -> Option<(Pos2, Pos2)> {
    match handle {
        GizmoHandle::ScaleTopLeft => Some((local.left_top(), local.right_bottom())),
        GizmoHandle::ScaleTopRight => Some((local.right_top(), local.left_bottom())),
        GizmoHandle::ScaleBottomLeft => Some((local.left_bottom(), local.right_top())),
        GizmoHandle::ScaleBottomRight => Some((local.right_bottom(), local.left_top())),
        GizmoHandle::Move | GizmoHandle::Rotate => None,
    }
}

/// Keeps the scaled extent of one axis at or above the minimum size.
fn floor_scale(scale: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return scale;
    }
    let min = MIN_ELEMENT_SIZE / extent;
    if scale.abs() < min {
        if scale < 0.0 { -min } else { min }
    } else {
        scale
    }
}

/// Resizes by dragging a corner; the opposite corner stays put.
pub fn scale_by_corner(
    initial: NodeTransform,
    local: Rect,
    handle: GizmoHandle,
    pointer: Pos2,
    keep_aspect: bool,
) -> NodeTransform {
    let Some((dragged, anchor)) = scale_corners(handle, local) else {
        return initial;
    };
    let anchor_canvas = initial.apply(anchor);
    let span = dragged - anchor;
    let reach = initial.rot().inverse() * (pointer - anchor_canvas);

    let mut scale = Vec2::new(
        if span.x == 0.0 { initial.scale.x } else { reach.x / span.x },
        if span.y == 0.0 { initial.scale.y } else { reach.y / span.y },
    );
    if keep_aspect {
        let ratio = (scale.x / initial.scale.x).abs().max((scale.y / initial.scale.y).abs());
        scale = Vec2::new(
            initial.scale.x.abs() * ratio * scale.x.signum(),
            initial.scale.y.abs() * ratio * scale.y.signum(),
        );
    }
    scale = Vec2::new(
        floor_scale(scale.x, local.width()),
        floor_scale(scale.y, local.height()),
    );

    let mut result = NodeTransform { scale, ..initial };
    // Re-anchor so the fixed corner lands where it was.
    result.position += anchor_canvas - result.apply(anchor);
    result
}

/// Rotates about the centre of the box by the angle swept from `start` to `current`.
pub fn rotate_about_center(initial: NodeTransform, local: Rect, start: Pos2, current: Pos2) -> NodeTransform {
    let center = initial.apply(local.center());
    let from = start - center;
    let to = current - center;
    if from == Vec2::ZERO || to == Vec2::ZERO {
        return initial;
    }
    let delta = to.angle() - from.angle();
    let turn = Rot2::from_angle(delta);
    NodeTransform {
        position: center + turn * (initial.position - center),
        rotation: initial.rotation + delta.to_degrees(),
        scale: initial.scale,
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    target: GizmoTarget,
    handle: GizmoHandle,
    start: Pos2,
    current: NodeTransform,
}

/// Move/scale/rotate handles for the selected node.
///
/// Works in canvas coordinates; the surface converts pointer positions.
#[derive(Debug, Clone, Default)]
pub struct TransformGizmo {
    active: Option<ActiveDrag>,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, target: GizmoTarget, handle: GizmoHandle, pointer: Pos2) {
        self.active = Some(ActiveDrag {
            target,
            handle,
            start: pointer,
            current: target.transform,
        });
    }

    /// Updates the gesture and returns the transform to preview.
    pub fn drag(&mut self, pointer: Pos2, keep_aspect: bool) -> Option<(ObjectId, NodeTransform)> {
        let drag = self.active.as_mut()?;
        let initial = drag.target.transform;
        drag.current = match drag.handle {
            GizmoHandle::Move => NodeTransform {
                position: initial.position + (pointer - drag.start),
                ..initial
            },
            GizmoHandle::Rotate => rotate_about_center(initial, drag.target.local, drag.start, pointer),
            handle => scale_by_corner(initial, drag.target.local, handle, pointer, keep_aspect),
        };
        Some((drag.target.id, drag.current))
    }

    /// Finishes the gesture. `None` when nothing was active or nothing moved.
    pub fn end(&mut self) -> Option<(ObjectId, GizmoHandle, NodeTransform)> {
        let drag = self.active.take()?;
        (drag.current != drag.target.transform).then_some((drag.target.id, drag.handle, drag.current))
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_target(&self) -> Option<ObjectId> {
        self.active.map(|drag| drag.target.id)
    }

    /// Draws the selection box, plus handles when `editable`.
    pub fn paint(&self, painter: &Painter, to_screen: impl Fn(Pos2) -> Pos2, target: &GizmoTarget, editable: bool) {
        let corners = target.transform.corners(target.local).map(&to_screen);
        painter.add(egui::Shape::closed_line(
            corners.to_vec(),
            Stroke::new(1.0, HANDLE_COLOR),
        ));
        if !editable {
            return;
        }
        let active = self.active.map(|drag| drag.handle);
        let top_mid = corners[0] + (corners[1] - corners[0]) * 0.5;
        for (handle, pos) in target.handles() {
            let pos = to_screen(pos);
            let color = if active == Some(handle) {
                HANDLE_ACTIVE_COLOR
            } else {
                HANDLE_COLOR
            };
            if handle == GizmoHandle::Rotate {
                painter.line_segment([top_mid, pos], Stroke::new(1.0, HANDLE_COLOR));
                painter.circle_stroke(pos, HANDLE_SIZE / 2.0, Stroke::new(HANDLE_STROKE_WIDTH, color));
            } else {
                painter.rect_filled(Rect::from_center_size(pos, Vec2::splat(HANDLE_SIZE)), 0.0, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::generate_id;

    fn identity_at(x: f32, y: f32) -> NodeTransform {
        NodeTransform {
            position: Pos2::new(x, y),
            rotation: 0.0,
            scale: Vec2::splat(1.0),
        }
    }

    fn local() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0))
    }

    #[test]
    fn transform_round_trips_points() {
        let t = NodeTransform {
            position: Pos2::new(10.0, 20.0),
            rotation: 30.0,
            scale: Vec2::new(2.0, 0.5),
        };
        let p = Pos2::new(7.0, -3.0);
        let back = t.invert(t.apply(p));
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn corner_drag_keeps_the_opposite_corner() {
        let initial = identity_at(10.0, 10.0);
        let result = scale_by_corner(
            initial,
            local(),
            GizmoHandle::ScaleTopLeft,
            Pos2::new(60.0, 35.0),
            false,
        );
        assert!((result.scale.x - 0.5).abs() < 1e-4);
        assert!((result.scale.y - 0.5).abs() < 1e-4);
        let fixed = result.apply(local().right_bottom());
        assert!((fixed - Pos2::new(110.0, 60.0)).length() < 1e-3);
    }

    #[test]
    fn scaling_stops_at_the_minimum_box() {
        let initial = identity_at(0.0, 0.0);
        let result = scale_by_corner(
            initial,
            local(),
            GizmoHandle::ScaleBottomRight,
            Pos2::new(1.0, 1.0),
            false,
        );
        assert!(100.0 * result.scale.x >= MIN_ELEMENT_SIZE - 1e-4);
        assert!(50.0 * result.scale.y >= MIN_ELEMENT_SIZE - 1e-4);
    }

    #[test]
    fn quarter_turn_about_the_center() {
        let initial = identity_at(0.0, 0.0);
        let center = Pos2::new(50.0, 25.0);
        let result = rotate_about_center(initial, local(), center + Vec2::X * 10.0, center + Vec2::Y * 10.0);
        assert!((result.rotation - 90.0).abs() < 1e-3);
        let moved_center = result.apply(local().center());
        assert!((moved_center - center).length() < 1e-3);
    }

    #[test]
    fn gesture_without_movement_reports_nothing() {
        let target = GizmoTarget {
            id: generate_id(),
            transform: identity_at(0.0, 0.0),
            local: local(),
        };
        let mut gizmo = TransformGizmo::new();
        gizmo.begin(target, GizmoHandle::Move, Pos2::new(5.0, 5.0));
        gizmo.drag(Pos2::new(5.0, 5.0), false);
        assert!(gizmo.end().is_none());

        gizmo.begin(target, GizmoHandle::Move, Pos2::new(5.0, 5.0));
        gizmo.drag(Pos2::new(15.0, 8.0), false);
        let (id, handle, t) = gizmo.end().unwrap();
        assert_eq!(id, target.id);
        assert_eq!(handle, GizmoHandle::Move);
        assert_eq!(t.position, Pos2::new(10.0, 3.0));
    }

    #[test]
    fn rotate_handle_sits_above_the_box() {
        let target = GizmoTarget {
            id: generate_id(),
            transform: identity_at(0.0, 0.0),
            local: local(),
        };
        assert_eq!(target.handle_at(Pos2::new(50.0, -30.0)), Some(GizmoHandle::Rotate));
        assert_eq!(target.handle_at(Pos2::new(100.0, 50.0)), Some(GizmoHandle::ScaleBottomRight));
        assert_eq!(target.handle_at(Pos2::new(50.0, 25.0)), None);
    }
}
