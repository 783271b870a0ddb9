//! [`RenderSurface`] implemented over an egui painter.
//!
//! Nodes are retained between frames in their own z-order. Each frame the
//! surface paints them, runs the transform gizmo for the selected node and
//! queues the gestures it saw as [`SurfaceEvent`]s.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use egui::epaint::{Mesh, TextShape};
use egui::{Color32, ColorImage, FontFamily, FontId, Painter, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2};

use crate::element::{TextAlign, calculate_bounds};
use crate::gizmo::{GizmoHandle, GizmoTarget, NodeTransform, TransformGizmo};
use crate::id_generator::ObjectId;
use crate::node::stroke_hit;
use crate::surface::{NodeProps, NodeShape, RenderSurface, SurfaceEvent};
use crate::texture_manager::TextureManager;

const TEXTURE_CACHE_SIZE: usize = 256;
/// Path rasters are drawn at this many pixels per local unit.
const PATH_DENSITY: f32 = 2.0;
const MAX_PATH_RASTER: f32 = 4096.0;
const CLIP_OUTLINE: Color32 = Color32::RED;
/// Extra reach, in local units, when clicking thin strokes.
const STROKE_HIT_SLOP: f32 = 3.0;

/// How pointer gestures on the canvas are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// Click, drag and transform nodes.
    #[default]
    Objects,
    /// Raw pointer down/move/up for brush and eraser.
    Freehand,
}

/// A freehand stroke being drawn, painted above every node.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePreview {
    pub points: Vec<Pos2>,
    pub color: Color32,
    pub width: f32,
}

struct PathRaster {
    key: u64,
    image: Arc<ColorImage>,
    bounds: Rect,
}

pub struct EguiSurface {
    nodes: HashMap<ObjectId, NodeProps>,
    order: Vec<ObjectId>,
    events: Vec<SurfaceEvent>,
    textures: TextureManager,
    path_rasters: HashMap<ObjectId, PathRaster>,
    gizmo: TransformGizmo,
    preview: Option<(ObjectId, NodeTransform)>,
    mode: GestureMode,
    stroke_preview: Option<StrokePreview>,
    show_clip_outlines: bool,
    pointer: Option<Pos2>,
    repaint: bool,
}

impl Default for EguiSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl EguiSurface {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            events: Vec::new(),
            textures: TextureManager::new(TEXTURE_CACHE_SIZE),
            path_rasters: HashMap::new(),
            gizmo: TransformGizmo::new(),
            preview: None,
            mode: GestureMode::Objects,
            stroke_preview: None,
            show_clip_outlines: false,
            pointer: None,
            repaint: false,
        }
    }

    pub fn set_gesture_mode(&mut self, mode: GestureMode) {
        if self.mode != mode {
            self.gizmo.cancel();
            self.preview = None;
            self.mode = mode;
        }
    }

    pub fn set_stroke_preview(&mut self, preview: Option<StrokePreview>) {
        self.stroke_preview = preview;
    }

    pub fn set_show_clip_outlines(&mut self, show: bool) {
        self.show_clip_outlines = show;
    }

    /// Pointer position in canvas space, while hovering the canvas.
    pub fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    pub fn node(&self, id: ObjectId) -> Option<&NodeProps> {
        self.nodes.get(&id)
    }

    /// Allocates the canvas, handles input and paints every node.
    pub fn show(&mut self, ui: &mut Ui, canvas_size: Vec2) -> Response {
        let (response, painter) = ui.allocate_painter(canvas_size, Sense::click_and_drag());
        let origin = response.rect.min;
        let to_canvas = |p: Pos2| (p - origin).to_pos2();
        self.pointer = response.hover_pos().map(to_canvas);
        self.textures.begin_frame();

        match self.mode {
            GestureMode::Objects => {
                let keep_aspect = ui.input(|i| i.modifiers.shift);
                self.object_gestures(&response, to_canvas, keep_aspect);
            }
            GestureMode::Freehand => self.freehand_gestures(&response, to_canvas),
        }

        painter.rect_filled(response.rect, 0.0, Color32::WHITE);
        let painter = painter.with_clip_rect(response.rect);
        let ctx = ui.ctx().clone();
        for id in self.order.clone() {
            self.paint_node(&ctx, &painter, origin, id);
        }
        self.paint_selection(&painter, origin);
        if let Some(stroke) = &self.stroke_preview {
            let points: Vec<Pos2> = stroke.points.iter().map(|p| origin + p.to_vec2()).collect();
            painter.add(Shape::line(points, Stroke::new(stroke.width, stroke.color)));
        }

        if std::mem::take(&mut self.repaint) || self.gizmo.is_active() {
            ui.ctx().request_repaint();
        }
        response
    }

    fn object_gestures(&mut self, response: &Response, to_canvas: impl Fn(Pos2) -> Pos2, keep_aspect: bool) {
        let pointer = response.interact_pointer_pos().map(&to_canvas);

        if response.drag_started() {
            // Handles are small; start from where the button went down.
            let origin = press_origin(response).map(&to_canvas).or(pointer);
            if let Some(pos) = origin {
                self.begin_drag(pos);
            }
        }
        if response.dragged() {
            if let Some(pos) = pointer {
                self.preview = self.gizmo.drag(pos, keep_aspect);
            }
        }
        if response.drag_stopped() {
            if let Some((target, handle, t)) = self.gizmo.end() {
                self.events.push(match handle {
                    GizmoHandle::Move => SurfaceEvent::DragEnd {
                        target,
                        position: t.position,
                    },
                    _ => SurfaceEvent::TransformEnd {
                        target,
                        position: t.position,
                        rotation: t.rotation,
                        scale: t.scale,
                    },
                });
            } else {
                self.preview = None;
            }
        }

        if response.double_clicked() {
            if let Some(target) = pointer.and_then(|pos| self.hit_test(pos)) {
                self.events.push(SurfaceEvent::DoubleClick { target });
            }
        } else if response.clicked() {
            let target = pointer.and_then(|pos| self.hit_test(pos));
            self.events.push(SurfaceEvent::Click { target });
        }
    }

    fn begin_drag(&mut self, pos: Pos2) {
        if let Some(selected) = self.selected_target() {
            if let Some(handle) = selected.handle_at(pos) {
                if self.is_draggable(selected.id) {
                    self.gizmo.begin(selected, handle, pos);
                }
                return;
            }
        }
        let Some(hit) = self.hit_test(pos) else {
            return;
        };
        if !self.is_draggable(hit) {
            return;
        }
        if let Some(target) = self.gizmo_target(hit) {
            self.gizmo.begin(target, GizmoHandle::Move, pos);
        }
    }

    fn freehand_gestures(&mut self, response: &Response, to_canvas: impl Fn(Pos2) -> Pos2) {
        let Some(position) = response.interact_pointer_pos().map(&to_canvas) else {
            return;
        };
        if response.drag_started() {
            let start = press_origin(response).map(&to_canvas).unwrap_or(position);
            self.events.push(SurfaceEvent::PointerDown { position: start });
        }
        if response.dragged() && response.drag_delta() != Vec2::ZERO {
            self.events.push(SurfaceEvent::PointerMove { position });
        }
        if response.drag_stopped() {
            self.events.push(SurfaceEvent::PointerUp { position });
        } else if response.clicked() {
            self.events.push(SurfaceEvent::PointerDown { position });
            self.events.push(SurfaceEvent::PointerUp { position });
        }
    }

    fn is_draggable(&self, id: ObjectId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.draggable)
    }

    fn selected_target(&self) -> Option<GizmoTarget> {
        let id = self
            .order
            .iter()
            .rev()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.selected && n.visible))?;
        self.gizmo_target(*id)
    }

    fn gizmo_target(&self, id: ObjectId) -> Option<GizmoTarget> {
        let props = self.nodes.get(&id)?;
        let local = shape_bounds(&props.shape);
        if !local.is_finite() || local == Rect::NOTHING {
            return None;
        }
        Some(GizmoTarget {
            id,
            transform: self.transform_of(props),
            local,
        })
    }

    /// The node's transform, or the gizmo preview while it is being dragged.
    fn transform_of(&self, props: &NodeProps) -> NodeTransform {
        match self.preview {
            Some((id, t)) if id == props.id => t,
            _ => transform(props),
        }
    }

    fn paint_selection(&self, painter: &Painter, origin: Pos2) {
        let Some(target) = self.selected_target() else {
            return;
        };
        let editable = self.is_draggable(target.id);
        self.gizmo
            .paint(painter, |p| origin + p.to_vec2(), &target, editable);
    }

    fn paint_node(&mut self, ctx: &egui::Context, painter: &Painter, origin: Pos2, id: ObjectId) {
        let Some(props) = self.nodes.get(&id) else {
            return;
        };
        if !props.visible || props.opacity <= 0.0 {
            return;
        }
        let t = self.transform_of(props);
        let to_screen = |local: Pos2| origin + t.apply(local).to_vec2();
        let fade = |c: Color32| c.gamma_multiply(props.opacity.clamp(0.0, 1.0));

        let painter = match props.clip {
            Some(clip) => {
                let corners = t.corners(clip.to_rect()).map(|p| origin + p.to_vec2());
                let screen = calculate_bounds(&corners, 0.0);
                if self.show_clip_outlines {
                    painter.add(Shape::closed_line(corners.to_vec(), Stroke::new(1.0, CLIP_OUTLINE)));
                }
                painter.with_clip_rect(painter.clip_rect().intersect(screen))
            }
            None => painter.clone(),
        };

        match &props.shape {
            NodeShape::Empty => {}
            NodeShape::Rect {
                size,
                fill,
                stroke,
                stroke_width,
            } => {
                let corners = t
                    .corners(Rect::from_min_size(Pos2::ZERO, *size))
                    .map(to_screen)
                    .to_vec();
                painter.add(Shape::convex_polygon(
                    corners,
                    fade(*fill),
                    Stroke::new(*stroke_width * mean_scale(t.scale), fade(*stroke)),
                ));
            }
            NodeShape::Text {
                text,
                font_family,
                font_size,
                color,
                align,
                size,
            } => {
                let family = match font_family.to_ascii_lowercase().as_str() {
                    "courier" | "courier new" | "monospace" => FontFamily::Monospace,
                    _ => FontFamily::Proportional,
                };
                let galley = painter.layout_no_wrap(
                    text.clone(),
                    FontId::new(font_size * t.scale.y.abs().max(0.01), family),
                    fade(*color),
                );
                let slack = (size.x * t.scale.x.abs() - galley.size().x).max(0.0);
                let offset = match align {
                    TextAlign::Left => 0.0,
                    TextAlign::Center => slack / 2.0,
                    TextAlign::Right => slack,
                };
                let pos = to_screen(Pos2::ZERO)
                    + egui::emath::Rot2::from_angle(t.rotation.to_radians()) * Vec2::new(offset, 0.0);
                painter.add(
                    TextShape::new(pos, galley, fade(*color)).with_angle(t.rotation.to_radians()),
                );
            }
            NodeShape::Image {
                size,
                backing,
                pixels,
                cache_key,
            } => {
                let corners = t.corners(Rect::from_min_size(Pos2::ZERO, *size)).map(to_screen);
                if let Some(backing) = backing {
                    painter.add(Shape::convex_polygon(corners.to_vec(), fade(*backing), Stroke::NONE));
                }
                if let Some(pixels) = pixels {
                    let texture = self.textures.texture_for(ctx, id, *cache_key, pixels);
                    painter.add(textured_quad(texture, corners, fade(Color32::WHITE)));
                }
            }
            NodeShape::Path {
                contours,
                fill,
                stroke,
                stroke_width,
            } => {
                let key = path_key(contours, *fill, *stroke, *stroke_width);
                let stale = self.path_rasters.get(&id).is_none_or(|r| r.key != key);
                if stale {
                    match rasterize_path(contours, *fill, *stroke, *stroke_width) {
                        Some((image, bounds)) => {
                            self.path_rasters.insert(
                                id,
                                PathRaster {
                                    key,
                                    image: Arc::new(image),
                                    bounds,
                                },
                            );
                        }
                        None => {
                            self.path_rasters.remove(&id);
                        }
                    }
                }
                if let Some(raster) = self.path_rasters.get(&id) {
                    let corners = t.corners(raster.bounds).map(to_screen);
                    let texture = self.textures.texture_for(ctx, id, raster.key, &raster.image);
                    painter.add(textured_quad(texture, corners, fade(Color32::WHITE)));
                }
            }
            NodeShape::Polyline { points, color, width } => {
                let points: Vec<Pos2> = points.iter().map(|p| to_screen(*p)).collect();
                painter.add(Shape::line(
                    points,
                    Stroke::new(width * mean_scale(t.scale), fade(*color)),
                ));
            }
        }
    }
}

impl RenderSurface for EguiSurface {
    fn create_node(&mut self, props: NodeProps) {
        let id = props.id;
        if self.nodes.insert(id, props).is_none() {
            self.order.push(id);
        }
        self.repaint = true;
    }

    fn update_node(&mut self, props: NodeProps) {
        let id = props.id;
        if self.preview.is_some_and(|(preview, _)| preview == id) && !self.gizmo.is_active() {
            self.preview = None;
        }
        if !self.nodes.contains_key(&id) {
            self.order.push(id);
        }
        self.nodes.insert(id, props);
        self.repaint = true;
    }

    fn remove_node(&mut self, id: ObjectId) {
        if self.nodes.remove(&id).is_some() {
            self.order.retain(|n| *n != id);
            self.textures.invalidate(id);
            self.path_rasters.remove(&id);
            if self.gizmo.active_target() == Some(id) {
                self.gizmo.cancel();
            }
            self.repaint = true;
        }
    }

    fn contains_node(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn set_z_index(&mut self, id: ObjectId, z: usize) {
        let Some(current) = self.order.iter().position(|n| *n == id) else {
            return;
        };
        if current == z {
            return;
        }
        self.order.remove(current);
        let z = z.min(self.order.len());
        self.order.insert(z, id);
        self.repaint = true;
    }

    fn node_ids(&self) -> Vec<ObjectId> {
        self.order.clone()
    }

    fn hit_test(&self, pos: Pos2) -> Option<ObjectId> {
        self.order.iter().rev().copied().find(|id| {
            self.nodes
                .get(id)
                .is_some_and(|props| props.visible && props.listening && node_contains(props, pos))
        })
    }

    fn request_repaint(&mut self) {
        self.repaint = true;
    }

    fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }
}

fn press_origin(response: &Response) -> Option<Pos2> {
    response.ctx.input(|i| i.pointer.press_origin())
}

fn transform(props: &NodeProps) -> NodeTransform {
    NodeTransform {
        position: props.position,
        rotation: props.rotation,
        scale: props.scale,
    }
}

fn mean_scale(scale: Vec2) -> f32 {
    (scale.x.abs() + scale.y.abs()) / 2.0
}

/// Untransformed bounds of a node's geometry.
pub fn shape_bounds(shape: &NodeShape) -> Rect {
    match shape {
        NodeShape::Text { size, .. } | NodeShape::Rect { size, .. } | NodeShape::Image { size, .. } => {
            Rect::from_min_size(Pos2::ZERO, *size)
        }
        NodeShape::Path {
            contours,
            stroke_width,
            ..
        } => {
            let points: Vec<Pos2> = contours.iter().flatten().copied().collect();
            calculate_bounds(&points, stroke_width / 2.0)
        }
        NodeShape::Polyline { points, width, .. } => calculate_bounds(points, width / 2.0),
        NodeShape::Empty => Rect::NOTHING,
    }
}

/// Whether canvas point `pos` lands on the node, honouring its clip.
pub fn node_contains(props: &NodeProps, pos: Pos2) -> bool {
    let local = transform(props).invert(pos);
    if let Some(clip) = props.clip {
        if !clip.to_rect().contains(local) {
            return false;
        }
    }
    match &props.shape {
        NodeShape::Polyline { points, width, .. } => stroke_hit(points, *width, local, STROKE_HIT_SLOP),
        NodeShape::Image { pixels: None, backing: None, .. } => false,
        shape => shape_bounds(shape).contains(local),
    }
}

fn textured_quad(texture: egui::TextureId, corners: [Pos2; 4], tint: Color32) -> Shape {
    let uvs = [
        Pos2::new(0.0, 0.0),
        Pos2::new(1.0, 0.0),
        Pos2::new(1.0, 1.0),
        Pos2::new(0.0, 1.0),
    ];
    let mut mesh = Mesh::with_texture(texture);
    for (pos, uv) in corners.into_iter().zip(uvs) {
        mesh.vertices.push(egui::epaint::Vertex { pos, uv, color: tint });
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    Shape::mesh(mesh)
}

fn path_key(contours: &[Vec<Pos2>], fill: Color32, stroke: Color32, stroke_width: f32) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for contour in contours {
        contour.len().hash(&mut hasher);
        for p in contour {
            p.x.to_bits().hash(&mut hasher);
            p.y.to_bits().hash(&mut hasher);
        }
    }
    fill.hash(&mut hasher);
    stroke.hash(&mut hasher);
    stroke_width.to_bits().hash(&mut hasher);
    hasher.finish()
}

/// Fills (even-odd) and strokes flattened contours into an image covering their bounds.
fn rasterize_path(contours: &[Vec<Pos2>], fill: Color32, stroke: Color32, stroke_width: f32) -> Option<(ColorImage, Rect)> {
    use resvg::tiny_skia;

    let points: Vec<Pos2> = contours.iter().flatten().copied().collect();
    let bounds = calculate_bounds(&points, stroke_width.max(0.0) / 2.0 + 1.0);
    if !bounds.is_finite() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return None;
    }
    let density = PATH_DENSITY.min(MAX_PATH_RASTER / bounds.width().max(bounds.height()));
    let width = (bounds.width() * density).ceil().max(1.0) as u32;
    let height = (bounds.height() * density).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)?;

    let mut builder = tiny_skia::PathBuilder::new();
    for contour in contours {
        let Some((first, rest)) = contour.split_first() else {
            continue;
        };
        builder.move_to(first.x, first.y);
        for p in rest {
            builder.line_to(p.x, p.y);
        }
        builder.close();
    }
    let path = builder.finish()?;
    let transform = tiny_skia::Transform::from_row(
        density,
        0.0,
        0.0,
        density,
        -bounds.min.x * density,
        -bounds.min.y * density,
    );

    let mut paint = tiny_skia::Paint::default();
    paint.anti_alias = true;
    if fill.a() > 0 {
        let [r, g, b, a] = fill.to_srgba_unmultiplied();
        paint.set_color_rgba8(r, g, b, a);
        pixmap.fill_path(&path, &paint, tiny_skia::FillRule::EvenOdd, transform, None);
    }
    if stroke.a() > 0 && stroke_width > 0.0 {
        let [r, g, b, a] = stroke.to_srgba_unmultiplied();
        paint.set_color_rgba8(r, g, b, a);
        let line = tiny_skia::Stroke {
            width: stroke_width,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &line, transform, None);
    }

    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let image = ColorImage::from_rgba_unmultiplied([width as usize, height as usize], &rgba);
    Some((image, bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipRect;
    use crate::element::{BlendMode, KindTag};
    use crate::id_generator::generate_id;

    fn rect_node(position: Pos2) -> NodeProps {
        NodeProps {
            id: generate_id(),
            kind: KindTag::Rect,
            position,
            rotation: 0.0,
            scale: Vec2::splat(1.0),
            opacity: 1.0,
            blend: BlendMode::Normal,
            visible: true,
            draggable: true,
            listening: true,
            selected: false,
            clip: None,
            shape: NodeShape::Rect {
                size: Vec2::splat(100.0),
                fill: Color32::WHITE,
                stroke: Color32::BLACK,
                stroke_width: 1.0,
            },
        }
    }

    #[test]
    fn hit_test_prefers_the_topmost_listening_node() {
        let mut surface = EguiSurface::new();
        let below = rect_node(Pos2::ZERO);
        let above = rect_node(Pos2::new(50.0, 50.0));
        surface.create_node(below.clone());
        surface.create_node(above.clone());
        assert_eq!(surface.hit_test(Pos2::new(75.0, 75.0)), Some(above.id));
        assert_eq!(surface.hit_test(Pos2::new(10.0, 10.0)), Some(below.id));

        surface.set_z_index(below.id, 1);
        assert_eq!(surface.hit_test(Pos2::new(75.0, 75.0)), Some(below.id));

        let mut deaf = above.clone();
        deaf.listening = false;
        surface.update_node(deaf);
        surface.set_z_index(above.id, 1);
        assert_eq!(surface.hit_test(Pos2::new(120.0, 120.0)), None);
    }

    #[test]
    fn clipped_parts_do_not_hit() {
        let mut node = rect_node(Pos2::ZERO);
        node.clip = Some(ClipRect {
            x: 0.0,
            y: 0.0,
            width: 20.0,
            height: 20.0,
        });
        assert!(node_contains(&node, Pos2::new(10.0, 10.0)));
        assert!(!node_contains(&node, Pos2::new(50.0, 50.0)));
    }

    #[test]
    fn rotated_nodes_hit_in_local_space() {
        let mut node = rect_node(Pos2::ZERO);
        node.rotation = 90.0;
        assert!(node_contains(&node, Pos2::new(-50.0, 50.0)));
        assert!(!node_contains(&node, Pos2::new(50.0, 50.0)));
    }

    #[test]
    fn z_index_and_removal_keep_order_consistent() {
        let mut surface = EguiSurface::new();
        let nodes: Vec<NodeProps> = (0..3).map(|i| rect_node(Pos2::new(i as f32, 0.0))).collect();
        for node in &nodes {
            surface.create_node(node.clone());
        }
        surface.set_z_index(nodes[0].id, 2);
        assert_eq!(surface.node_ids(), vec![nodes[1].id, nodes[2].id, nodes[0].id]);
        surface.remove_node(nodes[2].id);
        assert_eq!(surface.node_ids(), vec![nodes[1].id, nodes[0].id]);
        assert!(surface.drain_events().is_empty());
    }

    #[test]
    fn paths_rasterize_into_their_bounds() {
        let contours = vec![vec![
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 0.0),
            Pos2::new(10.0, 10.0),
            Pos2::new(0.0, 10.0),
        ]];
        let (image, bounds) = rasterize_path(&contours, Color32::BLACK, Color32::TRANSPARENT, 0.0).unwrap();
        assert_eq!(bounds.min, Pos2::new(-1.0, -1.0));
        assert_eq!(image.size, [24, 24]);
        assert_eq!(image.pixels[12 * 24 + 12], Color32::BLACK);
        assert!(rasterize_path(&[], Color32::BLACK, Color32::TRANSPARENT, 0.0).is_none());
    }
}
