//! The retained drawing surface the engine drives.
//!
//! The surface owns drawable nodes derived from scene objects. It is never
//! the source of truth: the studio can rebuild every node from its object
//! list at any time.

use std::sync::Arc;

use egui::{Color32, ColorImage, Pos2, Vec2};

use crate::clip::ClipRect;
use crate::element::{BlendMode, KindTag, TextAlign};
use crate::id_generator::ObjectId;

/// Everything a surface needs to draw one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeProps {
    pub id: ObjectId,
    pub kind: KindTag,
    pub position: Pos2,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub scale: Vec2,
    pub opacity: f32,
    pub blend: BlendMode,
    pub visible: bool,
    /// Accepts drag and transform gestures.
    pub draggable: bool,
    /// Participates in hit testing.
    pub listening: bool,
    /// Shows the transform handles.
    pub selected: bool,
    pub clip: Option<ClipRect>,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeShape {
    Text {
        text: String,
        font_family: String,
        font_size: f32,
        color: Color32,
        align: TextAlign,
        size: Vec2,
    },
    Rect {
        size: Vec2,
        fill: Color32,
        stroke: Color32,
        stroke_width: f32,
    },
    /// `pixels` is `None` while loading or after a failed load; nothing is drawn then.
    Image {
        size: Vec2,
        backing: Option<Color32>,
        pixels: Option<Arc<ColorImage>>,
        /// Changes whenever the pixels must be re-uploaded.
        cache_key: u64,
    },
    /// Flattened outline, already in local coordinates.
    Path {
        contours: Vec<Vec<Pos2>>,
        fill: Color32,
        stroke: Color32,
        stroke_width: f32,
    },
    Polyline {
        points: Vec<Pos2>,
        color: Color32,
        width: f32,
    },
    /// Drawn as nothing but still present in the stack.
    Empty,
}

/// Gestures the surface reports back. Positions are in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// `target` is `None` when the background was clicked.
    Click { target: Option<ObjectId> },
    DoubleClick { target: ObjectId },
    DragEnd { target: ObjectId, position: Pos2 },
    TransformEnd {
        target: ObjectId,
        position: Pos2,
        rotation: f32,
        scale: Vec2,
    },
    PointerDown { position: Pos2 },
    PointerMove { position: Pos2 },
    PointerUp { position: Pos2 },
}

/// Primitives of an external retained-mode 2D surface.
pub trait RenderSurface {
    fn create_node(&mut self, props: NodeProps);

    fn update_node(&mut self, props: NodeProps);

    fn remove_node(&mut self, id: ObjectId);

    fn contains_node(&self, id: ObjectId) -> bool;

    /// Moves the node to `z` in the surface's own stack (0 = bottom).
    fn set_z_index(&mut self, id: ObjectId, z: usize);

    /// Node ids bottom to top, as the surface currently stacks them.
    fn node_ids(&self) -> Vec<ObjectId>;

    /// Topmost listening, visible node under `pos`.
    fn hit_test(&self, pos: Pos2) -> Option<ObjectId>;

    fn request_repaint(&mut self);

    /// Gestures observed since the last call.
    fn drain_events(&mut self) -> Vec<SurfaceEvent>;
}
