use egui::Vec2;

use crate::element::RectAttrs;
use crate::surface::NodeShape;

pub(super) fn shape(r: &RectAttrs) -> NodeShape {
    NodeShape::Rect {
        size: Vec2::new(r.width, r.height),
        fill: r.fill,
        stroke: r.stroke,
        stroke_width: r.stroke_width,
    }
}
