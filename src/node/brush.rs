use egui::Pos2;

use crate::element::{BrushAttrs, distance_to_line_segment};
use crate::surface::NodeShape;

pub(super) fn shape(b: &BrushAttrs) -> NodeShape {
    NodeShape::Polyline {
        points: b.points.clone(),
        color: b.color,
        width: b.stroke_width,
    }
}

/// Whether `pos` lies within `radius` of the stroke, counting its own width.
pub fn stroke_hit(points: &[Pos2], stroke_width: f32, pos: Pos2, radius: f32) -> bool {
    let reach = radius + stroke_width * 0.5;
    match points {
        [] => false,
        [single] => single.distance(pos) <= reach,
        _ => points
            .windows(2)
            .any(|w| distance_to_line_segment(pos, w[0], w[1]) <= reach),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_near_any_segment() {
        let points = [Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), Pos2::new(100.0, 100.0)];
        assert!(stroke_hit(&points, 2.0, Pos2::new(50.0, 5.0), 5.0));
        assert!(stroke_hit(&points, 2.0, Pos2::new(104.0, 50.0), 5.0));
        assert!(!stroke_hit(&points, 2.0, Pos2::new(50.0, 50.0), 5.0));
        assert!(!stroke_hit(&[], 2.0, Pos2::ZERO, 5.0));
    }
}
