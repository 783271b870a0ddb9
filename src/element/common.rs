use egui::{Pos2, Rect, Vec2};
use kurbo::{BezPath, Shape};

// Transforms producing a box smaller than this on either axis are rejected.
pub const MIN_ELEMENT_SIZE: f32 = 5.0;
// Imported vector paths are scaled to fit a square of this side.
pub const PATH_REFERENCE_SIZE: f32 = 150.0;

/// Validates that a transformed box keeps the minimum dimensions
pub(crate) fn validate_size(size: Vec2) -> Result<(), String> {
    if size.x.abs() < MIN_ELEMENT_SIZE || size.y.abs() < MIN_ELEMENT_SIZE {
        Err(format!(
            "Element dimensions too small (min: {}). Width: {}, Height: {}",
            MIN_ELEMENT_SIZE, size.x, size.y
        ))
    } else {
        Ok(())
    }
}

/// Distance from a point to a line segment, used for stroke hit testing and erasing
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Bounding box for a set of points, grown by `padding` on every side
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Bounds of SVG path data in its own coordinates. `None` for unparsable or empty data.
pub(crate) fn path_bounds(path_data: &str) -> Option<Rect> {
    let path = BezPath::from_svg(path_data).ok()?;
    if path.elements().is_empty() {
        return None;
    }
    let bbox = path.bounding_box();
    Some(Rect::from_min_max(
        Pos2::new(bbox.x0 as f32, bbox.y0 as f32),
        Pos2::new(bbox.x1 as f32, bbox.y1 as f32),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_boxes_below_floor() {
        assert!(validate_size(Vec2::new(2.0, 2.0)).is_err());
        assert!(validate_size(Vec2::new(100.0, 4.9)).is_err());
        assert!(validate_size(Vec2::new(5.0, 5.0)).is_ok());
        // Flipped boxes are measured by magnitude.
        assert!(validate_size(Vec2::new(-20.0, 20.0)).is_ok());
    }

    #[test]
    fn segment_distance() {
        let d = distance_to_line_segment(Pos2::new(5.0, 3.0), Pos2::ZERO, Pos2::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-5);
        let d = distance_to_line_segment(Pos2::new(13.0, 4.0), Pos2::ZERO, Pos2::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn path_bounds_from_svg_data() {
        let bounds = path_bounds("M10 20 L110 20 L110 70 Z").unwrap();
        assert_eq!(bounds.min, Pos2::new(10.0, 20.0));
        assert_eq!(bounds.max, Pos2::new(110.0, 70.0));
        assert!(path_bounds("").is_none());
        assert!(path_bounds("not a path").is_none());
    }
}
