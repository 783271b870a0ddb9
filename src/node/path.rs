use std::collections::HashMap;

use egui::Pos2;
use kurbo::{BezPath, PathEl};

use crate::element::{ObjectKind, ObjectPatch, PATH_REFERENCE_SIZE, PathAttrs, SceneObject, path_bounds};
use crate::id_generator::ObjectId;
use crate::surface::NodeShape;

const FLATTEN_TOLERANCE: f64 = 0.25;

pub(super) fn shape(p: &PathAttrs) -> NodeShape {
    let contours = flatten_path(&p.path_data);
    if contours.is_empty() {
        return NodeShape::Empty;
    }
    NodeShape::Path {
        contours,
        fill: p.fill,
        stroke: p.stroke,
        stroke_width: p.stroke_width,
    }
}

/// Flattens SVG path data into polylines, one per subpath.
pub fn flatten_path(path_data: &str) -> Vec<Vec<Pos2>> {
    let Ok(path) = BezPath::from_svg(path_data) else {
        log::warn!("Unparsable path data ({} bytes)", path_data.len());
        return Vec::new();
    };
    let mut contours: Vec<Vec<Pos2>> = Vec::new();
    let mut current: Vec<Pos2> = Vec::new();
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            if current.len() > 1 {
                contours.push(std::mem::take(&mut current));
            }
            current.clear();
            current.push(Pos2::new(p.x as f32, p.y as f32));
        }
        PathEl::LineTo(p) => current.push(Pos2::new(p.x as f32, p.y as f32)),
        PathEl::ClosePath => {
            if let Some(first) = current.first().copied() {
                current.push(first);
            }
        }
        // flatten only emits the three above
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    if current.len() > 1 {
        contours.push(current);
    }
    contours
}

/// One-time corrective placement for freshly imported path data.
///
/// Paths whose bounds sit far outside the visible region are pulled back to
/// about (100, 100); then the path is scaled to fit the reference square,
/// keeping its aspect ratio.
pub fn normalize_path(obj: &SceneObject) -> Option<ObjectPatch> {
    let ObjectKind::Path(p) = &obj.kind else {
        return None;
    };
    let bounds = path_bounds(&p.path_data)?;
    if bounds.width() <= 0.0 {
        return None;
    }
    let scale = if bounds.height() > 0.0 {
        (PATH_REFERENCE_SIZE / bounds.width()).min(PATH_REFERENCE_SIZE / bounds.height())
    } else {
        PATH_REFERENCE_SIZE / bounds.width()
    };
    let mut patch = ObjectPatch::default();
    // The drawn top-left lands at position + bounds.min * scale.
    if bounds.min.x > 500.0 || bounds.min.y > 500.0 || bounds.min.x < -100.0 {
        patch.x = Some(100.0 - bounds.min.x * scale);
        patch.y = Some(100.0 - bounds.min.y * scale);
    }
    patch.scale_x = Some(scale);
    patch.scale_y = Some(scale);
    Some(patch)
}

/// Remembers which path data each object has already been normalized for.
#[derive(Debug, Default)]
pub struct PathNormalizer {
    normalized: HashMap<ObjectId, String>,
}

impl PathNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes every path object whose data is new. Returns whether anything moved.
    pub fn normalize_pending(&mut self, objects: &mut [SceneObject]) -> bool {
        let mut changed = false;
        for obj in objects.iter_mut() {
            let ObjectKind::Path(p) = &obj.kind else {
                continue;
            };
            if self.normalized.get(&obj.id()) == Some(&p.path_data) {
                continue;
            }
            let data = p.path_data.clone();
            if let Some(patch) = normalize_path(obj) {
                log::debug!("Normalized path {}", obj.id());
                changed |= patch.apply(obj);
            }
            self.normalized.insert(obj.id(), data);
        }
        self.normalized
            .retain(|id, _| objects.iter().any(|o| o.id() == *id));
        changed
    }

    /// Treats the paths in `objects` as already placed, e.g. after a history jump.
    pub fn sync(&mut self, objects: &[SceneObject]) {
        self.normalized = objects
            .iter()
            .filter_map(|o| match &o.kind {
                ObjectKind::Path(p) => Some((o.id(), p.path_data.clone())),
                _ => None,
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offscreen_path_is_pulled_into_view_and_scaled() {
        let obj = SceneObject::path("M600 700 L900 700 L900 850 Z", Pos2::ZERO);
        let patch = normalize_path(&obj).unwrap();
        // 300 wide, 150 tall
        assert_eq!(patch.scale_x, Some(0.5));
        assert_eq!(patch.scale_y, Some(0.5));
        assert_eq!(patch.x, Some(-200.0));
        assert_eq!(patch.y, Some(-250.0));

        let mut placed = obj.clone();
        patch.apply(&mut placed);
        let drawn = placed.world_bounds();
        assert_eq!(drawn.min, Pos2::new(100.0, 100.0));
        assert!(egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0)).contains_rect(drawn));
    }

    #[test]
    fn visible_path_is_only_scaled() {
        let obj = SceneObject::path("M0 0 L75 0 L75 30 Z", Pos2::new(10.0, 10.0));
        let patch = normalize_path(&obj).unwrap();
        assert_eq!(patch.x, None);
        assert_eq!(patch.scale_x, Some(2.0));
    }

    #[test]
    fn normalization_runs_once_per_path_data() {
        let mut objects = vec![SceneObject::path("M0 0 L300 0 L300 300 Z", Pos2::ZERO)];
        let mut normalizer = PathNormalizer::new();
        assert!(normalizer.normalize_pending(&mut objects));
        assert_eq!(objects[0].attrs.scale_x, 0.5);

        // A user resize afterwards is kept.
        objects[0].attrs.scale_x = 1.5;
        assert!(!normalizer.normalize_pending(&mut objects));
        assert_eq!(objects[0].attrs.scale_x, 1.5);
    }

    #[test]
    fn flattens_subpaths_separately() {
        let contours = flatten_path("M0 0 L10 0 L10 10 Z M20 20 L30 20");
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].first(), contours[0].last());
        assert!(flatten_path("garbage").is_empty());
    }
}
