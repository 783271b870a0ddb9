//! Clip regions derived from another object's box, expressed in the target's local space.

use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::{DEFAULT_CLIP_EXTENT, SceneObject};
use crate::id_generator::ObjectId;

/// Axis-aligned clip region in a node's local (untransformed) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ClipRect {
    pub fn to_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }
}

/// Computes the clip rectangle `source` imposes on `target`.
///
/// Returns `None` when there is no source. A source without its own
/// dimensions covers a 100×100 region anchored at its position, and a zero
/// scale factor on the target counts as 1.
pub fn resolve_clip(target: &SceneObject, source: Option<&SceneObject>) -> Option<ClipRect> {
    let source = source?;
    let t = &target.attrs;
    let scale_x = if t.scale_x == 0.0 { 1.0 } else { t.scale_x };
    let scale_y = if t.scale_y == 0.0 { 1.0 } else { t.scale_y };
    let size = clip_extent(source);
    Some(ClipRect {
        x: (source.attrs.x - t.x) / scale_x,
        y: (source.attrs.y - t.y) / scale_y,
        width: size.x / scale_x,
        height: size.y / scale_y,
    })
}

fn clip_extent(source: &SceneObject) -> Vec2 {
    let size = source.explicit_size().unwrap_or(Vec2::ZERO);
    Vec2::new(
        if size.x > 0.0 { size.x } else { DEFAULT_CLIP_EXTENT },
        if size.y > 0.0 { size.y } else { DEFAULT_CLIP_EXTENT },
    )
}

/// Looks up the clip source of `target` in `objects`. Dangling references resolve to `None`.
pub fn find_clip_source<'a>(target: &SceneObject, objects: &'a [SceneObject]) -> Option<&'a SceneObject> {
    let source_id = target.attrs.clip_source_id?;
    let found = objects.iter().find(|o| o.id() == source_id);
    if found.is_none() {
        log::debug!("Clip source {source_id} of {} no longer exists", target.id());
    }
    found
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ClipKey {
    source: ObjectId,
    target: [u32; 4],
    source_box: [u32; 4],
}

impl ClipKey {
    fn new(target: &SceneObject, source: &SceneObject) -> Self {
        let t = &target.attrs;
        let size = clip_extent(source);
        Self {
            source: source.id(),
            target: [t.x, t.y, t.scale_x, t.scale_y].map(f32::to_bits),
            source_box: [source.attrs.x, source.attrs.y, size.x, size.y].map(f32::to_bits),
        }
    }
}

/// Memoizes resolved clips per target, keyed on the inputs the result depends on.
#[derive(Debug, Default)]
pub struct ClipCache {
    entries: HashMap<ObjectId, (ClipKey, Option<ClipRect>)>,
    hits: u64,
    misses: u64,
}

impl ClipCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, target: &SceneObject, objects: &[SceneObject]) -> Option<ClipRect> {
        let Some(source) = find_clip_source(target, objects) else {
            self.entries.remove(&target.id());
            return None;
        };
        let key = ClipKey::new(target, source);
        if let Some((cached_key, clip)) = self.entries.get(&target.id()) {
            if *cached_key == key {
                self.hits += 1;
                return *clip;
            }
        }
        self.misses += 1;
        let clip = resolve_clip(target, Some(source));
        self.entries.insert(target.id(), (key, clip));
        clip
    }

    /// Drops entries for objects that are gone.
    pub fn retain_live(&mut self, objects: &[SceneObject]) {
        self.entries
            .retain(|id, _| objects.iter().any(|o| o.id() == *id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_at(x: f32, y: f32, w: f32, h: f32) -> SceneObject {
        SceneObject::rect(Pos2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn maps_source_box_into_target_local_space() {
        let mut target = rect_at(100.0, 50.0, 200.0, 200.0);
        target.attrs.scale_x = 2.0;
        target.attrs.scale_y = 0.5;
        let source = rect_at(140.0, 60.0, 80.0, 40.0);

        let clip = resolve_clip(&target, Some(&source)).unwrap();
        assert_eq!(clip, ClipRect { x: 20.0, y: 20.0, width: 40.0, height: 80.0 });
    }

    #[test]
    fn sourceless_dimensions_default_to_100() {
        let target = rect_at(0.0, 0.0, 10.0, 10.0);
        let source = SceneObject::text("clip", Pos2::new(30.0, 40.0));
        let clip = resolve_clip(&target, Some(&source)).unwrap();
        assert_eq!(clip.width, 100.0);
        assert_eq!(clip.height, 100.0);
        assert_eq!((clip.x, clip.y), (30.0, 40.0));
    }

    #[test]
    fn no_source_is_no_clip() {
        let target = rect_at(0.0, 0.0, 10.0, 10.0);
        assert_eq!(resolve_clip(&target, None), None);
    }

    #[test]
    fn resolving_twice_is_identical() {
        let target = rect_at(10.0, 10.0, 10.0, 10.0);
        let source = rect_at(20.0, 20.0, 30.0, 30.0);
        assert_eq!(resolve_clip(&target, Some(&source)), resolve_clip(&target, Some(&source)));
    }

    #[test]
    fn dangling_reference_resolves_to_none() {
        let mut target = rect_at(0.0, 0.0, 10.0, 10.0);
        let gone = rect_at(0.0, 0.0, 10.0, 10.0);
        target.attrs.clip_source_id = Some(gone.id());
        let objects = vec![target.clone()];
        let mut cache = ClipCache::new();
        assert_eq!(cache.resolve(&target, &objects), None);
    }

    #[test]
    fn cache_hits_until_inputs_change() {
        let source = rect_at(20.0, 20.0, 30.0, 30.0);
        let mut target = rect_at(10.0, 10.0, 10.0, 10.0);
        target.attrs.clip_source_id = Some(source.id());
        let mut objects = vec![source, target.clone()];
        let mut cache = ClipCache::new();

        let first = cache.resolve(&target, &objects);
        let second = cache.resolve(&target, &objects);
        assert_eq!(first, second);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        // Unrelated attribute: still a hit.
        objects[1].attrs.opacity = 0.5;
        cache.resolve(&objects[1].clone(), &objects);
        assert_eq!(cache.hits(), 2);

        objects[1].attrs.x = 0.0;
        let moved = cache.resolve(&objects[1].clone(), &objects).unwrap();
        assert_eq!(cache.misses(), 2);
        assert_eq!(moved.x, 20.0);
    }
}
