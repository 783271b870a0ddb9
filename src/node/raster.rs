use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use egui::{ColorImage, Vec2};
use image::RgbaImage;

use crate::element::{ImageAttrs, SceneObject};
use crate::id_generator::ObjectId;
use crate::surface::NodeShape;

/// Identifies one rasterized appearance of an image node.
pub fn tint_cache_key(url: &str, tint: Option<[u8; 3]>) -> u64 {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    tint.hash(&mut hasher);
    hasher.finish()
}

/// Converts decoded pixels for display, applying the colorize tint if any.
///
/// The tint keeps each pixel's luminance and alpha and replaces its hue with
/// the tint colour.
pub fn tint_image(src: &RgbaImage, tint: Option<[u8; 3]>) -> ColorImage {
    let size = [src.width() as usize, src.height() as usize];
    let Some([r, g, b]) = tint else {
        return ColorImage::from_rgba_unmultiplied(size, src.as_raw());
    };
    let mut out = Vec::with_capacity(src.as_raw().len());
    for px in src.pixels() {
        let [pr, pg, pb, pa] = px.0;
        let lum = (0.299 * pr as f32 + 0.587 * pg as f32 + 0.114 * pb as f32) / 255.0;
        out.extend_from_slice(&[
            (lum * r as f32).round() as u8,
            (lum * g as f32).round() as u8,
            (lum * b as f32).round() as u8,
            pa,
        ]);
    }
    ColorImage::from_rgba_unmultiplied(size, &out)
}

#[derive(Debug)]
struct CachedRaster {
    key: u64,
    source: Arc<RgbaImage>,
    pixels: Arc<ColorImage>,
}

/// Caches the display pixels of image and logo nodes.
///
/// Changing the source or any colorize field changes the key, which drops
/// the cached pixels and forces the surface to upload new ones.
#[derive(Debug, Default)]
pub struct ImageNodes {
    cache: HashMap<ObjectId, CachedRaster>,
    rasterizations: u64,
}

impl ImageNodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn shape(&mut self, id: ObjectId, attrs: &ImageAttrs, source: Option<&Arc<RgbaImage>>) -> NodeShape {
        let key = tint_cache_key(&attrs.image_url, attrs.tint());
        let pixels = match source {
            Some(source) => Some(self.pixels_for(id, key, source, attrs.tint())),
            None => {
                self.cache.remove(&id);
                None
            }
        };
        NodeShape::Image {
            size: Vec2::new(attrs.width, attrs.height),
            backing: attrs.fill,
            pixels,
            cache_key: key,
        }
    }

    fn pixels_for(&mut self, id: ObjectId, key: u64, source: &Arc<RgbaImage>, tint: Option<[u8; 3]>) -> Arc<ColorImage> {
        if let Some(cached) = self.cache.get(&id) {
            if cached.key == key && Arc::ptr_eq(&cached.source, source) {
                return cached.pixels.clone();
            }
        }
        self.rasterizations += 1;
        let pixels = Arc::new(tint_image(source, tint));
        self.cache.insert(
            id,
            CachedRaster {
                key,
                source: source.clone(),
                pixels: pixels.clone(),
            },
        );
        pixels
    }

    pub fn invalidate(&mut self, id: ObjectId) {
        self.cache.remove(&id);
    }

    pub fn retain_live(&mut self, objects: &[SceneObject]) {
        self.cache
            .retain(|id, _| objects.iter().any(|o| o.id() == *id));
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// How many times pixels were (re)computed. Useful to observe cache behaviour.
    pub fn rasterizations(&self) -> u64 {
        self.rasterizations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ObjectPatch;
    use crate::element::ObjectKind;
    use egui::Pos2;

    fn grey_image() -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 128])))
    }

    fn attrs(obj: &SceneObject) -> &ImageAttrs {
        match &obj.kind {
            ObjectKind::Image(i) | ObjectKind::Logo(i) => i,
            _ => panic!("not an image"),
        }
    }

    #[test]
    fn untinted_pixels_pass_through() {
        let out = tint_image(&grey_image(), None);
        assert_eq!(out.size, [2, 2]);
        assert_eq!(out.pixels[0], egui::Color32::from_rgba_unmultiplied(255, 255, 255, 128));
    }

    #[test]
    fn tint_keeps_alpha_and_luminance() {
        let out = tint_image(&grey_image(), Some([255, 0, 0]));
        assert_eq!(out.pixels[0], egui::Color32::from_rgba_unmultiplied(255, 0, 0, 128));
    }

    #[test]
    fn colorize_changes_invalidate_cached_pixels() {
        let source = grey_image();
        let mut nodes = ImageNodes::new();
        let mut obj = SceneObject::logo("/logos/a.png", Pos2::ZERO, Vec2::splat(200.0));

        let first = nodes.shape(obj.id(), attrs(&obj), Some(&source));
        nodes.shape(obj.id(), attrs(&obj), Some(&source));
        assert_eq!(nodes.rasterizations(), 1);

        let patch = ObjectPatch {
            colorize: Some(true),
            colorize_red: Some(200),
            ..Default::default()
        };
        assert!(patch.touches_colorize());
        patch.apply(&mut obj);
        let second = nodes.shape(obj.id(), attrs(&obj), Some(&source));
        assert_eq!(nodes.rasterizations(), 2);

        let (NodeShape::Image { cache_key: a, .. }, NodeShape::Image { cache_key: b, .. }) = (first, second) else {
            panic!("expected image shapes");
        };
        assert_ne!(a, b);
    }

    #[test]
    fn missing_source_renders_nothing() {
        let mut nodes = ImageNodes::new();
        let obj = SceneObject::image("blob:1", Pos2::ZERO, Vec2::splat(300.0));
        let shape = nodes.shape(obj.id(), attrs(&obj), None);
        assert!(matches!(shape, NodeShape::Image { pixels: None, .. }));
    }
}
