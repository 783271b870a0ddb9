//! Per-kind node renderers.
//!
//! A renderer turns a scene object into [`NodeProps`] for the surface and
//! turns surface gestures back into [`ObjectPatch`]es. Renderers never touch
//! the object list themselves.

use std::sync::Arc;

use egui::{Pos2, Vec2};

use crate::clip::ClipRect;
use crate::element::{ObjectKind, ObjectPatch, SceneObject, validate_size};
use crate::surface::{NodeProps, NodeShape};

mod brush;
mod path;
mod raster;
mod rect;
mod text;

pub use brush::stroke_hit;
pub use raster::{ImageNodes, tint_cache_key, tint_image};
pub use path::{PathNormalizer, flatten_path, normalize_path};
pub use text::{TextEditSession, TextOverlay};

/// Per-frame inputs a node needs besides its object.
#[derive(Debug, Clone, Default)]
pub struct RenderInputs {
    pub selected: bool,
    /// The object is being edited through the text overlay.
    pub editing: bool,
    pub clip: Option<ClipRect>,
    /// Decoded source image for image and logo objects, once available.
    pub image: Option<Arc<image::RgbaImage>>,
}

/// Derives the surface node for `obj`.
pub fn build_props(obj: &SceneObject, inputs: RenderInputs, images: &mut ImageNodes) -> NodeProps {
    let a = &obj.attrs;
    let shape = match &obj.kind {
        ObjectKind::Text(t) => text::shape(t, obj.local_bounds().size()),
        ObjectKind::Rect(r) => rect::shape(r),
        ObjectKind::Image(i) | ObjectKind::Logo(i) => images.shape(obj.id(), i, inputs.image.as_ref()),
        ObjectKind::Path(p) => path::shape(p),
        ObjectKind::Brush(b) => brush::shape(b),
    };
    NodeProps {
        id: obj.id(),
        kind: obj.tag(),
        position: a.position(),
        rotation: a.rotation,
        scale: a.scale(),
        opacity: a.opacity,
        blend: a.blend_mode,
        visible: a.visible && !inputs.editing,
        draggable: a.draggable,
        listening: !a.is_template,
        selected: inputs.selected && !a.is_template,
        clip: inputs.clip,
        shape,
    }
}

/// Patch for a finished drag. Locked objects stay put.
pub fn drag_patch(obj: &SceneObject, position: Pos2) -> Option<ObjectPatch> {
    if obj.is_locked() {
        log::debug!("Ignoring drag of locked {}", obj.id());
        return None;
    }
    Some(ObjectPatch::position(position.x, position.y))
}

/// Patch for a finished resize/rotate.
///
/// The gesture is rejected as a whole, leaving the previous box, when the
/// object is locked or the resulting box falls below the minimum size.
pub fn transform_patch(obj: &SceneObject, position: Pos2, rotation: f32, scale: Vec2) -> Option<ObjectPatch> {
    if obj.is_locked() {
        log::debug!("Ignoring transform of locked {}", obj.id());
        return None;
    }
    let local = obj.local_bounds().size();
    let resulting = Vec2::new(local.x * scale.x, local.y * scale.y);
    if let Err(reason) = validate_size(resulting) {
        log::debug!("Rejected transform of {}: {reason}", obj.id());
        return None;
    }
    Some(ObjectPatch::transform(position.x, position.y, rotation, scale.x, scale.y))
}

/// Whether `obj` ends up drawn at all.
pub fn draws_anything(props: &NodeProps) -> bool {
    props.visible
        && !matches!(
            props.shape,
            NodeShape::Empty | NodeShape::Image { pixels: None, .. }
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_objects_ignore_gestures() {
        let mut obj = SceneObject::rect(Pos2::ZERO, Vec2::splat(50.0));
        obj.attrs.draggable = false;
        assert!(drag_patch(&obj, Pos2::new(10.0, 10.0)).is_none());
        assert!(transform_patch(&obj, Pos2::ZERO, 0.0, Vec2::splat(2.0)).is_none());
    }

    #[test]
    fn shrinking_below_floor_is_rejected() {
        let obj = SceneObject::rect(Pos2::ZERO, Vec2::splat(50.0));
        // 50 * 0.04 = 2px
        assert!(transform_patch(&obj, Pos2::ZERO, 0.0, Vec2::splat(0.04)).is_none());
        let ok = transform_patch(&obj, Pos2::new(3.0, 4.0), 15.0, Vec2::new(0.5, 2.0)).unwrap();
        assert_eq!(ok.scale_x, Some(0.5));
        assert_eq!(ok.rotation, Some(15.0));
        assert_eq!(ok.x, Some(3.0));
    }

    #[test]
    fn template_never_listens_or_shows_handles() {
        let template = SceneObject::template("/t.svg", Vec2::new(800.0, 600.0), None);
        let props = build_props(
            &template,
            RenderInputs {
                selected: true,
                ..Default::default()
            },
            &mut ImageNodes::default(),
        );
        assert!(!props.listening);
        assert!(!props.selected);
        assert!(!draws_anything(&props));
    }

    #[test]
    fn editing_text_hides_the_node() {
        let obj = SceneObject::text("Edit me", Pos2::new(100.0, 100.0));
        let props = build_props(
            &obj,
            RenderInputs {
                editing: true,
                ..Default::default()
            },
            &mut ImageNodes::default(),
        );
        assert!(!props.visible);
    }
}
