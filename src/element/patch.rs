use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use super::{BlendMode, ObjectKind, SceneObject, TextAlign};
use crate::id_generator::ObjectId;

/// Partial attribute set describing a requested change to one object.
///
/// Fields that do not exist on the target's kind are ignored. Nested options
/// (`clip_source_id`, `backing_fill`) distinguish "leave alone" from "clear".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_source_id: Option<Option<ObjectId>>,

    // text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,

    // shared by text, rect, path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,

    // rect, image, logo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,

    // image, logo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorize_red: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorize_green: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorize_blue: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_fill: Option<Option<Color32>>,

    // path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_data: Option<String>,

    // brush
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Pos2>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color32>,
}

fn merge<T: PartialEq>(slot: &mut T, value: &Option<T>, changed: &mut bool)
where
    T: Clone,
{
    if let Some(value) = value {
        if slot != value {
            *slot = value.clone();
            *changed = true;
        }
    }
}

impl ObjectPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn transform(x: f32, y: f32, rotation: f32, scale_x: f32, scale_y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            rotation: Some(rotation),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Default::default()
        }
    }

    pub fn draggable(draggable: bool) -> Self {
        Self {
            draggable: Some(draggable),
            ..Default::default()
        }
    }

    pub fn clip_source(source: Option<ObjectId>) -> Self {
        Self {
            clip_source_id: Some(source),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Touches any of the fields the tinted image cache is keyed on.
    pub fn touches_colorize(&self) -> bool {
        self.colorize.is_some()
            || self.colorize_red.is_some()
            || self.colorize_green.is_some()
            || self.colorize_blue.is_some()
    }

    /// Shallow-merges the patch over `obj`. Returns whether anything changed.
    ///
    /// An object can never be its own clip source; such a request is dropped.
    pub fn apply(&self, obj: &mut SceneObject) -> bool {
        let mut changed = false;
        let id = obj.id();
        let a = &mut obj.attrs;
        merge(&mut a.x, &self.x, &mut changed);
        merge(&mut a.y, &self.y, &mut changed);
        merge(&mut a.rotation, &self.rotation, &mut changed);
        merge(&mut a.scale_x, &self.scale_x, &mut changed);
        merge(&mut a.scale_y, &self.scale_y, &mut changed);
        merge(
            &mut a.opacity,
            &self.opacity.map(|o| o.clamp(0.0, 1.0)),
            &mut changed,
        );
        merge(&mut a.blend_mode, &self.blend_mode, &mut changed);
        merge(&mut a.visible, &self.visible, &mut changed);
        if !a.is_template {
            merge(&mut a.draggable, &self.draggable, &mut changed);
        }
        match self.clip_source_id {
            Some(Some(source)) if source == id => {
                log::debug!("Ignoring request to clip {id} by itself");
            }
            _ => merge(&mut a.clip_source_id, &self.clip_source_id, &mut changed),
        }

        match &mut obj.kind {
            ObjectKind::Text(t) => {
                merge(&mut t.text, &self.text, &mut changed);
                merge(&mut t.font_family, &self.font_family, &mut changed);
                merge(&mut t.font_size, &self.font_size, &mut changed);
                merge(&mut t.align, &self.align, &mut changed);
                merge(&mut t.fill, &self.fill, &mut changed);
            }
            ObjectKind::Rect(r) => {
                merge(&mut r.fill, &self.fill, &mut changed);
                merge(&mut r.stroke, &self.stroke, &mut changed);
                merge(&mut r.stroke_width, &self.stroke_width, &mut changed);
                merge(&mut r.width, &self.width, &mut changed);
                merge(&mut r.height, &self.height, &mut changed);
            }
            ObjectKind::Image(i) | ObjectKind::Logo(i) => {
                merge(&mut i.image_url, &self.image_url, &mut changed);
                merge(&mut i.width, &self.width, &mut changed);
                merge(&mut i.height, &self.height, &mut changed);
                merge(&mut i.colorize, &self.colorize, &mut changed);
                merge(&mut i.colorize_red, &self.colorize_red, &mut changed);
                merge(&mut i.colorize_green, &self.colorize_green, &mut changed);
                merge(&mut i.colorize_blue, &self.colorize_blue, &mut changed);
                merge(&mut i.fill, &self.backing_fill, &mut changed);
            }
            ObjectKind::Path(p) => {
                merge(&mut p.path_data, &self.path_data, &mut changed);
                merge(&mut p.fill, &self.fill, &mut changed);
                merge(&mut p.stroke, &self.stroke, &mut changed);
                merge(&mut p.stroke_width, &self.stroke_width, &mut changed);
            }
            ObjectKind::Brush(b) => {
                merge(&mut b.points, &self.points, &mut changed);
                merge(&mut b.color, &self.color, &mut changed);
                merge(&mut b.stroke_width, &self.stroke_width, &mut changed);
            }
        }
        changed
    }
}
