use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::id_generator::{ObjectId, generate_id};

mod common;
mod patch;

pub use common::{MIN_ELEMENT_SIZE, PATH_REFERENCE_SIZE, distance_to_line_segment};
pub(crate) use common::{calculate_bounds, path_bounds, validate_size};
pub use patch::ObjectPatch;

/// Side length of the region a clip source without explicit dimensions covers.
pub const DEFAULT_CLIP_EXTENT: f32 = 100.0;

/// Compositing mode applied when a node is painted over the ones below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    #[serde(rename = "source-over")]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl BlendMode {
    pub const ALL: [BlendMode; 12] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "Color Dodge",
            BlendMode::ColorBurn => "Color Burn",
            BlendMode::HardLight => "Hard Light",
            BlendMode::SoftLight => "Soft Light",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Discriminant of [`ObjectKind`], handy for tool switching and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Text,
    Rect,
    Image,
    Logo,
    Path,
    Brush,
}

impl KindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindTag::Text => "text",
            KindTag::Rect => "rect",
            KindTag::Image => "image",
            KindTag::Logo => "logo",
            KindTag::Path => "path",
            KindTag::Brush => "brush",
        }
    }
}

/// Attributes shared by every scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonAttrs {
    pub x: f32,
    pub y: f32,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub visible: bool,
    /// `false` means locked.
    pub draggable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_source_id: Option<ObjectId>,
    #[serde(default)]
    pub is_template: bool,
}

impl CommonAttrs {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            visible: true,
            draggable: true,
            clip_source_id: None,
            is_template: false,
        }
    }

    pub fn position(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn scale(&self) -> Vec2 {
        Vec2::new(self.scale_x, self.scale_y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttrs {
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub fill: Color32,
    #[serde(default)]
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectAttrs {
    pub width: f32,
    pub height: f32,
    pub fill: Color32,
    pub stroke: Color32,
    pub stroke_width: f32,
}

/// Shared by `image` and `logo` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttrs {
    pub image_url: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub colorize: bool,
    #[serde(default)]
    pub colorize_red: u8,
    #[serde(default)]
    pub colorize_green: u8,
    #[serde(default)]
    pub colorize_blue: u8,
    /// Backing colour painted under the image. Used for the template board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color32>,
}

impl ImageAttrs {
    pub fn new(image_url: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            image_url: image_url.into(),
            width,
            height,
            colorize: false,
            colorize_red: 0,
            colorize_green: 0,
            colorize_blue: 0,
            fill: None,
        }
    }

    pub fn tint(&self) -> Option<[u8; 3]> {
        self.colorize
            .then_some([self.colorize_red, self.colorize_green, self.colorize_blue])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathAttrs {
    pub path_data: String,
    pub fill: Color32,
    pub stroke: Color32,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushAttrs {
    /// Canvas-space points when the object sits at the origin.
    pub points: Vec<Pos2>,
    pub color: Color32,
    pub stroke_width: f32,
}

/// Per-kind attributes. Defaults are applied once, by the constructors on [`SceneObject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectKind {
    Text(TextAttrs),
    Rect(RectAttrs),
    Image(ImageAttrs),
    Logo(ImageAttrs),
    Path(PathAttrs),
    Brush(BrushAttrs),
}

impl ObjectKind {
    pub fn tag(&self) -> KindTag {
        match self {
            ObjectKind::Text(_) => KindTag::Text,
            ObjectKind::Rect(_) => KindTag::Rect,
            ObjectKind::Image(_) => KindTag::Image,
            ObjectKind::Logo(_) => KindTag::Logo,
            ObjectKind::Path(_) => KindTag::Path,
            ObjectKind::Brush(_) => KindTag::Brush,
        }
    }
}

/// One placeable item on the design surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    id: ObjectId,
    #[serde(flatten)]
    pub attrs: CommonAttrs,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn new(id: ObjectId, attrs: CommonAttrs, kind: ObjectKind) -> Self {
        Self { id, attrs, kind }
    }

    pub fn text(text: impl Into<String>, position: Pos2) -> Self {
        Self::new(
            generate_id(),
            CommonAttrs::at(position.x, position.y),
            ObjectKind::Text(TextAttrs {
                text: text.into(),
                font_family: "Arial".to_owned(),
                font_size: 24.0,
                fill: Color32::BLACK,
                align: TextAlign::Left,
            }),
        )
    }

    pub fn rect(position: Pos2, size: Vec2) -> Self {
        Self::new(
            generate_id(),
            CommonAttrs::at(position.x, position.y),
            ObjectKind::Rect(RectAttrs {
                width: size.x,
                height: size.y,
                fill: Color32::WHITE,
                stroke: Color32::BLACK,
                stroke_width: 1.0,
            }),
        )
    }

    pub fn image(url: impl Into<String>, position: Pos2, size: Vec2) -> Self {
        Self::new(
            generate_id(),
            CommonAttrs::at(position.x, position.y),
            ObjectKind::Image(ImageAttrs::new(url, size.x, size.y)),
        )
    }

    pub fn logo(url: impl Into<String>, position: Pos2, size: Vec2) -> Self {
        Self::new(
            generate_id(),
            CommonAttrs::at(position.x, position.y),
            ObjectKind::Logo(ImageAttrs::new(url, size.x, size.y)),
        )
    }

    /// The background garment outline: origin-anchored, canvas-sized, never draggable.
    pub fn template(url: impl Into<String>, canvas_size: Vec2, board: Option<Color32>) -> Self {
        let mut attrs = CommonAttrs::at(0.0, 0.0);
        attrs.draggable = false;
        attrs.is_template = true;
        let mut image = ImageAttrs::new(url, canvas_size.x, canvas_size.y);
        image.fill = board;
        Self::new(generate_id(), attrs, ObjectKind::Image(image))
    }

    pub fn path(path_data: impl Into<String>, position: Pos2) -> Self {
        Self::new(
            generate_id(),
            CommonAttrs::at(position.x, position.y),
            ObjectKind::Path(PathAttrs {
                path_data: path_data.into(),
                fill: Color32::BLACK,
                stroke: Color32::TRANSPARENT,
                stroke_width: 0.0,
            }),
        )
    }

    pub fn brush(points: Vec<Pos2>, color: Color32, stroke_width: f32) -> Self {
        Self::new(
            generate_id(),
            CommonAttrs::at(0.0, 0.0),
            ObjectKind::Brush(BrushAttrs {
                points,
                color,
                stroke_width,
            }),
        )
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn is_template(&self) -> bool {
        self.attrs.is_template
    }

    pub fn is_locked(&self) -> bool {
        !self.attrs.draggable
    }

    /// Width/height carried by the object itself, if its kind has any.
    pub fn explicit_size(&self) -> Option<Vec2> {
        match &self.kind {
            ObjectKind::Rect(r) => Some(Vec2::new(r.width, r.height)),
            ObjectKind::Image(i) | ObjectKind::Logo(i) => Some(Vec2::new(i.width, i.height)),
            ObjectKind::Text(_) | ObjectKind::Path(_) | ObjectKind::Brush(_) => None,
        }
    }

    /// Untransformed bounds in the object's local space.
    pub fn local_bounds(&self) -> Rect {
        match &self.kind {
            ObjectKind::Text(t) => {
                let lines: Vec<&str> = t.text.split('\n').collect();
                let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                let width = (longest.max(1) as f32) * t.font_size * 0.6;
                let height = lines.len() as f32 * t.font_size;
                Rect::from_min_size(Pos2::ZERO, Vec2::new(width, height))
            }
            ObjectKind::Rect(r) => Rect::from_min_size(Pos2::ZERO, Vec2::new(r.width, r.height)),
            ObjectKind::Image(i) | ObjectKind::Logo(i) => {
                Rect::from_min_size(Pos2::ZERO, Vec2::new(i.width, i.height))
            }
            ObjectKind::Path(p) => path_bounds(&p.path_data).unwrap_or(Rect::NOTHING),
            ObjectKind::Brush(b) => calculate_bounds(&b.points, b.stroke_width * 0.5),
        }
    }

    /// Maps a local point into canvas space: scale, then rotate, then translate.
    pub fn to_canvas(&self, local: Pos2) -> Pos2 {
        let a = &self.attrs;
        let scaled = Vec2::new(local.x * a.scale_x, local.y * a.scale_y);
        let rotated = egui::emath::Rot2::from_angle(a.rotation.to_radians()) * scaled;
        a.position() + rotated
    }

    /// Inverse of [`Self::to_canvas`]. Degenerate scales map to the origin.
    pub fn to_local(&self, canvas: Pos2) -> Pos2 {
        let a = &self.attrs;
        let unrotated = egui::emath::Rot2::from_angle(-a.rotation.to_radians()) * (canvas - a.position());
        let sx = if a.scale_x == 0.0 { 1.0 } else { a.scale_x };
        let sy = if a.scale_y == 0.0 { 1.0 } else { a.scale_y };
        Pos2::new(unrotated.x / sx, unrotated.y / sy)
    }

    /// Axis-aligned canvas bounds of the transformed local box.
    pub fn world_bounds(&self) -> Rect {
        let local = self.local_bounds();
        if local == Rect::NOTHING {
            return Rect::NOTHING;
        }
        let corners = [
            local.left_top(),
            local.right_top(),
            local.right_bottom(),
            local.left_bottom(),
        ]
        .map(|p| self.to_canvas(p));
        calculate_bounds(&corners, 0.0)
    }

    /// Local box scaled by the current scale factors, ignoring rotation.
    pub fn scaled_size(&self) -> Vec2 {
        let size = self.local_bounds().size();
        Vec2::new(
            size.x * self.attrs.scale_x.abs(),
            size.y * self.attrs.scale_y.abs(),
        )
    }

    pub fn label(&self) -> String {
        match &self.kind {
            ObjectKind::Text(t) => {
                let first: String = t.text.chars().take(16).collect();
                format!("Text \"{first}\"")
            }
            ObjectKind::Rect(_) => format!("Rect {}", self.id.short()),
            ObjectKind::Image(_) => format!("Image {}", self.id.short()),
            ObjectKind::Logo(_) => format!("Logo {}", self.id.short()),
            ObjectKind::Path(_) => format!("Path {}", self.id.short()),
            ObjectKind::Brush(_) => format!("Brush {}", self.id.short()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_defaults_are_applied_at_construction() {
        let obj = SceneObject::text("Edit me", Pos2::new(100.0, 100.0));
        let ObjectKind::Text(t) = &obj.kind else {
            panic!("expected text kind");
        };
        assert_eq!(t.font_size, 24.0);
        assert_eq!(t.font_family, "Arial");
        assert_eq!(t.fill, Color32::BLACK);
        assert!(obj.attrs.visible);
        assert!(obj.attrs.draggable);
        assert_eq!(obj.tag(), KindTag::Text);
    }

    #[test]
    fn template_is_locked_and_flagged() {
        let obj = SceneObject::template("/templates/a.svg", Vec2::new(800.0, 600.0), None);
        assert!(obj.is_template());
        assert!(obj.is_locked());
        assert_eq!(obj.explicit_size(), Some(Vec2::new(800.0, 600.0)));
    }

    #[test]
    fn serializes_with_kind_tag_and_camel_case() {
        let obj = SceneObject::rect(Pos2::new(1.0, 2.0), Vec2::new(10.0, 20.0));
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["kind"], "rect");
        assert_eq!(json["scaleX"], 1.0);
        assert_eq!(json["strokeWidth"], 1.0);
        assert_eq!(json["blendMode"], "source-over");

        let back: SceneObject = serde_json::from_value(json).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn local_and_canvas_transforms_are_inverse() {
        let mut obj = SceneObject::rect(Pos2::new(50.0, 40.0), Vec2::new(10.0, 10.0));
        obj.attrs.rotation = 30.0;
        obj.attrs.scale_x = 2.0;
        obj.attrs.scale_y = 0.5;
        let p = Pos2::new(3.0, 7.0);
        let back = obj.to_local(obj.to_canvas(p));
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn world_bounds_follow_scale() {
        let mut obj = SceneObject::rect(Pos2::new(10.0, 10.0), Vec2::new(10.0, 20.0));
        obj.attrs.scale_x = 2.0;
        let bounds = obj.world_bounds();
        assert_eq!(bounds.min, Pos2::new(10.0, 10.0));
        assert_eq!(bounds.max, Pos2::new(30.0, 30.0));
    }
}
