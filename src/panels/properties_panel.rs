//! Attribute editing for the selected object and the active tool.
//!
//! Every edit becomes an [`ObjectPatch`] committed through the studio.

use eframe::egui;
use egui::Color32;
use egui::color_picker::{Alpha, color_edit_button_srgb, color_edit_button_srgba};

use crate::app::EditorStudio;
use crate::element::{BlendMode, ImageAttrs, ObjectKind, ObjectPatch, SceneObject, TextAlign};
use crate::id_generator::ObjectId;
use crate::state::ToolMode;

const FONT_FAMILIES: [&str; 6] = [
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
    "Courier New",
    "Verdana",
];

pub fn tool_settings(studio: &mut EditorStudio, ui: &mut egui::Ui) {
    match studio.tool() {
        ToolMode::Brush => {
            ui.strong("Brush");
            let brush = studio.brush_mut();
            ui.horizontal(|ui| {
                ui.label("Color");
                color_edit_button_srgba(ui, &mut brush.color, Alpha::Opaque);
            });
            ui.add(egui::Slider::new(&mut brush.width, 1.0..=50.0).text("Width"));
        }
        ToolMode::Eraser => {
            ui.strong("Eraser");
            let eraser = studio.eraser_mut();
            ui.add(egui::Slider::new(&mut eraser.radius, 2.0..=100.0).text("Radius"));
        }
        ToolMode::Select | ToolMode::Move | ToolMode::Text => {}
    }
}

/// Edits made through the panel this frame.
#[derive(Default)]
struct Edit {
    patch: ObjectPatch,
    /// Set when a slider or colour picker produced the change.
    continuous: Option<&'static str>,
    released: bool,
}

impl Edit {
    fn slider(
        &mut self,
        ui: &mut egui::Ui,
        control: &'static str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
    ) -> bool {
        let response = ui.add(egui::Slider::new(value, range).text(control));
        if response.drag_stopped() || response.lost_focus() {
            self.released = true;
        }
        if response.changed() {
            self.continuous = Some(control);
        }
        response.changed()
    }

    fn color(&mut self, ui: &mut egui::Ui, control: &'static str, current: Color32) -> Option<Color32> {
        let mut color = current;
        let changed = ui
            .horizontal(|ui| {
                ui.label(control);
                color_edit_button_srgba(ui, &mut color, Alpha::OnlyBlend).changed()
            })
            .inner;
        changed.then(|| {
            self.continuous = Some(control);
            color
        })
    }
}

pub fn properties(studio: &mut EditorStudio, ui: &mut egui::Ui) {
    let Some(obj) = studio.selected_object().cloned() else {
        ui.label(egui::RichText::new("Nothing selected").weak());
        return;
    };
    let id = obj.id();
    ui.strong(obj.label());

    let mut edit = Edit::default();
    common_controls(&obj, studio.objects(), &mut edit, ui);
    ui.separator();
    match &obj.kind {
        ObjectKind::Text(t) => {
            let mut text = t.text.clone();
            if ui.text_edit_multiline(&mut text).changed() {
                edit.patch.text = Some(text);
            }
            let mut family = t.font_family.clone();
            egui::ComboBox::from_label("Font")
                .selected_text(family.clone())
                .show_ui(ui, |ui| {
                    for name in FONT_FAMILIES {
                        ui.selectable_value(&mut family, name.to_owned(), name);
                    }
                });
            if family != t.font_family {
                edit.patch.font_family = Some(family);
            }
            let mut size = t.font_size;
            if edit.slider(ui, "Size", &mut size, 8.0..=200.0) {
                edit.patch.font_size = Some(size);
            }
            edit.patch.fill = edit.color(ui, "Fill", t.fill);
            let mut align = t.align;
            ui.horizontal(|ui| {
                ui.selectable_value(&mut align, TextAlign::Left, "Left");
                ui.selectable_value(&mut align, TextAlign::Center, "Center");
                ui.selectable_value(&mut align, TextAlign::Right, "Right");
            });
            if align != t.align {
                edit.patch.align = Some(align);
            }
        }
        ObjectKind::Rect(r) => {
            edit.patch.fill = edit.color(ui, "Fill", r.fill);
            edit.patch.stroke = edit.color(ui, "Stroke", r.stroke);
            let mut width = r.stroke_width;
            if edit.slider(ui, "Stroke width", &mut width, 0.0..=50.0) {
                edit.patch.stroke_width = Some(width);
            }
        }
        ObjectKind::Image(i) | ObjectKind::Logo(i) => colorize_controls(i, &mut edit, ui),
        ObjectKind::Path(p) => {
            edit.patch.fill = edit.color(ui, "Fill", p.fill);
            edit.patch.stroke = edit.color(ui, "Stroke", p.stroke);
            let mut width = p.stroke_width;
            if edit.slider(ui, "Stroke width", &mut width, 0.0..=20.0) {
                edit.patch.stroke_width = Some(width);
            }
        }
        ObjectKind::Brush(b) => {
            edit.patch.color = edit.color(ui, "Color", b.color);
            let mut width = b.stroke_width;
            if edit.slider(ui, "Width", &mut width, 1.0..=50.0) {
                edit.patch.stroke_width = Some(width);
            }
        }
    }

    let Edit {
        patch,
        continuous,
        released,
    } = edit;
    if !patch.is_empty() {
        match continuous {
            Some(control) => studio.apply_continuous_patch(id, control, patch),
            None => studio.apply_patch(id, patch),
        };
    }
    if released {
        studio.finish_continuous_edit();
    }
}

fn common_controls(obj: &SceneObject, objects: &[SceneObject], edit: &mut Edit, ui: &mut egui::Ui) {
    let a = &obj.attrs;
    let mut opacity = a.opacity;
    if edit.slider(ui, "Opacity", &mut opacity, 0.0..=1.0) {
        edit.patch.opacity = Some(opacity);
    }

    let mut blend = a.blend_mode;
    egui::ComboBox::from_label("Blend")
        .selected_text(blend.label())
        .show_ui(ui, |ui| {
            for mode in BlendMode::ALL {
                ui.selectable_value(&mut blend, mode, mode.label());
            }
        });
    if blend != a.blend_mode {
        edit.patch.blend_mode = Some(blend);
    }

    let mut clip: Option<ObjectId> = a.clip_source_id;
    let current = clip
        .and_then(|id| objects.iter().find(|o| o.id() == id))
        .map_or_else(|| "None".to_owned(), SceneObject::label);
    egui::ComboBox::from_label("Clip to")
        .selected_text(current)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut clip, None, "None");
            for other in objects.iter().filter(|o| o.id() != obj.id()) {
                ui.selectable_value(&mut clip, Some(other.id()), other.label());
            }
        });
    if clip != a.clip_source_id {
        edit.patch.clip_source_id = Some(clip);
    }
}

fn colorize_controls(i: &ImageAttrs, edit: &mut Edit, ui: &mut egui::Ui) {
    let mut colorize = i.colorize;
    if ui.checkbox(&mut colorize, "Colorize").changed() {
        edit.patch.colorize = Some(colorize);
    }
    ui.add_enabled_ui(i.colorize, |ui| {
        let mut rgb = [i.colorize_red, i.colorize_green, i.colorize_blue];
        ui.horizontal(|ui| {
            ui.label("Tint");
            if color_edit_button_srgb(ui, &mut rgb).changed() {
                edit.patch.colorize_red = Some(rgb[0]);
                edit.patch.colorize_green = Some(rgb[1]);
                edit.patch.colorize_blue = Some(rgb[2]);
                edit.continuous = Some("Tint");
            }
        });
    });
}
