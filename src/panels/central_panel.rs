use eframe::egui;
use egui::{FontId, Rect, Sense, UiBuilder, Vec2};

use crate::app::{EditorStudio, UiState};
use crate::renderer::{GestureMode, StrokePreview};
use crate::rulers::{self, RULER_SIZE};

pub fn central_panel(studio: &mut EditorStudio, state: &mut UiState, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::both().show(ui, |ui| {
            let canvas_size = studio.config().canvas_size();
            let (outer, _) = ui.allocate_exact_size(canvas_size + Vec2::splat(RULER_SIZE), Sense::hover());
            let canvas_rect = Rect::from_min_size(outer.min + Vec2::splat(RULER_SIZE), canvas_size);

            let mode = if studio.tool().manipulates_objects() {
                GestureMode::Objects
            } else {
                GestureMode::Freehand
            };
            let preview = studio.brush().preview().map(|points| StrokePreview {
                points: points.to_vec(),
                color: studio.brush().color,
                width: studio.brush().width,
            });
            let show_clips = studio.config().show_clip_outlines;

            let mut pointer = None;
            if let Some(surface) = studio.surface_mut() {
                surface.set_gesture_mode(mode);
                surface.set_stroke_preview(preview);
                surface.set_show_clip_outlines(show_clips);
                ui.allocate_new_ui(UiBuilder::new().max_rect(canvas_rect), |ui| {
                    surface.show(ui, canvas_size);
                });
                pointer = surface.pointer();
            }
            studio.process_surface_events();

            if studio.show_rulers() {
                rulers::paint(ui.painter(), canvas_rect, studio.config().ruler_tick_spacing, pointer);
            }

            text_overlay(studio, state, ui, canvas_rect);
        });
    });
}

/// Inline editor placed over the text node being edited.
///
/// `TextEdit` has no rotation, so the editor stays axis-aligned over rotated text.
fn text_overlay(studio: &mut EditorStudio, state: &mut UiState, ui: &mut egui::Ui, canvas: Rect) {
    let Some(target) = studio.editor_state().text_session().map(|s| s.target()) else {
        state.overlay_focus = None;
        return;
    };
    let Some(overlay) = studio.text_overlay() else {
        return;
    };
    let scale = overlay.scale.abs();
    let size = Vec2::new(overlay.size.x * scale.x + overlay.font_size, overlay.size.y * scale.y);
    let rect = Rect::from_min_size(canvas.min + overlay.position.to_vec2(), size);

    let mut text = overlay.text.clone();
    let edit = egui::TextEdit::multiline(&mut text)
        .font(FontId::proportional(overlay.font_size * scale.y.max(0.01)))
        .text_color(overlay.color)
        .desired_width(rect.width())
        .frame(false);
    let response = ui.put(rect, edit);

    if state.overlay_focus != Some(target) {
        response.request_focus();
        state.overlay_focus = Some(target);
    }
    if response.changed() {
        studio.text_input(&text);
    }
    if response.lost_focus() {
        studio.end_text_edit();
        state.overlay_focus = None;
    }
}
