use eframe::egui;

use crate::app::EditorStudio;
use crate::id_generator::ObjectId;

enum RowAction {
    Select(ObjectId),
    ToggleVisibility(ObjectId),
    ToggleLock(ObjectId),
    Delete(ObjectId),
    Forward(ObjectId),
    Backward(ObjectId),
    Move { from: usize, to: usize },
}

/// Layer rows, top of the stack first. Rows can be dragged onto each other.
pub fn layers(studio: &mut EditorStudio, ui: &mut egui::Ui) {
    let rows = studio.layer_rows();
    if rows.is_empty() {
        ui.label(egui::RichText::new("No layers yet").weak());
        return;
    }

    let mut action = None;
    for (visual, row) in rows.iter().enumerate() {
        let drop_zone = ui
            .horizontal(|ui| {
                let drag_id = egui::Id::new(("layer_row", row.id));
                ui.dnd_drag_source(drag_id, visual, |ui| {
                    ui.label("☰");
                });
                if ui.selectable_label(row.selected, &row.label).clicked() {
                    action = Some(RowAction::Select(row.id));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        action = Some(RowAction::Delete(row.id));
                    }
                    if ui.small_button("⏷").on_hover_text("Send backward").clicked() {
                        action = Some(RowAction::Backward(row.id));
                    }
                    if ui.small_button("⏶").on_hover_text("Bring forward").clicked() {
                        action = Some(RowAction::Forward(row.id));
                    }
                    let lock = if row.locked { "🔒" } else { "🔓" };
                    if ui.small_button(lock).on_hover_text("Lock").clicked() {
                        action = Some(RowAction::ToggleLock(row.id));
                    }
                    let eye = if row.visible { "👁" } else { "—" };
                    if ui.small_button(eye).on_hover_text("Visibility").clicked() {
                        action = Some(RowAction::ToggleVisibility(row.id));
                    }
                });
            })
            .response;
        if let Some(from) = drop_zone.dnd_release_payload::<usize>() {
            action = Some(RowAction::Move { from: *from, to: visual });
        }
    }

    match action {
        Some(RowAction::Select(id)) => studio.select(id),
        Some(RowAction::ToggleVisibility(id)) => {
            studio.toggle_visibility(id);
        }
        Some(RowAction::ToggleLock(id)) => {
            studio.toggle_lock(id);
        }
        Some(RowAction::Delete(id)) => {
            studio.delete(id);
        }
        Some(RowAction::Forward(id)) => {
            studio.bring_forward(id);
        }
        Some(RowAction::Backward(id)) => {
            studio.send_backward(id);
        }
        Some(RowAction::Move { from, to }) => {
            studio.reorder_layers(from, to);
        }
        None => {}
    }
}
