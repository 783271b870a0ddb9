mod central_panel;
mod layers_panel;
mod properties_panel;
mod tools_panel;

pub use central_panel::central_panel;
pub use tools_panel::tools_panel;

use eframe::egui;

use crate::app::EditorStudio;

/// Right-hand column: tool settings, the selection's properties and the layer list.
pub fn inspector_panel(studio: &mut EditorStudio, ctx: &egui::Context) {
    egui::SidePanel::right("inspector_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                properties_panel::tool_settings(studio, ui);
                ui.heading("Properties");
                properties_panel::properties(studio, ui);
                ui.separator();
                ui.heading("Layers");
                layers_panel::layers(studio, ui);
            });
        });
}
