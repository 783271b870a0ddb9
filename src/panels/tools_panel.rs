use std::path::Path;

use eframe::egui;
use egui::Color32;
use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::app::{EditorStudio, UiState};
use crate::components::ToolButton;
use crate::state::ToolMode;

pub fn tools_panel(studio: &mut EditorStudio, state: &mut UiState, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            ui.horizontal_wrapped(|ui| {
                for tool in ToolMode::ALL {
                    if ToolButton::new(tool, studio.tool() == tool).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.label());
                        studio.set_tool(tool);
                    }
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Add Text").clicked() {
                    studio.add_text();
                }
                if ui.button("Add Rect").clicked() {
                    studio.add_rect();
                }
            });
            ui.label(
                egui::RichText::new("Drop a JPG, PNG, WebP, BMP or GIF onto the window to add it.")
                    .small()
                    .weak(),
            );
            ui.separator();

            ui.horizontal(|ui| {
                if ui.add_enabled(studio.can_undo(), egui::Button::new("Undo")).clicked() {
                    studio.undo();
                }
                if ui.add_enabled(studio.can_redo(), egui::Button::new("Redo")).clicked() {
                    studio.redo();
                }
            });
            let history = studio.history();
            ui.label(format!("History step {} of {}", history.step() + 1, history.len()));
            ui.separator();

            ui.collapsing("Templates", |ui| {
                let templates = studio.config().templates.clone();
                for entry in templates {
                    if ui.button(&entry.name).clicked() {
                        if studio.template_replacement_discards() > 0 {
                            state.pending_template = Some(entry);
                        } else {
                            studio.select_template(&entry.path);
                        }
                    }
                }
            });

            if studio.template().is_some() {
                let mut color = studio.board_color().unwrap_or(Color32::TRANSPARENT);
                ui.horizontal(|ui| {
                    ui.label("Board colour");
                    if color_edit_button_srgba(ui, &mut color, Alpha::OnlyBlend).changed() {
                        studio.set_board_color(color);
                    }
                });
            }

            ui.collapsing("Logos", |ui| {
                let logos = studio.config().logos.clone();
                if logos.is_empty() {
                    ui.label(egui::RichText::new("No logos configured").weak());
                }
                for entry in logos {
                    ui.horizontal(|ui| {
                        if ui.button(&entry.name).clicked() {
                            studio.select_logo(&entry.path);
                        }
                        if entry.path.to_ascii_lowercase().ends_with(".svg")
                            && ui.small_button("as vector").clicked()
                        {
                            import_vector_logo(studio, state, &entry.path);
                        }
                    });
                }
            });
            ui.separator();

            let mut show_rulers = studio.show_rulers();
            if ui.checkbox(&mut show_rulers, "Rulers").changed() {
                studio.toggle_rulers();
            }
            ui.separator();

            ui.label("Design file");
            ui.text_edit_singleline(&mut state.design_path);
            ui.horizontal(|ui| {
                let path = Path::new(&state.design_path).to_path_buf();
                if ui.button("Save").clicked() {
                    state.status = Some(match studio.save_design(&path) {
                        Ok(()) => format!("Saved {}", path.display()),
                        Err(err) => {
                            log::error!("{err}");
                            err.to_string()
                        }
                    });
                }
                if ui.button("Load").clicked() {
                    state.status = Some(match studio.load_design(&path) {
                        Ok(()) => format!("Loaded {}", path.display()),
                        Err(err) => {
                            log::error!("{err}");
                            err.to_string()
                        }
                    });
                }
            });
            if let Some(status) = &state.status {
                ui.label(egui::RichText::new(status).small());
            }
        });
}

fn import_vector_logo(studio: &mut EditorStudio, state: &mut UiState, path: &str) {
    let file = studio.config().asset_root.join(path.trim_start_matches('/'));
    match std::fs::read_to_string(&file) {
        Ok(svg) => {
            if studio.add_path_from_svg(&svg).is_none() {
                state.status = Some(format!("No vector paths in {path}"));
            }
        }
        Err(err) => {
            log::warn!("Failed to read {}: {err}", file.display());
            state.status = Some(format!("Could not read {path}"));
        }
    }
}
