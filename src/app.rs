use crate::config::{CatalogEntry, StudioConfig};
use crate::file_handler;
use crate::id_generator::ObjectId;
use crate::input;
use crate::panels;
use crate::renderer::EguiSurface;
use crate::studio::Studio;

/// The studio as the desktop shell drives it.
pub type EditorStudio = Studio<EguiSurface>;

/// Shell state that lives outside the scene.
///
/// We derive Deserialize/Serialize so the design path survives restarts.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)]
pub struct UiState {
    pub design_path: String,
    /// Message for the last rejected upload.
    #[serde(skip)]
    pub rejection: Option<String>,
    /// Template waiting on the user to confirm discarding the scene.
    #[serde(skip)]
    pub pending_template: Option<CatalogEntry>,
    #[serde(skip)]
    pub status: Option<String>,
    /// Text object whose inline editor already took focus.
    #[serde(skip)]
    pub overlay_focus: Option<ObjectId>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            design_path: "design.json".to_owned(),
            rejection: None,
            pending_template: None,
            status: None,
            overlay_focus: None,
        }
    }
}

pub struct StudioApp {
    studio: EditorStudio,
    ui_state: UiState,
}

impl StudioApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: StudioConfig) -> Self {
        let ui_state = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let mut studio = Studio::new(config);
        studio.attach_surface(EguiSurface::new());

        Self { studio, ui_state }
    }

    fn handle_drops(&mut self, ctx: &egui::Context) {
        for upload in file_handler::take_dropped_files(ctx) {
            if let Err(err) = self.studio.add_image_upload(upload) {
                log::warn!("{err}");
                self.ui_state.rejection = Some(err.to_string());
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // A focused text field owns the keyboard.
        if ctx.wants_keyboard_input() {
            return;
        }
        let actions = ctx.input(|i| input::actions_from_events(&i.events));
        for action in actions {
            self.studio.handle_key(action);
        }
    }

    fn rejection_window(&mut self, ctx: &egui::Context) {
        let Some(message) = self.ui_state.rejection.clone() else {
            return;
        };
        egui::Window::new("Upload rejected")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.ui_state.rejection = None;
                }
            });
    }

    fn template_confirmation(&mut self, ctx: &egui::Context) {
        let Some(entry) = self.ui_state.pending_template.clone() else {
            return;
        };
        let discarded = self.studio.template_replacement_discards();
        egui::Window::new("Replace design?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Selecting a template removes all {discarded} objects. You can undo this."
                ));
                ui.horizontal(|ui| {
                    if ui.button("Replace").clicked() {
                        self.studio.select_template(&entry.path);
                        self.ui_state.pending_template = None;
                    }
                    if ui.button("Cancel").clicked() {
                        self.ui_state.pending_template = None;
                    }
                });
            });
    }
}

impl eframe::App for StudioApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.ui_state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_drops(ctx);
        self.handle_shortcuts(ctx);

        self.studio.poll_assets();
        if self.studio.assets().is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        panels::tools_panel(&mut self.studio, &mut self.ui_state, ctx);
        panels::inspector_panel(&mut self.studio, ctx);
        panels::central_panel(&mut self.studio, &mut self.ui_state, ctx);

        self.rejection_window(ctx);
        self.template_confirmation(ctx);
    }
}
