#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use std::path::Path;

    use studio_canvas::{StudioApp, StudioConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = match std::env::args().nth(1) {
        Some(path) => StudioConfig::load(Path::new(&path)).unwrap_or_else(|err| {
            log::error!("{err}; using default settings");
            StudioConfig::default()
        }),
        None => StudioConfig::default(),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Studio",
        native_options,
        Box::new(|cc| Ok(Box::new(StudioApp::new(cc, config)))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
