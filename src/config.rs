use std::path::{Path, PathBuf};

use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use crate::command::DEFAULT_HISTORY_LIMIT;
use crate::error::ConfigError;

/// One selectable template or logo asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: String,
}

impl CatalogEntry {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_owned(),
            path: path.to_owned(),
        }
    }
}

fn default_templates() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(
            "Long Sleeve Hoodie",
            "/templates/vecteezy_long-sleeve-hoodie-technical-fashion-flat-sketch-vector_9649450.svg",
        ),
        CatalogEntry::new(
            "Long Sleeve Jacket",
            "/templates/vecteezy_long-sleeve-jacket-technical-fashion-flat-sketch-vector_7494901.svg",
        ),
        CatalogEntry::new(
            "Jacket with Pocket",
            "/templates/vecteezy_long-sleeve-jacket-with-pocket-and-zipper-technical-fashion_19849444.svg",
        ),
        CatalogEntry::new(
            "Jacket Sweatshirt",
            "/templates/vecteezy_long-sleeve-with-zipper-and-pocket-jacket-sweatshirt_11387650.svg",
        ),
        CatalogEntry::new(
            "Polo Shirt",
            "/templates/vecteezy_polo-shirt-vector-illustration-template-front-and-back_6896922.svg",
        ),
    ]
}

/// Studio settings. Every field has a default, so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub show_rulers: bool,
    pub ruler_tick_spacing: f32,
    pub brush_color: Color32,
    pub brush_width: f32,
    pub eraser_radius: f32,
    /// Snapshots kept for undo; the oldest go first.
    pub history_limit: usize,
    /// Relative and `/`-rooted asset paths resolve against this directory.
    pub asset_root: PathBuf,
    /// Outlines clip regions in red, for debugging.
    pub show_clip_outlines: bool,
    pub templates: Vec<CatalogEntry>,
    pub logos: Vec<CatalogEntry>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            show_rulers: true,
            ruler_tick_spacing: 50.0,
            brush_color: Color32::BLACK,
            brush_width: 5.0,
            eraser_radius: 10.0,
            history_limit: DEFAULT_HISTORY_LIMIT,
            asset_root: PathBuf::from("assets"),
            show_clip_outlines: false,
            templates: default_templates(),
            logos: Vec::new(),
        }
    }
}

impl StudioConfig {
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    pub fn from_json(json: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json, path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
