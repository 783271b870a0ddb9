#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod assets;
pub mod clip;
pub mod command;
pub mod components;
pub mod config;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod gizmo;
pub mod id_generator;
pub mod input;
pub mod layer;
pub mod node;
pub mod panels;
pub mod renderer;
pub mod rulers;
pub mod state;
pub mod studio;
pub mod surface;
pub mod texture_manager;
pub mod tools;

pub use app::StudioApp;
pub use command::{Command, CommandHistory};
pub use config::StudioConfig;
pub use element::{ObjectPatch, SceneObject};
pub use error::StudioError;
pub use renderer::EguiSurface;
pub use studio::Studio;
pub use surface::RenderSurface;
