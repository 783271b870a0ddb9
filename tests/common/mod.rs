#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use egui::Pos2;
use studio_canvas::assets::{BlobRegistry, FsLoader};
use studio_canvas::id_generator::ObjectId;
use studio_canvas::renderer::node_contains;
use studio_canvas::surface::{NodeProps, RenderSurface, SurfaceEvent};
use studio_canvas::{Studio, StudioConfig};

/// Keeps every node it is handed and stacks them like a real surface would.
#[derive(Default)]
pub struct RecordingSurface {
    pub nodes: HashMap<ObjectId, NodeProps>,
    pub order: Vec<ObjectId>,
    pub events: Vec<SurfaceEvent>,
    pub repaints: usize,
    pub created: usize,
    pub removed: usize,
}

impl RenderSurface for RecordingSurface {
    fn create_node(&mut self, props: NodeProps) {
        self.created += 1;
        self.order.push(props.id);
        self.nodes.insert(props.id, props);
    }

    fn update_node(&mut self, props: NodeProps) {
        self.nodes.insert(props.id, props);
    }

    fn remove_node(&mut self, id: ObjectId) {
        self.removed += 1;
        self.nodes.remove(&id);
        self.order.retain(|n| *n != id);
    }

    fn contains_node(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn set_z_index(&mut self, id: ObjectId, z: usize) {
        self.order.retain(|n| *n != id);
        let z = z.min(self.order.len());
        self.order.insert(z, id);
    }

    fn node_ids(&self) -> Vec<ObjectId> {
        self.order.clone()
    }

    fn hit_test(&self, pos: Pos2) -> Option<ObjectId> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.nodes.get(id))
            .find(|props| props.visible && props.listening && node_contains(props, pos))
            .map(|props| props.id)
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }
}

pub type TestStudio = Studio<RecordingSurface>;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join("studio_canvas_tests")
}

/// A studio with an attached recording surface. Assets resolve against an empty directory.
pub fn studio() -> TestStudio {
    let blobs = BlobRegistry::new();
    let loader = FsLoader::new(scratch_dir(), blobs.clone());
    let mut studio = Studio::with_loader(StudioConfig::default(), Box::new(loader), blobs);
    studio.attach_surface(RecordingSurface::default());
    studio
}

pub fn surface(studio: &TestStudio) -> &RecordingSurface {
    studio.surface().expect("surface attached")
}

pub fn ids(studio: &TestStudio) -> Vec<ObjectId> {
    studio.objects().iter().map(|o| o.id()).collect()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
