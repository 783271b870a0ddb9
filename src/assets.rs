//! Asynchronous image resources.
//!
//! Loads are futures polled without blocking from the UI loop, so the studio
//! stays interactive while images decode. A URL is either loading, ready, or
//! failed; failed images simply render nothing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::task::noop_waker_ref;
use image::RgbaImage;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::AssetError;

/// Longest side, in pixels, SVG assets are rasterized at.
const SVG_RASTER_SIZE: f32 = 1024.0;

/// Fetches the raw bytes behind a resource URL.
pub trait ResourceLoader: Send + Sync {
    fn load(&self, url: &str) -> BoxFuture<'static, Result<Vec<u8>, AssetError>>;
}

/// In-memory store for uploaded files, addressed by `blob:` URLs.
#[derive(Debug, Clone, Default)]
pub struct BlobRegistry {
    blobs: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` and returns the URL that resolves to them.
    pub fn register(&self, name: &str, bytes: Vec<u8>) -> String {
        let url = format!("blob:{}/{}", Uuid::new_v4().simple(), name);
        self.blobs.write().insert(url.clone(), Arc::new(bytes));
        url
    }

    pub fn get(&self, url: &str) -> Option<Arc<Vec<u8>>> {
        self.blobs.read().get(url).cloned()
    }

    pub fn revoke(&self, url: &str) {
        self.blobs.write().remove(url);
    }
}

/// Resolves `blob:` URLs from a registry and everything else from a directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
    blobs: BlobRegistry,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>, blobs: BlobRegistry) -> Self {
        Self {
            root: root.into(),
            blobs,
        }
    }

    fn resolve_path(&self, url: &str) -> PathBuf {
        let relative = url.trim_start_matches('/');
        if Path::new(url).is_absolute() && Path::new(url).exists() {
            PathBuf::from(url)
        } else {
            self.root.join(relative)
        }
    }
}

impl ResourceLoader for FsLoader {
    fn load(&self, url: &str) -> BoxFuture<'static, Result<Vec<u8>, AssetError>> {
        if url.starts_with("blob:") {
            let result = self
                .blobs
                .get(url)
                .map(|bytes| bytes.as_ref().clone())
                .ok_or_else(|| AssetError::NotFound(url.to_owned()));
            return future::ready(result).boxed();
        }
        if url.contains("://") {
            return future::ready(Err(AssetError::UnsupportedScheme(url.to_owned()))).boxed();
        }
        let path = self.resolve_path(url);
        async move {
            std::fs::read(&path).map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
                _ => AssetError::Io { path, source },
            })
        }
        .boxed()
    }
}

/// Load state of one URL.
#[derive(Debug, Clone)]
pub enum AssetState {
    Loading,
    Ready(Arc<RgbaImage>),
    Failed,
}

fn is_svg(url: &str, bytes: &[u8]) -> bool {
    if url.to_ascii_lowercase().ends_with(".svg") {
        return true;
    }
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

fn rasterize_svg(url: &str, bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    let svg_error = |message: String| AssetError::Svg {
        url: url.to_owned(),
        message,
    };
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| svg_error(e.to_string()))?;
    let size = tree.size();
    let longest = size.width().max(size.height());
    if !longest.is_finite() || longest <= 0.0 {
        return Err(svg_error("svg has invalid width/height".to_owned()));
    }
    let scale = SVG_RASTER_SIZE / longest;
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| svg_error("failed to allocate svg pixmap".to_owned()))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| svg_error("pixmap size mismatch".to_owned()))
}

/// Decodes raster or SVG bytes into straight-alpha RGBA.
pub fn decode_image(url: &str, bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    if is_svg(url, bytes) {
        return rasterize_svg(url, bytes);
    }
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|source| AssetError::Decode {
            url: url.to_owned(),
            source,
        })
}

/// Natural pixel size of an encoded raster image, read from its header.
pub fn natural_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

type PendingLoad = BoxFuture<'static, (String, Result<RgbaImage, AssetError>)>;

/// Tracks every image URL the studio has asked for.
pub struct AssetStore {
    loader: Box<dyn ResourceLoader>,
    states: HashMap<String, AssetState>,
    pending: FuturesUnordered<PendingLoad>,
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("states", &self.states.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl AssetStore {
    pub fn new(loader: Box<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            states: HashMap::new(),
            pending: FuturesUnordered::new(),
        }
    }

    /// Starts loading `url` unless it is already known.
    pub fn request(&mut self, url: &str) {
        if url.is_empty() || self.states.contains_key(url) {
            return;
        }
        log::debug!("Loading asset {url}");
        self.states.insert(url.to_owned(), AssetState::Loading);
        let owned = url.to_owned();
        let load = self.loader.load(url);
        self.pending.push(
            async move {
                let decoded = match load.await {
                    Ok(bytes) => decode_image(&owned, &bytes),
                    Err(err) => Err(err),
                };
                (owned, decoded)
            }
            .boxed(),
        );
    }

    pub fn state(&self, url: &str) -> Option<&AssetState> {
        self.states.get(url)
    }

    /// Decoded pixels, once ready.
    pub fn image(&self, url: &str) -> Option<Arc<RgbaImage>> {
        match self.states.get(url)? {
            AssetState::Ready(image) => Some(image.clone()),
            AssetState::Loading | AssetState::Failed => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drives pending loads without blocking. Returns the URLs that settled.
    pub fn poll(&mut self) -> Vec<String> {
        let mut settled = Vec::new();
        let mut cx = Context::from_waker(noop_waker_ref());
        while let Poll::Ready(Some((url, result))) = self.pending.poll_next_unpin(&mut cx) {
            let state = match result {
                Ok(image) => {
                    log::info!("Loaded asset {url} ({}x{})", image.width(), image.height());
                    AssetState::Ready(Arc::new(image))
                }
                Err(err) => {
                    log::warn!("Asset {url} failed to load: {err}");
                    AssetState::Failed
                }
            };
            // A forgotten URL stays forgotten.
            if self.states.contains_key(&url) {
                self.states.insert(url.clone(), state);
                settled.push(url);
            }
        }
        settled
    }

    /// Drops what is known about `url`; a later request loads it again.
    pub fn forget(&mut self, url: &str) {
        self.states.remove(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn store_with_blobs() -> (AssetStore, BlobRegistry) {
        let blobs = BlobRegistry::new();
        let loader = FsLoader::new(std::env::temp_dir(), blobs.clone());
        (AssetStore::new(Box::new(loader)), blobs)
    }

    #[test]
    fn blob_upload_loads_and_decodes() {
        let (mut store, blobs) = store_with_blobs();
        let url = blobs.register("photo.png", png_bytes(4, 3));
        store.request(&url);
        assert!(matches!(store.state(&url), Some(AssetState::Loading)));
        assert_eq!(store.poll(), vec![url.clone()]);
        let image = store.image(&url).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert!(!store.is_loading());
    }

    #[test]
    fn missing_and_undecodable_assets_fail_quietly() {
        let (mut store, blobs) = store_with_blobs();
        let garbage = blobs.register("broken.png", b"not an image".to_vec());
        store.request(&garbage);
        store.request("/no/such/file.png");
        store.request("https://example.com/remote.png");
        assert_eq!(store.poll().len(), 3);
        for url in [garbage.as_str(), "/no/such/file.png", "https://example.com/remote.png"] {
            assert!(matches!(store.state(url), Some(AssetState::Failed)), "{url}");
            assert!(store.image(url).is_none());
        }
    }

    #[test]
    fn svg_assets_are_rasterized() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="red"/></svg>"#;
        let image = decode_image("/templates/shirt.svg", svg).unwrap();
        assert_eq!(image.dimensions(), (1024, 512));
        assert_eq!(image.get_pixel(10, 10).0, [255, 0, 0, 255]);
    }

    #[test]
    fn natural_dimensions_from_header() {
        assert_eq!(natural_dimensions(&png_bytes(7, 5)), Some((7, 5)));
        assert_eq!(natural_dimensions(b"nope"), None);
    }

    #[test]
    fn forgotten_urls_ignore_late_results() {
        let (mut store, blobs) = store_with_blobs();
        let url = blobs.register("late.png", png_bytes(1, 1));
        store.request(&url);
        store.forget(&url);
        assert!(store.poll().is_empty());
        assert!(store.state(&url).is_none());
    }
}
