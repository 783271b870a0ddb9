use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::id_generator::ObjectId;

type TextureKey = (ObjectId, u64);

/// GPU textures for image nodes, keyed by node and pixel cache key.
///
/// A node whose cache key changes (new source, new tint) gets a fresh
/// upload; the stale texture is dropped right away.
pub struct TextureManager {
    textures: HashMap<TextureKey, TextureHandle>,
    last_used: HashMap<TextureKey, u64>,
    current_frame: u64,
    max_cache_size: usize,
    uploads: u64,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            textures: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
            uploads: 0,
        }
    }

    /// Call once per frame, before drawing.
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for `id` at `cache_key`, uploading `pixels` on a miss.
    pub fn texture_for(
        &mut self,
        ctx: &Context,
        id: ObjectId,
        cache_key: u64,
        pixels: &ColorImage,
    ) -> TextureId {
        let key = (id, cache_key);
        if let Some(handle) = self.textures.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return handle.id();
        }

        self.invalidate(id);
        self.prune_if_needed();

        let name = format!("node_{}_{cache_key:016x}", id.short());
        let handle = ctx.load_texture(name, pixels.clone(), TextureOptions::LINEAR);
        self.uploads += 1;
        let texture_id = handle.id();
        self.textures.insert(key, handle);
        self.last_used.insert(key, self.current_frame);
        texture_id
    }

    /// Drops every texture of `id`.
    pub fn invalidate(&mut self, id: ObjectId) {
        self.textures.retain(|(node, _), _| *node != id);
        self.last_used.retain(|(node, _), _| *node != id);
    }

    fn prune_if_needed(&mut self) {
        if self.textures.len() < self.max_cache_size {
            return;
        }
        let mut entries: Vec<(TextureKey, u64)> =
            self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);
        let to_remove = self.textures.len() + 1 - self.max_cache_size;
        for (key, _) in entries.into_iter().take(to_remove) {
            self.textures.remove(&key);
            self.last_used.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.textures.clear();
        self.last_used.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Total uploads so far.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::generate_id;

    fn pixels() -> ColorImage {
        ColorImage::new([4, 4], egui::Color32::WHITE)
    }

    #[test]
    fn same_key_reuses_the_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let id = generate_id();
        let first = manager.texture_for(&ctx, id, 1, &pixels());
        let second = manager.texture_for(&ctx, id, 1, &pixels());
        assert_eq!(first, second);
        assert_eq!(manager.uploads(), 1);
    }

    #[test]
    fn new_key_replaces_the_stale_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let id = generate_id();
        manager.texture_for(&ctx, id, 1, &pixels());
        manager.texture_for(&ctx, id, 2, &pixels());
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.uploads(), 2);
    }

    #[test]
    fn invalidation_drops_the_node() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let id = generate_id();
        manager.texture_for(&ctx, id, 1, &pixels());
        manager.invalidate(id);
        assert!(manager.is_empty());
    }

    #[test]
    fn least_recently_used_goes_first() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let (a, b, c) = (generate_id(), generate_id(), generate_id());
        manager.texture_for(&ctx, a, 1, &pixels());
        manager.begin_frame();
        manager.texture_for(&ctx, b, 1, &pixels());
        manager.begin_frame();
        manager.texture_for(&ctx, c, 1, &pixels());
        assert_eq!(manager.len(), 2);
        manager.texture_for(&ctx, b, 1, &pixels());
        assert_eq!(manager.uploads(), 3);
    }
}
