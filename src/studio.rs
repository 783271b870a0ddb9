//! The studio orchestrator.
//!
//! [`Studio`] owns the canonical object list and is the only place it is
//! replaced. Renderers, panels, tools and shortcuts all hand it a
//! [`Command`]; [`Studio::commit`] applies the command, normalizes new
//! paths, records one history snapshot and reconciles the surface.

use std::path::Path;

use egui::{Color32, Pos2, Vec2};

use crate::assets::{AssetStore, BlobRegistry, FsLoader, ResourceLoader, natural_dimensions};
use crate::clip::ClipCache;
use crate::command::{Command, CommandHistory};
use crate::config::StudioConfig;
use crate::element::{ObjectKind, ObjectPatch, SceneObject};
use crate::error::{PersistenceError, UploadError};
use crate::file_handler::{FileUpload, validate_upload};
use crate::id_generator::ObjectId;
use crate::input::ShortcutAction;
use crate::layer::{self, LayerRow};
use crate::node::{self, ImageNodes, PathNormalizer, RenderInputs, TextEditSession, TextOverlay};
use crate::state::{self, DesignDocument, EditorState, ToolMode};
use crate::surface::{RenderSurface, SurfaceEvent};
use crate::tools::{BrushTool, EraserTool, Tool};

pub const DEFAULT_TEXT: &str = "Edit me";
pub const TEXT_POSITION: Pos2 = Pos2::new(100.0, 100.0);
pub const RECT_POSITION: Pos2 = Pos2::new(150.0, 150.0);
pub const RECT_SIZE: Vec2 = Vec2::splat(100.0);
pub const LOGO_POSITION: Pos2 = Pos2::new(200.0, 300.0);
pub const LOGO_SIZE: Vec2 = Vec2::splat(200.0);
pub const IMAGE_POSITION: Pos2 = Pos2::new(200.0, 200.0);
/// Used when an upload's natural size cannot be read.
pub const FALLBACK_IMAGE_SIZE: Vec2 = Vec2::splat(300.0);
pub const TEMPLATE_BOARD: Color32 = Color32::WHITE;

pub struct Studio<S: RenderSurface> {
    config: StudioConfig,
    objects: Vec<SceneObject>,
    selected: Option<ObjectId>,
    tool: ToolMode,
    state: EditorState,
    history: CommandHistory,
    clip_cache: ClipCache,
    images: ImageNodes,
    normalizer: PathNormalizer,
    assets: AssetStore,
    blobs: BlobRegistry,
    brush: BrushTool,
    eraser: EraserTool,
    show_rulers: bool,
    /// Object and control of the continuous edit the latest snapshot belongs to.
    continuous: Option<(ObjectId, &'static str)>,
    surface: Option<S>,
}

impl<S: RenderSurface> Studio<S> {
    /// A studio loading assets from `config.asset_root`.
    pub fn new(config: StudioConfig) -> Self {
        let blobs = BlobRegistry::new();
        let loader = FsLoader::new(config.asset_root.clone(), blobs.clone());
        Self::with_loader(config, Box::new(loader), blobs)
    }

    /// A studio with a custom resource loader. `blobs` receives uploads.
    pub fn with_loader(config: StudioConfig, loader: Box<dyn ResourceLoader>, blobs: BlobRegistry) -> Self {
        let objects = Vec::new();
        Self {
            history: CommandHistory::new(&objects, config.history_limit),
            brush: BrushTool::new(config.brush_color, config.brush_width),
            eraser: EraserTool::new(config.eraser_radius),
            show_rulers: config.show_rulers,
            config,
            objects,
            selected: None,
            tool: ToolMode::default(),
            state: EditorState::Idle,
            clip_cache: ClipCache::new(),
            images: ImageNodes::new(),
            normalizer: PathNormalizer::new(),
            assets: AssetStore::new(loader),
            blobs,
            continuous: None,
            surface: None,
        }
    }

    // Surface lifecycle

    /// Hands the studio its drawing surface and builds every node on it.
    pub fn attach_surface(&mut self, surface: S) {
        if self.surface.is_some() {
            log::warn!("Replacing an attached surface");
        }
        self.surface = Some(surface);
        self.reconcile();
    }

    /// Takes the surface back, removing every node the studio created on it.
    pub fn detach_surface(&mut self) -> Option<S> {
        let mut surface = self.surface.take()?;
        for id in surface.node_ids() {
            surface.remove_node(id);
        }
        self.images.clear();
        self.clip_cache.clear();
        Some(surface)
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    // Read access

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.object(self.selected?)
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    pub fn editor_state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn layer_rows(&self) -> Vec<LayerRow> {
        layer::layer_rows(&self.objects, self.selected)
    }

    pub fn text_overlay(&self) -> Option<TextOverlay> {
        self.state.text_session()?.overlay(&self.objects)
    }

    pub fn brush(&self) -> &BrushTool {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut BrushTool {
        &mut self.brush
    }

    pub fn eraser_mut(&mut self) -> &mut EraserTool {
        &mut self.eraser
    }

    pub fn clip_cache(&self) -> &ClipCache {
        &self.clip_cache
    }

    pub fn image_nodes(&self) -> &ImageNodes {
        &self.images
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn show_rulers(&self) -> bool {
        self.show_rulers
    }

    pub fn toggle_rulers(&mut self) {
        self.show_rulers = !self.show_rulers;
    }

    // The single merge point

    /// Applies `command` to the object list. Returns whether the list changed.
    ///
    /// A changing command takes exactly one snapshot, after path
    /// normalization. Refused commands are logged and change nothing.
    pub fn commit(&mut self, command: Command) -> bool {
        self.commit_with(command, false)
    }

    fn commit_with(&mut self, command: Command, amend: bool) -> bool {
        match command.execute(&mut self.objects) {
            Ok(true) => {
                log_commit(&command);
                self.normalizer.normalize_pending(&mut self.objects);
                if amend {
                    self.history.amend(&self.objects);
                } else {
                    self.history.record(&self.objects);
                }
                self.continuous = None;
                self.after_change();
                true
            }
            Ok(false) => {
                log::debug!("{} changed nothing", command.name());
                false
            }
            Err(err) => {
                log::warn!("Refused {}: {err}", command.name());
                false
            }
        }
    }

    /// Merges `patch` into the object with `id`. Missing objects are ignored.
    pub fn apply_patch(&mut self, id: ObjectId, patch: ObjectPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        if patch.touches_colorize() {
            self.images.invalidate(id);
        }
        self.commit(Command::Patch { id, patch })
    }

    /// Like [`Self::apply_patch`], for controls that change every frame while
    /// dragged. Consecutive edits of the same `control` on the same object
    /// share one history entry until [`Self::finish_continuous_edit`].
    pub fn apply_continuous_patch(&mut self, id: ObjectId, control: &'static str, patch: ObjectPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        if patch.touches_colorize() {
            self.images.invalidate(id);
        }
        let key = (id, control);
        let amend = self.continuous == Some(key);
        let changed = self.commit_with(Command::Patch { id, patch }, amend);
        if changed {
            self.continuous = Some(key);
        }
        changed
    }

    pub fn finish_continuous_edit(&mut self) {
        self.continuous = None;
    }

    fn after_change(&mut self) {
        if self.selected.is_some_and(|id| self.object(id).is_none()) {
            self.selected = None;
        }
        if let Some(session) = self.state.text_session() {
            if self.object(session.target()).is_none() {
                self.state.return_to_idle();
            }
        }
        self.request_assets();
        self.reconcile();
    }

    fn request_assets(&mut self) {
        for obj in &self.objects {
            if let ObjectKind::Image(i) | ObjectKind::Logo(i) = &obj.kind {
                self.assets.request(&i.image_url);
            }
        }
    }

    // Insertion

    /// Adds a text object and selects it with the text tool active.
    pub fn add_text(&mut self) -> ObjectId {
        let obj = SceneObject::text(DEFAULT_TEXT, TEXT_POSITION);
        let id = obj.id();
        self.commit(Command::Insert(obj));
        self.set_tool(ToolMode::Text);
        self.select(id);
        id
    }

    pub fn add_rect(&mut self) -> ObjectId {
        let obj = SceneObject::rect(RECT_POSITION, RECT_SIZE);
        let id = obj.id();
        self.commit(Command::Insert(obj));
        self.select(id);
        id
    }

    /// Non-template objects a template selection would throw away.
    pub fn template_replacement_discards(&self) -> usize {
        self.objects.iter().filter(|o| !o.is_template()).count()
    }

    /// Replaces the whole scene with a single template object.
    pub fn select_template(&mut self, path: &str) -> ObjectId {
        let template = SceneObject::template(path, self.config.canvas_size(), Some(TEMPLATE_BOARD));
        let id = template.id();
        log::info!(
            "Selecting template {path}, discarding {} objects",
            self.template_replacement_discards()
        );
        self.commit(Command::ReplaceAll(vec![template]));
        self.selected = None;
        self.reconcile();
        id
    }

    /// The garment outline, if a template has been selected.
    pub fn template(&self) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.is_template())
    }

    /// Board colour painted under the template outline.
    pub fn board_color(&self) -> Option<Color32> {
        match &self.template()?.kind {
            ObjectKind::Image(i) | ObjectKind::Logo(i) => i.fill,
            _ => None,
        }
    }

    /// Recolours the board under the template. Returns false without a template.
    pub fn set_board_color(&mut self, color: Color32) -> bool {
        let Some(id) = self.template().map(SceneObject::id) else {
            return false;
        };
        let patch = ObjectPatch {
            backing_fill: Some(Some(color)),
            ..Default::default()
        };
        self.apply_continuous_patch(id, "board", patch)
    }

    /// Appends a logo. Insertion never fails, even if the asset does not load.
    pub fn select_logo(&mut self, path: &str) -> ObjectId {
        let obj = SceneObject::logo(path, LOGO_POSITION, LOGO_SIZE);
        let id = obj.id();
        self.commit(Command::Insert(obj));
        id
    }

    /// Adds an uploaded raster image at its natural size.
    pub fn add_image_upload(&mut self, upload: FileUpload) -> Result<ObjectId, UploadError> {
        if let Err(err) = validate_upload(&upload) {
            log::warn!("Rejected upload {}: {err}", upload.name);
            return Err(err);
        }
        let size = natural_dimensions(&upload.bytes)
            .filter(|(w, h)| *w > 0 && *h > 0)
            .map(|(w, h)| Vec2::new(w as f32, h as f32))
            .unwrap_or(FALLBACK_IMAGE_SIZE);
        let url = self.blobs.register(&upload.name, upload.bytes);
        let obj = SceneObject::image(url, IMAGE_POSITION, size);
        let id = obj.id();
        self.commit(Command::Insert(obj));
        self.select(id);
        Ok(id)
    }

    /// Imports the vector outline of an SVG as one path object.
    ///
    /// Every `<path d>` in the document is combined. Returns `None` when the
    /// SVG cannot be parsed or has no paths.
    pub fn add_path_from_svg(&mut self, svg: &str) -> Option<ObjectId> {
        let data = svg_path_data(svg)?;
        let obj = SceneObject::path(data, Pos2::ZERO);
        let id = obj.id();
        self.commit(Command::Insert(obj));
        self.select(id);
        Some(id)
    }

    // Selection and tools

    pub fn select(&mut self, id: ObjectId) {
        let Some(obj) = self.object(id) else {
            log::debug!("Cannot select missing object {id}");
            return;
        };
        if obj.is_template() {
            return;
        }
        if self.selected != Some(id) {
            self.selected = Some(id);
            self.reconcile();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.reconcile();
        }
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected.take() else {
            return false;
        };
        let changed = self.commit(Command::Remove(id));
        if !changed {
            self.reconcile();
        }
        changed
    }

    /// Switches tools, dropping any gesture or text edit in progress.
    pub fn set_tool(&mut self, tool: ToolMode) {
        if self.tool == tool {
            return;
        }
        log::info!("Tool changed: {} -> {}", self.tool.label(), tool.label());
        self.cancel_gestures();
        self.tool = tool;
        self.reconcile();
    }

    fn cancel_gestures(&mut self) {
        self.brush.cancel();
        self.eraser.cancel();
        self.state.return_to_idle();
    }

    /// Runs a keyboard shortcut. Everything is suppressed while text is being edited.
    pub fn handle_key(&mut self, action: ShortcutAction) -> bool {
        if self.state.is_editing_text() {
            log::debug!("Shortcut {action:?} suppressed during text edit");
            return false;
        }
        match action {
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Deselect => {
                let had = self.selected.is_some();
                self.clear_selection();
                had
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::BringForward => self.selected_layer_op(layer::bring_forward),
            ShortcutAction::SendBackward => self.selected_layer_op(layer::send_backward),
            ShortcutAction::BringToFront => self.selected_layer_op(layer::bring_to_front),
            ShortcutAction::SendToBack => self.selected_layer_op(layer::send_to_back),
        }
    }

    fn selected_layer_op(&mut self, op: fn(&[SceneObject], ObjectId) -> Option<Command>) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        self.layer_op(id, op)
    }

    fn layer_op(&mut self, id: ObjectId, op: fn(&[SceneObject], ObjectId) -> Option<Command>) -> bool {
        match op(&self.objects, id) {
            Some(command) => self.commit(command),
            None => false,
        }
    }

    // Layer panel

    pub fn toggle_visibility(&mut self, id: ObjectId) -> bool {
        self.layer_op(id, layer::toggle_visibility)
    }

    pub fn toggle_lock(&mut self, id: ObjectId) -> bool {
        self.layer_op(id, layer::toggle_lock)
    }

    pub fn delete(&mut self, id: ObjectId) -> bool {
        self.layer_op(id, layer::delete)
    }

    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        self.layer_op(id, layer::bring_forward)
    }

    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        self.layer_op(id, layer::send_backward)
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        self.layer_op(id, layer::bring_to_front)
    }

    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        self.layer_op(id, layer::send_to_back)
    }

    /// Drag-and-drop between visual rows of the layer panel (0 = top).
    pub fn reorder_layers(&mut self, from_visual: usize, to_visual: usize) -> bool {
        match layer::reorder(&self.objects, from_visual, to_visual) {
            Some(command) => self.commit(command),
            None => false,
        }
    }

    // Text editing

    /// Opens the inline editor on a text object.
    pub fn begin_text_edit(&mut self, id: ObjectId) -> bool {
        let Some(session) = self.object(id).and_then(TextEditSession::begin) else {
            return false;
        };
        self.brush.cancel();
        self.eraser.cancel();
        self.state.return_to_idle();
        if let Err(err) = self.state.transition_to(EditorState::EditingText(session)) {
            log::warn!("{err}");
            return false;
        }
        self.tool = ToolMode::Text;
        self.selected = Some(id);
        self.reconcile();
        true
    }

    /// New contents of the inline editor. Applied immediately.
    pub fn text_input(&mut self, text: &str) -> bool {
        let Some(session) = self.state.text_session() else {
            return false;
        };
        let id = session.target();
        let patch = session.input(text);
        self.commit(Command::Patch { id, patch })
    }

    /// The editor lost focus.
    pub fn end_text_edit(&mut self) {
        if self.state.is_editing_text() {
            self.state.return_to_idle();
            self.reconcile();
        }
    }

    // Surface gestures

    /// Drains the surface's gesture queue and handles every event.
    pub fn process_surface_events(&mut self) {
        let events = match self.surface.as_mut() {
            Some(surface) => surface.drain_events(),
            None => return,
        };
        for event in events {
            self.handle_surface_event(event);
        }
    }

    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Click { target } => self.on_click(target),
            SurfaceEvent::DoubleClick { target } => {
                self.begin_text_edit(target);
            }
            SurfaceEvent::DragEnd { target, position } => {
                let patch = self.object(target).and_then(|obj| node::drag_patch(obj, position));
                self.commit_gesture(target, patch);
            }
            SurfaceEvent::TransformEnd {
                target,
                position,
                rotation,
                scale,
            } => {
                let patch = self
                    .object(target)
                    .and_then(|obj| node::transform_patch(obj, position, rotation, scale));
                self.commit_gesture(target, patch);
            }
            SurfaceEvent::PointerDown { position } => self.pointer_down(position),
            SurfaceEvent::PointerMove { position } => self.pointer_move(position),
            SurfaceEvent::PointerUp { position } => self.pointer_up(position),
        }
    }

    fn on_click(&mut self, target: Option<ObjectId>) {
        if !self.tool.manipulates_objects() {
            return;
        }
        if self.state.is_editing_text() {
            self.end_text_edit();
        }
        let Some(id) = target else {
            self.clear_selection();
            return;
        };
        let Some(kind) = self.object(id).map(SceneObject::tag) else {
            return;
        };
        if matches!(self.tool, ToolMode::Select | ToolMode::Move) {
            self.set_tool(ToolMode::for_kind(kind));
        }
        self.select(id);
    }

    fn commit_gesture(&mut self, id: ObjectId, patch: Option<ObjectPatch>) {
        let changed = match patch {
            Some(patch) => self.commit(Command::Patch { id, patch }),
            None => false,
        };
        // The surface already shows the rejected box; put the node back.
        if !changed {
            self.reconcile();
        }
    }

    fn pointer_down(&mut self, position: Pos2) {
        let next = match self.tool {
            ToolMode::Brush => EditorState::Drawing,
            ToolMode::Eraser => EditorState::Erasing,
            _ => return,
        };
        if let Err(err) = self.state.transition_to(next) {
            log::debug!("{err}");
            return;
        }
        match self.tool {
            ToolMode::Brush => {
                self.brush.on_pointer_down(position, &self.objects);
            }
            ToolMode::Eraser => {
                self.eraser.on_pointer_down(position, &self.objects);
                self.reconcile();
            }
            _ => {}
        }
    }

    fn pointer_move(&mut self, position: Pos2) {
        match self.state {
            EditorState::Drawing => {
                self.brush.on_pointer_move(position, &self.objects);
                self.request_repaint();
            }
            EditorState::Erasing => {
                let before = self.eraser.pending().len();
                self.eraser.on_pointer_move(position, &self.objects);
                if self.eraser.pending().len() != before {
                    self.reconcile();
                }
            }
            EditorState::Idle | EditorState::EditingText(_) => {}
        }
    }

    fn pointer_up(&mut self, position: Pos2) {
        let command = match self.state {
            EditorState::Drawing => self.brush.on_pointer_up(position, &self.objects),
            EditorState::Erasing => self.eraser.on_pointer_up(position, &self.objects),
            EditorState::Idle | EditorState::EditingText(_) => return,
        };
        self.state.return_to_idle();
        match command {
            Some(command) => {
                self.commit(command);
            }
            None => self.reconcile(),
        }
    }

    // History

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(objects) => {
                self.restore(objects);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(objects) => {
                self.restore(objects);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, objects: Vec<SceneObject>) {
        self.cancel_gestures();
        self.continuous = None;
        self.objects = objects;
        self.normalizer.sync(&self.objects);
        self.after_change();
    }

    // Assets

    /// Applies finished image loads. Returns whether any node changed.
    pub fn poll_assets(&mut self) -> bool {
        let settled = self.assets.poll();
        if settled.is_empty() {
            return false;
        }
        let mut changed = false;
        for url in settled {
            let referenced = self.objects.iter().any(|o| match &o.kind {
                ObjectKind::Image(i) | ObjectKind::Logo(i) => i.image_url == url,
                _ => false,
            });
            if referenced {
                changed = true;
            } else {
                log::debug!("Ignoring late load of {url}; no object uses it anymore");
                self.assets.forget(&url);
            }
        }
        if changed {
            self.reconcile();
        }
        changed
    }

    // Persistence

    pub fn design(&self) -> DesignDocument {
        let size = self.config.canvas_size();
        DesignDocument::new([size.x, size.y], self.objects.clone())
    }

    pub fn save_design(&self, path: &Path) -> Result<(), PersistenceError> {
        state::save_design(path, &self.design())
    }

    pub fn load_design(&mut self, path: &Path) -> Result<(), PersistenceError> {
        let document = state::load_design(path)?;
        self.load_document(document)
    }

    /// Replaces the scene with `document` as one undoable edit.
    pub fn load_document(&mut self, document: DesignDocument) -> Result<(), PersistenceError> {
        document.validate()?;
        self.cancel_gestures();
        self.selected = None;
        // Saved paths keep their placement.
        self.normalizer.sync(&document.objects);
        if !self.commit(Command::Load(document.objects)) {
            self.normalizer.sync(&self.objects);
        }
        self.reconcile();
        Ok(())
    }

    // Surface reconciliation

    fn request_repaint(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.request_repaint();
        }
    }

    /// Brings the surface in line with the object list.
    ///
    /// Nodes are created, updated or removed as needed and every node's
    /// stacking position is reset to its list index.
    pub fn reconcile(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.clip_cache.retain_live(&self.objects);
        self.images.retain_live(&self.objects);

        let editing = self.state.text_session().map(TextEditSession::target);
        let erasing = self.eraser.pending();
        for obj in &self.objects {
            let image = match &obj.kind {
                ObjectKind::Image(i) | ObjectKind::Logo(i) => self.assets.image(&i.image_url),
                _ => None,
            };
            let inputs = RenderInputs {
                selected: self.selected == Some(obj.id()),
                editing: editing == Some(obj.id()),
                clip: self.clip_cache.resolve(obj, &self.objects),
                image,
            };
            let mut props = node::build_props(obj, inputs, &mut self.images);
            if erasing.contains(&obj.id()) {
                props.visible = false;
            }
            if surface.contains_node(obj.id()) {
                surface.update_node(props);
            } else {
                surface.create_node(props);
            }
        }

        for id in surface.node_ids() {
            if !self.objects.iter().any(|o| o.id() == id) {
                surface.remove_node(id);
            }
        }
        layer::resync_z_order(&mut *surface, &self.objects);
        surface.request_repaint();
    }
}

fn log_commit(command: &Command) {
    match command {
        Command::Insert(obj) => log::info!("Inserted {} {}", obj.tag().as_str(), obj.id()),
        Command::Remove(id) => log::info!("Removed {id}"),
        Command::RemoveMany(ids) => log::info!("Removed {} objects", ids.len()),
        Command::ReplaceAll(list) => log::info!("Replaced scene with {} objects", list.len()),
        Command::Load(list) => log::info!("Loaded scene with {} objects", list.len()),
        Command::Patch { .. } | Command::Reorder { .. } => log::debug!("Committed {}", command.name()),
    }
}

/// Joins the `d` attribute of every `<path>` in `svg`.
pub fn svg_path_data(svg: &str) -> Option<String> {
    let document = match roxmltree::Document::parse(svg) {
        Ok(document) => document,
        Err(err) => {
            log::warn!("Could not parse SVG: {err}");
            return None;
        }
    };
    let data: Vec<&str> = document
        .descendants()
        .filter(|n| n.has_tag_name("path"))
        .filter_map(|n| n.attribute("d"))
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();
    if data.is_empty() {
        log::debug!("SVG has no path data");
        return None;
    }
    Some(data.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_data_is_combined_from_every_path() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <g><path d="M0 0 L10 0 L10 10 Z"/></g>
            <path d=" M20 20 L30 20 "/>
            <rect width="5" height="5"/>
        </svg>"#;
        assert_eq!(
            svg_path_data(svg).as_deref(),
            Some("M0 0 L10 0 L10 10 Z M20 20 L30 20")
        );
    }

    #[test]
    fn svg_without_paths_yields_nothing() {
        assert!(svg_path_data(r#"<svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#).is_none());
        assert!(svg_path_data("not xml").is_none());
    }
}
