//! Editor: routes pointer and keyboard events to the board.
//!
//! The host forwards raw events in screen coordinates and reacts to the
//! returned [`EditorAction`]s. Every committed mutation pushes an undo
//! snapshot first.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::image::{ImageError, to_data_uri};
use crate::input::{Key, Modifiers, MouseButton};
use crate::item::{ItemId, ItemKind, ItemPatch, TextStyle};
use crate::layers::Direction;
use crate::placement::{DropPayload, place_on_grid};
use crate::resize::{ListenerGuard, PointerCapture, PointerListeners, ResizeController};
use crate::storage::{BoardPersistence, Storage, StorageResult};
use crate::templates::Template;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};

/// Side of the square resize handle at an item's bottom-right corner, in screen units.
pub const RESIZE_HANDLE_SIZE: f64 = 12.0;

/// Pointer travel, in screen units, before a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    RenderNeeded,
    ItemAdded(ItemId),
    ItemUpdated(ItemId),
    ItemRemoved(ItemId),
    SelectionChanged(Option<ItemId>),
    Saved(usize),
    Loaded { count: usize, repaired: usize },
    StorageFailed(String),
    /// A text card was double-clicked; the host should open its editor.
    EditTextRequested(ItemId),
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub count: usize,
    pub repaired: usize,
}

#[derive(Debug)]
struct DragState {
    id: ItemId,
    /// Pointer position relative to the item's top-left, canvas units.
    grab_offset: Vec2,
    /// Screen position of the press.
    origin: Point,
    /// Latest pointer position, canvas units.
    pointer: Point,
    moved: bool,
    _listeners: ListenerGuard,
}

/// Square resize handle for an item with `bounds`, in canvas units.
pub fn resize_handle_rect(bounds: Rect, zoom: f64) -> Rect {
    let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
    let side = (RESIZE_HANDLE_SIZE / zoom).min(bounds.width()).min(bounds.height());
    Rect::new(bounds.x1 - side, bounds.y1 - side, bounds.x1, bounds.y1)
}

/// A board with its gestures, viewport and persistence.
pub struct Editor<S> {
    board: Board,
    persistence: BoardPersistence<S>,
    resize: ResizeController,
    viewport: Viewport,
    capture: PointerCapture,
    drag: Option<DragState>,
}

impl<S: Storage> Editor<S> {
    pub fn new(config: BoardConfig, storage: S) -> Self {
        let persistence = BoardPersistence::with_key(storage, config.storage_key.clone());
        let resize = ResizeController::new(config.min_item_size);
        Self {
            board: Board::with_config(config),
            persistence,
            resize,
            viewport: Viewport::new(),
            capture: PointerCapture::new(),
            drag: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn persistence(&self) -> &BoardPersistence<S> {
        &self.persistence
    }

    /// True while a drag or resize wants every pointer event, even off-canvas.
    pub fn is_pointer_captured(&self) -> bool {
        self.capture.is_captured()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|drag| drag.moved)
    }

    /// Bounds to draw for `id`, including uncommitted drag and resize feedback.
    pub fn live_bounds(&self, id: &ItemId) -> Option<Rect> {
        let item = self.board.get(id)?;
        let mut position = item.position;
        let mut size = item.size;
        if let Some(live) = self.resize.live_size(id) {
            size = live;
        }
        if let Some(drag) = self.drag.as_ref().filter(|d| d.moved && d.id == *id) {
            position = drag.pointer - drag.grab_offset;
        }
        Some(Rect::from_origin_size(position, size))
    }

    // --- Events ---

    pub fn on_pointer_down(
        &mut self,
        screen: Point,
        button: MouseButton,
        _modifiers: Modifiers,
    ) -> Vec<EditorAction> {
        if button != MouseButton::Left {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let canvas = self.viewport.screen_to_canvas(screen);
        self.drag = None;

        let Some(hit) = self.board.item_at(canvas) else {
            self.select(None, &mut actions);
            return actions;
        };
        let id = hit.id.clone();
        let bounds = hit.bounds();
        let position = hit.position;
        let size = hit.size;

        if resize_handle_rect(bounds, self.viewport.zoom).contains(canvas) {
            self.resize.begin(id.clone(), screen, size, &self.capture);
        } else {
            self.resize.cancel();
            self.drag = Some(DragState {
                id: id.clone(),
                grab_offset: canvas - position,
                origin: screen,
                pointer: canvas,
                moved: false,
                _listeners: self.capture.acquire(),
            });
        }
        self.select(Some(id), &mut actions);
        actions.push(EditorAction::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<EditorAction> {
        if self.resize.is_active() {
            return match self.resize.pointer_move(screen, self.viewport.zoom) {
                Some(_) => vec![EditorAction::RenderNeeded],
                None => Vec::new(),
            };
        }

        let canvas = self.viewport.screen_to_canvas(screen);
        let Some(drag) = self.drag.as_mut() else {
            return Vec::new();
        };
        drag.pointer = canvas;
        if !drag.moved && (screen - drag.origin).hypot() >= DRAG_THRESHOLD {
            log::debug!("Drag started on {}", drag.id);
            drag.moved = true;
        }
        if drag.moved {
            vec![EditorAction::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn on_pointer_up(
        &mut self,
        screen: Point,
        button: MouseButton,
        _modifiers: Modifiers,
    ) -> Vec<EditorAction> {
        if button != MouseButton::Left {
            return Vec::new();
        }

        if self.resize.is_active() {
            if self
                .resize
                .active_item()
                .is_some_and(|id| self.board.contains(id))
            {
                self.board.push_undo();
            }
            let mut actions = vec![EditorAction::RenderNeeded];
            if let Some((id, _)) = self.resize.release(&mut self.board) {
                actions.insert(0, EditorAction::ItemUpdated(id));
            }
            return actions;
        }

        match self.drag.take() {
            Some(drag) if drag.moved => {
                let payload = DropPayload::MoveItem {
                    id: drag.id,
                    grab_offset: drag.grab_offset,
                };
                let canvas = self.viewport.screen_to_canvas(screen);
                self.drop_at(payload, canvas)
            }
            _ => Vec::new(),
        }
    }

    pub fn on_double_click(&mut self, screen: Point) -> Vec<EditorAction> {
        let canvas = self.viewport.screen_to_canvas(screen);
        let Some(item) = self.board.item_at(canvas) else {
            return Vec::new();
        };
        if !item.is_text() {
            return Vec::new();
        }
        let id = item.id.clone();
        let mut actions = Vec::new();
        self.select(Some(id.clone()), &mut actions);
        actions.push(EditorAction::EditTextRequested(id));
        actions
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<EditorAction> {
        match key {
            Key::Delete | Key::Backspace if !modifiers.command() => match self.delete_selected() {
                Some(id) => vec![
                    EditorAction::ItemRemoved(id),
                    EditorAction::SelectionChanged(None),
                    EditorAction::RenderNeeded,
                ],
                None => Vec::new(),
            },
            Key::Escape => {
                let mut actions = Vec::new();
                let cancelled = self.cancel_gestures();
                self.select(None, &mut actions);
                if cancelled || !actions.is_empty() {
                    actions.push(EditorAction::RenderNeeded);
                }
                actions
            }
            Key::Char('s') if modifiers.command() => match self.save() {
                Ok(count) => vec![EditorAction::Saved(count)],
                Err(e) => vec![EditorAction::StorageFailed(e.to_string())],
            },
            Key::Char('o') if modifiers.command() => match self.load() {
                Ok(report) => vec![
                    EditorAction::Loaded {
                        count: report.count,
                        repaired: report.repaired,
                    },
                    EditorAction::SelectionChanged(None),
                    EditorAction::RenderNeeded,
                ],
                Err(e) => vec![EditorAction::StorageFailed(e.to_string())],
            },
            Key::Char('z') if modifiers.command() => {
                let done = if modifiers.shift { self.redo() } else { self.undo() };
                if done { vec![EditorAction::RenderNeeded] } else { Vec::new() }
            }
            Key::Char('y') if modifiers.command() => {
                if self.redo() { vec![EditorAction::RenderNeeded] } else { Vec::new() }
            }
            _ => Vec::new(),
        }
    }

    /// Drop `payload` at a screen position.
    pub fn drop_payload(&mut self, payload: DropPayload, screen: Point) -> Vec<EditorAction> {
        let canvas = self.viewport.screen_to_canvas(screen);
        self.drop_at(payload, canvas)
    }

    fn drop_at(&mut self, payload: DropPayload, canvas: Point) -> Vec<EditorAction> {
        let raw = payload.raw_position(canvas);
        let canvas_size = self.board.config().canvas_size;
        let grid = self.board.config().grid_size;

        match payload {
            DropPayload::MoveItem { id, .. } => {
                let Some(item) = self.board.get(&id) else {
                    log::debug!("Dropped item {} no longer exists", id);
                    return vec![EditorAction::RenderNeeded];
                };
                let position = place_on_grid(raw, item.size, canvas_size, grid);
                if position == item.position {
                    return vec![EditorAction::RenderNeeded];
                }
                self.board.push_undo();
                self.board.update(&id, &ItemPatch::position(position));
                vec![EditorAction::ItemUpdated(id), EditorAction::RenderNeeded]
            }
            DropPayload::NewItem { kind } => {
                self.board.push_undo();
                let id = self.board.add(kind, None);
                if let Some(size) = self.board.get(&id).map(|item| item.size) {
                    let position = place_on_grid(raw, size, canvas_size, grid);
                    self.board.update(&id, &ItemPatch::position(position));
                }
                let mut actions = vec![EditorAction::ItemAdded(id.clone())];
                self.select(Some(id), &mut actions);
                actions.push(EditorAction::RenderNeeded);
                actions
            }
        }
    }

    // --- Operations ---

    /// Add a default item of `kind` on top and select it.
    pub fn add_item(&mut self, kind: ItemKind) -> ItemId {
        self.board.push_undo();
        let id = self.board.add(kind, None);
        self.board.select(Some(id.clone()));
        id
    }

    /// Restyle the selection with `template` if it is of the same kind,
    /// otherwise add a new item from the template.
    pub fn apply_template(&mut self, template: &Template) -> ItemId {
        self.board.push_undo();
        if let Some(selected) = self.board.selected().filter(|item| item.kind == template.kind) {
            let id = selected.id.clone();
            self.board.update(&id, &template.as_patch());
            log::debug!("Applied template {} to {}", template.name, id);
            return id;
        }
        let id = self.board.add(template.kind, Some(template));
        self.board.select(Some(id.clone()));
        id
    }

    /// Add an image card holding `bytes` as a `data:` URI.
    pub fn add_image_bytes(&mut self, bytes: &[u8]) -> Result<ItemId, ImageError> {
        let uri = to_data_uri(bytes)?;
        self.board.push_undo();
        let id = self.board.add(ItemKind::Image, None);
        self.board.update(&id, &ItemPatch::content(uri));
        self.board.select(Some(id.clone()));
        Ok(id)
    }

    /// Replace an item's content. Returns false if missing or unchanged.
    pub fn set_content(&mut self, id: &ItemId, content: &str) -> bool {
        match self.board.get(id) {
            Some(item) if item.content != content => {}
            _ => return false,
        }
        self.board.push_undo();
        self.board.update(id, &ItemPatch::content(content))
    }

    /// Restyle a text item. Returns false for images, missing items or no change.
    pub fn set_style(&mut self, id: &ItemId, style: &TextStyle) -> bool {
        match self.board.get(id) {
            Some(item) if item.is_text() && item.style.as_ref() != Some(style) => {}
            _ => return false,
        }
        self.board.push_undo();
        self.board.update(id, &ItemPatch::style(style))
    }

    /// Move the selection one rank in `direction`.
    pub fn reorder_selected(&mut self, direction: Direction) -> bool {
        let Some(id) = self.board.selected_id().cloned() else {
            return false;
        };
        if !self.board.can_reorder(&id, direction) {
            return false;
        }
        self.board.push_undo();
        self.board.reorder(&id, direction)
    }

    pub fn select_item(&mut self, id: Option<ItemId>) -> Vec<EditorAction> {
        let mut actions = Vec::new();
        self.select(id, &mut actions);
        actions
    }

    /// Remove the selected item, if any.
    pub fn delete_selected(&mut self) -> Option<ItemId> {
        let id = self.board.selected_id().cloned()?;
        self.cancel_gestures();
        self.board.push_undo();
        self.board.remove(&id).map(|item| item.id)
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gestures();
        self.board.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gestures();
        self.board.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.board.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.board.can_redo()
    }

    /// Persist every item. Returns how many were written.
    pub fn save(&self) -> StorageResult<usize> {
        self.persistence.save(self.board.items())?;
        Ok(self.board.len())
    }

    /// Replace the board with the stored items.
    ///
    /// On failure the board is left untouched.
    pub fn load(&mut self) -> StorageResult<LoadReport> {
        let items = self.persistence.load()?;
        let count = items.len();
        self.cancel_gestures();
        self.board.push_undo();
        let repaired = self.board.replace_all(items);
        Ok(LoadReport { count, repaired })
    }

    fn select(&mut self, id: Option<ItemId>, actions: &mut Vec<EditorAction>) {
        if self.board.selected_id() != id.as_ref() {
            self.board.select(id.clone());
            actions.push(EditorAction::SelectionChanged(id));
        }
    }

    fn cancel_gestures(&mut self) -> bool {
        let dragging = self.drag.take().is_some_and(|drag| drag.moved);
        self.resize.cancel() || dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MIN_ITEM_SIZE, STORAGE_KEY};
    use crate::item::{DEFAULT_TEXT, DEFAULT_TEXT_SIZE, FontFamily, FontSize};
    use crate::storage::MemoryStorage;
    use kurbo::Size;

    fn editor() -> Editor<MemoryStorage> {
        Editor::new(BoardConfig::default(), MemoryStorage::new())
    }

    fn press(editor: &mut Editor<MemoryStorage>, at: Point) -> Vec<EditorAction> {
        editor.on_pointer_down(at, MouseButton::Left, Modifiers::NONE)
    }

    fn release(editor: &mut Editor<MemoryStorage>, at: Point) -> Vec<EditorAction> {
        editor.on_pointer_up(at, MouseButton::Left, Modifiers::NONE)
    }

    #[test]
    fn test_click_selects_and_empty_click_clears() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);
        editor.select_item(None);

        let actions = press(&mut editor, Point::new(10.0, 10.0));
        assert!(actions.contains(&EditorAction::SelectionChanged(Some(id.clone()))));
        release(&mut editor, Point::new(10.0, 10.0));
        assert!(editor.board().is_selected(&id));

        let actions = press(&mut editor, Point::new(500.0, 800.0));
        assert_eq!(actions, vec![EditorAction::SelectionChanged(None)]);
    }

    #[test]
    fn test_click_without_drag_does_not_move() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);
        press(&mut editor, Point::new(10.0, 10.0));
        editor.on_pointer_move(Point::new(11.0, 11.0), Modifiers::NONE);
        assert!(!editor.is_dragging());
        let actions = release(&mut editor, Point::new(11.0, 11.0));
        assert!(actions.is_empty());
        assert_eq!(editor.board().get(&id).unwrap().position, Point::ZERO);
    }

    #[test]
    fn test_drag_snaps_and_clamps() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);

        press(&mut editor, Point::new(10.0, 10.0));
        assert!(editor.is_pointer_captured());
        editor.on_pointer_move(Point::new(100.0, 100.0), Modifiers::NONE);
        assert!(editor.is_dragging());
        assert_eq!(
            editor.live_bounds(&id).unwrap().origin(),
            Point::new(90.0, 90.0)
        );

        let actions = release(&mut editor, Point::new(119.0, 131.0));
        assert!(actions.contains(&EditorAction::ItemUpdated(id.clone())));
        // (119 - 10, 131 - 10) = (109, 121) snaps to (100, 120).
        assert_eq!(editor.board().get(&id).unwrap().position, Point::new(100.0, 120.0));
        assert!(!editor.is_pointer_captured());

        press(&mut editor, Point::new(110.0, 130.0));
        editor.on_pointer_move(Point::new(5000.0, 5000.0), Modifiers::NONE);
        release(&mut editor, Point::new(5000.0, 5000.0));
        // Upper bounds: 600 - 200 = 400, 900 - 100 = 800.
        assert_eq!(editor.board().get(&id).unwrap().position, Point::new(400.0, 800.0));
    }

    #[test]
    fn test_drag_respects_zoom() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);
        editor.viewport_mut().set_zoom(2.0);

        press(&mut editor, Point::new(20.0, 20.0));
        editor.on_pointer_move(Point::new(100.0, 100.0), Modifiers::NONE);
        release(&mut editor, Point::new(100.0, 100.0));
        // Canvas delta is (40, 40).
        assert_eq!(editor.board().get(&id).unwrap().position, Point::new(40.0, 40.0));
    }

    #[test]
    fn test_resize_handle_gesture() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);
        let corner = Point::new(DEFAULT_TEXT_SIZE.width - 2.0, DEFAULT_TEXT_SIZE.height - 2.0);

        press(&mut editor, corner);
        assert!(editor.is_resizing());
        editor.on_pointer_move(corner + Vec2::new(40.0, 10.0), Modifiers::NONE);
        assert_eq!(
            editor.live_bounds(&id).unwrap().size(),
            Size::new(240.0, 110.0)
        );
        assert_eq!(editor.board().get(&id).unwrap().size, DEFAULT_TEXT_SIZE);

        let actions = release(&mut editor, corner + Vec2::new(40.0, 10.0));
        assert_eq!(actions[0], EditorAction::ItemUpdated(id.clone()));
        assert_eq!(editor.board().get(&id).unwrap().size, Size::new(240.0, 110.0));
        assert!(!editor.is_pointer_captured());

        assert!(editor.undo());
        assert_eq!(editor.board().get(&id).unwrap().size, DEFAULT_TEXT_SIZE);
    }

    #[test]
    fn test_resize_at_right_edge_reloads_unchanged() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);

        press(&mut editor, Point::new(10.0, 10.0));
        editor.on_pointer_move(Point::new(410.0, 10.0), Modifiers::NONE);
        release(&mut editor, Point::new(410.0, 10.0));
        assert_eq!(editor.board().get(&id).unwrap().position, Point::new(400.0, 0.0));

        let corner = Point::new(598.0, 98.0);
        press(&mut editor, corner);
        assert!(editor.is_resizing());
        editor.on_pointer_move(corner + Vec2::new(100.0, 0.0), Modifiers::NONE);
        release(&mut editor, corner + Vec2::new(100.0, 0.0));
        let item = editor.board().get(&id).unwrap();
        assert_eq!(item.size, Size::new(300.0, 100.0));
        assert_eq!(item.position, Point::new(300.0, 0.0));

        editor.save().unwrap();
        let before = editor.board().items().to_vec();
        let report = editor.load().unwrap();
        assert_eq!(report.repaired, 0);
        assert_eq!(editor.board().items(), before.as_slice());
    }

    #[test]
    fn test_resize_floor() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);
        let corner = Point::new(195.0, 95.0);
        press(&mut editor, corner);
        editor.on_pointer_move(Point::new(-1000.0, -1000.0), Modifiers::NONE);
        release(&mut editor, Point::new(-1000.0, -1000.0));
        assert_eq!(
            editor.board().get(&id).unwrap().size,
            Size::new(MIN_ITEM_SIZE, MIN_ITEM_SIZE)
        );
    }

    #[test]
    fn test_escape_cancels_resize_and_clears_selection() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);
        press(&mut editor, Point::new(195.0, 95.0));
        editor.on_pointer_move(Point::new(300.0, 300.0), Modifiers::NONE);

        let actions = editor.on_key_down(Key::Escape, Modifiers::NONE);
        assert!(actions.contains(&EditorAction::SelectionChanged(None)));
        assert!(!editor.is_resizing());
        assert!(!editor.is_pointer_captured());
        release(&mut editor, Point::new(300.0, 300.0));
        assert_eq!(editor.board().get(&id).unwrap().size, DEFAULT_TEXT_SIZE);
    }

    #[test]
    fn test_delete_key_removes_selection() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Image);
        let actions = editor.on_key_down(Key::Backspace, Modifiers::NONE);
        assert_eq!(actions[0], EditorAction::ItemRemoved(id));
        assert!(editor.board().is_empty());
        assert!(editor.on_key_down(Key::Delete, Modifiers::NONE).is_empty());
    }

    #[test]
    fn test_double_click_text_requests_edit() {
        let mut editor = editor();
        let text = editor.add_item(ItemKind::Text);
        let actions = editor.on_double_click(Point::new(5.0, 5.0));
        assert!(actions.contains(&EditorAction::EditTextRequested(text)));

        editor.add_item(ItemKind::Image);
        assert!(editor.on_double_click(Point::new(5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_drop_new_item() {
        let mut editor = editor();
        let actions = editor.drop_payload(
            DropPayload::NewItem { kind: ItemKind::Text },
            Point::new(607.0, 895.0),
        );
        let EditorAction::ItemAdded(id) = &actions[0] else {
            panic!("expected ItemAdded, got {:?}", actions);
        };
        assert_eq!(editor.board().get(id).unwrap().position, Point::new(400.0, 800.0));
        assert!(editor.board().is_selected(id));
    }

    #[test]
    fn test_drop_stale_item_is_noop() {
        let mut editor = editor();
        let actions = editor.drop_payload(
            DropPayload::MoveItem {
                id: ItemId::from("gone"),
                grab_offset: Vec2::ZERO,
            },
            Point::new(50.0, 50.0),
        );
        assert_eq!(actions, vec![EditorAction::RenderNeeded]);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_apply_template_restyles_matching_selection() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);
        let heading = Template::by_name("Heading").unwrap();
        assert_eq!(editor.apply_template(heading), id);
        assert_eq!(editor.board().len(), 1);
        let item = editor.board().get(&id).unwrap();
        assert_eq!(item.content, heading.content);

        let frame = Template::by_name("Photo Frame").unwrap();
        let added = editor.apply_template(frame);
        assert_ne!(added, id);
        assert_eq!(editor.board().len(), 2);
        assert!(editor.board().is_selected(&added));
    }

    #[test]
    fn test_set_content_and_style() {
        let mut editor = editor();
        let id = editor.add_item(ItemKind::Text);
        assert!(!editor.set_content(&id, DEFAULT_TEXT));
        assert!(editor.set_content(&id, "Moss & linen"));

        let style = TextStyle {
            color: "#336699".to_string(),
            font_size: FontSize::Large,
            font_family: FontFamily::Monospace,
        };
        assert!(editor.set_style(&id, &style));
        assert!(!editor.set_style(&id, &style));
        assert_eq!(editor.board().get(&id).unwrap().style.as_ref(), Some(&style));

        let image = editor.add_item(ItemKind::Image);
        assert!(!editor.set_style(&image, &style));
    }

    #[test]
    fn test_add_image_bytes() {
        let mut editor = editor();
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        let id = editor.add_image_bytes(&png).unwrap();
        assert!(editor.board().get(&id).unwrap().content.starts_with("data:image/png;base64,"));

        assert!(editor.add_image_bytes(b"plain text").is_err());
        assert_eq!(editor.board().len(), 1);
    }

    #[test]
    fn test_reorder_selected() {
        let mut editor = editor();
        let first = editor.add_item(ItemKind::Text);
        let second = editor.add_item(ItemKind::Text);
        editor.select_item(Some(first.clone()));

        assert!(!editor.reorder_selected(Direction::Backward));
        assert!(editor.reorder_selected(Direction::Forward));
        assert_eq!(editor.board().get(&first).unwrap().layer, 1);
        assert_eq!(editor.board().get(&second).unwrap().layer, 0);
        assert!(!editor.reorder_selected(Direction::Forward));
    }

    #[test]
    fn test_save_and_load_shortcuts() {
        let mut editor = editor();
        editor.add_item(ItemKind::Text);
        editor.add_item(ItemKind::Image);

        assert_eq!(
            editor.on_key_down(Key::Char('s'), Modifiers::CTRL),
            vec![EditorAction::Saved(2)]
        );
        editor.delete_selected();
        assert_eq!(editor.board().len(), 1);

        let actions = editor.on_key_down(Key::Char('o'), Modifiers::CTRL);
        assert_eq!(actions[0], EditorAction::Loaded { count: 2, repaired: 0 });
        assert_eq!(editor.board().len(), 2);
        assert!(editor.board().selected_id().is_none());
    }

    #[test]
    fn test_failed_load_keeps_board() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "not json").unwrap();
        let mut editor = Editor::new(BoardConfig::default(), storage);
        editor.add_item(ItemKind::Text);

        let actions = editor.on_key_down(Key::Char('o'), Modifiers::CTRL);
        assert!(matches!(actions[0], EditorAction::StorageFailed(_)));
        assert_eq!(editor.board().len(), 1);

        assert!(editor.persistence().load_or_empty().is_empty());
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let mut editor = editor();
        editor.add_item(ItemKind::Text);
        assert!(!editor.on_key_down(Key::Char('z'), Modifiers::CTRL).is_empty());
        assert!(editor.board().is_empty());
        assert!(!editor.on_key_down(Key::Char('z'), Modifiers::CTRL_SHIFT).is_empty());
        assert_eq!(editor.board().len(), 1);
        assert!(editor.on_key_down(Key::Char('y'), Modifiers::CTRL).is_empty());
    }

    #[test]
    fn test_resize_handle_rect() {
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(resize_handle_rect(bounds, 1.0), Rect::new(188.0, 88.0, 200.0, 100.0));
        assert_eq!(resize_handle_rect(bounds, 2.0), Rect::new(194.0, 94.0, 200.0, 100.0));
    }
}
