//! Board state store: the item collection, the selection and undo history.

use crate::config::BoardConfig;
use crate::item::{Item, ItemId, ItemKind, ItemPatch, TextStyle};
use crate::layers::{self, Direction};
use crate::placement::clamp_to_canvas;
use crate::templates::Template;
use kurbo::Point;
use std::collections::HashSet;

/// The single source of truth for a board.
///
/// Items are kept in insertion order; paint order is given by `Item::layer`,
/// which stays a dense `0..N-1` ranking after every mutation.
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    items: Vec<Item>,
    /// Back-reference by id. May go stale; see [`Board::selected`].
    selected: Option<ItemId>,
    undo_stack: Vec<Vec<Item>>,
    redo_stack: Vec<Vec<Item>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            selected: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Snapshot of the collection in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == *id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Add an item of `kind` on top of every other item.
    ///
    /// A template of the same kind supplies content, size and style;
    /// otherwise the kind's defaults are used.
    pub fn add(&mut self, kind: ItemKind, template: Option<&Template>) -> ItemId {
        let layer = self.items.len();
        let item = match template {
            Some(template) if template.kind == kind => template.instantiate(layer),
            Some(template) => {
                log::debug!("Ignoring {} template for a {} item", template.name, kind.name());
                Item::new(kind, layer)
            }
            None => Item::new(kind, layer),
        };
        self.insert(item)
    }

    /// Append a prebuilt item on top. Its layer is overwritten and its
    /// geometry brought within bounds.
    pub fn insert(&mut self, mut item: Item) -> ItemId {
        item.layer = self.items.len();
        item.size = self.config.clamp_size(item.size);
        item.position = clamp_to_canvas(item.position, item.size, self.config.canvas_size);
        if self.contains(&item.id) {
            item.id = ItemId::new();
        }
        let id = item.id.clone();
        log::debug!("Added {} item {}", item.kind.name(), id);
        self.items.push(item);
        id
    }

    /// Merge `patch` into the item with `id`.
    ///
    /// Sizes are floored at the minimum item size. After a position or size
    /// change the item is moved back inside the canvas, so committed geometry
    /// is exactly what [`replace_all`](Self::replace_all) accepts unchanged.
    /// Returns false if no such item exists.
    pub fn update(&mut self, id: &ItemId, patch: &ItemPatch) -> bool {
        let config = &self.config;
        let Some(item) = self.items.iter_mut().find(|item| item.id == *id) else {
            return false;
        };
        let mut patch = patch.clone();
        if let Some(size) = patch.size {
            patch.size = Some(config.clamp_size(size));
        }
        item.apply(&patch);
        if patch.position.is_some() || patch.size.is_some() {
            item.position = clamp_to_canvas(item.position, item.size, config.canvas_size);
        }
        true
    }

    /// Delete the item, clear a selection pointing at it and compact ranks.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|item| item.id == *id)?;
        let removed = self.items.remove(idx);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        layers::normalize(&mut self.items);
        log::debug!("Removed item {}", id);
        Some(removed)
    }

    /// Set or clear the selection. Liveness is not checked here.
    pub fn select(&mut self, id: Option<ItemId>) {
        self.selected = id;
    }

    /// The selected id, if it still names a live item.
    pub fn selected_id(&self) -> Option<&ItemId> {
        self.selected.as_ref().filter(|id| self.contains(id))
    }

    /// The selected item; a stale selection reads as none.
    pub fn selected(&self) -> Option<&Item> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selected_id() == Some(id)
    }

    /// Move an item one rank forward or backward.
    pub fn reorder(&mut self, id: &ItemId, direction: Direction) -> bool {
        layers::reorder(&mut self.items, id, direction)
    }

    /// Whether [`reorder`](Self::reorder) would move the item.
    pub fn can_reorder(&self, id: &ItemId, direction: Direction) -> bool {
        let Some(item) = self.get(id) else {
            return false;
        };
        match direction {
            Direction::Forward => item.layer + 1 < self.items.len(),
            Direction::Backward => item.layer > 0,
        }
    }

    /// Items in paint order (back to front).
    pub fn items_by_layer(&self) -> Vec<&Item> {
        layers::rank_order(&self.items)
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect()
    }

    /// Topmost item containing `point` (canvas coordinates).
    pub fn item_at(&self, point: Point) -> Option<&Item> {
        self.items_by_layer()
            .into_iter()
            .rev()
            .find(|item| item.bounds().contains(point))
    }

    /// Replace the whole collection, repairing what does not hold up.
    ///
    /// Duplicate ids are reassigned, sizes floored, positions clamped, text
    /// styles filled in and ranks renormalised. Clears the selection.
    /// Returns how many items needed a fix.
    pub fn replace_all(&mut self, items: Vec<Item>) -> usize {
        let mut seen = HashSet::new();
        let mut repaired = 0;
        self.items = items
            .into_iter()
            .map(|mut item| {
                let original = item.clone();
                if !seen.insert(item.id.clone()) {
                    item.id = ItemId::new();
                }
                item.size = self.config.clamp_size(item.size);
                item.position = clamp_to_canvas(item.position, item.size, self.config.canvas_size);
                match item.kind {
                    ItemKind::Text => {
                        item.style.get_or_insert_with(TextStyle::default);
                    }
                    ItemKind::Image => item.style = None,
                }
                if item != original {
                    repaired += 1;
                }
                item
            })
            .collect();

        if !layers::is_dense(&self.items) {
            layers::normalize(&mut self.items);
            repaired += 1;
        }
        self.selected = None;
        if repaired > 0 {
            log::warn!("Repaired {} item(s) while replacing board contents", repaired);
        }
        repaired
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        self.undo_stack.push(self.items.clone());
        self.redo_stack.clear();
        if self.undo_stack.len() > self.config.max_undo_history {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.items, snapshot);
        self.redo_stack.push(current);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.items, snapshot);
        self.undo_stack.push(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
