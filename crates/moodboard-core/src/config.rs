//! Board configuration.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Logical canvas width.
pub const CANVAS_WIDTH: f64 = 600.0;
/// Logical canvas height.
pub const CANVAS_HEIGHT: f64 = 900.0;
/// Grid unit used when snapping dropped items.
pub const GRID_SIZE: f64 = 20.0;
/// Smallest width or height an item may have.
pub const MIN_ITEM_SIZE: f64 = 50.0;
/// Storage key holding the serialized item collection.
pub const STORAGE_KEY: &str = "moodboard-items";
/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Tunables for a board.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Fixed canvas dimensions in logical units.
    pub canvas_size: Size,
    /// Snap grid unit.
    pub grid_size: f64,
    /// Minimum item width/height.
    pub min_item_size: f64,
    /// Key under which the board is persisted.
    pub storage_key: String,
    /// Undo depth.
    pub max_undo_history: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            grid_size: GRID_SIZE,
            min_item_size: MIN_ITEM_SIZE,
            storage_key: STORAGE_KEY.to_string(),
            max_undo_history: MAX_UNDO_HISTORY,
        }
    }
}

impl BoardConfig {
    /// Clamp both dimensions of `size` to the minimum item size.
    pub fn clamp_size(&self, size: Size) -> Size {
        Size::new(
            floor_dimension(size.width, self.min_item_size),
            floor_dimension(size.height, self.min_item_size),
        )
    }
}

fn floor_dimension(value: f64, min: f64) -> f64 {
    if value.is_finite() { value.max(min) } else { min }
}
