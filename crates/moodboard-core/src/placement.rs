//! Placement of dropped items: snap to grid, then clamp into the canvas.

use crate::config::GRID_SIZE;
use crate::item::{ItemId, ItemKind};
use kurbo::{Point, Size, Vec2};

/// What is being dropped onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    /// An existing card being dragged; `grab_offset` is the pointer position
    /// relative to the card's top-left corner when the drag started.
    MoveItem { id: ItemId, grab_offset: Vec2 },
    /// A new card dragged in from the side panel.
    NewItem { kind: ItemKind },
}

impl DropPayload {
    /// Raw top-left position for a drop at `pointer` (canvas coordinates).
    pub fn raw_position(&self, pointer: Point) -> Point {
        match self {
            DropPayload::MoveItem { grab_offset, .. } => pointer - *grab_offset,
            DropPayload::NewItem { .. } => pointer,
        }
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Position for an item of `item_size` dropped at `raw`, on the default 20-unit grid.
pub fn place(raw: Point, item_size: Size, canvas_size: Size) -> Point {
    place_on_grid(raw, item_size, canvas_size, GRID_SIZE)
}

/// Snap `raw` to `grid_size`, then clamp it so the item stays on the canvas.
///
/// Each axis is handled independently. The upper bound is the largest grid
/// multiple not exceeding `canvas - item`, so the result is always
/// grid-aligned. An item larger than the canvas on an axis is pinned to 0 on
/// that axis and overflows.
pub fn place_on_grid(raw: Point, item_size: Size, canvas_size: Size, grid_size: f64) -> Point {
    let snapped = snap_to_grid(raw, grid_size);
    Point::new(
        clamp_axis(snapped.x, item_size.width, canvas_size.width, grid_size),
        clamp_axis(snapped.y, item_size.height, canvas_size.height, grid_size),
    )
}

/// Clamp a position into the canvas without snapping.
pub fn clamp_to_canvas(position: Point, item_size: Size, canvas_size: Size) -> Point {
    Point::new(
        clamp_axis(position.x, item_size.width, canvas_size.width, 0.0),
        clamp_axis(position.y, item_size.height, canvas_size.height, 0.0),
    )
}

fn clamp_axis(value: f64, extent: f64, bound: f64, grid_size: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let mut max = (bound - extent).max(0.0);
    if grid_size > 0.0 {
        max = (max / grid_size).floor() * grid_size;
    }
    value.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH};

    fn canvas() -> Size {
        Size::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Point::new(29.0, 31.0), 20.0), Point::new(20.0, 40.0));
        assert_eq!(snap_to_grid(Point::new(-9.0, 10.0), 20.0), Point::new(0.0, 20.0));
    }

    #[test]
    fn test_drop_past_bottom_right_corner() {
        let position = place(Point::new(607.0, 895.0), Size::new(300.0, 200.0), canvas());
        assert_eq!(position, Point::new(300.0, 700.0));
    }

    #[test]
    fn test_negative_drop_clamps_to_origin() {
        let position = place(Point::new(-250.0, -3.0), Size::new(100.0, 100.0), canvas());
        assert_eq!(position, Point::ZERO);
    }

    #[test]
    fn test_oversized_item_pins_to_zero() {
        let position = place(Point::new(140.0, 140.0), Size::new(800.0, 100.0), canvas());
        assert_eq!(position, Point::new(0.0, 140.0));
    }

    #[test]
    fn test_unaligned_upper_bound_stays_on_grid() {
        // 600 - 150 = 450 is not a grid multiple; the bound rounds down to 440.
        let position = place(Point::new(599.0, 0.0), Size::new(150.0, 150.0), canvas());
        assert_eq!(position, Point::new(440.0, 0.0));
    }

    #[test]
    fn test_move_payload_subtracts_grab_offset() {
        let payload = DropPayload::MoveItem {
            id: ItemId::from("a"),
            grab_offset: Vec2::new(10.0, 5.0),
        };
        assert_eq!(payload.raw_position(Point::new(50.0, 50.0)), Point::new(40.0, 45.0));

        let payload = DropPayload::NewItem { kind: ItemKind::Text };
        assert_eq!(payload.raw_position(Point::new(50.0, 50.0)), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_clamp_without_snapping() {
        let position = clamp_to_canvas(Point::new(555.0, 13.0), Size::new(100.0, 100.0), canvas());
        assert_eq!(position, Point::new(500.0, 13.0));
    }
}
