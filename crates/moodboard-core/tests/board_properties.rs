//! Property tests for board invariants: dense layer ranks, placement bounds,
//! the resize floor and persistence round trips.

use kurbo::{Point, Size, Vec2};
use moodboard_core::config::{CANVAS_HEIGHT, CANVAS_WIDTH, GRID_SIZE, MIN_ITEM_SIZE};
use moodboard_core::resize::{PointerCapture, ResizeController};
use moodboard_core::{
    Board, BoardPersistence, Direction, ItemKind, ItemPatch, MemoryStorage, place,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    Add(ItemKind),
    Remove(usize),
    Forward(usize),
    Backward(usize),
}

fn arb_kind() -> impl Strategy<Value = ItemKind> {
    prop_oneof![Just(ItemKind::Text), Just(ItemKind::Image)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_kind().prop_map(Op::Add),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => any::<usize>().prop_map(Op::Forward),
        1 => any::<usize>().prop_map(Op::Backward),
    ]
}

fn apply(board: &mut Board, op: &Op) {
    let pick = |board: &Board, n: usize| {
        (!board.is_empty()).then(|| board.items()[n % board.len()].id.clone())
    };
    match op {
        Op::Add(kind) => {
            board.add(*kind, None);
        }
        Op::Remove(n) => {
            if let Some(id) = pick(board, *n) {
                board.remove(&id);
            }
        }
        Op::Forward(n) => {
            if let Some(id) = pick(board, *n) {
                board.reorder(&id, Direction::Forward);
            }
        }
        Op::Backward(n) => {
            if let Some(id) = pick(board, *n) {
                board.reorder(&id, Direction::Backward);
            }
        }
    }
}

/// Arbitrary fractional position and size, partly off the canvas.
fn arb_geometry() -> impl Strategy<Value = (Point, Size)> {
    (
        -100.0f64..CANVAS_WIDTH + 100.0,
        -100.0f64..CANVAS_HEIGHT + 100.0,
        MIN_ITEM_SIZE..CANVAS_WIDTH,
        MIN_ITEM_SIZE..CANVAS_HEIGHT,
    )
        .prop_map(|(x, y, width, height)| (Point::new(x, y), Size::new(width, height)))
}

fn assert_dense(board: &Board) {
    let mut layers: Vec<usize> = board.items().iter().map(|item| item.layer).collect();
    layers.sort_unstable();
    assert_eq!(layers, (0..board.len()).collect::<Vec<_>>());
}

fn canvas() -> Size {
    Size::new(CANVAS_WIDTH, CANVAS_HEIGHT)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn layers_stay_a_permutation(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut board = Board::new();
        for op in &ops {
            apply(&mut board, op);
            assert_dense(&board);
        }
    }

    #[test]
    fn placement_stays_on_canvas_and_on_grid(
        x in -2000.0f64..2000.0,
        y in -2000.0f64..2000.0,
        width in MIN_ITEM_SIZE..CANVAS_WIDTH * 2.0,
        height in MIN_ITEM_SIZE..CANVAS_HEIGHT * 2.0,
    ) {
        let size = Size::new(width, height);
        let placed = place(Point::new(x, y), size, canvas());

        prop_assert!(placed.x >= 0.0 && placed.y >= 0.0);
        // Oversized items are pinned to the origin on that axis.
        if width > CANVAS_WIDTH {
            prop_assert_eq!(placed.x, 0.0);
        } else {
            prop_assert!(placed.x + width <= CANVAS_WIDTH);
        }
        if height > CANVAS_HEIGHT {
            prop_assert_eq!(placed.y, 0.0);
        } else {
            prop_assert!(placed.y + height <= CANVAS_HEIGHT);
        }
        prop_assert_eq!(placed.x % GRID_SIZE, 0.0);
        prop_assert_eq!(placed.y % GRID_SIZE, 0.0);
    }

    #[test]
    fn resize_never_goes_below_floor(
        steps in prop::collection::vec((-5000.0f64..5000.0, -5000.0f64..5000.0), 1..20),
        zoom in 0.25f64..4.0,
    ) {
        let mut board = Board::new();
        let id = board.add(ItemKind::Text, None);
        let capture = PointerCapture::new();
        let mut resize = ResizeController::default();
        let start = board.get(&id).map(|item| item.size).unwrap_or_default();
        resize.begin(id.clone(), Point::ZERO, start, &capture);

        for (x, y) in steps {
            let size = resize.pointer_move(Point::new(x, y), zoom);
            let size = size.unwrap_or_default();
            prop_assert!(size.width >= MIN_ITEM_SIZE);
            prop_assert!(size.height >= MIN_ITEM_SIZE);
        }
        resize.release(&mut board);
        let committed = board.get(&id).map(|item| item.size).unwrap_or_default();
        prop_assert!(committed.width >= MIN_ITEM_SIZE && committed.height >= MIN_ITEM_SIZE);
        prop_assert!(!capture.is_captured());
    }

    #[test]
    fn forward_then_backward_restores_ranks(
        count in 2usize..8,
        pick in any::<usize>(),
    ) {
        let mut board = Board::new();
        for _ in 0..count {
            board.add(ItemKind::Text, None);
        }
        let id = board.items()[pick % count].id.clone();
        let before: Vec<usize> = board.items().iter().map(|item| item.layer).collect();

        if board.reorder(&id, Direction::Forward) {
            prop_assert!(board.reorder(&id, Direction::Backward));
        }
        let after: Vec<usize> = board.items().iter().map(|item| item.layer).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn save_load_round_trip(
        ops in prop::collection::vec(arb_op(), 0..30),
        geometry in prop::collection::vec(arb_geometry(), 0..8),
        content in "[a-zA-Z0-9 ]{0,40}",
    ) {
        let mut board = Board::new();
        for op in &ops {
            apply(&mut board, op);
        }
        if let Some(id) = board.items().first().map(|item| item.id.clone()) {
            board.update(&id, &ItemPatch::content(content));
        }
        let ids: Vec<_> = board.items().iter().map(|item| item.id.clone()).collect();
        for (id, (position, size)) in ids.iter().zip(geometry) {
            board.update(id, &ItemPatch::position(position).with_size(size));
        }

        let persistence = BoardPersistence::new(MemoryStorage::new());
        persistence.save(board.items()).unwrap();
        let loaded = persistence.load().unwrap();
        prop_assert_eq!(loaded.as_slice(), board.items());

        let mut restored = Board::new();
        prop_assert_eq!(restored.replace_all(loaded), 0);
    }

    #[test]
    fn zoomed_resize_survives_save_load(
        zoom in prop_oneof![Just(1.5625f64), 0.25f64..4.0],
        steps in prop::collection::vec((-40.0f64..40.0, -40.0f64..40.0), 1..30),
    ) {
        let mut board = Board::new();
        let id = board.add(ItemKind::Text, None);
        let capture = PointerCapture::new();
        let mut resize = ResizeController::default();
        let start = board.get(&id).map(|item| item.size).unwrap_or_default();
        let mut pointer = Point::new(start.width, start.height);
        resize.begin(id.clone(), pointer, start, &capture);
        for (dx, dy) in steps {
            pointer += Vec2::new(dx, dy);
            resize.pointer_move(pointer, zoom);
        }
        prop_assert!(resize.release(&mut board).is_some());

        let persistence = BoardPersistence::new(MemoryStorage::new());
        persistence.save(board.items()).unwrap();
        let loaded = persistence.load().unwrap();
        prop_assert_eq!(loaded.as_slice(), board.items());

        let mut restored = Board::new();
        prop_assert_eq!(restored.replace_all(loaded), 0);
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn add_text_defaults() {
    let mut board = Board::new();
    let id = board.add(ItemKind::Text, None);
    let item = board.get(&id).unwrap();
    assert_eq!(item.content, "Double click to edit");
    assert_eq!(item.position, Point::ZERO);
    assert_eq!(item.size, Size::new(200.0, 100.0));
    assert_eq!(item.layer, 0);
    let style = item.style.as_ref().unwrap();
    assert_eq!(style.color, "#000000");
    assert_eq!(style.font_size.points(), 16.0);
    assert_eq!(style.font_family.name(), "sans-serif");
}

#[test]
fn two_item_reorder() {
    let mut board = Board::new();
    let a = board.add(ItemKind::Text, None);
    let b = board.add(ItemKind::Image, None);

    assert!(board.reorder(&a, Direction::Forward));
    assert_eq!(board.get(&a).unwrap().layer, 1);
    assert_eq!(board.get(&b).unwrap().layer, 0);
    assert_eq!(board.items_by_layer().last().map(|item| &item.id), Some(&a));
}

#[test]
fn drop_near_corner_is_clamped() {
    let placed = place(Point::new(607.0, 895.0), Size::new(300.0, 200.0), canvas());
    assert_eq!(placed, Point::new(300.0, 700.0));
}

#[test]
fn empty_storage_loads_empty_board() {
    let persistence = BoardPersistence::new(MemoryStorage::new());
    assert!(persistence.load().unwrap().is_empty());
}
