//! Layer ordering: adjacent swaps plus renormalisation to a dense `0..N-1` ranking.

use crate::item::{Item, ItemId};

/// Direction for a single-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One rank towards the front (drawn later, hit first).
    Forward,
    /// One rank towards the back.
    Backward,
}

/// Move the item one rank in `direction`.
///
/// Returns false (and leaves every rank untouched) when the item is missing
/// or already at the boundary in that direction.
pub fn reorder(items: &mut [Item], id: &ItemId, direction: Direction) -> bool {
    let mut order = rank_order(items);
    let Some(rank) = order.iter().position(|&idx| items[idx].id == *id) else {
        return false;
    };
    let target = match direction {
        Direction::Forward if rank + 1 < order.len() => rank + 1,
        Direction::Backward if rank > 0 => rank - 1,
        _ => return false,
    };
    order.swap(rank, target);
    assign(items, &order);
    true
}

/// Reassign every `layer` to the item's index in rank order.
///
/// Ties (duplicate ranks) keep insertion order.
pub fn normalize(items: &mut [Item]) {
    let order = rank_order(items);
    assign(items, &order);
}

/// Whether the ranks form exactly `0..N-1`.
pub fn is_dense(items: &[Item]) -> bool {
    let mut seen = vec![false; items.len()];
    for item in items {
        match seen.get_mut(item.layer) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Indices into `items`, sorted back to front.
pub fn rank_order(items: &[Item]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&idx| (items[idx].layer, idx));
    order
}

fn assign(items: &mut [Item], order: &[usize]) {
    for (rank, &idx) in order.iter().enumerate() {
        items[idx].layer = rank;
    }
}
