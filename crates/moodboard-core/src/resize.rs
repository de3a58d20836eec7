//! Resize gestures: an `Idle`/`Resizing` state machine with scoped pointer listeners.

use crate::board::Board;
use crate::config::MIN_ITEM_SIZE;
use crate::item::{ItemId, ItemPatch};
use kurbo::{Point, Size};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Releases a pointer-listener registration exactly once, when dropped.
pub struct ListenerGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// Source of window-wide pointer-move / pointer-up listeners.
///
/// Entering `Resizing` acquires them; the returned guard is held by the
/// gesture and dropped on every exit path.
pub trait PointerListeners {
    fn acquire(&self) -> ListenerGuard;
}

/// Pointer capture flag shared with the host's event loop.
///
/// While captured, the host routes every pointer move and release to the
/// editor, even outside the canvas.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    holders: Rc<Cell<usize>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_captured(&self) -> bool {
        self.holders.get() > 0
    }
}

impl PointerListeners for PointerCapture {
    fn acquire(&self) -> ListenerGuard {
        self.holders.set(self.holders.get() + 1);
        let holders = Rc::clone(&self.holders);
        ListenerGuard::new(move || holders.set(holders.get().saturating_sub(1)))
    }
}

/// An in-progress resize.
#[derive(Debug)]
pub struct ResizeGesture {
    item: ItemId,
    /// Pointer position at the previous step, in screen units.
    last_pointer: Point,
    /// Uncommitted size shown for live feedback.
    size: Size,
    _listeners: ListenerGuard,
}

impl ResizeGesture {
    pub fn item(&self) -> &ItemId {
        &self.item
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

#[derive(Debug, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing(ResizeGesture),
}

/// Tracks at most one resize gesture and commits it on release.
#[derive(Debug)]
pub struct ResizeController {
    state: ResizeState,
    min_size: f64,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new(MIN_ITEM_SIZE)
    }
}

impl ResizeController {
    pub fn new(min_size: f64) -> Self {
        Self {
            state: ResizeState::Idle,
            min_size,
        }
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    pub fn active_item(&self) -> Option<&ItemId> {
        match &self.state {
            ResizeState::Resizing(gesture) => Some(&gesture.item),
            ResizeState::Idle => None,
        }
    }

    /// Live size of `item` if it is being resized.
    pub fn live_size(&self, item: &ItemId) -> Option<Size> {
        match &self.state {
            ResizeState::Resizing(gesture) if gesture.item == *item => Some(gesture.size),
            _ => None,
        }
    }

    /// Start a gesture on a resize-handle press.
    ///
    /// Pressing again on the item already being resized resets the baseline
    /// to `pointer` and `current_size`. A gesture on another item is
    /// abandoned without committing.
    pub fn begin(
        &mut self,
        item: ItemId,
        pointer: Point,
        current_size: Size,
        listeners: &dyn PointerListeners,
    ) {
        if let ResizeState::Resizing(gesture) = &mut self.state {
            if gesture.item == item {
                log::debug!("Resize restarted on {}, resetting baseline", item);
                gesture.last_pointer = pointer;
                gesture.size = current_size;
                return;
            }
            log::debug!("Abandoning resize of {}", gesture.item);
        }
        self.state = ResizeState::Idle;

        log::debug!("Resize started on {}", item);
        self.state = ResizeState::Resizing(ResizeGesture {
            item,
            last_pointer: pointer,
            size: current_size,
            _listeners: listeners.acquire(),
        });
    }

    /// Accumulate the pointer delta since the last step, divided by `zoom`.
    ///
    /// Returns the live size, or None when idle.
    pub fn pointer_move(&mut self, pointer: Point, zoom: f64) -> Option<Size> {
        let ResizeState::Resizing(gesture) = &mut self.state else {
            return None;
        };
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        let delta = (pointer - gesture.last_pointer) / zoom;
        gesture.size = Size::new(
            (gesture.size.width + delta.x).max(self.min_size),
            (gesture.size.height + delta.y).max(self.min_size),
        );
        gesture.last_pointer = pointer;
        Some(gesture.size)
    }

    /// Commit the accumulated size on pointer release and return to idle.
    ///
    /// Returns the committed item and size; None if idle or the item has
    /// vanished in the meantime.
    pub fn release(&mut self, board: &mut Board) -> Option<(ItemId, Size)> {
        let ResizeState::Resizing(gesture) = std::mem::take(&mut self.state) else {
            return None;
        };
        let ResizeGesture { item, size, .. } = gesture;
        if board.update(&item, &ItemPatch::size(size)) {
            log::debug!("Resize committed on {}: {}x{}", item, size.width, size.height);
            Some((item, size))
        } else {
            log::debug!("Resize target {} vanished, nothing committed", item);
            None
        }
    }

    /// Abandon the gesture without committing. Returns true if one was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = ResizeState::Idle;
        if was_active {
            log::debug!("Resize cancelled");
        }
        was_active
    }
}
