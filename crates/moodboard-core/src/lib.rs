//! Moodboard Core Library
//!
//! Platform-agnostic data structures and logic for the mood board editor:
//! the item store, placement and layering rules, resize gestures,
//! persistence and the authentication session.

pub mod board;
pub mod config;
pub mod editor;
pub mod image;
pub mod input;
pub mod item;
pub mod layers;
pub mod placement;
pub mod resize;
pub mod routes;
pub mod session;
pub mod storage;
pub mod templates;
pub mod viewport;

pub use board::Board;
pub use config::BoardConfig;
pub use editor::{Editor, EditorAction, LoadReport};
pub use image::ImageError;
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use item::{FontFamily, FontSize, Item, ItemId, ItemKind, ItemPatch, TextStyle};
pub use layers::Direction;
pub use placement::{DropPayload, place, snap_to_grid};
pub use resize::{ListenerGuard, PointerCapture, PointerListeners, ResizeController, ResizeState};
pub use routes::{Route, guard};
pub use session::{
    AuthError, AuthProvider, AuthResult, IdentityProvider, LocalIdentityProvider, Session,
    Subscription, User,
};
pub use storage::{BoardPersistence, MemoryStorage, Storage, StorageError, StorageResult};
pub use templates::Template;
pub use viewport::Viewport;
