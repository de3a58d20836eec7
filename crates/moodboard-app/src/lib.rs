//! Moodboard Application
//!
//! The desktop shell: window, authentication view, side panel and the
//! board canvas on top of `moodboard-core`.

mod app;
mod canvas;
mod config;
mod shortcuts;
mod ui;
mod widgets;

pub use app::{MoodboardApp, open_storage};
pub use canvas::{CanvasView, TextEditSession};
pub use config::{AppConfig, ConfigError};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{PanelContext, Status, UiAction, UiState};
