//! Application state and the eframe frame loop.

use std::cell::Cell;
use std::rc::Rc;

use moodboard_core::{
    Direction, Editor, EditorAction, ItemId, Key, LoadReport, LocalIdentityProvider,
    MemoryStorage, Route, Session, Storage, Subscription, Template, guard,
};

use crate::canvas::{CanvasView, TextEditSession, to_modifiers};
use crate::config::AppConfig;
use crate::ui::{PanelContext, UiAction, UiState, render_auth_view, render_side_panel};
use crate::widgets::theme;

const ZOOM_STEP: f64 = 1.25;

#[cfg(not(target_arch = "wasm32"))]
mod file_ops {
    /// Ask for an image file and read it.
    pub fn pick_image() -> Option<std::io::Result<Vec<u8>>> {
        let path = rfd::FileDialog::new()
            .set_title("Upload Image")
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
            .pick_file()?;
        log::info!("Reading image from: {:?}", path);
        Some(std::fs::read(&path))
    }
}

/// Open the board storage named by `config`, falling back to memory when
/// the directory is unusable.
pub fn open_storage(config: &AppConfig) -> Box<dyn Storage> {
    #[cfg(not(target_arch = "wasm32"))]
    let storage = match &config.data_dir {
        Some(dir) => moodboard_core::storage::FileStorage::new(dir.clone()),
        None => moodboard_core::storage::FileStorage::default_location(),
    }
    .inspect(|storage| log::info!("Storing boards in {}", storage.base_path().display()));

    #[cfg(target_arch = "wasm32")]
    let storage = {
        let _ = config;
        moodboard_core::storage::create_default_storage()
    };

    match storage {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("Board storage unavailable, changes will not persist: {}", e);
            Box::new(MemoryStorage::default())
        }
    }
}

/// The mood board application.
pub struct MoodboardApp {
    session: Session,
    session_changed: Rc<Cell<bool>>,
    _session_subscription: Subscription,
    route: Route,
    editor: Editor<Box<dyn Storage>>,
    canvas: CanvasView,
    ui_state: UiState,
}

impl MoodboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        Self::with_storage(config.clone(), open_storage(&config))
    }

    /// Build the app around an explicit storage backend.
    pub fn with_storage(config: AppConfig, storage: Box<dyn Storage>) -> Self {
        let provider = LocalIdentityProvider::with_profile(&config.local_profile);
        let session = Session::start(Box::new(provider));

        let session_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&session_changed);
        let subscription = session.subscribe(move |_| flag.set(true));

        let editor = Editor::new(config.board.clone(), storage);

        let route = guard(Route::Board, session.user());
        Self {
            session,
            session_changed,
            _session_subscription: subscription,
            route,
            editor,
            canvas: CanvasView::new(),
            ui_state: UiState::default(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn editor(&self) -> &Editor<Box<dyn Storage>> {
        &self.editor
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui_state
    }

    fn sync_session(&mut self) {
        if !self.session_changed.replace(false) {
            return;
        }
        let route = guard(self.route, self.session.user());
        if route != self.route {
            log::info!("Route {} -> {}", self.route.path(), route.path());
            self.route = route;
        }
        if self.session.is_signed_in() {
            self.ui_state.auth.clear();
        } else {
            self.ui_state.editing = None;
            self.ui_state.status = None;
            self.editor.select_item(None);
        }
    }

    /// Apply a UI action.
    pub fn handle_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::AddItem(kind) => {
                let id = self.editor.add_item(kind);
                log::debug!("Added {} item {}", kind.name(), id);
            }
            UiAction::UploadImage => self.upload_image(),
            UiAction::ApplyTemplate(name) => match Template::by_name(name) {
                Some(template) => {
                    self.editor.apply_template(template);
                }
                None => log::warn!("Unknown template: {}", name),
            },
            UiAction::EditText(id) => self.start_editing(&id),
            UiAction::SetStyle(id, style) => {
                self.editor.set_style(&id, &style);
            }
            UiAction::Reorder(direction) => {
                self.editor.reorder_selected(direction);
            }
            UiAction::DeleteSelected => {
                if let Some(id) = self.editor.delete_selected() {
                    self.handle_editor_actions(vec![EditorAction::ItemRemoved(id)]);
                }
            }
            UiAction::Undo => {
                self.editor.undo();
            }
            UiAction::Redo => {
                self.editor.redo();
            }
            UiAction::Save => match self.editor.save() {
                Ok(count) => self.show_saved(count),
                Err(e) => self.show_storage_error(e.to_string()),
            },
            UiAction::Load => match self.editor.load() {
                Ok(report) => self.show_loaded(report),
                Err(e) => self.show_storage_error(e.to_string()),
            },
            UiAction::ZoomIn => self.editor.viewport_mut().zoom_by(ZOOM_STEP),
            UiAction::ZoomOut => self.editor.viewport_mut().zoom_by(1.0 / ZOOM_STEP),
            UiAction::ZoomReset => self.editor.viewport_mut().reset_zoom(),
            UiAction::SignIn(provider) => {
                if let Err(e) = self.session.sign_in(provider) {
                    self.ui_state.auth.error = Some(e.to_string());
                }
            }
            UiAction::SignInWithEmail { email, password } => {
                if let Err(e) = self.session.sign_in_with_email(&email, &password) {
                    self.ui_state.auth.error = Some(e.to_string());
                }
            }
            UiAction::SignUp {
                email,
                password,
                display_name,
            } => {
                let display_name = display_name.as_deref().unwrap_or("");
                if let Err(e) = self.session.sign_up(&email, &password, display_name) {
                    self.ui_state.auth.error = Some(e.to_string());
                }
            }
            UiAction::SignOut => {
                if let Err(e) = self.session.sign_out() {
                    self.ui_state.error(e.to_string());
                }
            }
        }
        self.sync_session();
    }

    /// React to what the editor reported.
    pub fn handle_editor_actions(&mut self, actions: Vec<EditorAction>) {
        for action in actions {
            match action {
                EditorAction::Saved(count) => self.show_saved(count),
                EditorAction::Loaded { count, repaired } => {
                    self.show_loaded(LoadReport { count, repaired });
                }
                EditorAction::StorageFailed(message) => self.show_storage_error(message),
                EditorAction::EditTextRequested(id) => self.start_editing(&id),
                EditorAction::ItemRemoved(id) => {
                    if self.ui_state.editing.as_ref().is_some_and(|e| e.id == id) {
                        self.ui_state.editing = None;
                    }
                }
                EditorAction::RenderNeeded
                | EditorAction::ItemAdded(_)
                | EditorAction::ItemUpdated(_)
                | EditorAction::SelectionChanged(_) => {}
            }
        }
    }

    fn show_saved(&mut self, count: usize) {
        self.ui_state.info(format!("Saved {} items", count));
    }

    fn show_loaded(&mut self, report: LoadReport) {
        let message = if report.repaired > 0 {
            format!("Loaded {} items ({} repaired)", report.count, report.repaired)
        } else {
            format!("Loaded {} items", report.count)
        };
        self.ui_state.editing = None;
        self.ui_state.info(message);
    }

    fn show_storage_error(&mut self, message: String) {
        log::warn!("Board storage failed: {}", message);
        self.ui_state.error(message);
    }

    fn start_editing(&mut self, id: &ItemId) {
        let Some(item) = self.editor.board().get(id).filter(|item| item.is_text()) else {
            return;
        };
        self.ui_state.editing = Some(TextEditSession::new(item.id.clone(), item.content.clone()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn upload_image(&mut self) {
        let Some(read) = file_ops::pick_image() else {
            return;
        };
        let result = read
            .map_err(|e| e.to_string())
            .and_then(|bytes| self.editor.add_image_bytes(&bytes).map_err(|e| e.to_string()));
        match result {
            Ok(id) => log::info!("Added uploaded image {}", id),
            Err(e) => {
                log::warn!("Image upload failed: {}", e);
                self.ui_state.error(e);
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn upload_image(&mut self) {
        log::warn!("Image upload is not available in the browser build");
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let keys: Vec<_> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => to_core_key(*key).map(|key| (key, to_modifiers(*modifiers))),
                    _ => None,
                })
                .collect()
        });
        for (key, modifiers) in keys {
            let actions = self.editor.on_key_down(key, modifiers);
            self.handle_editor_actions(actions);
        }
    }

    fn panel_context(&self) -> PanelContext {
        let board = self.editor.board();
        let selected = board.selected().cloned();
        let can_reorder = |direction| {
            selected
                .as_ref()
                .is_some_and(|item| board.can_reorder(&item.id, direction))
        };
        PanelContext {
            can_forward: can_reorder(Direction::Forward),
            can_backward: can_reorder(Direction::Backward),
            selected: selected.clone(),
            can_undo: self.editor.can_undo(),
            can_redo: self.editor.can_redo(),
            zoom_percentage: self.editor.viewport().zoom_percentage(),
            item_count: board.len(),
            user_label: self
                .session
                .user()
                .map(|user| user.label().to_string())
                .unwrap_or_default(),
        }
    }

    fn show_board(&mut self, ctx: &egui::Context) {
        self.handle_keyboard(ctx);

        let panel = self.panel_context();
        if let Some(action) = render_side_panel(ctx, &mut self.ui_state, &panel) {
            self.handle_ui_action(action);
        }

        let mut committed = None;
        let mut actions = Vec::new();
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::CANVAS_BG).inner_margin(egui::Margin::same(24)))
            .show(ctx, |ui| {
                egui::ScrollArea::both().drag_to_scroll(false).show(ui, |ui| {
                    let (canvas_actions, finished) =
                        self.canvas
                            .show(ui, &mut self.editor, &mut self.ui_state.editing);
                    actions = canvas_actions;
                    committed = finished;
                });
            });

        if let Some((id, text)) = committed
            && self.editor.set_content(&id, &text)
        {
            log::debug!("Updated text of {}", id);
        }
        if actions.contains(&EditorAction::RenderNeeded) {
            ctx.request_repaint();
        }
        self.handle_editor_actions(actions);
    }
}

impl eframe::App for MoodboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_session();
        match self.route {
            Route::Auth => {
                if let Some(action) = render_auth_view(ctx, &mut self.ui_state) {
                    self.handle_ui_action(action);
                }
            }
            Route::Board => self.show_board(ctx),
        }
    }
}

/// Keys the editor understands; everything else is left to egui.
fn to_core_key(key: egui::Key) -> Option<Key> {
    Some(match key {
        egui::Key::Delete => Key::Delete,
        egui::Key::Backspace => Key::Backspace,
        egui::Key::Escape => Key::Escape,
        egui::Key::Enter => Key::Enter,
        egui::Key::S => Key::Char('s'),
        egui::Key::O => Key::Char('o'),
        egui::Key::Z => Key::Char('z'),
        egui::Key::Y => Key::Char('y'),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodboard_core::config::STORAGE_KEY;
    use moodboard_core::{AuthProvider, ItemKind, Modifiers};
    use tempfile::tempdir;

    fn app() -> MoodboardApp {
        MoodboardApp::with_storage(AppConfig::default(), Box::new(MemoryStorage::default()))
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(to_core_key(egui::Key::S), Some(Key::Char('s')));
        assert_eq!(to_core_key(egui::Key::Backspace), Some(Key::Backspace));
        assert_eq!(to_core_key(egui::Key::F1), None);
    }

    #[test]
    fn test_starts_on_auth_view() {
        let app = app();
        assert_eq!(app.route(), Route::Auth);
    }

    #[test]
    fn test_sign_in_opens_board() {
        let mut app = app();
        app.handle_ui_action(UiAction::SignIn(AuthProvider::GitHub));
        assert_eq!(app.route(), Route::Board);

        app.handle_ui_action(UiAction::SignOut);
        assert_eq!(app.route(), Route::Auth);
    }

    #[test]
    fn test_failed_sign_in_shows_error() {
        let mut app = app();
        app.handle_ui_action(UiAction::SignInWithEmail {
            email: "nobody@example.com".to_string(),
            password: "secret".to_string(),
        });
        assert_eq!(app.route(), Route::Auth);
        assert!(app.ui_state().auth.error.is_some());
    }

    #[test]
    fn test_sign_up_opens_board() {
        let mut app = app();
        app.handle_ui_action(UiAction::SignUp {
            email: "ada@example.com".to_string(),
            password: "analytical".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
        });
        assert_eq!(app.route(), Route::Board);
        assert_eq!(app.panel_context().user_label, "Ada Lovelace");
    }

    #[test]
    fn test_save_and_load_report_status() {
        let mut app = app();
        app.handle_ui_action(UiAction::AddItem(ItemKind::Text));
        app.handle_ui_action(UiAction::Save);
        assert_eq!(
            app.ui_state().status,
            Some(crate::ui::Status::Info("Saved 1 items".to_string()))
        );

        app.handle_ui_action(UiAction::DeleteSelected);
        assert!(app.editor().board().is_empty());

        app.handle_ui_action(UiAction::Load);
        assert_eq!(app.editor().board().len(), 1);
    }

    #[test]
    fn test_saved_board_waits_for_load() {
        let mut seeded = Editor::new(AppConfig::default().board, MemoryStorage::default());
        seeded.add_item(ItemKind::Text);
        seeded.save().unwrap();
        let saved = seeded.persistence().storage().get(STORAGE_KEY).unwrap().unwrap();
        let storage = MemoryStorage::default();
        storage.set(STORAGE_KEY, &saved).unwrap();

        let mut app = MoodboardApp::with_storage(AppConfig::default(), Box::new(storage));
        assert!(app.editor().board().is_empty());

        app.handle_ui_action(UiAction::Load);
        assert_eq!(app.editor().board().len(), 1);
        assert_eq!(
            app.ui_state().status,
            Some(crate::ui::Status::Info("Loaded 1 items".to_string()))
        );
    }

    #[test]
    fn test_malformed_load_shows_error() {
        let storage = MemoryStorage::default();
        storage.set(STORAGE_KEY, "{ not items").unwrap();
        let mut app = MoodboardApp::with_storage(AppConfig::default(), Box::new(storage));
        app.handle_ui_action(UiAction::AddItem(ItemKind::Text));

        app.handle_ui_action(UiAction::Load);
        assert_eq!(app.editor().board().len(), 1);
        assert!(matches!(app.ui_state().status, Some(crate::ui::Status::Error(_))));
    }

    #[test]
    fn test_edit_request_opens_text_session() {
        let mut app = app();
        app.handle_ui_action(UiAction::AddItem(ItemKind::Text));
        let id = app.editor().board().items()[0].id.clone();

        app.handle_editor_actions(vec![EditorAction::EditTextRequested(id.clone())]);
        assert_eq!(app.ui_state().editing.as_ref().map(|e| &e.id), Some(&id));

        let actions = app.editor.on_key_down(Key::Delete, Modifiers::NONE);
        app.handle_editor_actions(actions);
        assert!(app.ui_state().editing.is_none());
    }

    #[test]
    fn test_reorder_flags_follow_selection() {
        let mut app = app();
        app.handle_ui_action(UiAction::AddItem(ItemKind::Text));
        app.handle_ui_action(UiAction::AddItem(ItemKind::Image));

        let panel = app.panel_context();
        assert!(!panel.can_forward);
        assert!(panel.can_backward);

        app.handle_ui_action(UiAction::Reorder(Direction::Backward));
        let panel = app.panel_context();
        assert!(panel.can_forward);
        assert!(!panel.can_backward);
    }

    #[test]
    fn test_open_storage_uses_data_dir() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            data_dir: Some(dir.path().join("boards")),
            ..AppConfig::default()
        };
        let storage = open_storage(&config);
        storage.set("probe", "1").unwrap();
        assert!(dir.path().join("boards").join("probe.json").exists());
    }
}
