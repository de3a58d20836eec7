//! UI components using egui.

use egui::{Align, Context, Layout, RichText, Sense, Ui, Vec2};
use moodboard_core::session::MIN_PASSWORD_LEN;
use moodboard_core::{
    AuthProvider, Direction, FontFamily, FontSize, Item, ItemId, ItemKind, Template, TextStyle,
};

use crate::canvas::TextEditSession;
use crate::shortcuts::ShortcutRegistry;
use crate::widgets::{
    TEXT_COLORS, ToggleButton, color_swatch, error_label, panel_frame, parse_css_color,
    section_label, separator, theme,
};

const SIDE_PANEL_WIDTH: f32 = 230.0;
const BUTTON_WIDTH: f32 = 96.0;

/// Status line shown under the save/load buttons.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// Contents of the email form on the auth view.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub error: Option<String>,
}

impl AuthForm {
    /// "First Last", trimmed; `None` when both are blank.
    pub fn display_name(&self) -> Option<String> {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Forget everything typed, keeping the mode.
    pub fn clear(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
    }
}

/// UI state that lives across frames.
#[derive(Debug, Default)]
pub struct UiState {
    pub status: Option<Status>,
    pub auth: AuthForm,
    pub editing: Option<TextEditSession>,
    pub show_shortcuts: bool,
}

impl UiState {
    pub fn info(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Info(message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Error(message.into()));
    }
}

/// What the side panel needs to know about the board this frame.
#[derive(Debug, Clone, Default)]
pub struct PanelContext {
    pub selected: Option<Item>,
    pub can_forward: bool,
    pub can_backward: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub zoom_percentage: i32,
    pub item_count: usize,
    pub user_label: String,
}

/// Actions that can be triggered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    AddItem(ItemKind),
    /// Pick an image file and add it as a card.
    UploadImage,
    ApplyTemplate(&'static str),
    /// Open the in-place editor on a text card.
    EditText(ItemId),
    SetStyle(ItemId, TextStyle),
    Reorder(Direction),
    DeleteSelected,
    Undo,
    Redo,
    Save,
    Load,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    SignIn(AuthProvider),
    SignInWithEmail { email: String, password: String },
    SignUp {
        email: String,
        password: String,
        display_name: Option<String>,
    },
    SignOut,
}

/// Render the signed-out view.
pub fn render_auth_view(ctx: &Context, state: &mut UiState) -> Option<UiAction> {
    let mut action = None;
    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(theme::CANVAS_BG))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space((ui.available_height() * 0.2).max(24.0));
                panel_frame().show(ui, |ui| {
                    ui.set_width(320.0);
                    ui.vertical_centered(|ui| {
                        let title = RichText::new("Moodboard").size(24.0).strong();
                        ui.label(title.color(theme::TEXT));
                        let subtitle = RichText::new("Sign in to open your board");
                        ui.label(subtitle.color(theme::TEXT_MUTED));
                    });
                    ui.add_space(12.0);

                    for provider in AuthProvider::federated() {
                        let label = format!("Continue with {}", provider.display_name());
                        if ToggleButton::new(&label, false).min_width(320.0).show(ui) {
                            action = Some(UiAction::SignIn(*provider));
                        }
                        ui.add_space(4.0);
                    }

                    ui.add_space(8.0);
                    separator(ui);
                    if let Some(email_action) = render_email_form(ui, &mut state.auth) {
                        action = Some(email_action);
                    }

                    if let Some(error) = &state.auth.error {
                        ui.add_space(6.0);
                        error_label(ui, error);
                    }
                });
            });
        });
    action
}

fn render_email_form(ui: &mut Ui, form: &mut AuthForm) -> Option<UiAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ToggleButton::new("Sign in", form.mode == AuthMode::SignIn).min_width(80.0).show(ui) {
            form.mode = AuthMode::SignIn;
            form.error = None;
        }
        if ToggleButton::new("Sign up", form.mode == AuthMode::SignUp).min_width(80.0).show(ui) {
            form.mode = AuthMode::SignUp;
            form.error = None;
        }
    });
    ui.add_space(6.0);

    if form.mode == AuthMode::SignUp {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut form.first_name)
                    .hint_text("First name")
                    .desired_width(150.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut form.last_name)
                    .hint_text("Last name")
                    .desired_width(150.0),
            );
        });
    }
    ui.add(
        egui::TextEdit::singleline(&mut form.email)
            .hint_text("Email")
            .desired_width(f32::INFINITY),
    );
    let password = ui.add(
        egui::TextEdit::singleline(&mut form.password)
            .password(true)
            .hint_text("Password")
            .desired_width(f32::INFINITY),
    );
    if form.mode == AuthMode::SignUp {
        ui.label(
            RichText::new(format!("At least {} characters", MIN_PASSWORD_LEN))
                .size(10.0)
                .color(theme::TEXT_MUTED),
        );
    }
    ui.add_space(6.0);

    let submitted = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    let label = match form.mode {
        AuthMode::SignIn => "Sign in with email",
        AuthMode::SignUp => "Create account",
    };
    if ToggleButton::new(label, true).min_width(320.0).show(ui) || submitted {
        action = Some(match form.mode {
            AuthMode::SignIn => UiAction::SignInWithEmail {
                email: form.email.clone(),
                password: form.password.clone(),
            },
            AuthMode::SignUp => UiAction::SignUp {
                email: form.email.clone(),
                password: form.password.clone(),
                display_name: form.display_name(),
            },
        });
    }
    action
}

/// Render the board's side panel.
pub fn render_side_panel(
    ctx: &Context,
    state: &mut UiState,
    panel: &PanelContext,
) -> Option<UiAction> {
    let mut action = None;
    egui::SidePanel::left("board_panel")
        .exact_width(SIDE_PANEL_WIDTH)
        .resizable(false)
        .frame(egui::Frame::new().fill(theme::PANEL_BG).inner_margin(egui::Margin::same(12)))
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.spacing_mut().item_spacing = Vec2::new(4.0, 4.0);

                action = action.take().or(render_add_section(ui));
                separator(ui);
                action = action.take().or(render_templates(ui));
                separator(ui);
                action = action.take().or(render_selection(ui, panel));
                separator(ui);
                action = action.take().or(render_board_section(ui, state, panel));
                separator(ui);
                action = action.take().or(render_account(ui, state, panel));
            });
        });
    action
}

fn render_add_section(ui: &mut Ui) -> Option<UiAction> {
    let mut action = None;
    section_label(ui, "ADD  (click, or drag onto the board)");
    ui.horizontal(|ui| {
        for kind in [ItemKind::Text, ItemKind::Image] {
            let label = match kind {
                ItemKind::Text => "Text",
                ItemKind::Image => "Image",
            };
            let response = ui
                .add(egui::Button::new(label).min_size(Vec2::new(BUTTON_WIDTH, 26.0)))
                .interact(Sense::click_and_drag());
            response.dnd_set_drag_payload(kind);
            if response.clicked() {
                action = Some(UiAction::AddItem(kind));
            }
        }
    });
    if ui.button("Upload image…").clicked() {
        action = Some(UiAction::UploadImage);
    }
    action
}

fn render_templates(ui: &mut Ui) -> Option<UiAction> {
    let mut action = None;
    section_label(ui, "TEMPLATES");
    ui.horizontal_wrapped(|ui| {
        for template in Template::all() {
            if ToggleButton::new(template.name, false).show(ui) {
                action = Some(UiAction::ApplyTemplate(template.name));
            }
        }
    });
    action
}

fn render_selection(ui: &mut Ui, panel: &PanelContext) -> Option<UiAction> {
    let mut action = None;
    section_label(ui, "SELECTION");
    let Some(item) = &panel.selected else {
        ui.label(RichText::new("Nothing selected").color(theme::TEXT_MUTED));
        return None;
    };

    ui.horizontal(|ui| {
        if ToggleButton::new("Forward", false)
            .enabled(panel.can_forward)
            .min_width(BUTTON_WIDTH)
            .show(ui)
        {
            action = Some(UiAction::Reorder(Direction::Forward));
        }
        if ToggleButton::new("Backward", false)
            .enabled(panel.can_backward)
            .min_width(BUTTON_WIDTH)
            .show(ui)
        {
            action = Some(UiAction::Reorder(Direction::Backward));
        }
    });
    ui.horizontal(|ui| {
        let edit = ToggleButton::new("Edit text", false).min_width(BUTTON_WIDTH);
        if item.is_text() && edit.show(ui) {
            action = Some(UiAction::EditText(item.id.clone()));
        }
        if ToggleButton::new("Delete", false)
            .hint(ShortcutRegistry::label_for("Delete selected item"))
            .min_width(BUTTON_WIDTH)
            .show(ui)
        {
            action = Some(UiAction::DeleteSelected);
        }
    });

    if let Some(style) = item.style.as_ref().filter(|_| item.is_text()) {
        ui.add_space(6.0);
        if let Some(style) = render_style_editor(ui, style) {
            action = Some(UiAction::SetStyle(item.id.clone(), style));
        }
    }
    action
}

/// Color, size and family controls. Returns the edited style on change.
fn render_style_editor(ui: &mut Ui, style: &TextStyle) -> Option<TextStyle> {
    let mut edited = style.clone();

    section_label(ui, "COLOR");
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = Vec2::new(4.0, 4.0);
        for (name, css) in TEXT_COLORS {
            let selected = edited.color.eq_ignore_ascii_case(css);
            if color_swatch(ui, parse_css_color(css), name, selected).0 {
                edited.color = css.to_string();
            }
        }
    });

    section_label(ui, "SIZE");
    egui::ComboBox::from_id_salt("font_size")
        .selected_text(format!("{} px", edited.font_size.points()))
        .show_ui(ui, |ui| {
            for size in FontSize::all() {
                ui.selectable_value(&mut edited.font_size, *size, format!("{} px", size.points()));
            }
        });

    section_label(ui, "FONT");
    egui::ComboBox::from_id_salt("font_family")
        .selected_text(edited.font_family.display_name())
        .show_ui(ui, |ui| {
            for family in FontFamily::all() {
                ui.selectable_value(&mut edited.font_family, *family, family.display_name());
            }
        });

    (edited != *style).then_some(edited)
}

/// Panel button whose hover text is the shortcut for `command`.
fn board_button<'a>(label: &'a str, command: &str) -> ToggleButton<'a> {
    ToggleButton::new(label, false)
        .hint(ShortcutRegistry::label_for(command))
        .min_width(BUTTON_WIDTH)
}

fn render_board_section(
    ui: &mut Ui,
    state: &mut UiState,
    panel: &PanelContext,
) -> Option<UiAction> {
    let mut action = None;
    section_label(ui, &format!("BOARD  ({} items)", panel.item_count));

    ui.horizontal(|ui| {
        if board_button("Undo", "Undo").enabled(panel.can_undo).show(ui) {
            action = Some(UiAction::Undo);
        }
        if board_button("Redo", "Redo").enabled(panel.can_redo).show(ui) {
            action = Some(UiAction::Redo);
        }
    });
    ui.horizontal(|ui| {
        if board_button("Save", "Save board").show(ui) {
            action = Some(UiAction::Save);
        }
        if board_button("Load", "Load saved board").show(ui) {
            action = Some(UiAction::Load);
        }
    });
    match &state.status {
        Some(Status::Info(message)) => {
            ui.label(RichText::new(message).size(11.0).color(theme::TEXT_MUTED));
        }
        Some(Status::Error(message)) => error_label(ui, message),
        None => {}
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        if ui.small_button("−").on_hover_text("Zoom out").clicked() {
            action = Some(UiAction::ZoomOut);
        }
        if ui
            .small_button(format!("{}%", panel.zoom_percentage))
            .on_hover_text("Reset zoom")
            .clicked()
        {
            action = Some(UiAction::ZoomReset);
        }
        if ui.small_button("+").on_hover_text("Zoom in").clicked() {
            action = Some(UiAction::ZoomIn);
        }
    });
    action
}

fn render_account(ui: &mut Ui, state: &mut UiState, panel: &PanelContext) -> Option<UiAction> {
    let mut action = None;
    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        ui.label(RichText::new(&panel.user_label).color(theme::TEXT));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.small_button("Sign out").clicked() {
                action = Some(UiAction::SignOut);
            }
        });
    });

    ui.add_space(6.0);
    ui.checkbox(&mut state.show_shortcuts, "Keyboard shortcuts");
    if state.show_shortcuts {
        egui::Grid::new("shortcuts").num_columns(2).show(ui, |ui| {
            for shortcut in ShortcutRegistry::all() {
                ui.label(RichText::new(shortcut.format()).monospace().size(10.0));
                ui.label(RichText::new(shortcut.description).size(10.0).color(theme::TEXT_MUTED));
                ui.end_row();
            }
        });
    }
    action
}
