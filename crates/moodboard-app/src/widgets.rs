//! Small styled egui components shared by the panels.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, Frame, Margin, Rect, Sense, Stroke, Ui, vec2,
};

pub mod theme {
    use egui::Color32;

    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    pub const ERROR: Color32 = Color32::from_rgb(220, 38, 38);
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    pub const CANVAS_BG: Color32 = Color32::from_rgb(243, 244, 246);
}

const CORNER_RADIUS: u8 = 4;
const PANEL_RADIUS: u8 = 8;

/// Text colors offered in the style editor.
pub const TEXT_COLORS: &[(&str, &str)] = &[
    ("Black", "#000000"),
    ("Slate", "#475569"),
    ("Red", "#dc2626"),
    ("Orange", "#ea580c"),
    ("Amber", "#d97706"),
    ("Green", "#16a34a"),
    ("Teal", "#0d9488"),
    ("Blue", "#2563eb"),
    ("Violet", "#7c3aed"),
    ("Pink", "#db2777"),
];

/// Standard panel frame with shadow.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(12))
}

/// Small, muted heading above a group of controls.
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(10.0).color(theme::TEXT_MUTED));
}

/// Inline error message.
pub fn error_label(ui: &mut Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(11.0).color(theme::ERROR));
}

/// Draw a horizontal separator line.
pub fn separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let y = rect.top() + 4.0;
    ui.painter().line_segment(
        [egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)],
        Stroke::new(1.0, Color32::from_gray(230)),
    );
    ui.add_space(8.0);
}

/// A toggle button with text label; solid accent background when selected.
pub struct ToggleButton<'a> {
    label: &'a str,
    selected: bool,
    enabled: bool,
    min_width: Option<f32>,
    hint: Option<String>,
}

impl<'a> ToggleButton<'a> {
    pub fn new(label: &'a str, selected: bool) -> Self {
        Self {
            label,
            selected,
            enabled: true,
            min_width: None,
            hint: None,
        }
    }

    /// Hover text, e.g. the keyboard shortcut. Empty hints are not shown.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into()).filter(|hint| !hint.is_empty());
        self
    }

    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = egui::FontId::proportional(12.0);
        let galley =
            ui.painter()
                .layout_no_wrap(self.label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
        let text_width = galley.size().x + 16.0;
        let width = self.min_width.unwrap_or(text_width).max(text_width);
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(vec2(width, 26.0), sense);

        if ui.is_rect_visible(rect) {
            let (bg, fg) = if !self.enabled {
                (Color32::from_gray(248), Color32::from_gray(180))
            } else if self.selected {
                (theme::ACCENT, Color32::WHITE)
            } else if response.hovered() {
                (Color32::from_gray(235), Color32::from_gray(60))
            } else {
                (Color32::from_gray(245), Color32::from_gray(80))
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(CORNER_RADIUS), bg);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, fg);
        }

        let clicked = self.enabled && response.clicked();
        let response = match self.hint {
            Some(hint) => response.on_hover_text(hint),
            None => response,
        };
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}

/// A clickable circular color swatch. Returns (clicked, rect).
pub fn color_swatch(ui: &mut Ui, color: Color32, tooltip: &str, selected: bool) -> (bool, Rect) {
    let (rect, response) = ui.allocate_exact_size(vec2(20.0, 20.0), Sense::click());
    if ui.is_rect_visible(rect) {
        let center = rect.center();
        let radius = rect.width() / 2.0;
        ui.painter().circle_filled(center, radius, color);
        if selected {
            ui.painter()
                .circle_stroke(center, radius - 3.0, Stroke::new(2.0, Color32::WHITE));
            ui.painter()
                .circle_stroke(center, radius, Stroke::new(1.5, theme::ACCENT));
        }
    }
    let clicked = response.clicked();
    response
        .on_hover_text(tooltip)
        .on_hover_cursor(CursorIcon::PointingHand);
    (clicked, rect)
}

/// Parse a `#rrggbb` or `#rgb` CSS color; anything else is mid gray.
pub fn parse_css_color(color: &str) -> Color32 {
    let Some(hex) = color.trim().strip_prefix('#').filter(|hex| hex.is_ascii()) else {
        return Color32::from_rgb(128, 128, 128);
    };
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let rgb = match hex.len() {
        6 => channel(&hex[0..2]).zip(channel(&hex[2..4])).zip(channel(&hex[4..6])),
        3 => channel(&hex[0..1])
            .zip(channel(&hex[1..2]))
            .zip(channel(&hex[2..3]))
            .map(|((r, g), b)| ((r * 17, g * 17), b * 17)),
        _ => None,
    };
    match rgb {
        Some(((r, g), b)) => Color32::from_rgb(r, g, b),
        None => Color32::from_rgb(128, 128, 128),
    }
}

/// Format a color as `#rrggbb`.
pub fn to_css_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
