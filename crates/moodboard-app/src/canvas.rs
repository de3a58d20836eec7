//! Board canvas: paints the cards and forwards pointer input to the editor.

use egui::{
    Color32, CornerRadius, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2,
};
use kurbo::Point;
use moodboard_core::editor::resize_handle_rect;
use moodboard_core::image::{decode_data_uri, is_data_uri};
use moodboard_core::{
    DropPayload, Editor, EditorAction, FontFamily, Item, ItemId, ItemKind, Modifiers, MouseButton,
    Storage,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::widgets::{parse_css_color, theme};

/// Inner padding of a card, in canvas units.
const CARD_PADDING: f32 = 8.0;

/// An in-place text edit on a card.
#[derive(Debug, Clone)]
pub struct TextEditSession {
    pub id: ItemId,
    pub buffer: String,
    focus_requested: bool,
}

impl TextEditSession {
    pub fn new(id: ItemId, buffer: String) -> Self {
        Self {
            id,
            buffer,
            focus_requested: false,
        }
    }
}

/// Decoded `data:` image, keyed by the content it came from.
struct CachedImage {
    content: String,
    uri: String,
    bytes: Arc<[u8]>,
}

/// Paints the board and owns per-view caches.
#[derive(Default)]
pub struct CanvasView {
    images: HashMap<ItemId, CachedImage>,
    generation: u64,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the canvas, route input, and return the editor's reactions.
    ///
    /// A finished in-place edit is returned as `(id, text)` for the caller
    /// to commit.
    pub fn show<S: Storage>(
        &mut self,
        ui: &mut Ui,
        editor: &mut Editor<S>,
        editing: &mut Option<TextEditSession>,
    ) -> (Vec<EditorAction>, Option<(ItemId, String)>) {
        let canvas_size = editor.board().config().canvas_size;
        let zoom = editor.viewport().zoom as f32;
        let size = Vec2::new(canvas_size.width as f32, canvas_size.height as f32) * zoom;
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        editor
            .viewport_mut()
            .set_origin(Point::new(rect.min.x as f64, rect.min.y as f64));

        let mut actions = self.forward_input(ui, editor, rect, editing.is_some());

        if response.double_clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            actions.extend(editor.on_double_click(to_point(pos)));
        }
        if let Some(kind) = response.dnd_release_payload::<ItemKind>()
            && let Some(pos) = ui.ctx().pointer_interact_pos()
        {
            let payload = DropPayload::NewItem { kind: *kind };
            actions.extend(editor.drop_payload(payload, to_point(pos)));
        }

        self.paint(ui, editor, rect, editing.as_ref().map(|e| &e.id));
        if response.dnd_hover_payload::<ItemKind>().is_some() {
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(8),
                Stroke::new(2.0, theme::ACCENT),
                StrokeKind::Inside,
            );
        }
        self.update_cursor(ui, editor, &response);
        self.prune_images(editor);

        let committed = self.show_text_edit(ui, editor, editing);
        (actions, committed)
    }

    fn forward_input<S: Storage>(
        &mut self,
        ui: &Ui,
        editor: &mut Editor<S>,
        rect: Rect,
        text_editing: bool,
    ) -> Vec<EditorAction> {
        let events = ui.input(|i| i.events.clone());
        let mut actions = Vec::new();
        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                } => {
                    let Some(button) = to_button(button) else {
                        continue;
                    };
                    let modifiers = to_modifiers(modifiers);
                    if pressed {
                        // Presses inside the text editor belong to it.
                        if rect.contains(pos) && !text_editing {
                            let down = editor.on_pointer_down(to_point(pos), button, modifiers);
                            actions.extend(down);
                        }
                    } else if editor.is_pointer_captured() || rect.contains(pos) {
                        actions.extend(editor.on_pointer_up(to_point(pos), button, modifiers));
                    }
                }
                egui::Event::PointerMoved(pos) if editor.is_pointer_captured() => {
                    let modifiers = to_modifiers(ui.input(|i| i.modifiers));
                    actions.extend(editor.on_pointer_move(to_point(pos), modifiers));
                }
                egui::Event::PointerGone if editor.is_pointer_captured() => {
                    // Window lost the pointer mid-gesture; the release never arrives.
                    let cancel = editor.on_key_down(moodboard_core::Key::Escape, Modifiers::NONE);
                    actions.extend(cancel);
                }
                _ => {}
            }
        }
        actions
    }

    fn paint<S: Storage>(
        &mut self,
        ui: &Ui,
        editor: &Editor<S>,
        rect: Rect,
        editing: Option<&ItemId>,
    ) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, CornerRadius::same(8), Color32::WHITE);
        painter.rect_stroke(
            rect,
            CornerRadius::same(8),
            Stroke::new(2.0, Color32::from_gray(210)),
            StrokeKind::Inside,
        );
        self.paint_grid(&painter, editor, rect);

        let zoom = editor.viewport().zoom;
        for item in editor.board().items_by_layer() {
            let Some(bounds) = editor.live_bounds(&item.id) else {
                continue;
            };
            let card = to_rect(bounds, editor);
            let selected = editor.board().is_selected(&item.id);

            painter.rect_filled(
                card.translate(Vec2::new(0.0, 2.0)),
                CornerRadius::same(6),
                Color32::from_black_alpha(25),
            );
            painter.rect_filled(card, CornerRadius::same(6), Color32::WHITE);

            if editing != Some(&item.id) {
                let content = card.shrink(CARD_PADDING * zoom as f32);
                match item.kind {
                    ItemKind::Image => self.paint_image(ui, item, content),
                    ItemKind::Text => paint_text(&painter, item, content, zoom as f32),
                }
            }

            let outline = if selected {
                Stroke::new(2.0, theme::ACCENT)
            } else {
                Stroke::new(1.0, Color32::from_gray(225))
            };
            painter.rect_stroke(card, CornerRadius::same(6), outline, StrokeKind::Outside);

            if selected {
                let handle = to_rect(resize_handle_rect(bounds, zoom), editor);
                painter.rect_filled(handle, CornerRadius::same(2), theme::ACCENT);
            }
        }
    }

    fn paint_grid<S: Storage>(&self, painter: &egui::Painter, editor: &Editor<S>, rect: Rect) {
        if !editor.is_dragging() {
            return;
        }
        let step = (editor.board().config().grid_size * editor.viewport().zoom) as f32;
        if step < 4.0 {
            return;
        }
        let color = Color32::from_gray(200);
        let mut x = rect.left();
        while x <= rect.right() {
            let mut y = rect.top();
            while y <= rect.bottom() {
                painter.circle_filled(Pos2::new(x, y), 1.0, color);
                y += step;
            }
            x += step;
        }
    }

    fn paint_image(&mut self, ui: &Ui, item: &Item, rect: Rect) {
        let image = if is_data_uri(&item.content) {
            match self.cached_image(item) {
                Some((uri, bytes)) => egui::Image::from_bytes(uri, bytes),
                None => {
                    paint_broken_image(ui.painter(), rect);
                    return;
                }
            }
        } else {
            egui::Image::from_uri(item.content.clone())
        };
        image
            .maintain_aspect_ratio(true)
            .show_loading_spinner(true)
            .paint_at(ui, rect);
    }

    fn cached_image(&mut self, item: &Item) -> Option<(String, Arc<[u8]>)> {
        let stale = self
            .images
            .get(&item.id)
            .is_none_or(|cached| cached.content != item.content);
        if stale {
            let (format, bytes) = match decode_data_uri(&item.content) {
                Ok(decoded) => decoded,
                Err(e) => {
                    log::warn!("Cannot display image {}: {}", item.id, e);
                    self.images.remove(&item.id);
                    return None;
                }
            };
            // A fresh uri per decode so egui never serves the previous texture.
            self.generation += 1;
            let uri = format!(
                "bytes://moodboard/{}-{}.{}",
                item.id,
                self.generation,
                format.extension()
            );
            self.images.insert(
                item.id.clone(),
                CachedImage {
                    content: item.content.clone(),
                    uri,
                    bytes: bytes.into(),
                },
            );
        }
        self.images
            .get(&item.id)
            .map(|cached| (cached.uri.clone(), Arc::clone(&cached.bytes)))
    }

    fn prune_images<S: Storage>(&mut self, editor: &Editor<S>) {
        self.images.retain(|id, _| editor.board().contains(id));
    }

    fn update_cursor<S: Storage>(&self, ui: &Ui, editor: &Editor<S>, response: &egui::Response) {
        if editor.is_resizing() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeNwSe);
            return;
        }
        if editor.is_dragging() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            return;
        }
        let Some(pos) = response.hover_pos() else {
            return;
        };
        let canvas = editor.viewport().screen_to_canvas(to_point(pos));
        if let Some(item) = editor.board().item_at(canvas) {
            let on_handle = editor.board().is_selected(&item.id)
                && resize_handle_rect(item.bounds(), editor.viewport().zoom).contains(canvas);
            ui.ctx().set_cursor_icon(if on_handle {
                CursorIcon::ResizeNwSe
            } else {
                CursorIcon::Grab
            });
        }
    }

    fn show_text_edit<S: Storage>(
        &mut self,
        ui: &mut Ui,
        editor: &Editor<S>,
        editing: &mut Option<TextEditSession>,
    ) -> Option<(ItemId, String)> {
        let session = editing.as_mut()?;
        let Some(item) = editor.board().get(&session.id) else {
            *editing = None;
            return None;
        };
        let Some(bounds) = editor.live_bounds(&item.id) else {
            *editing = None;
            return None;
        };
        let zoom = editor.viewport().zoom as f32;
        let rect = to_rect(bounds, editor).shrink(CARD_PADDING * zoom);
        let font = font_id(item, zoom);
        let color = item
            .style
            .as_ref()
            .map(|style| parse_css_color(&style.color))
            .unwrap_or(Color32::BLACK);

        let response = ui.put(
            rect,
            egui::TextEdit::multiline(&mut session.buffer)
                .font(font)
                .text_color(color)
                .frame(false)
                .desired_width(rect.width()),
        );
        if !session.focus_requested {
            response.request_focus();
            session.focus_requested = true;
            return None;
        }
        if response.lost_focus() {
            let finished = editing.take()?;
            return Some((finished.id, finished.buffer));
        }
        None
    }
}

fn paint_text(painter: &egui::Painter, item: &Item, rect: Rect, zoom: f32) {
    let color = item
        .style
        .as_ref()
        .map(|style| parse_css_color(&style.color))
        .unwrap_or(Color32::BLACK);
    let galley = painter.layout(item.content.clone(), font_id(item, zoom), color, rect.width());
    painter
        .with_clip_rect(rect)
        .galley(rect.min, galley, color);
}

fn paint_broken_image(painter: &egui::Painter, rect: Rect) {
    painter.rect_filled(rect, CornerRadius::same(4), Color32::from_gray(240));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "Image unavailable",
        FontId::proportional(12.0),
        theme::TEXT_MUTED,
    );
}

/// egui font for a text card. Only proportional and monospace faces ship
/// with the default fonts, so serif and cursive fall back to proportional.
fn font_id(item: &Item, zoom: f32) -> FontId {
    let style = item.style.clone().unwrap_or_default();
    let size = style.font_size.points() as f32 * zoom;
    match style.font_family {
        FontFamily::Monospace => FontId::monospace(size),
        FontFamily::SansSerif | FontFamily::Serif | FontFamily::Cursive => {
            FontId::proportional(size)
        }
    }
}

fn to_point(pos: Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

/// Canvas-space rect to screen space.
fn to_rect<S: Storage>(bounds: kurbo::Rect, editor: &Editor<S>) -> Rect {
    let min = editor.viewport().canvas_to_screen(Point::new(bounds.x0, bounds.y0));
    let max = editor.viewport().canvas_to_screen(Point::new(bounds.x1, bounds.y1));
    Rect::from_min_max(
        Pos2::new(min.x as f32, min.y as f32),
        Pos2::new(max.x as f32, max.y as f32),
    )
}

fn to_button(button: egui::PointerButton) -> Option<MouseButton> {
    match button {
        egui::PointerButton::Primary => Some(MouseButton::Left),
        egui::PointerButton::Secondary => Some(MouseButton::Right),
        egui::PointerButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub fn to_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.shift,
        ctrl: modifiers.ctrl,
        alt: modifiers.alt,
        meta: modifiers.mac_cmd,
    }
}
