//! Board items (cards) and their persisted record format.

use crate::image::PLACEHOLDER_IMAGE_URI;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Content shown on a freshly added text card.
pub const DEFAULT_TEXT: &str = "Double click to edit";
/// Size of a freshly added text card.
pub const DEFAULT_TEXT_SIZE: Size = Size::new(200.0, 100.0);
/// Size of a freshly added image card.
pub const DEFAULT_IMAGE_SIZE: Size = Size::new(150.0, 150.0);
/// Default text color.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Opaque item identifier.
///
/// New ids are random UUIDs; ids read back from storage are kept verbatim,
/// whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generate a fresh, collision-free id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a card displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Image,
    Text,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Image => "image",
            ItemKind::Text => "text",
        }
    }
}

/// Font size options for text cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontSize {
    ExtraSmall,
    Small,
    /// 16 units (default).
    #[default]
    Medium,
    Large,
    ExtraLarge,
    Huge,
    Display,
}

impl FontSize {
    /// Size in canvas units.
    pub fn points(&self) -> f64 {
        match self {
            FontSize::ExtraSmall => 12.0,
            FontSize::Small => 14.0,
            FontSize::Medium => 16.0,
            FontSize::Large => 20.0,
            FontSize::ExtraLarge => 24.0,
            FontSize::Huge => 32.0,
            FontSize::Display => 48.0,
        }
    }

    /// Get all available font sizes, smallest first.
    pub fn all() -> &'static [FontSize] {
        &[
            FontSize::ExtraSmall,
            FontSize::Small,
            FontSize::Medium,
            FontSize::Large,
            FontSize::ExtraLarge,
            FontSize::Huge,
            FontSize::Display,
        ]
    }

    /// Exact match on a point size.
    pub fn from_points(points: f64) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.points() == points)
    }

    /// The enumerated size closest to `points`. Non-finite input maps to the default.
    pub fn nearest(points: f64) -> Self {
        if !points.is_finite() {
            return Self::default();
        }
        Self::all()
            .iter()
            .copied()
            .min_by(|a, b| {
                (a.points() - points)
                    .abs()
                    .total_cmp(&(b.points() - points).abs())
            })
            .unwrap_or_default()
    }
}

/// Font family options for text cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    #[default]
    SansSerif,
    Serif,
    Monospace,
    Cursive,
}

impl FontFamily {
    /// CSS generic family name, as persisted.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::SansSerif => "sans-serif",
            FontFamily::Serif => "serif",
            FontFamily::Monospace => "monospace",
            FontFamily::Cursive => "cursive",
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontFamily::SansSerif => "Sans",
            FontFamily::Serif => "Serif",
            FontFamily::Monospace => "Mono",
            FontFamily::Cursive => "Handwritten",
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::SansSerif,
            FontFamily::Serif,
            FontFamily::Monospace,
            FontFamily::Cursive,
        ]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// Styling for text cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextStyle {
    /// CSS color string, usually `#rrggbb`.
    pub color: String,
    pub font_size: FontSize,
    pub font_family: FontFamily,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_TEXT_COLOR.to_string(),
            font_size: FontSize::default(),
            font_family: FontFamily::default(),
        }
    }
}

/// A placeable card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Text for text cards; URI or `data:` URI for image cards.
    pub content: String,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    pub size: Size,
    /// Present on text cards only.
    pub style: Option<TextStyle>,
    /// Paint order rank; higher is on top.
    pub layer: usize,
}

impl Item {
    /// Create an item of `kind` with default content, size and style.
    pub fn new(kind: ItemKind, layer: usize) -> Self {
        let (content, size, style) = match kind {
            ItemKind::Text => (DEFAULT_TEXT, DEFAULT_TEXT_SIZE, Some(TextStyle::default())),
            ItemKind::Image => (PLACEHOLDER_IMAGE_URI, DEFAULT_IMAGE_SIZE, None),
        };
        Self {
            id: ItemId::new(),
            kind,
            content: content.to_string(),
            position: Point::ZERO,
            size,
            style,
            layer,
        }
    }

    /// Axis-aligned bounds in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn is_text(&self) -> bool {
        self.kind == ItemKind::Text
    }

    /// Merge the fields present in `patch`. Style fields are ignored on image cards.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if self.kind == ItemKind::Text && patch.touches_style() {
            let style = self.style.get_or_insert_with(TextStyle::default);
            if let Some(color) = &patch.color {
                style.color = color.clone();
            }
            if let Some(font_size) = patch.font_size {
                style.font_size = font_size;
            }
            if let Some(font_family) = patch.font_family {
                style.font_family = font_family;
            }
        }
    }
}

/// A partial update: only the `Some` fields are merged into the item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub content: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub color: Option<String>,
    pub font_size: Option<FontSize>,
    pub font_family: Option<FontFamily>,
}

impl ItemPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    /// Patch carrying every field of a text style.
    pub fn style(style: &TextStyle) -> Self {
        Self {
            color: Some(style.color.clone()),
            font_size: Some(style.font_size),
            font_family: Some(style.font_family),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn touches_style(&self) -> bool {
        self.color.is_some() || self.font_size.is_some() || self.font_family.is_some()
    }
}

/// Persisted shape of an item.
///
/// Style fields are flat and optional; unknown font sizes and families are
/// coerced to the nearest supported value on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: ItemId,
    kind: ItemKind,
    content: String,
    position: Point,
    size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_family: Option<String>,
    #[serde(default)]
    layer: usize,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let style = match record.kind {
            ItemKind::Text => Some(TextStyle {
                color: record
                    .color
                    .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
                font_size: record.font_size.map(FontSize::nearest).unwrap_or_default(),
                font_family: record
                    .font_family
                    .as_deref()
                    .and_then(FontFamily::from_name)
                    .unwrap_or_default(),
            }),
            ItemKind::Image => None,
        };
        Self {
            id: record.id,
            kind: record.kind,
            content: record.content,
            position: record.position,
            size: record.size,
            style,
            layer: record.layer,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        let (color, font_size, font_family) = match item.style {
            Some(style) if item.kind == ItemKind::Text => (
                Some(style.color),
                Some(style.font_size.points()),
                Some(style.font_family.name().to_string()),
            ),
            _ => (None, None, None),
        };
        Self {
            id: item.id,
            kind: item.kind,
            content: item.content,
            position: item.position,
            size: item.size,
            color,
            font_size,
            font_family,
            layer: item.layer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_text_item_defaults() {
        let item = Item::new(ItemKind::Text, 3);
        assert_eq!(item.content, DEFAULT_TEXT);
        assert_eq!(item.position, Point::ZERO);
        assert_eq!(item.layer, 3);
        assert_eq!(item.style, Some(TextStyle::default()));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Item::new(ItemKind::Image, 0);
        let b = Item::new(ItemKind::Image, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_patch_ignores_style_on_images() {
        let mut item = Item::new(ItemKind::Image, 0);
        item.apply(&ItemPatch {
            color: Some("#ff0000".to_string()),
            ..Default::default()
        });
        assert!(item.style.is_none());
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut item = Item::new(ItemKind::Text, 0);
        item.apply(&ItemPatch {
            font_size: Some(FontSize::Huge),
            ..Default::default()
        });
        let style = item.style.as_ref().unwrap();
        assert_eq!(style.font_size, FontSize::Huge);
        assert_eq!(style.color, DEFAULT_TEXT_COLOR);
        assert_eq!(item.content, DEFAULT_TEXT);
    }

    #[test]
    fn test_record_format() {
        let mut item = Item::new(ItemKind::Text, 1);
        item.id = ItemId::from("abc");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["kind"], "text");
        assert_eq!(json["position"]["x"], 0.0);
        assert_eq!(json["size"]["width"], 200.0);
        assert_eq!(json["fontSize"], 16.0);
        assert_eq!(json["fontFamily"], "sans-serif");
        assert_eq!(json["color"], "#000000");
        assert_eq!(json["layer"], 1);
    }

    #[test]
    fn test_image_record_has_no_style_fields() {
        let item = Item::new(ItemKind::Image, 0);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("color").is_none());
        assert!(json.get("fontSize").is_none());
    }

    #[test]
    fn test_record_coerces_unknown_style() {
        let json = r##"{
            "id": "1700000000000",
            "kind": "text",
            "content": "hi",
            "position": {"x": 10, "y": 20},
            "size": {"width": 100, "height": 60},
            "fontSize": 19,
            "fontFamily": "Comic Sans",
            "layer": 0
        }"##;
        let item: Item = serde_json::from_str(json).unwrap();
        let style = item.style.unwrap();
        assert_eq!(style.font_size, FontSize::Large);
        assert_eq!(style.font_family, FontFamily::SansSerif);
        assert_eq!(style.color, DEFAULT_TEXT_COLOR);
        assert_eq!(item.id.as_str(), "1700000000000");
    }

    #[test]
    fn test_font_size_nearest() {
        assert_eq!(FontSize::nearest(13.0), FontSize::ExtraSmall);
        assert_eq!(FontSize::nearest(100.0), FontSize::Display);
        assert_eq!(FontSize::nearest(f64::NAN), FontSize::Medium);
        assert_eq!(FontSize::from_points(24.0), Some(FontSize::ExtraLarge));
    }
}
