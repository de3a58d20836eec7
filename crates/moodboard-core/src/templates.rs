//! Preset cards offered by the side panel.

use crate::image::PLACEHOLDER_IMAGE_URI;
use crate::item::{FontFamily, FontSize, Item, ItemKind, ItemPatch, TextStyle};
use kurbo::Size;

/// Text style carried by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateStyle {
    pub color: &'static str,
    pub font_size: FontSize,
    pub font_family: FontFamily,
}

impl TemplateStyle {
    pub fn to_text_style(&self) -> TextStyle {
        TextStyle {
            color: self.color.to_string(),
            font_size: self.font_size,
            font_family: self.font_family,
        }
    }
}

/// A named preset: content, size and (for text) style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    pub name: &'static str,
    pub kind: ItemKind,
    pub content: &'static str,
    pub size: Size,
    pub style: Option<TemplateStyle>,
}

const TEMPLATES: &[Template] = &[
    Template {
        name: "Heading",
        kind: ItemKind::Text,
        content: "Heading",
        size: Size::new(400.0, 80.0),
        style: Some(TemplateStyle {
            color: "#111827",
            font_size: FontSize::Display,
            font_family: FontFamily::Serif,
        }),
    },
    Template {
        name: "Quote",
        kind: ItemKind::Text,
        content: "\u{201c}Design is intelligence made visible.\u{201d}",
        size: Size::new(300.0, 120.0),
        style: Some(TemplateStyle {
            color: "#4b5563",
            font_size: FontSize::ExtraLarge,
            font_family: FontFamily::Cursive,
        }),
    },
    Template {
        name: "Caption",
        kind: ItemKind::Text,
        content: "Caption",
        size: Size::new(200.0, 50.0),
        style: Some(TemplateStyle {
            color: "#6b7280",
            font_size: FontSize::Small,
            font_family: FontFamily::SansSerif,
        }),
    },
    Template {
        name: "Sticky Note",
        kind: ItemKind::Text,
        content: "Note",
        size: Size::new(160.0, 160.0),
        style: Some(TemplateStyle {
            color: "#92400e",
            font_size: FontSize::Large,
            font_family: FontFamily::Cursive,
        }),
    },
    Template {
        name: "Photo Frame",
        kind: ItemKind::Image,
        content: PLACEHOLDER_IMAGE_URI,
        size: Size::new(300.0, 200.0),
        style: None,
    },
];

impl Template {
    /// Get all built-in templates.
    pub fn all() -> &'static [Template] {
        TEMPLATES
    }

    pub fn by_name(name: &str) -> Option<&'static Template> {
        TEMPLATES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Build a new item from this template at rank `layer`.
    pub fn instantiate(&self, layer: usize) -> Item {
        let mut item = Item::new(self.kind, layer);
        item.content = self.content.to_string();
        item.size = self.size;
        if let Some(style) = &self.style {
            item.style = Some(style.to_text_style());
        }
        item
    }

    /// Patch that restyles an existing item of the same kind with this template.
    pub fn as_patch(&self) -> ItemPatch {
        let patch = match &self.style {
            Some(style) => ItemPatch::style(&style.to_text_style()),
            None => ItemPatch::default(),
        };
        patch.with_content(self.content).with_size(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_templates_carry_style() {
        for template in Template::all() {
            let is_text = template.kind == ItemKind::Text;
            assert_eq!(is_text, template.style.is_some(), "{}", template.name);
        }
    }

    #[test]
    fn test_instantiate() {
        let template = Template::by_name("heading").unwrap();
        let item = template.instantiate(2);
        assert_eq!(item.content, "Heading");
        assert_eq!(item.size, Size::new(400.0, 80.0));
        assert_eq!(item.layer, 2);
        assert_eq!(item.style.unwrap().font_size, FontSize::Display);
    }

    #[test]
    fn test_template_sizes_respect_floor() {
        for template in Template::all() {
            assert!(template.size.width >= crate::config::MIN_ITEM_SIZE);
            assert!(template.size.height >= crate::config::MIN_ITEM_SIZE);
        }
    }
}
