//! Style sheet parsing (word/styles.xml)
//!
//! The style sheet maps the style ids referenced from document.xml
//! (`w:pStyle`, `w:rStyle`, `w:tblStyle`) to a kind and a display name.

use crate::error::DocxError;
use std::collections::HashMap;

/// WordprocessingML main namespace
pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// The kind of a style, as declared by `w:style/@w:type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
}

/// A named style declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub kind: StyleKind,
    pub name: String,
}

impl Style {
    pub fn new(kind: StyleKind, name: impl Into<String>) -> Style {
        Style {
            kind,
            name: name.into(),
        }
    }
}

/// Every paragraph/character/table style declared in the package, keyed by
/// style id. Styles of other kinds (numbering, ...) are not retained.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    by_id: HashMap<String, Style>,
}

impl StyleSheet {
    /// Parse word/styles.xml
    pub(crate) fn parse(xml: &str) -> Result<StyleSheet, DocxError> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut by_id = HashMap::new();

        for node in doc.root_element().children() {
            if node.tag_name().name() != "style" || node.tag_name().namespace() != Some(WML_NS) {
                continue;
            }
            let kind = match node.attribute((WML_NS, "type")) {
                Some("paragraph") => StyleKind::Paragraph,
                Some("character") => StyleKind::Character,
                Some("table") => StyleKind::Table,
                _ => continue,
            };
            let Some(style_id) = node.attribute((WML_NS, "styleId")) else {
                continue;
            };
            let raw_name = node
                .children()
                .find(|n| n.tag_name().name() == "name" && n.tag_name().namespace() == Some(WML_NS))
                .and_then(|n| n.attribute((WML_NS, "val")))
                .unwrap_or(style_id);

            by_id.insert(style_id.to_string(), Style::new(kind, ui_name(raw_name)));
        }

        Ok(StyleSheet { by_id })
    }

    /// Look a style id up; unknown ids are simply not resolvable.
    pub fn resolve(&self, style_id: &str) -> Option<&Style> {
        self.by_id.get(style_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Word stores built-in heading styles under lowercase internal names
/// ("heading 2") while every UI surface shows the capitalized form. Report
/// the UI name so style-name matching sees what authors see.
fn ui_name(raw: &str) -> String {
    for level in 1..=9u8 {
        if raw == format!("heading {level}") {
            return format!("Heading {level}");
        }
    }
    raw.to_string()
}
