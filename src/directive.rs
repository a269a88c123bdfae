//! Converter directives: how registered styles land on tree elements
//!
//! The HTML producer knows nothing about styles; it asks the directive set
//! which tag and token class a style name maps to. Directives are matched by
//! exact style name and kind; their order is stable (headings first,
//! ascending) but carries no meaning to consumers.

use crate::registry::StyleRegistry;
use crate::token::style_token;
use weft_docx::StyleKind;

/// Tag a directive targets in the generic tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTag {
    Heading(u8),
    Paragraph,
    Span,
    Table,
}

/// One mapping rule: a style of a given kind and name becomes a target tag
/// annotated with a token class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDirective {
    pub kind: StyleKind,
    pub style_name: String,
    pub target: TargetTag,
    pub token: String,
}

/// If `name` is one of the six built-in heading styles, its level.
///
/// Kept as a closed comparison so exactly the names "Heading 1" through
/// "Heading 6" match, while "Heading 12" or "My Heading 2" do not.
pub fn heading_level(name: &str) -> Option<u8> {
    match name {
        "Heading 1" => Some(1),
        "Heading 2" => Some(2),
        "Heading 3" => Some(3),
        "Heading 4" => Some(4),
        "Heading 5" => Some(5),
        "Heading 6" => Some(6),
        _ => None,
    }
}

/// The full set of mapping rules for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    directives: Vec<StyleDirective>,
}

impl DirectiveSet {
    /// Build the directive set for a registry.
    ///
    /// Heading directives for levels 1–6 are always emitted, whether or not
    /// the registry observed them, so the reverse direction can always
    /// recognize headings. Registered paragraph styles whose name is itself
    /// a heading name are skipped (already covered); everything else maps to
    /// its generic tag.
    pub fn build(registry: &StyleRegistry) -> DirectiveSet {
        let mut directives = Vec::new();

        for level in 1..=6u8 {
            let name = format!("Heading {level}");
            directives.push(StyleDirective {
                kind: StyleKind::Paragraph,
                token: style_token(&name),
                style_name: name,
                target: TargetTag::Heading(level),
            });
        }

        for (token, name) in registry.paragraph.iter() {
            if heading_level(name).is_some() {
                continue;
            }
            directives.push(StyleDirective {
                kind: StyleKind::Paragraph,
                style_name: name.to_string(),
                target: TargetTag::Paragraph,
                token: token.to_string(),
            });
        }

        for (token, name) in registry.character.iter() {
            directives.push(StyleDirective {
                kind: StyleKind::Character,
                style_name: name.to_string(),
                target: TargetTag::Span,
                token: token.to_string(),
            });
        }

        for (token, name) in registry.table.iter() {
            directives.push(StyleDirective {
                kind: StyleKind::Table,
                style_name: name.to_string(),
                target: TargetTag::Table,
                token: token.to_string(),
            });
        }

        DirectiveSet { directives }
    }

    /// Exact-name lookup for a given kind.
    pub fn for_style(&self, kind: StyleKind, name: &str) -> Option<&StyleDirective> {
        self.directives
            .iter()
            .find(|d| d.kind == kind && d.style_name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleDirective> {
        self.directives.iter()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
