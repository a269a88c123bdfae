//! Style registry: the styles a document actually uses
//!
//! Built once per forward conversion by scanning the source document, then
//! carried through the pipeline in two forms: per-kind tables drive the
//! forward mapper, and the flat merged table becomes the rewrite context and
//! the artifact header. The registry is write-once; nothing mutates it after
//! collection.

use crate::token::style_token;
use weft_docx::{BodyItem, Document, Paragraph, StyleKind};

/// An insertion-ordered token → name table with first-wins insertion.
///
/// Two distinct names can normalize to the same token ("Quote!" and
/// "Quote?"); the first one seen keeps the token and later names are merged
/// under it. That loss is accepted and deliberate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTable {
    entries: Vec<(String, String)>,
}

impl StyleTable {
    /// Register a style name under its token unless the token is taken.
    pub fn insert(&mut self, name: &str) {
        let token = style_token(name);
        if !self.contains(&token) {
            self.entries.push((token, name.to_string()));
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.iter().any(|(t, _)| t == token)
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, name)| name.as_str())
    }

    /// (token, name) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(token, name)| (token.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The distinct paragraph, character and table styles in use, one ordered
/// table per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRegistry {
    pub paragraph: StyleTable,
    pub character: StyleTable,
    pub table: StyleTable,
}

impl StyleRegistry {
    /// Scan a document in document order and record every resolvable style.
    ///
    /// The six built-in heading styles are seeded first so heading tokens are
    /// always recognizable on the way back, even when the source document
    /// never instantiated a heading. Elements whose style reference does not
    /// resolve are silently skipped.
    pub fn collect(document: &Document) -> StyleRegistry {
        let mut registry = StyleRegistry::default();
        for level in 1..=6u8 {
            registry.paragraph.insert(&format!("Heading {level}"));
        }

        for item in &document.body {
            match item {
                BodyItem::Paragraph(paragraph) => registry.record_paragraph(paragraph),
                BodyItem::Table(table) => {
                    if let Some(style) = &table.style {
                        if style.kind == StyleKind::Table {
                            registry.table.insert(&style.name);
                        }
                    }
                }
            }
        }

        registry
    }

    fn record_paragraph(&mut self, paragraph: &Paragraph) {
        if let Some(style) = &paragraph.style {
            if style.kind == StyleKind::Paragraph {
                self.paragraph.insert(&style.name);
            }
        }
        for run in &paragraph.runs {
            if let Some(style) = &run.style {
                if style.kind == StyleKind::Character {
                    self.character.insert(&style.name);
                }
            }
        }
    }

    /// Flatten the three kind tables into one token → name table.
    ///
    /// Merge order is fixed (Paragraph, then Character, then Table) and a
    /// token already claimed by an earlier kind wins, so cross-kind token
    /// collisions resolve deterministically.
    pub fn merged(&self) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = Vec::new();
        let tables = [&self.paragraph, &self.character, &self.table];
        for table in tables {
            for (token, name) in table.iter() {
                if !merged.iter().any(|(t, _)| t == token) {
                    merged.push((token.to_string(), name.to_string()));
                }
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_docx::{Run, Style, Table};

    fn styled_paragraph(kind: StyleKind, name: &str) -> Paragraph {
        Paragraph {
            style: Some(Style::new(kind, name)),
            runs: Vec::new(),
        }
    }

    fn doc(body: Vec<BodyItem>) -> Document {
        Document { body }
    }

    #[test]
    fn test_headings_are_always_seeded() {
        let registry = StyleRegistry::collect(&doc(Vec::new()));
        assert_eq!(registry.paragraph.len(), 6);
        assert_eq!(registry.paragraph.get("Heading_1"), Some("Heading 1"));
        assert_eq!(registry.paragraph.get("Heading_6"), Some("Heading 6"));
        assert!(registry.character.is_empty());
        assert!(registry.table.is_empty());
    }

    #[test]
    fn test_collect_walks_paragraphs_runs_tables() {
        let run = Run {
            style: Some(Style::new(StyleKind::Character, "Book Title")),
            text: "x".to_string(),
            ..Run::default()
        };
        let mut quote = styled_paragraph(StyleKind::Paragraph, "Intense Quote");
        quote.runs.push(run);
        let table = Table {
            style: Some(Style::new(StyleKind::Table, "Grid Table 5")),
            rows: Vec::new(),
        };

        let registry = StyleRegistry::collect(&doc(vec![
            BodyItem::Paragraph(quote),
            BodyItem::Table(table),
        ]));

        assert_eq!(registry.paragraph.get("Intense_Quote"), Some("Intense Quote"));
        assert_eq!(registry.character.get("Book_Title"), Some("Book Title"));
        assert_eq!(registry.table.get("Grid_Table_5"), Some("Grid Table 5"));
    }

    #[test]
    fn test_first_name_wins_on_token_collision() {
        let registry = StyleRegistry::collect(&doc(vec![
            BodyItem::Paragraph(styled_paragraph(StyleKind::Paragraph, "Body Text")),
            BodyItem::Paragraph(styled_paragraph(StyleKind::Paragraph, "Body, Text")),
            BodyItem::Paragraph(styled_paragraph(StyleKind::Paragraph, "Body  Text")),
        ]));

        assert_eq!(registry.paragraph.get("Body_Text"), Some("Body Text"));
        // 6 seeded headings + the one surviving entry
        assert_eq!(registry.paragraph.len(), 7);
    }

    #[test]
    fn test_kind_mismatch_is_ignored() {
        // A paragraph whose reference resolved to a character style is as
        // good as unstyled for registry purposes.
        let registry = StyleRegistry::collect(&doc(vec![BodyItem::Paragraph(styled_paragraph(
            StyleKind::Character,
            "Book Title",
        ))]));
        assert_eq!(registry.paragraph.len(), 6);
        assert!(registry.character.is_empty());
    }

    #[test]
    fn test_unstyled_elements_are_skipped() {
        let registry = StyleRegistry::collect(&doc(vec![
            BodyItem::Paragraph(Paragraph::default()),
            BodyItem::Table(Table::default()),
        ]));
        assert_eq!(registry.paragraph.len(), 6);
        assert!(registry.table.is_empty());
    }

    #[test]
    fn test_merged_is_paragraph_then_character_then_table_first_wins() {
        let mut registry = StyleRegistry::default();
        registry.paragraph.insert("Quote");
        registry.character.insert("Emphasis");
        // Cross-kind collision: same token as the paragraph entry.
        registry.character.insert("Quote!");
        registry.table.insert("Grid Table 5");

        let merged = registry.merged();
        assert_eq!(
            merged,
            vec![
                ("Quote".to_string(), "Quote".to_string()),
                ("Emphasis".to_string(), "Emphasis".to_string()),
                ("Grid_Table_5".to_string(), "Grid Table 5".to_string()),
            ]
        );
    }
}
