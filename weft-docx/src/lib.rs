//! Read-only DOCX document model
//!
//! This crate opens a WordprocessingML package (a ZIP container) and exposes
//! the parts of it that style-aware conversion needs: paragraphs, the runs
//! inside them, tables, embedded images, and above all the style
//! each of those carries, resolved to its kind and human-readable name.
//!
//! The API is deliberately shaped like python-docx: `Document::open`, then
//! iterate `paragraphs()` / `tables()` or walk `body` in document order.
//! Style references that do not resolve against the package's style sheet
//! come back as `None` rather than an error; some producers emit runs without
//! resolvable style parts and a reader must shrug that off.
//!
//! Out of scope: writing DOCX, layout, numbering, headers/footers, and style
//! *definitions* (fonts, colors, indentation). Only style identity is read.

pub mod document;
pub mod error;
pub mod styles;

pub use document::{BodyItem, Cell, Document, Image, Paragraph, Run, Table};
pub use error::DocxError;
pub use styles::{Style, StyleKind, StyleSheet};
