//! Style-preserving round-trips between DOCX and Markdown
//!
//!     Word documents carry style assignments (paragraph, character and table
//!     styles) that plain Markdown has no syntax for. This crate converts in
//!     both directions without losing them: the forward pass records every
//!     style in use, threads a safe token for each through the converter
//!     tree as a generic class, rewrites those classes into explicit
//!     `custom-style` attributes, and keeps the token → name table in a YAML
//!     header at the top of the artifact. The reverse pass reads that header
//!     back and restores the identical style names onto the rebuilt document.
//!
//! Architecture
//!
//!     - token: style name → safe token (deterministic, collision-collapsing)
//!     - registry: which styles the source document actually uses
//!     - directive: how each registered style maps onto a tree element
//!     - html: document body → class-annotated HTML (feeds pandoc)
//!     - rewrite: token classes → `custom-style` attributes on pandoc's AST
//!     - header: the token table as YAML front matter on the artifact
//!     - pandoc: the external converter, located up front, invoked blocking
//!     - pipeline: sequences the above in both directions
//!
//!     Only style *identity* travels; style *definitions* (appearance) come
//!     from a reference document on the way back. Degraded inputs (a missing
//!     or hand-broken header, classes nobody recognizes, runs without
//!     resolvable styles) reduce fidelity, never abort a conversion.

pub mod directive;
pub mod error;
pub mod header;
pub mod html;
pub mod pandoc;
pub mod pipeline;
pub mod registry;
pub mod rewrite;
pub mod token;

pub use directive::{heading_level, DirectiveSet, StyleDirective, TargetTag};
pub use error::ConvertError;
pub use pipeline::{to_docx, to_markdown};
pub use registry::{StyleRegistry, StyleTable};
pub use rewrite::{
    restore_style_identity, rewrite_pandoc_ast, Element, ElementKind, StyleLookup, STYLE_ATTR,
};
pub use token::{style_token, FALLBACK_TOKEN};

pub use weft_docx::{Document, Style, StyleKind};
