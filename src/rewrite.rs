//! Attribute rewriting: token classes → explicit style identity
//!
//! The converter tree (pandoc's JSON AST) only carries generic classes, so
//! the forward mapper tags elements with style tokens. This pass exchanges a
//! recognized token class for a `custom-style` attribute holding the original
//! style name. It runs once while producing Markdown and once while consuming
//! it, so it must be idempotent: an element that already names its style is
//! left untouched, and unknown classes are inert.
//!
//! Two layers:
//! - a pure element model ([`Element`], [`restore_style_identity`]) holding
//!   the actual matching logic, identical across element kinds;
//! - a recursive walker ([`rewrite_pandoc_ast`]) that adapts the attribute
//!   slot of `Header` / `Div` / `Span` / `Table` nodes through that model.
//!   Plain paragraphs carry no attributes in pandoc's tree; a styled
//!   paragraph arrives from the HTML reader wrapped in a `Div`, which is the
//!   generic-block kind here.
//!
//! Markdown cannot attach attributes to a table itself, so styled tables are
//! wrapped in an attribute-bearing generic block on the way out
//! ([`wrap_styled_tables`]) and unwrapped on the way back in
//! ([`unwrap_styled_tables`]). Both halves are no-ops when re-applied.

use serde_json::{json, Value};

/// Attribute that carries explicit style identity through the converters.
pub const STYLE_ATTR: &str = "custom-style";

/// Element kinds the rewrite pass visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Heading,
    Paragraph,
    GenericBlock,
    InlineSpan,
    Table,
}

/// A tree element reduced to what the pass needs: an ordered class list and
/// ordered free-form attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Element {
        Element {
            kind,
            classes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn style_identity(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == STYLE_ATTR)
            .map(|(_, value)| value.as_str())
    }
}

/// Token → original-name lookup supplied as rewrite context.
#[derive(Debug, Clone, Default)]
pub struct StyleLookup {
    entries: Vec<(String, String)>,
}

impl StyleLookup {
    /// Build a lookup from (token, name) pairs; the first name for a token
    /// wins, matching registry semantics.
    pub fn from_entries<I>(entries: I) -> StyleLookup
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut lookup = StyleLookup::default();
        for (token, name) in entries {
            if lookup.get(&token).is_none() {
                lookup.entries.push((token, name));
            }
        }
        lookup
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, name)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The decode pass for one element.
///
/// If the element already carries a style identity it is left exactly as it
/// is. Otherwise the classes are scanned in order; the first one that is a
/// known token sets the identity attribute and that one class is removed,
/// all other classes staying put. No matching class leaves the element
/// untouched; style-unknown is recoverable, not an error.
pub fn restore_style_identity(element: &mut Element, lookup: &StyleLookup) {
    if element.style_identity().is_some() {
        return;
    }

    let mut matched = None;
    for (index, class) in element.classes.iter().enumerate() {
        if let Some(name) = lookup.get(class) {
            matched = Some((index, name.to_string()));
            break;
        }
    }

    if let Some((index, name)) = matched {
        element.attributes.push((STYLE_ATTR.to_string(), name));
        element.classes.remove(index);
    }
}

/// Where a pandoc AST constructor keeps its attribute triple, if anywhere.
fn attr_slot(tag: &str) -> Option<(ElementKind, usize)> {
    match tag {
        "Header" => Some((ElementKind::Heading, 1)),
        "Div" => Some((ElementKind::GenericBlock, 0)),
        "Span" => Some((ElementKind::InlineSpan, 0)),
        "Table" => Some((ElementKind::Table, 0)),
        _ => None,
    }
}

/// Apply the decode pass to every attribute-bearing element of a pandoc JSON
/// AST. Order-independent across element kinds and safe to run any number of
/// times; nodes with unexpected shapes are simply left alone.
pub fn rewrite_pandoc_ast(value: &mut Value, lookup: &StyleLookup) {
    match value {
        Value::Array(items) => {
            for item in items {
                rewrite_pandoc_ast(item, lookup);
            }
        }
        Value::Object(map) => {
            let slot = map
                .get("t")
                .and_then(Value::as_str)
                .and_then(attr_slot);
            if let Some((kind, index)) = slot {
                if let Some(attr) = map
                    .get_mut("c")
                    .and_then(Value::as_array_mut)
                    .and_then(|contents| contents.get_mut(index))
                {
                    rewrite_attr(attr, kind, lookup);
                }
            }
            for (_key, child) in map.iter_mut() {
                rewrite_pandoc_ast(child, lookup);
            }
        }
        _ => {}
    }
}

/// Run one pandoc `Attr` (`[id, [classes], [[key, value]]]`) through the
/// element model, writing back only when something changed.
fn rewrite_attr(attr: &mut Value, kind: ElementKind, lookup: &StyleLookup) {
    let Some(parts) = attr.as_array_mut() else {
        return;
    };
    if parts.len() != 3 {
        return;
    }
    let Some(classes) = string_items(&parts[1]) else {
        return;
    };
    let Some(attributes) = pair_items(&parts[2]) else {
        return;
    };

    let mut element = Element {
        kind,
        classes,
        attributes,
    };
    let before = element.clone();
    restore_style_identity(&mut element, lookup);
    if element == before {
        return;
    }

    parts[1] = Value::Array(element.classes.into_iter().map(Value::String).collect());
    parts[2] = Value::Array(
        element
            .attributes
            .into_iter()
            .map(|(key, value)| json!([key, value]))
            .collect(),
    );
}

/// Wrap every style-carrying table in a generic block holding the identity
/// attribute, so it survives serialization to Markdown. The table's own
/// identity attribute moves onto the wrapper, which keeps the pass from
/// wrapping twice.
pub fn wrap_styled_tables(value: &mut Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                wrap_styled_tables(item);
                if let Some(wrapper) = styled_table_wrapper(item) {
                    *item = wrapper;
                }
            }
        }
        Value::Object(map) => {
            for (_key, child) in map.iter_mut() {
                wrap_styled_tables(child);
            }
        }
        _ => {}
    }
}

fn styled_table_wrapper(item: &mut Value) -> Option<Value> {
    if item.get("t").and_then(Value::as_str) != Some("Table") {
        return None;
    }
    let attr = item.get_mut("c")?.as_array_mut()?.first_mut()?;
    let name = take_style_attr(attr)?;
    Some(json!({
        "t": "Div",
        "c": [["", [], [[STYLE_ATTR, name]]], [item.take()]]
    }))
}

/// Undo [`wrap_styled_tables`]: a generic block that names a style and holds
/// exactly one table dissolves, its identity landing on the table (unless
/// the table already names one).
pub fn unwrap_styled_tables(value: &mut Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                if let Some(table) = styled_table_inside(item) {
                    *item = table;
                }
                unwrap_styled_tables(item);
            }
        }
        Value::Object(map) => {
            for (_key, child) in map.iter_mut() {
                unwrap_styled_tables(child);
            }
        }
        _ => {}
    }
}

fn styled_table_inside(item: &mut Value) -> Option<Value> {
    if item.get("t").and_then(Value::as_str) != Some("Div") {
        return None;
    }
    let contents = item.get_mut("c")?.as_array_mut()?;
    let name = style_attr_value(contents.first()?)?.to_string();
    let blocks = contents.get_mut(1)?.as_array_mut()?;
    if blocks.len() != 1 {
        return None;
    }
    let only = blocks.first_mut()?;
    if only.get("t").and_then(Value::as_str) != Some("Table") {
        return None;
    }

    let attr = only.get_mut("c")?.as_array_mut()?.first_mut()?;
    if style_attr_value(attr).is_none() {
        let pairs = attr.as_array_mut()?.get_mut(2)?.as_array_mut()?;
        pairs.push(json!([STYLE_ATTR, name]));
    }
    Some(only.take())
}

fn style_attr_value(attr: &Value) -> Option<&str> {
    let pairs = attr.as_array()?.get(2)?.as_array()?;
    pairs
        .iter()
        .filter_map(|pair| pair.as_array())
        .find(|pair| pair.first().and_then(Value::as_str) == Some(STYLE_ATTR))
        .and_then(|pair| pair.get(1)?.as_str())
}

fn take_style_attr(attr: &mut Value) -> Option<String> {
    let pairs = attr.as_array_mut()?.get_mut(2)?.as_array_mut()?;
    let index = pairs.iter().position(|pair| {
        pair.as_array()
            .and_then(|kv| kv.first())
            .and_then(Value::as_str)
            == Some(STYLE_ATTR)
    })?;
    let pair = pairs.remove(index);
    pair.as_array()?.get(1)?.as_str().map(str::to_owned)
}

fn string_items(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect()
}

fn pair_items(value: &Value) -> Option<Vec<(String, String)>> {
    value
        .as_array()?
        .iter()
        .map(|pair| {
            let kv = pair.as_array()?;
            if kv.len() != 2 {
                return None;
            }
            Some((kv[0].as_str()?.to_owned(), kv[1].as_str()?.to_owned()))
        })
        .collect()
}
