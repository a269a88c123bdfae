//! DOCX body → class-annotated HTML
//!
//! The HTML handed to pandoc's HTML reader is where style identity first
//! becomes a generic class: each body item is tagged according to the
//! directive set, embedded images are pushed through the caller's sink, and
//! everything else is ordinary semantic HTML. Built as an RcDom tree and
//! serialized with html5ever, which takes care of escaping.

use crate::directive::{DirectiveSet, TargetTag};
use crate::error::ConvertError;
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use weft_docx::{BodyItem, Document, Image, Paragraph, Run, Table};

/// Sink invoked once per embedded image; returns the `src` the HTML should
/// carry (a path relative to the eventual artifact location).
pub type ImageSink<'a> = dyn FnMut(&Image) -> std::io::Result<String> + 'a;

/// Render a document body as HTML, tagging styled elements with their token
/// classes per the directive set.
pub fn document_to_html(
    document: &Document,
    directives: &DirectiveSet,
    images: &mut ImageSink<'_>,
) -> Result<String, ConvertError> {
    let container = create_element("body", vec![]);
    for item in &document.body {
        let node = match item {
            BodyItem::Paragraph(paragraph) => paragraph_node(paragraph, directives, images)?,
            BodyItem::Table(table) => table_node(table, directives, images)?,
        };
        container.children.borrow_mut().push(node);
    }
    serialize_children(&container)
}

fn paragraph_node(
    paragraph: &Paragraph,
    directives: &DirectiveSet,
    images: &mut ImageSink<'_>,
) -> Result<Handle, ConvertError> {
    let directive = paragraph
        .style
        .as_ref()
        .and_then(|style| directives.for_style(style.kind, &style.name));

    let node = match directive.map(|d| (d.target, d.token.as_str())) {
        Some((TargetTag::Heading(level), token)) => {
            create_element(&format!("h{level}"), vec![("class", token)])
        }
        Some((_, token)) => create_element("p", vec![("class", token)]),
        None => create_element("p", vec![]),
    };

    for run in &paragraph.runs {
        append_run(&node, run, directives, images)?;
    }
    Ok(node)
}

fn append_run(
    parent: &Handle,
    run: &Run,
    directives: &DirectiveSet,
    images: &mut ImageSink<'_>,
) -> Result<(), ConvertError> {
    if let Some(image) = &run.image {
        let src = images(image)?;
        let img = create_element("img", vec![("src", &src)]);
        parent.children.borrow_mut().push(img);
    }
    if run.text.is_empty() {
        return Ok(());
    }

    // Innermost out: text, emphasis, strong, then the style-carrying span.
    let mut node = create_text(&run.text);
    if run.italic {
        node = wrap("em", node);
    }
    if run.bold {
        node = wrap("strong", node);
    }
    if let Some(directive) = run
        .style
        .as_ref()
        .and_then(|style| directives.for_style(style.kind, &style.name))
    {
        if directive.target == TargetTag::Span {
            let span = create_element("span", vec![("class", &directive.token)]);
            span.children.borrow_mut().push(node);
            node = span;
        }
    }
    parent.children.borrow_mut().push(node);
    Ok(())
}

fn table_node(
    table: &Table,
    directives: &DirectiveSet,
    images: &mut ImageSink<'_>,
) -> Result<Handle, ConvertError> {
    let directive = table
        .style
        .as_ref()
        .and_then(|style| directives.for_style(style.kind, &style.name));
    let node = match directive {
        Some(directive) => create_element("table", vec![("class", &directive.token)]),
        None => create_element("table", vec![]),
    };

    for row in &table.rows {
        let tr = create_element("tr", vec![]);
        for cell in row {
            let td = create_element("td", vec![]);
            for (index, paragraph) in cell.paragraphs.iter().enumerate() {
                if index > 0 {
                    td.children.borrow_mut().push(create_text(" "));
                }
                for run in &paragraph.runs {
                    append_run(&td, run, directives, images)?;
                }
            }
            tr.children.borrow_mut().push(td);
        }
        node.children.borrow_mut().push(tr);
    }
    Ok(node)
}

fn wrap(tag: &str, child: Handle) -> Handle {
    let node = create_element(tag, vec![]);
    node.children.borrow_mut().push(child);
    node
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize every child of `container`, leaving the container tag out.
fn serialize_children(container: &Handle) -> Result<String, ConvertError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in container.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|err| {
            ConvertError::Serialization(format!("HTML serialization failed: {err}"))
        })?;
        output.push(b'\n');
    }

    String::from_utf8(output)
        .map_err(|err| ConvertError::Serialization(format!("UTF-8 conversion failed: {err}")))
}
