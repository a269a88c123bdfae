//! The document body model (word/document.xml)
//!
//! Parsing resolves style references eagerly, so the model is self-contained
//! once `Document::open` returns: no style sheet or ZIP handle needs to stay
//! alive. Body items keep their document order, which matters to consumers
//! that scan styles "first occurrence wins".

use crate::error::DocxError;
use crate::styles::{Style, StyleKind, StyleSheet, WML_NS};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// An image embedded in a run, read out of the package's media parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Lowercased file extension of the media part ("png", "jpeg", ...)
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// A run of text inside a paragraph, with its character-level dressing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub style: Option<Style>,
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub image: Option<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub style: Option<Style>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub style: Option<Style>,
    pub rows: Vec<Vec<Cell>>,
}

/// One top-level element of the document body, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    Paragraph(Paragraph),
    Table(Table),
}

/// A parsed, read-only document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub body: Vec<BodyItem>,
}

impl Document {
    /// Open and parse a DOCX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Document, DocxError> {
        let file = File::open(path)?;
        Document::from_reader(BufReader::new(file))
    }

    /// Parse a DOCX package from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Document, DocxError> {
        let mut archive = zip::ZipArchive::new(reader)?;

        let document_xml = read_part(&mut archive, "word/document.xml")?
            .ok_or_else(|| DocxError::MissingPart("word/document.xml".to_string()))?;
        let styles = match read_part(&mut archive, "word/styles.xml")? {
            Some(xml) => StyleSheet::parse(&xml)?,
            None => StyleSheet::default(),
        };
        let relationships = match read_part(&mut archive, "word/_rels/document.xml.rels")? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let xml = roxmltree::Document::parse(&document_xml)?;
        let body = xml
            .root_element()
            .children()
            .find(|n| is_wml(*n, "body"))
            .ok_or_else(|| DocxError::MissingPart("w:body".to_string()))?;

        let mut items = Vec::new();
        for node in body.children() {
            if is_wml(node, "p") {
                items.push(BodyItem::Paragraph(parse_paragraph(
                    node,
                    &styles,
                    &relationships,
                    &mut archive,
                )?));
            } else if is_wml(node, "tbl") {
                items.push(BodyItem::Table(parse_table(
                    node,
                    &styles,
                    &relationships,
                    &mut archive,
                )?));
            }
        }

        Ok(Document { body: items })
    }

    /// Top-level paragraphs, in document order (table cells not included).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Paragraph(paragraph) => Some(paragraph),
            BodyItem::Table(_) => None,
        })
    }

    /// Top-level tables, in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Table(table) => Some(table),
            BodyItem::Paragraph(_) => None,
        })
    }
}

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

fn wml_val<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

/// `w:b` / `w:i` toggles: present means on unless an explicit off value.
fn flag_on(properties: roxmltree::Node, name: &str) -> bool {
    match wml(properties, name) {
        Some(node) => !matches!(node.attribute((WML_NS, "val")), Some("0") | Some("false")),
        None => false,
    }
}

/// Resolve a style reference, keeping it only when the declared kind matches
/// the referencing element. Unknown ids and kind mismatches yield `None`.
fn resolve_style(styles: &StyleSheet, style_id: Option<&str>, kind: StyleKind) -> Option<Style> {
    let style = styles.resolve(style_id?)?;
    (style.kind == kind).then(|| style.clone())
}

fn parse_paragraph<R: Read + Seek>(
    node: roxmltree::Node,
    styles: &StyleSheet,
    relationships: &HashMap<String, String>,
    archive: &mut zip::ZipArchive<R>,
) -> Result<Paragraph, DocxError> {
    let style = wml(node, "pPr")
        .and_then(|ppr| resolve_style(styles, wml_val(ppr, "pStyle"), StyleKind::Paragraph));

    let mut runs = Vec::new();
    for child in node.children() {
        if is_wml(child, "r") {
            runs.push(parse_run(child, styles, relationships, archive)?);
        } else if is_wml(child, "hyperlink") {
            // Hyperlink targets are not modeled; their runs still carry text.
            for run_node in child.children().filter(|n| is_wml(*n, "r")) {
                runs.push(parse_run(run_node, styles, relationships, archive)?);
            }
        }
    }

    Ok(Paragraph { style, runs })
}

fn parse_run<R: Read + Seek>(
    node: roxmltree::Node,
    styles: &StyleSheet,
    relationships: &HashMap<String, String>,
    archive: &mut zip::ZipArchive<R>,
) -> Result<Run, DocxError> {
    let properties = wml(node, "rPr");
    let style = properties
        .and_then(|rpr| resolve_style(styles, wml_val(rpr, "rStyle"), StyleKind::Character));
    let bold = properties.map(|rpr| flag_on(rpr, "b")).unwrap_or(false);
    let italic = properties.map(|rpr| flag_on(rpr, "i")).unwrap_or(false);

    let text = node
        .descendants()
        .filter(|n| is_wml(*n, "t"))
        .filter_map(|n| n.text())
        .collect::<String>();

    let image = parse_run_image(node, relationships, archive)?;

    Ok(Run {
        style,
        text,
        bold,
        italic,
        image,
    })
}

/// Find a `a:blip` embed inside a run's drawing and pull the media bytes.
/// Unresolvable references are skipped, not errors.
fn parse_run_image<R: Read + Seek>(
    node: roxmltree::Node,
    relationships: &HashMap<String, String>,
    archive: &mut zip::ZipArchive<R>,
) -> Result<Option<Image>, DocxError> {
    let Some(blip) = node
        .descendants()
        .find(|n| n.tag_name().name() == "blip" && n.tag_name().namespace() == Some(DRAWING_NS))
    else {
        return Ok(None);
    };
    let Some(target) = blip
        .attribute((REL_NS, "embed"))
        .and_then(|rel_id| relationships.get(rel_id))
    else {
        return Ok(None);
    };

    let part = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("word/{target}")
    };
    let Some(bytes) = read_part_bytes(archive, &part)? else {
        return Ok(None);
    };

    let extension = Path::new(&part)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png")
        .to_ascii_lowercase();

    Ok(Some(Image { extension, bytes }))
}

fn parse_table<R: Read + Seek>(
    node: roxmltree::Node,
    styles: &StyleSheet,
    relationships: &HashMap<String, String>,
    archive: &mut zip::ZipArchive<R>,
) -> Result<Table, DocxError> {
    let style = wml(node, "tblPr")
        .and_then(|tbl_pr| resolve_style(styles, wml_val(tbl_pr, "tblStyle"), StyleKind::Table));

    let mut rows = Vec::new();
    for row_node in node.children().filter(|n| is_wml(*n, "tr")) {
        let mut cells = Vec::new();
        for cell_node in row_node.children().filter(|n| is_wml(*n, "tc")) {
            let mut paragraphs = Vec::new();
            for p_node in cell_node.children().filter(|n| is_wml(*n, "p")) {
                paragraphs.push(parse_paragraph(p_node, styles, relationships, archive)?);
            }
            cells.push(Cell { paragraphs });
        }
        rows.push(cells);
    }

    Ok(Table { style, rows })
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, DocxError> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut map = HashMap::new();
    for node in doc.root_element().children() {
        if node.tag_name().name() != "Relationship" {
            continue;
        }
        if let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) {
            map.insert(id.to_string(), target.to_string());
        }
    }
    Ok(map)
}

fn read_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, DocxError> {
    match read_part_bytes(archive, name)? {
        Some(bytes) => Ok(Some(
            String::from_utf8(bytes).map_err(|_| DocxError::MissingPart(name.to_string()))?,
        )),
        None => Ok(None),
    }
}

fn read_part_bytes<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, DocxError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(DocxError::Zip(err)),
    };
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}
