//! End-to-end round-trip scenarios through the orchestrator.
//!
//! These tests drive the real pipeline, pandoc included, and skip cleanly on
//! machines without pandoc installed. Everything that does not need the
//! external converter lives in the unit tests next to each module.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use weft::{rewrite_pandoc_ast, StyleLookup, STYLE_ATTR};
use zip::write::SimpleFileOptions;

fn pandoc_available() -> bool {
    std::process::Command::new("pandoc")
        .arg("--version")
        .output()
        .is_ok()
}

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="IntenseQuote"><w:name w:val="Intense Quote"/></w:style>
  <w:style w:type="character" w:styleId="BookTitle"><w:name w:val="Book Title"/></w:style>
  <w:style w:type="table" w:styleId="GridTable5"><w:name w:val="Grid Table 5"/></w:style>
</w:styles>"#;

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:pStyle w:val="Heading2"/></w:pPr>
      <w:r><w:t>Quarterly Report</w:t></w:r>
    </w:p>
    <w:p>
      <w:pPr><w:pStyle w:val="IntenseQuote"/></w:pPr>
      <w:r><w:t>Numbers went up.</w:t></w:r>
    </w:p>
    <w:p>
      <w:r><w:t>See </w:t></w:r>
      <w:r><w:rPr><w:rStyle w:val="BookTitle"/></w:rPr><w:t>Moby-Dick</w:t></w:r>
      <w:r><w:t> for details.</w:t></w:r>
    </w:p>
    <w:tbl>
      <w:tblPr><w:tblStyle w:val="GridTable5"/></w:tblPr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>alpha</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>beta</w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>1</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>2</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
  </w:body>
</w:document>"#;

fn write_fixture_docx(path: &Path) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in [
        ("word/document.xml", DOCUMENT_XML),
        ("word/styles.xml", STYLES_XML),
    ] {
        writer
            .start_file(name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn workspace() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("source.docx");
    write_fixture_docx(&fixture);
    (dir, fixture)
}

#[test]
fn scenario_a_heading_round_trips_with_its_style_name() {
    if !pandoc_available() {
        eprintln!("pandoc not installed; skipping");
        return;
    }
    let (dir, fixture) = workspace();
    let artifact = dir.path().join("out.md");
    let media = dir.path().join("media");

    weft::to_markdown(&fixture, &artifact, &media).unwrap();
    let text = fs::read_to_string(&artifact).unwrap();
    assert!(text.contains("Heading_2: Heading 2"), "header table missing:\n{text}");
    assert!(text.contains("## Quarterly Report"), "no level-2 heading:\n{text}");

    let rebuilt = dir.path().join("rebuilt.docx");
    weft::to_docx(&artifact, &rebuilt, None).unwrap();
    let document = weft::Document::open(&rebuilt).unwrap();
    let heading = document
        .paragraphs()
        .find(|p| p.text() == "Quarterly Report")
        .expect("heading paragraph survives the round trip");
    assert_eq!(
        heading.style.as_ref().map(|s| s.name.as_str()),
        Some("Heading 2")
    );
}

#[test]
fn scenario_b_table_style_identity_travels_both_ways() {
    if !pandoc_available() {
        eprintln!("pandoc not installed; skipping");
        return;
    }
    let (dir, fixture) = workspace();
    let artifact = dir.path().join("out.md");

    weft::to_markdown(&fixture, &artifact, &dir.path().join("media")).unwrap();
    let text = fs::read_to_string(&artifact).unwrap();
    assert!(text.contains("Grid_Table_5: Grid Table 5"), "header table missing:\n{text}");
    // The table's identity rides on a fenced wrapper, since pipe tables
    // cannot carry attributes themselves.
    assert!(
        text.contains(r#"custom-style="Grid Table 5""#),
        "table style identity missing from artifact:\n{text}"
    );
    assert!(text.contains("alpha"), "table content missing:\n{text}");

    // On the way back the identity must land on the table element of the
    // tree handed to the document writer.
    let (entries, body) = weft::header::split_artifact(&text);
    let pandoc = weft::pandoc::Pandoc::locate().unwrap();
    let ast_json = pandoc
        .convert_text(
            "Markdown->JSON",
            [
                "--from=markdown+bracketed_spans+fenced_divs+pipe_tables+header_attributes",
                "--to=json",
            ],
            body.as_bytes(),
        )
        .unwrap();
    let mut ast: serde_json::Value = serde_json::from_str(&ast_json).unwrap();
    rewrite_pandoc_ast(&mut ast, &StyleLookup::from_entries(entries));
    weft::rewrite::unwrap_styled_tables(&mut ast);
    let tables: Vec<&serde_json::Value> = ast["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|block| block["t"] == "Table")
        .collect();
    assert_eq!(tables.len(), 1);
    let kvs = &tables[0]["c"][0][2];
    assert!(
        kvs.as_array()
            .unwrap()
            .iter()
            .any(|pair| pair[0] == STYLE_ATTR && pair[1] == "Grid Table 5"),
        "table lost its style identity: {kvs}"
    );

    // And the full reverse conversion still produces a document with the table.
    let rebuilt = dir.path().join("rebuilt.docx");
    weft::to_docx(&artifact, &rebuilt, None).unwrap();
    let document = weft::Document::open(&rebuilt).unwrap();
    let table = document.tables().next().expect("table survives");
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0].paragraphs[0].text(), "alpha");
}

#[test]
fn scenario_c_malformed_header_still_converts() {
    if !pandoc_available() {
        eprintln!("pandoc not installed; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("broken.md");
    // Opening delimiter with no closing fence: the header codec must shrug
    // and treat the whole file as body.
    fs::write(
        &artifact,
        "---\nstyle_map:\n  Intense_Quote: Intense Quote\n\n## Still a heading\n\nBody text.\n",
    )
    .unwrap();

    let rebuilt = dir.path().join("rebuilt.docx");
    weft::to_docx(&artifact, &rebuilt, None).unwrap();
    let document = weft::Document::open(&rebuilt).unwrap();
    assert!(document
        .paragraphs()
        .any(|p| p.text().contains("Body text.")));
    // No custom style identity could be recovered.
    assert!(!document
        .paragraphs()
        .any(|p| p.style.as_ref().is_some_and(|s| s.name == "Intense Quote")));
}

#[test]
fn custom_paragraph_and_character_styles_reach_the_artifact() {
    if !pandoc_available() {
        eprintln!("pandoc not installed; skipping");
        return;
    }
    let (dir, fixture) = workspace();
    let artifact = dir.path().join("out.md");

    weft::to_markdown(&fixture, &artifact, &dir.path().join("media")).unwrap();
    let text = fs::read_to_string(&artifact).unwrap();
    assert!(text.contains(r#"custom-style="Intense Quote""#), "{text}");
    assert!(text.contains(r#"custom-style="Book Title""#), "{text}");
    assert!(text.contains("Numbers went up."), "{text}");
    assert!(text.contains("Moby-Dick"), "{text}");
}

#[test]
fn images_are_extracted_and_relinked() {
    if !pandoc_available() {
        eprintln!("pandoc not installed; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("illustrated.docx");

    let document = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
            xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <w:body>
    <w:p><w:r><w:drawing><a:blip r:embed="rId4"/></w:drawing></w:r></w:p>
  </w:body>
</w:document>"#;
    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId4" Target="media/image1.png"/>
</Relationships>"#;
    let png: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    let file = fs::File::create(&fixture).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, bytes) in [
        ("word/document.xml", document.as_bytes()),
        ("word/_rels/document.xml.rels", rels.as_bytes()),
        ("word/media/image1.png", png),
    ] {
        writer
            .start_file(name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();

    let artifact = dir.path().join("out.md");
    let media = dir.path().join("media");
    weft::to_markdown(&fixture, &artifact, &media).unwrap();

    let exported: Vec<_> = fs::read_dir(&media).unwrap().collect();
    assert_eq!(exported.len(), 1);
    let exported_name = exported[0].as_ref().unwrap().file_name();
    let exported_name = exported_name.to_string_lossy();
    assert!(exported_name.starts_with("img-") && exported_name.ends_with(".png"));
    assert_eq!(
        fs::read(media.join(exported_name.as_ref())).unwrap(),
        png.to_vec()
    );

    let text = fs::read_to_string(&artifact).unwrap();
    assert!(
        text.contains(&format!("media/{exported_name}")),
        "artifact does not link the exported image:\n{text}"
    );
}

#[test]
fn forward_conversion_is_reproducible_for_the_header() {
    if !pandoc_available() {
        eprintln!("pandoc not installed; skipping");
        return;
    }
    let (dir, fixture) = workspace();
    let first = dir.path().join("one.md");
    let second = dir.path().join("two.md");
    weft::to_markdown(&fixture, &first, &dir.path().join("m1")).unwrap();
    weft::to_markdown(&fixture, &second, &dir.path().join("m2")).unwrap();

    let (header_one, _) = weft::header::split_artifact(&fs::read_to_string(&first).unwrap());
    let (header_two, _) = weft::header::split_artifact(&fs::read_to_string(&second).unwrap());
    assert_eq!(header_one, header_two);
}

#[test]
fn missing_reference_fails_before_any_conversion() {
    if !pandoc_available() {
        eprintln!("pandoc not installed; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("in.md");
    fs::write(&artifact, "plain body\n").unwrap();
    let output = dir.path().join("out.docx");

    let err = weft::to_docx(&artifact, &output, Some(Path::new("no-such-ref.docx"))).unwrap_err();
    assert!(matches!(err, weft::ConvertError::MissingReference(_)));
    assert!(!output.exists(), "no partial output may exist");
}

#[test]
fn failed_conversion_leaves_no_output_file() {
    if !pandoc_available() {
        eprintln!("pandoc not installed; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let not_a_docx = dir.path().join("garbage.docx");
    fs::write(&not_a_docx, b"this is not a zip archive").unwrap();
    let output = dir.path().join("out.md");

    let err = weft::to_markdown(&not_a_docx, &output, &dir.path().join("media")).unwrap_err();
    assert!(matches!(err, weft::ConvertError::Docx(_)));
    assert!(!output.exists(), "no partial output may exist");
}
