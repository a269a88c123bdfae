//! Round-trip orchestration
//!
//! Forward: DOCX → registry → directives → HTML → pandoc HTML→JSON →
//! attribute rewrite → pandoc JSON→Markdown → header + body, placed
//! atomically. Reverse: artifact → header split → pandoc Markdown→JSON →
//! attribute rewrite → pandoc JSON→DOCX, placed atomically.
//!
//! Each call owns its working state: a fresh registry, a fresh scoped temp
//! directory, nothing shared. Failures never leave a partial file at the
//! destination: output lands in a temporary location first and is only
//! persisted on success.

use crate::directive::DirectiveSet;
use crate::error::ConvertError;
use crate::header::{encode_header, split_artifact};
use crate::html::document_to_html;
use crate::pandoc::Pandoc;
use crate::registry::StyleRegistry;
use crate::rewrite::{
    rewrite_pandoc_ast, unwrap_styled_tables, wrap_styled_tables, StyleLookup,
};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The Markdown dialect both directions speak: attributes on headings and
/// spans, fenced divs for block-level identity, pipe tables.
const MARKDOWN_DIALECT: &str = "markdown+bracketed_spans+fenced_divs+pipe_tables+header_attributes";

/// Convert a DOCX file to a style-preserving Markdown artifact.
///
/// Embedded images land in `media_dir` under collision-free generated names,
/// referenced relative to the artifact's directory. Returns the output path.
pub fn to_markdown(input: &Path, output: &Path, media_dir: &Path) -> Result<PathBuf, ConvertError> {
    let pandoc = Pandoc::locate()?;
    let document = weft_docx::Document::open(input)?;

    let registry = StyleRegistry::collect(&document);
    let directives = DirectiveSet::build(&registry);
    let merged = registry.merged();

    let out_parent = parent_dir(output);
    fs::create_dir_all(&out_parent)?;
    fs::create_dir_all(media_dir)?;

    let mut sink = |image: &weft_docx::Image| -> std::io::Result<String> {
        let file_name = format!("img-{}.{}", uuid::Uuid::new_v4().simple(), image.extension);
        let target = media_dir.join(file_name);
        fs::write(&target, &image.bytes)?;
        let relative = pathdiff::diff_paths(&target, &out_parent).unwrap_or_else(|| target.clone());
        Ok(posix_path(&relative))
    };
    let html = document_to_html(&document, &directives, &mut sink)?;

    let ast_json = pandoc.convert_text("HTML->JSON", ["--from=html", "--to=json"], html.as_bytes())?;
    let mut ast: serde_json::Value = serde_json::from_str(&ast_json)
        .map_err(|err| ConvertError::Serialization(format!("unexpected pandoc AST: {err}")))?;
    rewrite_pandoc_ast(&mut ast, &StyleLookup::from_entries(merged.iter().cloned()));
    wrap_styled_tables(&mut ast);
    let rewritten = serde_json::to_string(&ast)
        .map_err(|err| ConvertError::Serialization(format!("cannot re-encode pandoc AST: {err}")))?;

    let to_flag = format!("--to={MARKDOWN_DIALECT}");
    let markdown = pandoc.convert_text(
        "JSON->Markdown",
        [
            "--from=json",
            to_flag.as_str(),
            "--wrap=none",
            pandoc.markdown_headings_flag(),
        ],
        rewritten.as_bytes(),
    )?;

    let artifact = format!("{}{}", encode_header(&merged)?, markdown);
    write_atomically(output, artifact.as_bytes())?;
    Ok(output.to_path_buf())
}

/// Convert a Markdown artifact back to DOCX, restoring recorded style
/// identities. `reference` supplies the style *definitions* (appearance);
/// this pipeline only restores style *names*. Returns the output path.
pub fn to_docx(
    input: &Path,
    output: &Path,
    reference: Option<&Path>,
) -> Result<PathBuf, ConvertError> {
    let pandoc = Pandoc::locate()?;
    if let Some(reference) = reference {
        if !reference.exists() {
            return Err(ConvertError::MissingReference(reference.to_path_buf()));
        }
    }

    let text = fs::read_to_string(input)?;
    let (entries, body) = split_artifact(&text);
    let lookup = StyleLookup::from_entries(entries);

    let from_flag = format!("--from={MARKDOWN_DIALECT}");
    let ast_json = pandoc.convert_text(
        "Markdown->JSON",
        [from_flag.as_str(), "--to=json"],
        body.as_bytes(),
    )?;
    let mut ast: serde_json::Value = serde_json::from_str(&ast_json)
        .map_err(|err| ConvertError::Serialization(format!("unexpected pandoc AST: {err}")))?;
    rewrite_pandoc_ast(&mut ast, &lookup);
    unwrap_styled_tables(&mut ast);
    let rewritten = serde_json::to_string(&ast)
        .map_err(|err| ConvertError::Serialization(format!("cannot re-encode pandoc AST: {err}")))?;

    // pandoc writes the binary itself; stage it inside a scoped temp dir so
    // nothing is left behind on failure.
    let workdir = tempfile::tempdir()?;
    let staged = workdir.path().join("output.docx");

    let mut args: Vec<OsString> = vec!["--from=json".into(), "--to=docx".into()];
    if let Some(reference) = reference {
        let mut flag = OsString::from("--reference-doc=");
        flag.push(reference);
        args.push(flag);
    }
    args.push("-o".into());
    args.push(staged.clone().into_os_string());
    pandoc.convert("JSON->DOCX", args, rewritten.as_bytes())?;

    let bytes = fs::read(&staged)?;
    fs::create_dir_all(parent_dir(output))?;
    write_atomically(output, &bytes)?;
    Ok(output.to_path_buf())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Forward-slashed rendition of a relative path, for use in links.
fn posix_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Stage the bytes next to the destination and move them into place, so the
/// destination either keeps its old content or gets the complete new one.
fn write_atomically(output: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let mut staged = tempfile::NamedTempFile::new_in(parent_dir(output))?;
    staged.write_all(bytes)?;
    staged
        .persist(output)
        .map_err(|err| ConvertError::Io(err.error))?;
    Ok(())
}
