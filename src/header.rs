//! Artifact header: the style table as YAML front matter
//!
//! The Markdown artifact opens with a `---`-delimited block carrying one
//! `style_map` mapping of token → original style name, then a blank line,
//! then the body. The block is what lets a later reverse conversion recover
//! style identities without the original document. It is meant to be
//! human-editable, and a hand-edited (or hand-broken) file is a first-class
//! input: any malformed or absent header decodes to an empty table, never an
//! error.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    style_map: BTreeMap<String, String>,
}

/// Serialize a merged token table as a front-matter block ready to be
/// prepended to the Markdown body. Keys come out sorted so the header is
/// byte-stable across runs.
pub fn encode_header(entries: &[(String, String)]) -> Result<String, ConvertError> {
    let front = FrontMatter {
        style_map: entries.iter().cloned().collect(),
    };
    let yaml = serde_yaml::to_string(&front)
        .map_err(|err| ConvertError::Serialization(format!("cannot encode header: {err}")))?;
    Ok(format!("---\n{yaml}---\n\n"))
}

/// Split an artifact into its style table and Markdown body.
///
/// Returns an empty table and the whole text as body when there is no
/// opening delimiter, no closing delimiter, or the block between them is not
/// the expected YAML. Conversion proceeds either way, just without custom
/// style recovery.
pub fn split_artifact(text: &str) -> (Vec<(String, String)>, &str) {
    let Some(rest) = strip_delimiter_line(text) else {
        return (Vec::new(), text);
    };

    let mut yaml_len = None;
    let mut scanned = 0usize;
    for line in rest.split_inclusive('\n') {
        if is_delimiter_line(line) {
            yaml_len = Some((scanned, scanned + line.len()));
            break;
        }
        scanned += line.len();
    }
    let Some((yaml_end, body_start)) = yaml_len else {
        return (Vec::new(), text);
    };

    let yaml = &rest[..yaml_end];
    let body = &rest[body_start..];
    // One blank separator line between header and body, when present.
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);

    match serde_yaml::from_str::<FrontMatter>(yaml) {
        Ok(front) => (front.style_map.into_iter().collect(), body),
        Err(_) => (Vec::new(), text),
    }
}

fn strip_delimiter_line(text: &str) -> Option<&str> {
    text.strip_prefix("---\r\n")
        .or_else(|| text.strip_prefix("---\n"))
}

fn is_delimiter_line(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == "---"
}
