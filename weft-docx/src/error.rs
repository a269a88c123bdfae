//! Error type for DOCX reading

use std::fmt;
use std::io;

/// Error that can occur while opening or parsing a DOCX package
#[derive(Debug)]
pub enum DocxError {
    /// Underlying I/O failure
    Io(io::Error),
    /// The ZIP container could not be read
    Zip(zip::result::ZipError),
    /// A package part is not well-formed XML
    Xml(roxmltree::Error),
    /// A required package part is absent (e.g. word/document.xml)
    MissingPart(String),
}

impl fmt::Display for DocxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocxError::Io(err) => write!(f, "I/O error: {err}"),
            DocxError::Zip(err) => write!(f, "Not a readable DOCX container: {err}"),
            DocxError::Xml(err) => write!(f, "Malformed XML in DOCX part: {err}"),
            DocxError::MissingPart(part) => write!(f, "DOCX package part missing: {part}"),
        }
    }
}

impl std::error::Error for DocxError {}

impl From<io::Error> for DocxError {
    fn from(err: io::Error) -> Self {
        DocxError::Io(err)
    }
}

impl From<zip::result::ZipError> for DocxError {
    fn from(err: zip::result::ZipError) -> Self {
        DocxError::Zip(err)
    }
}

impl From<roxmltree::Error> for DocxError {
    fn from(err: roxmltree::Error) -> Self {
        DocxError::Xml(err)
    }
}
