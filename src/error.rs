//! Error type for round-trip conversion
//!
//! Only environment problems, bad input paths and converter failures are
//! errors. Reduced style fidelity (a missing artifact header, a class no one
//! recognizes, a run without a resolvable style) is recoverable by design and
//! never surfaces here.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConvertError {
    /// The external pandoc converter is not installed
    PandocMissing,
    /// The requested reference document does not exist
    MissingReference(PathBuf),
    /// The external converter exited non-zero; its stderr is kept verbatim
    ConverterFailed { stage: String, stderr: String },
    /// The source document could not be read
    Docx(weft_docx::DocxError),
    /// Building or consuming an intermediate representation failed
    Serialization(String),
    /// Underlying I/O failure
    Io(io::Error),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::PandocMissing => {
                write!(f, "pandoc not found on PATH. Please install pandoc and try again.")
            }
            ConvertError::MissingReference(path) => {
                write!(f, "Reference DOCX not found: {}", path.display())
            }
            ConvertError::ConverterFailed { stage, stderr } => {
                write!(f, "pandoc {stage} failed:\n{stderr}")
            }
            ConvertError::Docx(err) => write!(f, "{err}"),
            ConvertError::Serialization(msg) => write!(f, "{msg}"),
            ConvertError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<weft_docx::DocxError> for ConvertError {
    fn from(err: weft_docx::DocxError) -> Self {
        ConvertError::Docx(err)
    }
}

impl From<io::Error> for ConvertError {
    fn from(err: io::Error) -> Self {
        ConvertError::Io(err)
    }
}
