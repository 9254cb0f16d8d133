//! Error types for unoffice library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unoffice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading office documents.
///
/// Every variant is fatal for the reader call that produced it; readers never
/// return partial output alongside an error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input is not a recognized office document.
    #[error("Unknown file format: not a DOCX or spreadsheet document")]
    UnknownFormat,

    /// No reader is registered for the given extension.
    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    /// The document container or its XML could not be parsed.
    #[error("Document parsing error: {0}")]
    Parse(String),

    /// A required part of the package is missing.
    #[error("Missing required document part: {0}")]
    MissingPart(String),

    /// A requested worksheet does not exist in the workbook.
    #[error("Worksheet not found: {0}")]
    SheetNotFound(String),

    /// A parsing backend was compiled out of this build.
    #[error("Missing dependency: {0}")]
    Dependency(String),

    /// Error while serializing output units.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Error for a backend that is disabled at build time.
    pub fn dependency_missing(feature: &str) -> Self {
        Error::Dependency(format!(
            "{feature} support is not available; rebuild unoffice with the `{feature}` feature"
        ))
    }

    /// Map an I/O error on `path`, turning a missing file into [`Error::NotFound`].
    pub fn from_io_at(err: io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Error::NotFound(path.into())
        } else {
            Error::Io(err)
        }
    }

    /// Whether the input file could not be located.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Whether the input was located but could not be read as a document.
    ///
    /// I/O failures other than a missing file (a directory, a permission
    /// error, a truncated read) count as parse errors.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::Io(e) if e.kind() != io::ErrorKind::NotFound
        ) || matches!(
            self,
            Error::Parse(_)
                | Error::MissingPart(_)
                | Error::SheetNotFound(_)
                | Error::UnknownFormat
                | Error::UnsupportedFormat(_)
        )
    }

    /// Whether a required parsing backend is unavailable.
    pub fn is_dependency_error(&self) -> bool {
        matches!(self, Error::Dependency(_))
    }
}

// Packages are read from memory, so archive I/O failures mean truncated data.
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Parse(format!("invalid package: {}", err))
    }
}

#[cfg(feature = "docx")]
impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Parse(format!("malformed XML: {}", err))
    }
}

#[cfg(feature = "xlsx")]
impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => Error::Io(e),
            _ => Error::Parse(err.to_string()),
        }
    }
}
