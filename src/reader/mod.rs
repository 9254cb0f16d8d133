//! Document readers and the extension-based reader registry.
//!
//! # Example
//!
//! ```no_run
//! use unoffice::reader::{DocxReader, ReaderRegistry};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn main() -> unoffice::Result<()> {
//!     let mut registry = ReaderRegistry::new();
//!     registry.register(Arc::new(DocxReader::new().with_max_words_per_page(512)));
//!
//!     let units = registry.load(Path::new("report.docx"), None)?;
//!     println!("{} units", units.len());
//!     Ok(())
//! }
//! ```

mod docx;
mod xlsx;

pub use docx::DocxReader;
pub use xlsx::{LoadOptions, SheetSelection, XlsxReader, DEFAULT_COL_JOINER, DEFAULT_ROW_JOINER};

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::{Metadata, OutputUnit};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Trait for document readers.
///
/// A reader turns one input document into an ordered list of output units.
/// Calls are independent of each other and either return every unit or fail.
pub trait DocumentReader: Send + Sync {
    /// Get the supported file extensions for this reader.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["docx"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this reader.
    fn name(&self) -> &str;

    /// Read a file at the given path.
    fn load(&self, path: &Path, extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>>;

    /// Read a document from bytes.
    fn load_bytes(&self, bytes: &[u8], extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>>;

    /// Check if this reader supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document readers.
///
/// Maps file extensions to readers. Inputs without a known extension are
/// routed by content detection.
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn DocumentReader>>,
    by_name: HashMap<String, Arc<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the DOCX and workbook readers.
    pub fn with_defaults() -> Self {
        Self::with_readers(DocxReader::new(), XlsxReader::new())
    }

    /// Create a registry from configured DOCX and workbook readers.
    pub fn with_readers(docx: DocxReader, xlsx: XlsxReader) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(docx));
        registry.register(Arc::new(xlsx));
        registry
    }

    /// Register a reader for all its supported extensions.
    pub fn register(&mut self, reader: Arc<dyn DocumentReader>) {
        for ext in reader.supported_extensions() {
            self.readers.insert(ext.to_lowercase(), reader.clone());
        }
        self.by_name.insert(reader.name().to_lowercase(), reader);
    }

    /// Get a reader by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentReader>> {
        self.readers.get(&ext.to_lowercase()).cloned()
    }

    /// Get a reader by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentReader>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.readers.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.readers.keys().map(|s| s.as_str()).collect()
    }

    /// Pick the reader for a path: by extension first, then by content.
    pub fn reader_for_path(&self, path: &Path) -> Result<Arc<dyn DocumentReader>> {
        if let Some(reader) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.get_by_extension(ext))
        {
            return Ok(reader);
        }

        let format = detect_format_from_path(path)?;
        log::debug!("{}: detected {} from content", path.display(), format);
        self.get_by_extension(format.extension())
            .ok_or_else(|| Error::UnsupportedFormat(format.extension().to_string()))
    }

    /// Read a file using the appropriate reader.
    pub fn load(&self, path: &Path, extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
        self.reader_for_path(path)?.load(path, extra_info)
    }

    /// Read bytes. `ext` selects the reader when given; otherwise the
    /// format is detected from content.
    pub fn load_bytes(
        &self,
        bytes: &[u8],
        ext: Option<&str>,
        extra_info: Option<&Metadata>,
    ) -> Result<Vec<OutputUnit>> {
        let reader = match ext {
            Some(ext) => self
                .get_by_extension(ext)
                .ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))?,
            None => {
                let format = detect_format_from_bytes(bytes)?;
                self.get_by_extension(format.extension())
                    .ok_or_else(|| Error::UnsupportedFormat(format.extension().to_string()))?
            }
        };
        reader.load_bytes(bytes, extra_info)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Resolve `path` to an absolute path, failing with [`Error::NotFound`] when
/// it does not exist.
pub(crate) fn resolve_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| Error::from_io_at(e, path))
}
