//! # unoffice
//!
//! Office document ingestion for indexing pipelines.
//!
//! This library reads word-processing documents and spreadsheet workbooks and
//! turns them into flat lists of [`OutputUnit`]s: a text payload plus scalar
//! metadata, ready for embedding or search indexing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unoffice::{load_docx, render, JsonFormat};
//!
//! fn main() -> unoffice::Result<()> {
//!     // Tables first, then body text in pages of at most 2048 words
//!     let units = load_docx("report.docx", None)?;
//!
//!     for unit in &units {
//!         println!("{:?}: {}", unit.page_label(), unit.text);
//!     }
//!
//!     println!("{}", render::to_json(&units, JsonFormat::Lines)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **DOCX**: body paragraphs chunked into pages, tables rendered as CSV
//! - **Workbooks**: xlsx, xlsm, xlsb, xls and ods rendered into one text unit
//! - **Chunking**: greedy whitespace-token packing with a word bound
//! - **Parallel processing**: Uses Rayon for batches of files
//! - **Async**: tokio entry point behind the `async` feature

pub mod chunk;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod reader;
pub mod render;

// Re-export commonly used types
pub use chunk::{split_text, TextChunker, DEFAULT_MAX_TOKENS};
pub use detect::{detect_format_from_bytes, detect_format_from_path, DocumentFormat};
pub use error::{Error, Result};
pub use model::{
    Cell, InMemoryWorkbook, Metadata, MetadataValue, OutputUnit, RecordTable, Sheet, TableMatrix,
    WordDocument, WorkbookSource,
};
pub use parser::SheetOptions;
pub use reader::{
    DocumentReader, DocxReader, LoadOptions, ReaderRegistry, SheetSelection, XlsxReader,
};
pub use render::JsonFormat;

use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Read a DOCX file into output units.
///
/// Table units come first, followed by page units labelled 1..N.
///
/// # Example
///
/// ```no_run
/// use unoffice::{load_docx, Metadata};
///
/// let mut extra = Metadata::new();
/// extra.insert("source".into(), "share/report.docx".into());
/// let units = load_docx("report.docx", Some(&extra)).unwrap();
/// println!("Units: {}", units.len());
/// ```
pub fn load_docx<P: AsRef<Path>>(path: P, extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
    DocxReader::new().load(path, extra_info)
}

/// Read a spreadsheet workbook into a single output unit.
///
/// # Example
///
/// ```no_run
/// use unoffice::{load_xlsx, LoadOptions};
///
/// let options = LoadOptions::new()
///     .with_sheets(vec!["Q1", "Q2"])
///     .with_sheet_name_rows(true);
/// let units = load_xlsx("sales.xlsx", &options).unwrap();
/// assert_eq!(units.len(), 1);
/// ```
pub fn load_xlsx<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Vec<OutputUnit>> {
    XlsxReader::new().load_with(path, options)
}

/// Read any supported file, choosing the reader by extension or content.
///
/// # Example
///
/// ```no_run
/// use unoffice::load_file;
///
/// let units = load_file("inbox/attachment.bin", None).unwrap();
/// ```
pub fn load_file<P: AsRef<Path>>(path: P, extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
    ReaderRegistry::with_defaults().load(path.as_ref(), extra_info)
}

/// Read a document from bytes. The format is detected from content.
pub fn load_bytes(data: &[u8], extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
    ReaderRegistry::with_defaults().load_bytes(data, None, extra_info)
}

/// Read many files in parallel.
///
/// Results are returned in input order; a failure for one file does not
/// affect the others.
///
/// # Example
///
/// ```no_run
/// use unoffice::load_files;
///
/// let results = load_files(&["a.docx", "b.xlsx"], None);
/// for result in results {
///     match result {
///         Ok(units) => println!("{} units", units.len()),
///         Err(e) => eprintln!("{}", e),
///     }
/// }
/// ```
pub fn load_files<P>(paths: &[P], extra_info: Option<&Metadata>) -> Vec<Result<Vec<OutputUnit>>>
where
    P: AsRef<Path> + Sync,
{
    Unoffice::new().load_files_with(paths, extra_info)
}

/// Read a file asynchronously.
///
/// The file is read with `tokio::fs` and parsed on the blocking pool.
#[cfg(feature = "async")]
pub async fn load_file_async<P: AsRef<Path>>(
    path: P,
    extra_info: Option<Metadata>,
) -> Result<Vec<OutputUnit>> {
    let path = path.as_ref().to_path_buf();
    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::from_io_at(e, &path))?;
    let ext = extension_of(&path);

    tokio::task::spawn_blocking(move || {
        let registry = ReaderRegistry::with_defaults();
        let ext = ext.filter(|e| registry.supports(e));
        registry.load_bytes(&data, ext.as_deref(), extra_info.as_ref())
    })
    .await
    .map_err(|e| Error::Other(format!("loader task failed: {}", e)))?
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Builder for configured document loading.
///
/// # Example
///
/// ```no_run
/// use unoffice::{SheetOptions, Unoffice};
///
/// let units = Unoffice::new()
///     .with_max_words_per_page(512)
///     .with_col_joiner(" | ")
///     .with_sheet_options(SheetOptions::new().no_header())
///     .with_extra("collection", "finance")
///     .load("ledger.xlsx")?;
/// # Ok::<(), unoffice::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unoffice {
    docx: DocxReader,
    xlsx: XlsxReader,
    extra_info: Metadata,
}

impl Unoffice {
    /// Create a new Unoffice builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of words per DOCX page unit.
    pub fn with_max_words_per_page(mut self, words: usize) -> Self {
        self.docx = self.docx.with_max_words_per_page(words);
        self
    }

    /// Set the workbook row separator.
    pub fn with_row_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.xlsx = self.xlsx.with_row_joiner(joiner);
        self
    }

    /// Set the workbook cell separator.
    pub fn with_col_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.xlsx = self.xlsx.with_col_joiner(joiner);
        self
    }

    /// Set the sheet parsing options.
    pub fn with_sheet_options(mut self, options: SheetOptions) -> Self {
        self.xlsx = self.xlsx.with_sheet_options(options);
        self
    }

    /// Attach one metadata entry to every unit.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.extra_info.insert(key.into(), value.into());
        self
    }

    /// Attach metadata entries to every unit.
    pub fn with_extra_info(mut self, extra_info: Metadata) -> Self {
        self.extra_info.extend(extra_info);
        self
    }

    /// Build a registry with the configured readers.
    pub fn registry(&self) -> ReaderRegistry {
        ReaderRegistry::with_readers(self.docx, self.xlsx.clone())
    }

    /// Read a file, choosing the reader by extension or content.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<OutputUnit>> {
        self.registry().load(path.as_ref(), self.extra())
    }

    /// Read a document from bytes.
    pub fn load_bytes(&self, data: &[u8]) -> Result<Vec<OutputUnit>> {
        self.registry().load_bytes(data, None, self.extra())
    }

    /// Read a workbook with per-call options. Builder metadata is applied
    /// first; entries in `options.extra_info` win.
    pub fn load_xlsx<P: AsRef<Path>>(&self, path: P, options: &LoadOptions) -> Result<Vec<OutputUnit>> {
        let mut options = options.clone();
        if !self.extra_info.is_empty() {
            let mut extra = self.extra_info.clone();
            extra.extend(options.extra_info.take().unwrap_or_default());
            options.extra_info = Some(extra);
        }
        self.xlsx.load_with(path, &options)
    }

    /// Read many files in parallel; results are in input order.
    pub fn load_files<P>(&self, paths: &[P]) -> Vec<Result<Vec<OutputUnit>>>
    where
        P: AsRef<Path> + Sync,
    {
        self.load_files_with(paths, self.extra())
    }

    fn load_files_with<P>(
        &self,
        paths: &[P],
        extra_info: Option<&Metadata>,
    ) -> Vec<Result<Vec<OutputUnit>>>
    where
        P: AsRef<Path> + Sync,
    {
        let registry = self.registry();
        log::debug!("loading {} files", paths.len());
        paths
            .par_iter()
            .map(|path| registry.load(path.as_ref(), extra_info))
            .collect()
    }

    fn extra(&self) -> Option<&Metadata> {
        if self.extra_info.is_empty() {
            None
        } else {
            Some(&self.extra_info)
        }
    }
}

/// Paths of the files in `dir` that the default registry can read,
/// sorted by name. Subdirectories are not visited.
pub fn supported_files_in<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let registry = ReaderRegistry::with_defaults();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::from_io_at(e, dir))? {
        let path = entry?.path();
        let supported = extension_of(&path).is_some_and(|ext| registry.supports(&ext));
        if path.is_file() && supported {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unoffice_builder() {
        let builder = Unoffice::new()
            .with_max_words_per_page(100)
            .with_row_joiner(" / ")
            .with_extra("source", "inbox");

        assert_eq!(builder.docx.max_words_per_page(), 100);
        assert_eq!(builder.xlsx.row_joiner(), " / ");
        assert_eq!(builder.extra(), Some(&builder.extra_info));
    }

    #[test]
    fn test_unoffice_builder_default() {
        let builder = Unoffice::default();
        assert_eq!(builder.docx.max_words_per_page(), DEFAULT_MAX_TOKENS);
        assert_eq!(builder.xlsx.col_joiner(), " ");
        assert!(builder.extra().is_none());
    }

    #[test]
    fn test_registry_uses_builder_readers() {
        let registry = Unoffice::new().registry();
        assert!(registry.supports("docx"));
        assert!(registry.supports("xls"));
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_load_bytes_empty_data() {
        let result = load_bytes(&[], None);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_load_bytes_unknown_magic() {
        let data = b"<!DOCTYPE html><html></html>";
        assert!(load_bytes(data, None).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file("missing/report.docx", None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_files_keeps_order() {
        let results = load_files(&["missing/a.docx", "missing/b.xlsx"], None);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| matches!(r, Err(e) if e.is_not_found())));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("A.DOCX")), Some("docx".to_string()));
        assert_eq!(extension_of(Path::new("README")), None);
    }
}
