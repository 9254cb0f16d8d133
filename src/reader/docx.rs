//! DOCX reader: body text as page units, tables as CSV units.

use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::chunk::{TextChunker, DEFAULT_MAX_TOKENS};
use crate::error::Result;
use crate::model::{Metadata, OutputUnit, WordDocument};

use super::DocumentReader;

/// Word-processing document reader.
///
/// Produces one table unit per body table (text is the table as CSV, with
/// row 0 as the header) followed by one page unit per chunk of body text.
/// Paragraphs are NFKC-normalized and joined with newlines before chunking.
/// Page units whose trimmed text is empty are still emitted.
#[derive(Debug, Clone, Copy)]
pub struct DocxReader {
    max_words_per_page: usize,
}

impl DocxReader {
    /// Create a reader with the default page size of 2048 words.
    pub fn new() -> Self {
        Self {
            max_words_per_page: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the maximum number of words per page unit.
    pub fn with_max_words_per_page(mut self, words: usize) -> Self {
        self.max_words_per_page = words;
        self
    }

    /// The configured page size.
    pub fn max_words_per_page(&self) -> usize {
        self.max_words_per_page
    }

    /// Read a DOCX file.
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        extra_info: Option<&Metadata>,
    ) -> Result<Vec<OutputUnit>> {
        #[cfg(feature = "docx")]
        {
            let path = super::resolve_path(path.as_ref())?;
            log::debug!("docx: reading {}", path.display());
            let doc = crate::parser::DocxParser::open(&path)?.parse()?;
            self.units_from_document(&doc, extra_info)
        }
        #[cfg(not(feature = "docx"))]
        {
            let _ = (path, extra_info);
            Err(crate::error::Error::dependency_missing("docx"))
        }
    }

    /// Read a DOCX package from bytes.
    pub fn load_bytes(&self, bytes: &[u8], extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
        #[cfg(feature = "docx")]
        {
            let doc = crate::parser::DocxParser::from_bytes(bytes)?.parse()?;
            self.units_from_document(&doc, extra_info)
        }
        #[cfg(not(feature = "docx"))]
        {
            let _ = (bytes, extra_info);
            Err(crate::error::Error::dependency_missing("docx"))
        }
    }

    /// Build output units from an already parsed document.
    pub fn units_from_document(
        &self,
        doc: &WordDocument,
        extra_info: Option<&Metadata>,
    ) -> Result<Vec<OutputUnit>> {
        let text = doc
            .paragraphs
            .iter()
            .map(|p| p.nfkc().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        let pages = TextChunker::new(self.max_words_per_page).split(&text);

        let mut units = Vec::with_capacity(doc.tables.len() + pages.len());
        for table in &doc.tables {
            let csv = table.to_record_table().to_csv()?;
            units.push(OutputUnit::table(csv, extra_info));
        }
        for (idx, page) in pages.iter().enumerate() {
            units.push(OutputUnit::page(page, idx + 1, extra_info));
        }

        log::debug!(
            "docx: {} table units, {} page units",
            doc.tables.len(),
            pages.len()
        );
        Ok(units)
    }
}

impl Default for DocxReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader for DocxReader {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn load(&self, path: &Path, extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
        DocxReader::load(self, path, extra_info)
    }

    fn load_bytes(&self, bytes: &[u8], extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
        DocxReader::load_bytes(self, bytes, extra_info)
    }
}
