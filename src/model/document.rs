//! Parsed word-processing documents.

use super::TableMatrix;
use serde::{Deserialize, Serialize};

/// The parts of a word-processing document that ingestion reads:
/// body paragraphs and body tables, each in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDocument {
    /// Body paragraph text, one entry per paragraph
    pub paragraphs: Vec<String>,

    /// Body tables
    pub tables: Vec<TableMatrix>,
}

impl WordDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paragraph.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.paragraphs.push(text.into());
    }

    /// Add a table.
    pub fn add_table(&mut self, table: TableMatrix) {
        self.tables.push(table);
    }

    /// Check if the document has neither paragraphs nor tables.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.tables.is_empty()
    }

    /// Paragraph text joined with newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = WordDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_plain_text_keeps_empty_paragraphs() {
        let mut doc = WordDocument::new();
        doc.add_paragraph("Title");
        doc.add_paragraph("");
        doc.add_paragraph("Body");
        assert_eq!(doc.plain_text(), "Title\n\nBody");
    }
}
