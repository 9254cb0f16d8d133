//! Table types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A rectangular grid of cell text extracted from a document table.
///
/// Merged cells are not tracked: a merged cell's text is stored in every
/// grid position it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMatrix {
    cells: Vec<Vec<String>>,
    cols: usize,
}

impl TableMatrix {
    /// Create a `rows x cols` grid of empty cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![String::new(); cols]; rows],
            cols,
        }
    }

    /// Build a grid from row values, padding short rows with empty cells.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(cols, String::new());
        }
        Self { cells, cols }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.cols
    }

    /// Check if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() || self.cols == 0
    }

    /// Get a cell's text.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }

    /// Set a cell's text. Out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = text.into();
        }
    }

    /// All rows of the grid.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.cells
    }

    /// Convert to a record table, using row 0 as the column names.
    ///
    /// When two header cells carry the same name, the later column replaces
    /// the earlier column's values but keeps the earlier column's position.
    pub fn to_record_table(&self) -> RecordTable {
        let Some((header, body)) = self.cells.split_first() else {
            return RecordTable::default();
        };

        let mut columns: Vec<(String, usize)> = Vec::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            match columns.iter_mut().find(|(existing, _)| existing == name) {
                Some(slot) => {
                    log::debug!(
                        "duplicate table header {:?}: column {} replaces column {}",
                        name,
                        idx,
                        slot.1
                    );
                    slot.1 = idx;
                }
                None => columns.push((name.clone(), idx)),
            }
        }

        let records = body
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|(_, idx)| row.get(*idx).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        RecordTable {
            columns: columns.into_iter().map(|(name, _)| name).collect(),
            records,
        }
    }
}

/// A table of named columns and records, ready for CSV serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTable {
    /// Column names
    pub columns: Vec<String>,

    /// Data rows, each with one value per column
    pub records: Vec<Vec<String>>,
}

impl RecordTable {
    /// Serialize as CSV: header line, then one line per record, each
    /// terminated by `\n`. Fields are quoted only when needed.
    ///
    /// A table without columns serializes to an empty string.
    pub fn to_csv(&self) -> Result<String> {
        if self.columns.is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(&self.columns).map_err(csv_error)?;
        for record in &self.records {
            writer.write_record(record).map_err(csv_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Render(format!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::Render(format!("CSV encoding error: {}", e)))
    }
}

fn csv_error(err: csv::Error) -> Error {
    Error::Render(format!("CSV serialization error: {}", err))
}
