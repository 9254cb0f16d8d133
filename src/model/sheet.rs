//! Worksheet types and the workbook access trait.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single worksheet cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// No value
    #[default]
    Empty,
    /// Text
    String(String),
    /// Floating point number
    Float(f64),
    /// Integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Date and time
    DateTime(NaiveDateTime),
    /// ISO 8601 date, time or duration kept verbatim
    Iso(String),
    /// Formula error such as `#DIV/0!`
    Error(String),
}

impl Cell {
    /// Whether the cell counts as a missing value.
    ///
    /// Empty cells, error cells, empty text, and text equal to one of the
    /// `na_values` sentinels are missing.
    pub fn is_missing(&self, na_values: &[String]) -> bool {
        match self {
            Cell::Empty | Cell::Error(_) => true,
            Cell::String(s) => s.is_empty() || na_values.iter().any(|na| na == s),
            _ => false,
        }
    }

    /// Render the cell value as text.
    ///
    /// Integral floats print without a fractional part, booleans print as
    /// `True`/`False`, date-times as `YYYY-MM-DD HH:MM:SS`.
    pub fn render(&self) -> String {
        match self {
            Cell::Empty | Cell::Error(_) => String::new(),
            Cell::String(s) | Cell::Iso(s) => s.clone(),
            Cell::Float(f) => format_float(*f),
            Cell::Int(i) => i.to_string(),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::String(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::String(s)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// A worksheet: a name and its rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet (tab) name
    pub name: String,

    /// Rows in sheet order
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Create a sheet from rows.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Read access to a workbook's sheets.
///
/// Implemented by the calamine backend for files on disk and by
/// [`InMemoryWorkbook`] for sheets built in code.
pub trait WorkbookSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Load one sheet by name.
    fn read_sheet(&mut self, name: &str) -> Result<Sheet>;
}

/// A workbook held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<Sheet>,
}

impl InMemoryWorkbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet.
    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Append a sheet and return self.
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.add_sheet(sheet);
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_render_numbers() {
        assert_eq!(Cell::Float(3.0).render(), "3");
        assert_eq!(Cell::Float(-2.5).render(), "-2.5");
        assert_eq!(Cell::Float(0.1).render(), "0.1");
        assert_eq!(Cell::Int(42).render(), "42");
    }

    #[test]
    fn test_render_other() {
        assert_eq!(Cell::Bool(true).render(), "True");
        assert_eq!(Cell::Bool(false).render(), "False");
        assert_eq!(Cell::Error("#DIV/0!".into()).render(), "");
        assert_eq!(Cell::Empty.render(), "");

        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(Cell::DateTime(dt).render(), "2024-01-15 09:30:00");
    }

    #[test]
    fn test_missing() {
        let na = vec!["N/A".to_string()];
        assert!(Cell::Empty.is_missing(&na));
        assert!(Cell::from("").is_missing(&na));
        assert!(Cell::from("N/A").is_missing(&na));
        assert!(Cell::Error("#REF!".into()).is_missing(&na));
        assert!(!Cell::from("n/a ok").is_missing(&na));
        assert!(!Cell::Float(0.0).is_missing(&na));
    }

    #[test]
    fn test_in_memory_workbook() {
        let mut wb = InMemoryWorkbook::new()
            .with_sheet(Sheet::new("A", vec![]))
            .with_sheet(Sheet::new("B", vec![vec![Cell::from("x")]]));

        assert_eq!(wb.sheet_names(), vec!["A", "B"]);
        assert_eq!(wb.read_sheet("B").unwrap().width(), 1);
        assert!(matches!(wb.read_sheet("C"), Err(Error::SheetNotFound(_))));
    }
}
