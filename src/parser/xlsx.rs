//! Spreadsheet access using calamine.
//!
//! Supports xlsx, xlsm, xlsb, xls and ods workbooks.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};

use crate::error::{Error, Result};
use crate::model::{Cell, Sheet, WorkbookSource};

/// A workbook opened through calamine.
pub struct CalamineWorkbook<RS> {
    sheets: Sheets<RS>,
}

impl CalamineWorkbook<BufReader<File>> {
    /// Open a workbook file. The format is chosen from the extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        // calamine wraps open failures in format-specific errors
        std::fs::metadata(path).map_err(|e| Error::from_io_at(e, path))?;
        let sheets = open_workbook_auto(path)?;
        Ok(Self { sheets })
    }
}

impl CalamineWorkbook<Cursor<Vec<u8>>> {
    /// Open a workbook from bytes. The format is detected from content.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))?;
        Ok(Self { sheets })
    }
}

impl<RS: Read + Seek> WorkbookSource for CalamineWorkbook<RS> {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        let range = self.sheets.worksheet_range(name)?;
        let rows = anchor_at_a1(
            range.rows().map(|row| row.iter().map(Cell::from).collect()),
            range.start(),
        );
        log::debug!("xlsx: sheet {:?} has {} rows", name, rows.len());
        Ok(Sheet::new(name, rows))
    }
}

/// calamine ranges begin at the first used cell. Prepend empty rows and
/// columns so row and column indices count from A1.
fn anchor_at_a1<I>(rows: I, start: Option<(u32, u32)>) -> Vec<Vec<Cell>>
where
    I: Iterator<Item = Vec<Cell>>,
{
    let (first_row, first_col) = start
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: Vec<Vec<Cell>> = vec![Vec::new(); first_row];
    grid.extend(rows.map(|row| {
        let mut padded = vec![Cell::Empty; first_col];
        padded.extend(row);
        padded
    }));
    grid
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::String(s.clone()),
            Data::Float(f) => Cell::Float(*f),
            Data::Int(i) => Cell::Int(*i),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(naive) => Cell::DateTime(naive),
                None => Cell::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Iso(s.clone()),
            Data::Error(e) => Cell::Error(e.to_string()),
        }
    }
}
