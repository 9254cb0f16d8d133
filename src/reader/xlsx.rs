//! Workbook reader: every selected sheet rendered into a single text unit.

use std::path::Path;

#[cfg(feature = "xlsx")]
use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::{Cell, Metadata, OutputUnit, Sheet, WorkbookSource};
use crate::parser::SheetOptions;

use super::DocumentReader;

/// Default separator between rendered rows.
pub const DEFAULT_ROW_JOINER: &str = "\n";

/// Default separator between cells of a row.
pub const DEFAULT_COL_JOINER: &str = " ";

/// Which sheets of a workbook to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelection {
    /// Every sheet, in workbook order.
    #[default]
    All,
    /// The named sheets, in the given order.
    Named(Vec<String>),
}

impl From<&str> for SheetSelection {
    fn from(name: &str) -> Self {
        SheetSelection::Named(vec![name.to_string()])
    }
}

impl From<String> for SheetSelection {
    fn from(name: String) -> Self {
        SheetSelection::Named(vec![name])
    }
}

impl From<Vec<String>> for SheetSelection {
    fn from(names: Vec<String>) -> Self {
        SheetSelection::Named(names)
    }
}

impl From<Vec<&str>> for SheetSelection {
    fn from(names: Vec<&str>) -> Self {
        SheetSelection::Named(names.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for SheetSelection {
    fn from(names: &[&str]) -> Self {
        SheetSelection::Named(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Per-call options for [`XlsxReader`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    /// Emit a one-cell row with the sheet name before each sheet's rows
    pub include_sheet_name: bool,

    /// Sheets to read
    pub sheet_name: SheetSelection,

    /// Metadata attached to the output unit
    pub extra_info: Option<Metadata>,
}

impl LoadOptions {
    /// Create default load options (all sheets, no sheet-name rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix each sheet with its name.
    pub fn with_sheet_name_rows(mut self, include: bool) -> Self {
        self.include_sheet_name = include;
        self
    }

    /// Restrict loading to the given sheet or sheets.
    pub fn with_sheets(mut self, sheets: impl Into<SheetSelection>) -> Self {
        self.sheet_name = sheets.into();
        self
    }

    /// Attach metadata to the output unit.
    pub fn with_extra_info(mut self, extra_info: Metadata) -> Self {
        self.extra_info = Some(extra_info);
        self
    }
}

/// Spreadsheet reader.
///
/// Always produces exactly one unit. Rows whose cells are all missing are
/// dropped; missing cells inside kept rows render as empty strings.
#[derive(Debug, Clone)]
pub struct XlsxReader {
    sheet_options: SheetOptions,
    row_joiner: String,
    col_joiner: String,
}

impl XlsxReader {
    /// Create a reader with default joiners and sheet options.
    pub fn new() -> Self {
        Self {
            sheet_options: SheetOptions::default(),
            row_joiner: DEFAULT_ROW_JOINER.to_string(),
            col_joiner: DEFAULT_COL_JOINER.to_string(),
        }
    }

    /// Set the row separator. An empty string keeps the default.
    pub fn with_row_joiner(mut self, joiner: impl Into<String>) -> Self {
        let joiner = joiner.into();
        self.row_joiner = if joiner.is_empty() {
            DEFAULT_ROW_JOINER.to_string()
        } else {
            joiner
        };
        self
    }

    /// Set the cell separator. An empty string keeps the default.
    pub fn with_col_joiner(mut self, joiner: impl Into<String>) -> Self {
        let joiner = joiner.into();
        self.col_joiner = if joiner.is_empty() {
            DEFAULT_COL_JOINER.to_string()
        } else {
            joiner
        };
        self
    }

    /// Set the sheet parsing options.
    pub fn with_sheet_options(mut self, options: SheetOptions) -> Self {
        self.sheet_options = options;
        self
    }

    /// Separator placed between rendered rows.
    pub fn row_joiner(&self) -> &str {
        &self.row_joiner
    }

    /// Separator placed between cells of a row.
    pub fn col_joiner(&self) -> &str {
        &self.col_joiner
    }

    /// Options applied to every sheet read.
    pub fn sheet_options(&self) -> &SheetOptions {
        &self.sheet_options
    }

    /// Read a workbook file with default load options.
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        extra_info: Option<&Metadata>,
    ) -> Result<Vec<OutputUnit>> {
        let options = LoadOptions {
            extra_info: extra_info.cloned(),
            ..LoadOptions::default()
        };
        self.load_with(path, &options)
    }

    /// Read a workbook file.
    pub fn load_with<P: AsRef<Path>>(
        &self,
        path: P,
        options: &LoadOptions,
    ) -> Result<Vec<OutputUnit>> {
        #[cfg(feature = "xlsx")]
        {
            let path = super::resolve_path(path.as_ref())?;
            log::debug!("xlsx: reading {}", path.display());

            // calamine picks its backend from the extension
            let known_extension = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(DocumentFormat::from_extension)
                .is_some_and(DocumentFormat::is_workbook);
            if !known_extension {
                let data = std::fs::read(&path).map_err(|e| Error::from_io_at(e, &path))?;
                return self.load_bytes_with(&data, options);
            }

            let mut workbook = crate::parser::CalamineWorkbook::open(&path)?;
            self.load_source(&mut workbook, options)
        }
        #[cfg(not(feature = "xlsx"))]
        {
            let _ = (path, options);
            Err(Error::dependency_missing("xlsx"))
        }
    }

    /// Read a workbook from bytes.
    pub fn load_bytes_with(&self, bytes: &[u8], options: &LoadOptions) -> Result<Vec<OutputUnit>> {
        #[cfg(feature = "xlsx")]
        {
            let mut workbook = crate::parser::CalamineWorkbook::from_bytes(bytes)?;
            self.load_source(&mut workbook, options)
        }
        #[cfg(not(feature = "xlsx"))]
        {
            let _ = (bytes, options);
            Err(Error::dependency_missing("xlsx"))
        }
    }

    /// Read from any workbook source.
    ///
    /// All requested sheets are validated before any of them is read.
    pub fn load_source(
        &self,
        source: &mut dyn WorkbookSource,
        options: &LoadOptions,
    ) -> Result<Vec<OutputUnit>> {
        let names = select_sheets(source, &options.sheet_name)?;
        let na_values = self.sheet_options.effective_na_values();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for name in &names {
            let sheet = source.read_sheet(name)?;
            if options.include_sheet_name {
                rows.push(vec![sheet.name.clone()]);
            }
            let before = rows.len();
            rows.extend(self.sheet_rows(&sheet, &na_values));
            log::debug!("xlsx: sheet {:?} contributed {} rows", name, rows.len() - before);
        }

        let text = rows
            .iter()
            .map(|row| row.join(&self.col_joiner))
            .collect::<Vec<_>>()
            .join(&self.row_joiner);

        let metadata = options.extra_info.clone().unwrap_or_default();
        Ok(vec![OutputUnit::new(text, metadata)])
    }

    /// Rendered data rows of one sheet.
    fn sheet_rows(&self, sheet: &Sheet, na_values: &[String]) -> Vec<Vec<String>> {
        let opts = &self.sheet_options;
        let width = sheet.width();

        let mut data = sheet.rows.iter().skip(opts.skip_rows);
        if opts.header {
            // Blank rows above the header are not column names
            let _ = data.find(|row| !row.iter().all(|cell| cell.is_missing(na_values)));
        }
        let limit = opts.n_rows.unwrap_or(usize::MAX);

        data.take(limit)
            .map(|row| select_columns(row, width, opts.use_columns.as_deref()))
            .filter(|row| !row.iter().all(|cell| cell.is_missing(na_values)))
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        if cell.is_missing(na_values) {
                            String::new()
                        } else {
                            cell.render()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for XlsxReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader for XlsxReader {
    fn supported_extensions(&self) -> &[&str] {
        &["xlsx", "xlsm", "xlsb", "xls", "ods"]
    }

    fn name(&self) -> &str {
        "xlsx"
    }

    fn load(&self, path: &Path, extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
        XlsxReader::load(self, path, extra_info)
    }

    fn load_bytes(&self, bytes: &[u8], extra_info: Option<&Metadata>) -> Result<Vec<OutputUnit>> {
        let options = LoadOptions {
            extra_info: extra_info.cloned(),
            ..LoadOptions::default()
        };
        self.load_bytes_with(bytes, &options)
    }
}

fn select_sheets(source: &dyn WorkbookSource, selection: &SheetSelection) -> Result<Vec<String>> {
    let available = source.sheet_names();
    match selection {
        SheetSelection::All => Ok(available),
        SheetSelection::Named(requested) => {
            let mut names: Vec<String> = Vec::with_capacity(requested.len());
            for name in requested {
                if !available.contains(name) {
                    return Err(Error::SheetNotFound(name.clone()));
                }
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            Ok(names)
        }
    }
}

/// Pad a row to the sheet width, then keep only the selected columns.
fn select_columns(row: &[Cell], width: usize, columns: Option<&[usize]>) -> Vec<Cell> {
    match columns {
        Some(columns) => columns
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or_default())
            .collect(),
        None => {
            let mut cells = row.to_vec();
            cells.resize(width, Cell::Empty);
            cells
        }
    }
}
