//! Sheet parsing options.

/// Text values that count as missing when `keep_default_na` is set.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options controlling how worksheet rows are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    /// The first row (after `skip_rows`) holds column names and is not emitted
    pub header: bool,

    /// Number of leading rows to skip, counted from row 1 of the sheet
    pub skip_rows: usize,

    /// Maximum number of data rows to read (after the header)
    pub n_rows: Option<usize>,

    /// Zero-based column indices to keep (all columns when `None`)
    pub use_columns: Option<Vec<usize>>,

    /// Additional text values treated as missing
    pub na_values: Vec<String>,

    /// Also treat [`DEFAULT_NA_VALUES`] as missing
    pub keep_default_na: bool,
}

impl SheetOptions {
    /// Create new sheet options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the first row is a header row.
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Read every row as data.
    pub fn no_header(mut self) -> Self {
        self.header = false;
        self
    }

    /// Skip leading rows.
    pub fn with_skip_rows(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }

    /// Limit the number of data rows.
    pub fn with_n_rows(mut self, rows: usize) -> Self {
        self.n_rows = Some(rows);
        self
    }

    /// Keep only the given zero-based columns.
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        let mut columns: Vec<usize> = columns.into_iter().collect();
        columns.sort_unstable();
        columns.dedup();
        self.use_columns = Some(columns);
        self
    }

    /// Add a text value that counts as missing.
    pub fn with_na_value(mut self, value: impl Into<String>) -> Self {
        self.na_values.push(value.into());
        self
    }

    /// Enable or disable the default missing-value sentinels.
    pub fn with_default_na(mut self, keep: bool) -> Self {
        self.keep_default_na = keep;
        self
    }

    /// The full list of missing-value sentinels in effect.
    pub fn effective_na_values(&self) -> Vec<String> {
        let mut values = self.na_values.clone();
        if self.keep_default_na {
            values.extend(DEFAULT_NA_VALUES.iter().map(|s| s.to_string()));
        }
        values
    }
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            header: true,
            skip_rows: 0,
            n_rows: None,
            use_columns: None,
            na_values: Vec::new(),
            keep_default_na: true,
        }
    }
}
