//! Document model types.
//!
//! Parsers produce [`WordDocument`] and [`Sheet`] values; readers turn them
//! into [`OutputUnit`] lists for downstream indexing.

mod document;
mod sheet;
mod table;
mod unit;

pub use document::WordDocument;
pub use sheet::{Cell, InMemoryWorkbook, Sheet, WorkbookSource};
pub use table::{RecordTable, TableMatrix};
pub use unit::{
    Metadata, MetadataValue, OutputUnit, KEY_PAGE_LABEL, KEY_TABLE_ORIGIN, KEY_TYPE, TYPE_TABLE,
};
