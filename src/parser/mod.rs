//! Format backends.

#[cfg(feature = "docx")]
mod docx;
mod options;
#[cfg(feature = "xlsx")]
mod xlsx;

#[cfg(feature = "docx")]
pub use docx::{DocxParser, DOCUMENT_PART};
pub use options::{SheetOptions, DEFAULT_NA_VALUES};
#[cfg(feature = "xlsx")]
pub use xlsx::CalamineWorkbook;
