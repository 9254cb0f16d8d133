//! Office document format detection.

use crate::error::{Error, Result};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Word-processing document (OOXML)
    Docx,
    /// Spreadsheet workbook (OOXML)
    Xlsx,
    /// Legacy binary workbook
    Xls,
    /// OpenDocument spreadsheet
    Ods,
}

impl DocumentFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Ods => "ods",
        }
    }

    /// Map a file extension (any case, no dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "xlsx" | "xlsm" | "xlsb" => Some(Self::Xlsx),
            "xls" | "xla" => Some(Self::Xls),
            "ods" => Some(Self::Ods),
            _ => None,
        }
    }

    /// Whether the format is a spreadsheet.
    pub fn is_workbook(self) -> bool {
        !matches!(self, Self::Docx)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Docx => "DOCX",
            Self::Xlsx => "XLSX",
            Self::Xls => "XLS",
            Self::Ods => "ODS",
        };
        f.write_str(name)
    }
}

/// ZIP local file header: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE2 compound file header
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const DOCX_MAIN_PART: &str = "word/document.xml";
const XLSX_MAIN_PARTS: &[&str] = &["xl/workbook.xml", "xl/workbook.bin"];
const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// Detect the format of a file from its content.
///
/// # Example
/// ```no_run
/// use unoffice::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("format: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocumentFormat> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| Error::from_io_at(e, path))?;
    detect_format_from_bytes(&data)
}

/// Detect the format of a document from its bytes.
///
/// ZIP packages are classified by their main part as listed in the archive
/// directory. OLE2 files are accepted only when they carry a workbook stream.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocumentFormat> {
    if data.starts_with(ZIP_MAGIC) {
        return detect_package(data);
    }

    if data.starts_with(OLE_MAGIC) {
        // Directory entry names are UTF-16LE
        if contains(data, &utf16le("Workbook")) || contains(data, &utf16le("Book")) {
            return Ok(DocumentFormat::Xls);
        }
    }

    Err(Error::UnknownFormat)
}

/// Check if a file is a supported office document.
pub fn is_office_document<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes are a supported office document.
pub fn is_office_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

fn detect_package(data: &[u8]) -> Result<DocumentFormat> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let has_part = |name: &str| archive.file_names().any(|n| n == name);
    if has_part(DOCX_MAIN_PART) {
        return Ok(DocumentFormat::Docx);
    }
    if XLSX_MAIN_PARTS.iter().any(|&part| has_part(part)) {
        return Ok(DocumentFormat::Xlsx);
    }

    if let Ok(mut file) = archive.by_name("mimetype") {
        let mut mimetype = String::new();
        if file.read_to_string(&mut mimetype).is_ok() && mimetype.trim() == ODS_MIMETYPE {
            return Ok(DocumentFormat::Ods);
        }
    }

    Err(Error::UnknownFormat)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
