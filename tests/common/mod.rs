//! Fixture builders shared by the integration tests.
//!
//! Packages are assembled in memory with `zip::ZipWriter` so the tests do not
//! depend on binary files checked into the repository.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub fn zip_package(parts: &[(&str, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `<w:p>` with a single run.
pub fn para(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape(text)
    )
}

/// `<w:tbl>` with one paragraph per cell.
pub fn table<R, S>(rows: &[R]) -> String
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let cols = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
    let mut xml = String::from("<w:tbl><w:tblGrid>");
    for _ in 0..cols {
        xml.push_str(r#"<w:gridCol w:w="2000"/>"#);
    }
    xml.push_str("</w:tblGrid>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in row.as_ref() {
            xml.push_str(&format!("<w:tc>{}</w:tc>", para(cell.as_ref())));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// A complete DOCX package whose body is `body_xml`.
pub fn docx_package(body_xml: &str) -> Vec<u8> {
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;
    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}/officeDocument" Target="word/document.xml"/></Relationships>"#,
        R_NS
    );
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}" xmlns:r="{}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        W_NS, R_NS, body_xml
    );

    zip_package(&[
        ("[Content_Types].xml", content_types.to_string()),
        ("_rels/.rels", rels),
        ("word/document.xml", document),
    ])
}

fn column_name(index: usize) -> String {
    let mut name = String::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    name
}

fn sheet_xml(rows: &[Vec<&str>]) -> String {
    let mut data = String::new();
    for (r, row) in rows.iter().enumerate() {
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        data.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell_ref = format!("{}{}", column_name(c), r + 1);
            if value.parse::<f64>().is_ok() {
                data.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, value));
            } else {
                data.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    cell_ref,
                    escape(value)
                ));
            }
        }
        data.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        data
    )
}

/// A complete XLSX package. Cells that parse as numbers are stored as
/// numbers, empty strings leave the cell out, anything else is inline text.
pub fn xlsx_package(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let mut overrides = String::new();
    let mut sheet_entries = String::new();
    let mut relationships = String::new();
    let mut parts: Vec<(String, String)> = Vec::new();

    for (i, (name, rows)) in sheets.iter().enumerate() {
        let n = i + 1;
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            n
        ));
        sheet_entries.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            n,
            n
        ));
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, R_NS, n
        ));
        parts.push((format!("xl/worksheets/sheet{}.xml", n), sheet_xml(rows)));
    }

    let content_types = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{}</Types>"#,
        overrides
    );
    let root_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        R_NS
    );
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{}"><sheets>{}</sheets></workbook>"#,
        R_NS, sheet_entries
    );
    let workbook_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        relationships
    );

    let mut all: Vec<(&str, String)> = vec![
        ("[Content_Types].xml", content_types),
        ("_rels/.rels", root_rels),
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", workbook_rels),
    ];
    all.extend(parts.iter().map(|(n, c)| (n.as_str(), c.clone())));
    zip_package(&all)
}

/// Write `data` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}
