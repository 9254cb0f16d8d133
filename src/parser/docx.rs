//! DOCX (WordprocessingML) parser using zip and quick-xml.

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::model::{TableMatrix, WordDocument};

/// Default location of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

const PACKAGE_RELS: &str = "_rels/.rels";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// DOCX document parser.
///
/// Reads body-level paragraphs and body-level tables from the main document
/// part. The archive is read fully into memory when the parser is created.
pub struct DocxParser {
    xml: Vec<u8>,
}

impl DocxParser {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| Error::from_io_at(e, path))?;
        Self::from_bytes(&data)
    }

    /// Parse a DOCX package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let part = main_part_name(&mut archive)?;

        let xml = match archive.by_name(&part) {
            Ok(mut file) => {
                let mut xml = Vec::with_capacity(file.size() as usize);
                file.read_to_end(&mut xml)
                    .map_err(|e| Error::Parse(format!("cannot read {}: {}", part, e)))?;
                xml
            }
            Err(ZipError::FileNotFound) => return Err(Error::MissingPart(part)),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { xml })
    }

    /// Parse a DOCX package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Parse the main document part.
    pub fn parse(&self) -> Result<WordDocument> {
        let mut reader = Reader::from_reader(self.xml.as_slice());
        let mut buf = Vec::new();
        let mut walker = BodyWalker::default();
        let mut has_root = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    check_root(&mut has_root, &e)?;
                    walker.open(&e)
                }
                Event::Empty(e) => {
                    check_root(&mut has_root, &e)?;
                    walker.empty(&e)
                }
                Event::Text(t) => {
                    if walker.in_text {
                        let text = t.unescape()?;
                        walker.push_text(&text);
                    }
                }
                Event::End(_) => walker.close(),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        if !has_root {
            return Err(Error::Parse("main part has no w:document element".into()));
        }

        let doc = walker.doc;
        log::debug!(
            "docx: {} paragraphs, {} tables",
            doc.paragraphs.len(),
            doc.tables.len()
        );
        Ok(doc)
    }
}

/// The first element of the main part must be `w:document`. Any other root
/// means the package is not a word-processing document.
fn check_root(has_root: &mut bool, e: &BytesStart<'_>) -> Result<()> {
    if *has_root {
        return Ok(());
    }
    if e.local_name().as_ref() != b"document" {
        return Err(Error::Parse(format!(
            "main part root is <{}>, not w:document",
            String::from_utf8_lossy(e.name().as_ref())
        )));
    }
    *has_root = true;
    Ok(())
}

/// Resolve the main document part from the package relationships, falling
/// back to [`DOCUMENT_PART`].
fn main_part_name<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let rels = match archive.by_name(PACKAGE_RELS) {
        Ok(mut file) => {
            let mut xml = Vec::new();
            file.read_to_end(&mut xml)
                .map_err(|e| Error::Parse(format!("cannot read {}: {}", PACKAGE_RELS, e)))?;
            xml
        }
        Err(ZipError::FileNotFound) => return Ok(DOCUMENT_PART.to_string()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = Reader::from_reader(rels.as_slice());
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let is_main = attr(&e, b"Type")
                    .map(|t| t.ends_with(OFFICE_DOCUMENT_REL))
                    .unwrap_or(false);
                if let (true, Some(target)) = (is_main, attr(&e, b"Target")) {
                    return Ok(target.trim_start_matches('/').to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::warn!("docx: no officeDocument relationship, using {}", DOCUMENT_PART);
    Ok(DOCUMENT_PART.to_string())
}

/// Value of the attribute with the given local name.
fn attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn attr_usize(e: &BytesStart<'_>, local: &[u8]) -> Option<usize> {
    attr(e, local).and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Body,
    Cell,
}

#[derive(Debug)]
struct ParagraphBuilder {
    /// Stack index of the `w:p` element.
    depth: usize,
    target: Target,
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum VMerge {
    #[default]
    None,
    Restart,
    Continue,
}

#[derive(Debug)]
struct CellBuilder {
    paragraphs: Vec<String>,
    span: usize,
    vmerge: VMerge,
}

impl Default for CellBuilder {
    fn default() -> Self {
        Self {
            paragraphs: Vec::new(),
            span: 1,
            vmerge: VMerge::None,
        }
    }
}

#[derive(Debug, Default)]
struct RowBuilder {
    grid_before: usize,
    cells: Vec<CellBuilder>,
}

impl RowBuilder {
    fn width(&self) -> usize {
        self.grid_before + self.cells.iter().map(|c| c.span).sum::<usize>()
    }
}

#[derive(Debug, Default)]
struct TableBuilder {
    grid_cols: usize,
    rows: Vec<RowBuilder>,
    row: Option<RowBuilder>,
    cell: Option<CellBuilder>,
}

impl TableBuilder {
    fn end_cell(&mut self) {
        if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
            row.cells.push(cell);
        }
    }

    fn end_row(&mut self) {
        self.end_cell();
        if let Some(row) = self.row.take() {
            self.rows.push(row);
        }
    }

    /// Lay the rows out on the column grid. Spanned cells repeat their text
    /// in every covered column; vertical-merge continuations repeat the text
    /// of the cell above.
    fn build(mut self) -> TableMatrix {
        self.end_row();

        let widest = self.rows.iter().map(RowBuilder::width).max().unwrap_or(0);
        if self.grid_cols > 0 && widest > self.grid_cols {
            log::warn!(
                "docx: table row spans {} columns but grid declares {}",
                widest,
                self.grid_cols
            );
        }
        let width = widest.max(self.grid_cols);

        let mut matrix = TableMatrix::new(self.rows.len(), width);
        for (r, row) in self.rows.iter().enumerate() {
            let mut col = row.grid_before;
            for cell in &row.cells {
                let text = match cell.vmerge {
                    VMerge::Continue if r > 0 => {
                        matrix.get(r - 1, col).unwrap_or_default().to_string()
                    }
                    _ => cell.paragraphs.join("\n"),
                };
                for c in col..col + cell.span {
                    matrix.set(r, c, text.clone());
                }
                col += cell.span;
            }
        }
        matrix
    }
}

/// Event-driven walk over `w:document`, collecting body paragraphs and the
/// grids of body tables. Nested tables are skipped.
#[derive(Debug, Default)]
struct BodyWalker {
    stack: Vec<Vec<u8>>,
    doc: WordDocument,
    table_depth: usize,
    table: Option<TableBuilder>,
    paragraph: Option<ParagraphBuilder>,
    in_text: bool,
}

impl BodyWalker {
    fn parent_is(&self, name: &[u8]) -> bool {
        self.stack.last().map(Vec::as_slice) == Some(name)
    }

    fn in_top_table(&self) -> bool {
        self.table.is_some() && self.table_depth == 1
    }

    /// Whether the innermost open element is a run that belongs directly to
    /// the paragraph being collected (optionally through a hyperlink).
    fn in_paragraph_run(&self) -> bool {
        let Some(p) = &self.paragraph else {
            return false;
        };
        if !self.parent_is(b"r") {
            return false;
        }
        let r = self.stack.len() - 1;
        r == p.depth + 1 || (r == p.depth + 2 && self.stack[p.depth + 1] == b"hyperlink")
    }

    /// Where a paragraph opening at the current position belongs, if anywhere.
    fn paragraph_target(&self) -> Option<Target> {
        if self.table_depth == 0 && self.parent_is(b"body") {
            Some(Target::Body)
        } else if self.in_top_table() && self.parent_is(b"tc") {
            Some(Target::Cell)
        } else {
            None
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(p) = self.paragraph.as_mut() {
            p.text.push_str(text);
        }
    }

    fn open(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name().as_ref().to_vec();

        match name.as_slice() {
            b"tbl" => {
                if self.table_depth == 0 && self.parent_is(b"body") {
                    self.table = Some(TableBuilder::default());
                }
                self.table_depth += 1;
            }
            b"tr" if self.in_top_table() => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                    table.row = Some(RowBuilder::default());
                }
            }
            b"tc" if self.in_top_table() => {
                if let Some(table) = self.table.as_mut() {
                    table.end_cell();
                    table.cell = Some(CellBuilder::default());
                }
            }
            b"p" if self.paragraph.is_none() => {
                if let Some(target) = self.paragraph_target() {
                    self.paragraph = Some(ParagraphBuilder {
                        depth: self.stack.len(),
                        target,
                        text: String::new(),
                    });
                }
            }
            b"t" if self.in_paragraph_run() => self.in_text = true,
            _ => self.property(e),
        }

        self.stack.push(name);
    }

    fn empty(&mut self, e: &BytesStart<'_>) {
        if e.local_name().as_ref() == b"p" {
            let target = match self.paragraph {
                None => self.paragraph_target(),
                Some(_) => None,
            };
            if let Some(target) = target {
                self.finish_paragraph(ParagraphBuilder {
                    depth: self.stack.len(),
                    target,
                    text: String::new(),
                });
            }
            return;
        }
        if self.in_paragraph_run() {
            match e.local_name().as_ref() {
                b"tab" | b"ptab" => self.push_text("\t"),
                b"cr" => self.push_text("\n"),
                b"br" => {
                    let kind = attr(e, b"type");
                    if matches!(kind.as_deref(), None | Some("textWrapping")) {
                        self.push_text("\n");
                    }
                }
                b"noBreakHyphen" => self.push_text("-"),
                _ => {}
            }
            return;
        }
        self.property(e);
    }

    /// Table layout properties, which may appear as empty or start elements.
    fn property(&mut self, e: &BytesStart<'_>) {
        if !self.in_top_table() {
            return;
        }
        let parent_grid = self.parent_is(b"tblGrid");
        let parent_row = self.parent_is(b"trPr");
        let parent_cell = self.parent_is(b"tcPr");
        let Some(table) = self.table.as_mut() else {
            return;
        };

        match e.local_name().as_ref() {
            b"gridCol" if parent_grid => table.grid_cols += 1,
            b"gridBefore" if parent_row => {
                if let (Some(row), Some(n)) = (table.row.as_mut(), attr_usize(e, b"val")) {
                    row.grid_before = n;
                }
            }
            b"gridSpan" if parent_cell => {
                if let (Some(cell), Some(n)) = (table.cell.as_mut(), attr_usize(e, b"val")) {
                    cell.span = n.max(1);
                }
            }
            b"vMerge" if parent_cell => {
                if let Some(cell) = table.cell.as_mut() {
                    cell.vmerge = match attr(e, b"val").as_deref() {
                        Some("restart") => VMerge::Restart,
                        _ => VMerge::Continue,
                    };
                }
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        let Some(name) = self.stack.pop() else {
            return;
        };

        match name.as_slice() {
            b"t" => self.in_text = false,
            b"p" => {
                if self.paragraph.as_ref().map(|p| p.depth) == Some(self.stack.len()) {
                    if let Some(p) = self.paragraph.take() {
                        self.finish_paragraph(p);
                    }
                }
            }
            b"tc" if self.in_top_table() => {
                if let Some(table) = self.table.as_mut() {
                    table.end_cell();
                }
            }
            b"tr" if self.in_top_table() => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                }
            }
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    if let Some(table) = self.table.take() {
                        self.doc.add_table(table.build());
                    }
                }
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self, p: ParagraphBuilder) {
        match p.target {
            Target::Body => self.doc.add_paragraph(p.text),
            Target::Cell => {
                if let Some(cell) = self.table.as_mut().and_then(|t| t.cell.as_mut()) {
                    cell.paragraphs.push(p.text);
                }
            }
        }
    }
}
