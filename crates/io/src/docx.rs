// WordprocessingML loader: zip container -> raw paragraphs and tables.
//
// Only the main document part and the style sheet are read. Headers,
// footers, footnotes and comments are not part of the body.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use docdelta_core::model::{Block, RawDocument, RawParagraph, RawTable};

use crate::error::UnreadableDocument;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Paragraph style used when a paragraph names none and the style sheet
/// declares no default.
const FALLBACK_STYLE: &str = "Normal";

/// Read the body of a `.docx` byte stream in document order.
pub fn load(bytes: &[u8]) -> Result<RawDocument, UnreadableDocument> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(UnreadableDocument::Container)?;

    let document_xml = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or(UnreadableDocument::MissingPart(DOCUMENT_PART))?;

    // The style sheet only supplies display names; a broken one degrades to
    // raw style ids instead of failing the document.
    let styles = match read_part(&mut archive, STYLES_PART) {
        Ok(Some(xml)) => StyleSheet::parse(&xml).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring unreadable style sheet");
            StyleSheet::default()
        }),
        Ok(None) => StyleSheet::default(),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable style sheet");
            StyleSheet::default()
        }
    };

    let raw = read_body(&document_xml, &styles)?;
    tracing::debug!(
        paragraphs = raw.paragraphs.len(),
        tables = raw.tables.len(),
        styles = styles.names.len(),
        "loaded docx body"
    );
    Ok(raw)
}

/// Read one part as UTF-8 text. `Ok(None)` when the part is absent.
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Option<String>, UnreadableDocument> {
    let mut file = match archive.by_name(path) {
        Ok(f) => f,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(UnreadableDocument::Container(err)),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let text = String::from_utf8(bytes).map_err(|err| UnreadableDocument::Malformed {
        part: path.to_string(),
        message: err.to_string(),
    })?;
    Ok(Some(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }))
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// Paragraph style ids resolved to display names.
#[derive(Debug, Default)]
struct StyleSheet {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

#[derive(Default)]
struct PendingStyle {
    id: String,
    name: Option<String>,
    is_default_paragraph: bool,
}

impl StyleSheet {
    fn parse(xml: &str) -> Result<Self, quick_xml::Error> {
        let mut sheet = Self::default();
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut pending: Option<PendingStyle> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"style" => {
                        if let Some(done) = pending.take() {
                            sheet.insert(done);
                        }
                        pending = attr(e, b"styleId").map(|id| PendingStyle {
                            id,
                            name: None,
                            is_default_paragraph: attr(e, b"type").as_deref()
                                == Some("paragraph")
                                && is_on(attr(e, b"default").as_deref()),
                        });
                    }
                    b"name" => {
                        if let (Some(style), Some(val)) = (pending.as_mut(), attr(e, b"val")) {
                            style.name = Some(val);
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) if e.local_name().as_ref() == b"style" => {
                    if let Some(done) = pending.take() {
                        sheet.insert(done);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        if let Some(done) = pending.take() {
            sheet.insert(done);
        }
        Ok(sheet)
    }

    fn insert(&mut self, style: PendingStyle) {
        let name = match style.name {
            Some(name) => capitalize(&name),
            None => style.id.clone(),
        };
        if style.is_default_paragraph {
            self.default_paragraph = Some(name.clone());
        }
        self.names.insert(style.id, name);
    }

    fn display_name(&self, style_id: Option<&str>) -> String {
        match style_id {
            Some(id) => self
                .names
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
            None => self
                .default_paragraph
                .clone()
                .unwrap_or_else(|| FALLBACK_STYLE.to_string()),
        }
    }
}

/// Built-in styles are stored lower-case (`heading 2`); show them as Word does.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

fn read_body(xml: &str, styles: &StyleSheet) -> Result<RawDocument, UnreadableDocument> {
    let mut reader = Reader::from_str(xml);
    // Keep whitespace: `<w:t xml:space="preserve"> </w:t>` is real text.
    reader.config_mut().trim_text(false);
    let mut body = BodyReader::new(styles);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => body.open(e, false),
            Ok(Event::Empty(ref e)) => body.open(e, true),
            Ok(Event::End(ref e)) => body.close(e.local_name().as_ref()),
            Ok(Event::Text(ref e)) => body.text(&String::from_utf8_lossy(e.as_ref())),
            Ok(Event::GeneralRef(ref e)) => {
                if let Some(resolved) = decode_reference(e) {
                    body.text(&resolved);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(UnreadableDocument::Malformed {
                    part: DOCUMENT_PART.to_string(),
                    message: format!("{err} (near byte {})", reader.buffer_position()),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(body.finish())
}

/// Resolve `&amp;`-style entities and `&#123;` / `&#x7B;` character references.
fn decode_reference(name: &[u8]) -> Option<String> {
    let name = std::str::from_utf8(name).ok()?;
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let resolved = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => return None,
    };
    Some(resolved.to_string())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum VerticalMerge {
    #[default]
    None,
    Restart,
    Continue,
}

#[derive(Debug, Default)]
struct OpenParagraph {
    text: String,
    style_id: Option<String>,
}

#[derive(Debug)]
struct OpenCell {
    lines: Vec<String>,
    span: usize,
    merge: VerticalMerge,
}

impl Default for OpenCell {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            span: 1,
            merge: VerticalMerge::None,
        }
    }
}

/// The outermost table being read. Nested tables only contribute text.
#[derive(Debug)]
struct OpenTable {
    page: u32,
    rows: Vec<Vec<String>>,
    cells: Vec<OpenCell>,
    cell: Option<OpenCell>,
}

impl OpenTable {
    fn new(page: u32) -> Self {
        Self {
            page,
            rows: Vec::new(),
            cells: Vec::new(),
            cell: None,
        }
    }

    fn close_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            self.cells.push(cell);
        }
    }

    /// Expand spans across grid columns and fill vertical-merge
    /// continuations from the row above.
    fn close_row(&mut self) {
        let above = self.rows.last();
        let mut row: Vec<String> = Vec::new();
        for cell in self.cells.drain(..) {
            let text = cell.lines.join("\n").trim().to_string();
            for _ in 0..cell.span {
                let value = match cell.merge {
                    VerticalMerge::Continue => above
                        .and_then(|r| r.get(row.len()))
                        .cloned()
                        .unwrap_or_default(),
                    VerticalMerge::None | VerticalMerge::Restart => text.clone(),
                };
                row.push(value);
            }
        }
        self.rows.push(row);
    }

    fn finish(self) -> RawTable {
        RawTable {
            rows: self.rows,
            page: self.page,
        }
    }
}

/// Event-driven state for `word/document.xml`.
struct BodyReader<'s> {
    styles: &'s StyleSheet,
    doc: RawDocument,
    /// 1-based page of the current position.
    page: u32,
    /// An explicit break was seen and no text followed yet, so the next
    /// rendered-break marker describes the same page.
    explicit_break_pending: bool,
    /// Body paragraphs seen so far, empty ones included.
    paragraphs_seen: usize,
    /// Depth inside an element whose content is not document text.
    skip_depth: usize,
    run_depth: usize,
    in_text: bool,
    paragraph: Option<OpenParagraph>,
    table_depth: usize,
    table: Option<OpenTable>,
}

impl<'s> BodyReader<'s> {
    fn new(styles: &'s StyleSheet) -> Self {
        Self {
            styles,
            doc: RawDocument::default(),
            page: 1,
            explicit_break_pending: false,
            paragraphs_seen: 0,
            skip_depth: 0,
            run_depth: 0,
            in_text: false,
            paragraph: None,
            table_depth: 0,
            table: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        if self.skip_depth > 0 {
            if !empty {
                self.skip_depth += 1;
            }
            return;
        }

        let in_run = self.run_depth > 0;
        match e.local_name().as_ref() {
            // Alternate renderings, field codes, tracked deletions, text boxes.
            b"Fallback" | b"instrText" | b"delText" | b"txbxContent" => {
                if !empty {
                    self.skip_depth = 1;
                }
            }
            b"p" => {
                self.paragraph = Some(OpenParagraph::default());
                if empty {
                    self.close_paragraph();
                }
            }
            b"pStyle" => {
                if self.table_depth == 0 {
                    if let Some(p) = self.paragraph.as_mut() {
                        p.style_id = attr(e, b"val");
                    }
                }
            }
            b"r" if !empty => self.run_depth += 1,
            b"t" if !empty => self.in_text = in_run,
            b"tab" if in_run => self.push_text("\t"),
            b"cr" if in_run => self.push_text("\n"),
            b"noBreakHyphen" if in_run => self.push_text("-"),
            b"br" if in_run => {
                if attr(e, b"type").as_deref() == Some("page") {
                    self.explicit_break();
                } else {
                    self.push_text("\n");
                }
            }
            b"pageBreakBefore" => {
                if is_on(attr(e, b"val").as_deref()) {
                    self.explicit_break();
                }
            }
            b"lastRenderedPageBreak" => {
                if self.explicit_break_pending {
                    self.explicit_break_pending = false;
                } else {
                    self.page += 1;
                }
            }
            b"tbl" if !empty => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Some(OpenTable::new(self.page));
                }
            }
            b"tr" if !empty && self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    table.cells.clear();
                }
            }
            b"tc" if !empty && self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    table.cell = Some(OpenCell::default());
                }
            }
            b"gridSpan" if self.table_depth == 1 => {
                if let Some(cell) = self.open_cell() {
                    cell.span = attr(e, b"val")
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(1)
                        .max(1);
                }
            }
            b"vMerge" if self.table_depth == 1 => {
                if let Some(cell) = self.open_cell() {
                    cell.merge = match attr(e, b"val").as_deref() {
                        Some("restart") => VerticalMerge::Restart,
                        _ => VerticalMerge::Continue,
                    };
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        match name {
            b"p" => self.close_paragraph(),
            b"r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"t" => self.in_text = false,
            b"tc" if self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    table.close_cell();
                }
            }
            b"tr" if self.table_depth == 1 => {
                if let Some(table) = self.table.as_mut() {
                    table.close_row();
                }
            }
            b"tbl" => {
                if self.table_depth == 1 {
                    if let Some(table) = self.table.take() {
                        let slot = self.doc.tables.len();
                        self.doc.tables.push(table.finish());
                        self.doc.blocks.push(Block::Table(slot));
                    }
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text && self.skip_depth == 0 {
            self.push_text(text);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(p) = self.paragraph.as_mut() {
            p.text.push_str(text);
            if !text.trim().is_empty() {
                self.explicit_break_pending = false;
            }
        }
    }

    fn explicit_break(&mut self) {
        self.page += 1;
        self.explicit_break_pending = true;
    }

    fn open_cell(&mut self) -> Option<&mut OpenCell> {
        self.table.as_mut().and_then(|t| t.cell.as_mut())
    }

    fn close_paragraph(&mut self) {
        let Some(paragraph) = self.paragraph.take() else {
            return;
        };

        if self.table_depth > 0 {
            // Paragraphs of nested tables fold into the outer cell too.
            if let Some(cell) = self.open_cell() {
                cell.lines.push(paragraph.text);
            }
            return;
        }

        let index = self.paragraphs_seen;
        self.paragraphs_seen += 1;
        let text = paragraph.text.trim();
        if text.is_empty() {
            return;
        }
        let slot = self.doc.paragraphs.len();
        self.doc.paragraphs.push(RawParagraph {
            index,
            text: text.to_string(),
            style_name: self.styles.display_name(paragraph.style_id.as_deref()),
        });
        self.doc.blocks.push(Block::Paragraph(slot));
    }

    fn finish(self) -> RawDocument {
        self.doc
    }
}

/// Attribute value by local name (`w:val` and `val` both match `b"val"`).
fn attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// OOXML on/off value: absent means on.
fn is_on(val: Option<&str>) -> bool {
    !matches!(val, Some("0") | Some("false") | Some("off"))
}
