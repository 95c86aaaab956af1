//! Office Open XML workbook reader.
//!
//! An `.xlsx` file is a zip archive of XML parts. Only the first worksheet
//! is read; its first row becomes the header.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use super::table::Table;

/// Name reported when a workbook format is outside what this reader handles.
pub const ENGINE: &str = "xlsx";

type Archive = ZipArchive<Cursor<Vec<u8>>>;

/// Widest sheet Excel allows (column `XFD`).
const MAX_COLUMNS: usize = 16_384;

/// Error from reading a workbook; the caller attaches the path.
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    /// The archive has no sheets.
    #[error("workbook has no sheets")]
    NoSheets,
    /// Anything else, described for the user.
    #[error("{0}")]
    Malformed(String),
}

impl From<String> for WorkbookError {
    fn from(message: String) -> Self {
        Self::Malformed(message)
    }
}

/// Read the first worksheet of a workbook into a [`Table`].
pub fn read_workbook(bytes: Vec<u8>) -> Result<Table, WorkbookError> {
    let mut zip =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("open .xlsx zip failed: {e}"))?;

    let sheet_path = first_sheet_path(&mut zip)?;
    let shared = match read_part(&mut zip, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };
    let sheet = read_part(&mut zip, &sheet_path)?
        .ok_or_else(|| format!("missing worksheet {sheet_path}"))?;

    let mut rows = parse_sheet(&sheet, &shared)?.into_iter();
    let header = rows.next().unwrap_or_default();
    let columns = header
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            if name.is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            }
        })
        .collect();

    Ok(Table::new(columns, rows.collect()))
}

// ---- Internal helpers ----

fn read_part(zip: &mut Archive, name: &str) -> Result<Option<String>, String> {
    let mut part = match zip.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(format!("read {name} failed: {e}")),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| format!("read {name} failed: {e}"))?;
    Ok(Some(xml))
}

/// Resolve the first `<sheet>` of `xl/workbook.xml` to its part path.
fn first_sheet_path(zip: &mut Archive) -> Result<String, WorkbookError> {
    let workbook = read_part(zip, "xl/workbook.xml")?
        .ok_or_else(|| "missing xl/workbook.xml".to_string())?;

    let mut reader = Reader::from_str(&workbook);
    let rel_id = loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                break attr(&e, b"id")?.ok_or(WorkbookError::NoSheets)?;
            }
            Ok(Event::Eof) => return Err(WorkbookError::NoSheets),
            Err(e) => return Err(format!("parse workbook.xml failed: {e}").into()),
            _ => {}
        }
    };

    let Some(rels) = read_part(zip, "xl/_rels/workbook.xml.rels")? else {
        return Ok("xl/worksheets/sheet1.xml".to_string());
    };

    let mut reader = Reader::from_str(&rels);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if attr(&e, b"Id")?.as_deref() != Some(rel_id.as_str()) {
                    continue;
                }
                let target = attr(&e, b"Target")?
                    .ok_or_else(|| format!("relationship {rel_id} has no target"))?;
                return Ok(match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{target}"),
                });
            }
            Ok(Event::Eof) => {
                return Err(format!("relationship {rel_id} not found").into());
            }
            Err(e) => return Err(format!("parse workbook.xml.rels failed: {e}").into()),
            _ => {}
        }
    }
}

/// Collect the text of every `<si>` item, skipping phonetic runs.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Ok(Event::Text(t)) if in_text && !in_phonetic => {
                current.push_str(&t.unescape().map_err(|e| e.to_string())?);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("parse sharedStrings.xml failed: {e}")),
            _ => {}
        }
    }
    Ok(strings)
}

/// A cell being assembled while its children are read.
struct PendingCell {
    column: usize,
    kind: Option<String>,
    value: String,
}

impl PendingCell {
    fn resolve(self, shared: &[String]) -> Result<(usize, String), String> {
        let value = match self.kind.as_deref() {
            Some("s") => {
                let idx: usize = self
                    .value
                    .trim()
                    .parse()
                    .map_err(|_| format!("bad shared string index {:?}", self.value))?;
                shared
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| format!("shared string {idx} out of range"))?
            }
            Some("b") => match self.value.trim() {
                "1" => "True".to_string(),
                _ => "False".to_string(),
            },
            _ => self.value,
        };
        Ok((self.column, value))
    }
}

/// Read every `<row>` of a worksheet into dense rows of cell text.
fn parse_sheet(xml: &str, shared: &[String]) -> Result<Vec<Vec<String>>, String> {
    let mut reader = Reader::from_str(xml);
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => row.clear(),
                b"c" => cell = Some(start_cell(&e, row.len())?),
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"c" => {
                let blank = start_cell(&e, row.len())?;
                place(&mut row, blank.column, String::new());
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"row" => rows.push(Vec::new()),
            Ok(Event::Text(t)) if in_value => {
                if let Some(c) = cell.as_mut() {
                    c.value.push_str(&t.unescape().map_err(|e| e.to_string())?);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(c) = cell.take() {
                        let (col, value) = c.resolve(shared)?;
                        place(&mut row, col, value);
                    }
                }
                b"row" => rows.push(std::mem::take(&mut row)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("parse worksheet failed: {e}")),
            _ => {}
        }
    }
    Ok(rows)
}

fn start_cell(e: &BytesStart<'_>, next_column: usize) -> Result<PendingCell, String> {
    let column = match attr(e, b"r")? {
        Some(reference) => column_index(&reference)
            .ok_or_else(|| format!("bad cell reference {reference:?}"))?,
        None => next_column,
    };
    Ok(PendingCell {
        column,
        kind: attr(e, b"t")?,
        value: String::new(),
    })
}

fn place(row: &mut Vec<String>, col: usize, value: String) {
    if row.len() <= col {
        row.resize(col + 1, String::new());
    }
    row[col] = value;
}

/// Zero-based column of an A1-style reference (`"C7"` → 2).
///
/// References past column `XFD` are rejected.
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let n = letters.iter().try_fold(0usize, |acc, b| {
        acc.checked_mul(26)?
            .checked_add(usize::from(b - b'A' + 1))
            .filter(|&n| n <= MAX_COLUMNS)
    })?;
    Some(n - 1)
}

/// Value of the attribute whose local name is `name`.
fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, String> {
    for a in e.attributes() {
        let a = a.map_err(|e| e.to_string())?;
        if a.key.local_name().as_ref() == name {
            return Ok(Some(
                a.unescape_value().map_err(|e| e.to_string())?.into_owned(),
            ));
        }
    }
    Ok(None)
}
