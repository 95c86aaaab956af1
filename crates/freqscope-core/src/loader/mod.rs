//! Document loading.
//!
//! Resolves a path to a [`Document`]: plain text is read as UTF-8, CSV files
//! and workbooks are parsed into a [`Table`] whose text rendering becomes
//! the working text until a single column is selected.

pub mod table;
#[cfg(feature = "spreadsheet")]
mod xlsx;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use table::Table;

use crate::error::{LoadError, LoadResult};

/// What kind of file a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Plain text.
    Text,
    /// Comma-separated values.
    Csv,
    /// Spreadsheet workbook.
    Excel,
}

impl SourceKind {
    /// Classify a path by extension, case-insensitively.
    ///
    /// Unknown or missing extensions are treated as plain text.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("csv") => Self::Csv,
            Some("xlsx" | "xls") => Self::Excel,
            _ => Self::Text,
        }
    }

    /// Returns the kind as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }

    /// Whether documents of this kind have columns.
    pub const fn is_tabular(&self) -> bool {
        matches!(self, Self::Csv | Self::Excel)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings that apply to every load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Reject files larger than this many bytes. `None` reads any size.
    pub max_input_bytes: Option<usize>,
}

/// The currently loaded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: Utf8PathBuf,
    source_kind: SourceKind,
    raw_text: String,
    selected_column: Option<String>,
    table: Option<Table>,
}

impl Document {
    /// Build a plain-text document from a string already in memory.
    pub fn from_text(path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source_kind: SourceKind::Text,
            raw_text: text.into(),
            selected_column: None,
            table: None,
        }
    }

    /// Build a tabular document; the working text is the whole table.
    pub fn from_table(path: impl Into<Utf8PathBuf>, kind: SourceKind, table: Table) -> Self {
        Self {
            path: path.into(),
            source_kind: kind,
            raw_text: table.to_text(),
            selected_column: None,
            table: Some(table),
        }
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// File name component of the path, or the whole path if it has none.
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }

    /// Kind of source file.
    pub const fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// The text that analysis runs on.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// The column whose text replaced the table text, if any.
    pub fn selected_column(&self) -> Option<&str> {
        self.selected_column.as_deref()
    }

    /// Parsed table for CSV and spreadsheet sources.
    pub const fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Column names of a tabular source.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotTabular`] for plain-text documents.
    pub fn columns(&self) -> LoadResult<&[String]> {
        self.table
            .as_ref()
            .map(Table::columns)
            .ok_or(LoadError::NotTabular)
    }

    /// Replace the working text with one column rendered as text.
    ///
    /// This does not run an analysis. On error the document is unchanged.
    #[tracing::instrument(skip(self), fields(path = %self.path))]
    pub fn select_column(&mut self, name: &str) -> LoadResult<()> {
        let table = self.table.as_ref().ok_or(LoadError::NotTabular)?;
        if name.is_empty() {
            return Err(LoadError::NoColumnSelected);
        }
        let text = table
            .column_text(name)
            .ok_or_else(|| LoadError::UnknownColumn {
                name: name.to_string(),
                available: table.columns().join(", "),
            })?;

        self.raw_text = text;
        self.selected_column = Some(name.to_string());
        info!(column = name, "column selected");
        Ok(())
    }
}

/// Load a document, choosing the reader from the file extension.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read, is not UTF-8, is
/// malformed, or is a spreadsheet format this build cannot read.
#[tracing::instrument(skip(options), fields(path = %path))]
pub fn load(path: &Utf8Path, options: &LoadOptions) -> LoadResult<Document> {
    let kind = SourceKind::from_path(path);
    debug!(kind = %kind, "loading document");

    let doc = match kind {
        SourceKind::Text => load_text(path, options)?,
        SourceKind::Csv => load_csv(path, options)?,
        SourceKind::Excel => load_spreadsheet(path, options)?,
    };

    info!(
        kind = %doc.source_kind,
        bytes = doc.raw_text.len(),
        columns = doc.table.as_ref().map_or(0, |t| t.columns().len()),
        "document loaded"
    );
    Ok(doc)
}

/// Read a UTF-8 text file.
pub fn load_text(path: &Utf8Path, options: &LoadOptions) -> LoadResult<Document> {
    let text = read_utf8(path, options)?;
    Ok(Document::from_text(path, text))
}

/// Read a CSV file whose first record is the header.
pub fn load_csv(path: &Utf8Path, options: &LoadOptions) -> LoadResult<Document> {
    let text = read_utf8(path, options)?;
    let table = parse_csv(&text).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Document::from_table(path, SourceKind::Csv, table))
}

/// Read the first worksheet of a workbook.
#[cfg(feature = "spreadsheet")]
pub fn load_spreadsheet(path: &Utf8Path, options: &LoadOptions) -> LoadResult<Document> {
    let extension = path.extension().unwrap_or_default().to_ascii_lowercase();
    if extension != "xlsx" {
        return Err(LoadError::UnsupportedSpreadsheet {
            path: path.to_path_buf(),
            extension,
            engine: xlsx::ENGINE,
        });
    }

    let bytes = read_bytes(path, options)?;
    let table = xlsx::read_workbook(bytes).map_err(|e| match e {
        xlsx::WorkbookError::NoSheets => LoadError::EmptyWorkbook {
            path: path.to_path_buf(),
        },
        xlsx::WorkbookError::Malformed(message) => LoadError::Spreadsheet {
            path: path.to_path_buf(),
            message,
        },
    })?;
    Ok(Document::from_table(path, SourceKind::Excel, table))
}

/// Read the first worksheet of a workbook.
#[cfg(not(feature = "spreadsheet"))]
pub fn load_spreadsheet(_path: &Utf8Path, _options: &LoadOptions) -> LoadResult<Document> {
    Err(LoadError::NoSpreadsheetEngine)
}

fn parse_csv(text: &str) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns = reader.headers()?.iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(String::from).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok(Table::new(columns, rows))
}

fn read_bytes(path: &Utf8Path, options: &LoadOptions) -> LoadResult<Vec<u8>> {
    let read_err = |source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    };

    // Preflight: check file size via metadata before reading into memory.
    if let Some(limit) = options.max_input_bytes {
        let size = std::fs::metadata(path.as_std_path())
            .map_err(read_err)?
            .len();
        if size > limit as u64 {
            return Err(LoadError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            });
        }
    }

    std::fs::read(path.as_std_path()).map_err(read_err)
}

fn read_utf8(path: &Utf8Path, options: &LoadOptions) -> LoadResult<String> {
    let bytes = read_bytes(path, options)?;
    String::from_utf8(bytes).map_err(|e| LoadError::Decode {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> Utf8PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(SourceKind::from_path("a.txt".into()), SourceKind::Text);
        assert_eq!(SourceKind::from_path("a.CSV".into()), SourceKind::Csv);
        assert_eq!(SourceKind::from_path("a.xlsx".into()), SourceKind::Excel);
        assert_eq!(SourceKind::from_path("a.xls".into()), SourceKind::Excel);
        assert_eq!(SourceKind::from_path("README".into()), SourceKind::Text);
        assert_eq!(SourceKind::from_path("notes.md".into()), SourceKind::Text);
    }

    #[test]
    fn loads_plain_text() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "notes.txt", "Ana are mere.".as_bytes());
        let doc = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(doc.source_kind(), SourceKind::Text);
        assert_eq!(doc.raw_text(), "Ana are mere.");
        assert_eq!(doc.file_name(), "notes.txt");
        assert!(matches!(doc.columns(), Err(LoadError::NotTabular)));
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "bad.txt", &[b'o', b'k', 0xff, 0xfe]);
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Decode { offset: 2, .. }), "{err}");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("nope.txt")).unwrap();
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn size_limit_rejects_large_files() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "big.txt", &[b'a'; 64]);
        let opts = LoadOptions {
            max_input_bytes: Some(16),
        };
        let err = load(&path, &opts).unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { size: 64, limit: 16, .. }));
    }

    #[test]
    fn csv_loads_as_table_text() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "pets.csv", b"name,kind\nRex,dog\nTom,cat\n");
        let doc = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(doc.source_kind(), SourceKind::Csv);
        assert_eq!(doc.columns().unwrap(), ["name", "kind"]);
        assert!(doc.raw_text().contains("name"));
        assert!(doc.raw_text().contains("Rex"));
        assert!(doc.raw_text().contains("cat"));
        assert!(doc.selected_column().is_none());
    }

    #[test]
    fn ragged_csv_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "bad.csv", b"a,b\n1,2,3\n");
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }), "{err}");
    }

    #[test]
    fn selecting_a_column_replaces_text() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "pets.csv", b"name,kind\nRex,dog\nTom,cat\n");
        let mut doc = load(&path, &LoadOptions::default()).unwrap();

        doc.select_column("kind").unwrap();
        assert_eq!(doc.selected_column(), Some("kind"));
        assert!(doc.raw_text().contains("dog"));
        assert!(!doc.raw_text().contains("Rex"));
        assert!(!doc.raw_text().contains("name"));
    }

    #[test]
    fn column_errors_leave_document_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "pets.csv", b"name,kind\nRex,dog\n");
        let mut doc = load(&path, &LoadOptions::default()).unwrap();
        let before = doc.clone();

        let err = doc.select_column("age").unwrap_err();
        match err {
            LoadError::UnknownColumn { name, available } => {
                assert_eq!(name, "age");
                assert_eq!(available, "name, kind");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(doc.select_column(""), Err(LoadError::NoColumnSelected)));
        assert_eq!(doc, before);
    }

    #[test]
    fn column_selection_needs_a_table() {
        let mut doc = Document::from_text("a.txt", "plain");
        assert!(matches!(doc.select_column("x"), Err(LoadError::NotTabular)));
    }

    #[cfg(feature = "spreadsheet")]
    #[test]
    fn legacy_xls_is_unsupported() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "old.xls", b"\xd0\xcf\x11\xe0");
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(
            matches!(err, LoadError::UnsupportedSpreadsheet { ref extension, .. } if extension == "xls"),
            "{err}"
        );
    }

    #[cfg(feature = "spreadsheet")]
    fn write_workbook(dir: &TempDir, name: &str, parts: &[(&str, &str)]) -> Utf8PathBuf {
        use std::io::Write;

        let path = dir.path().join(name);
        let mut zip = zip::ZipWriter::new(fs::File::create(&path).unwrap());
        for (part, body) in parts {
            zip.start_file(*part, zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[cfg(feature = "spreadsheet")]
    #[test]
    fn xlsx_loads_first_sheet_as_table() {
        let tmp = TempDir::new().unwrap();
        // No relationships part: the reader falls back to sheet1.xml.
        let path = write_workbook(
            &tmp,
            "cities.XLSX",
            &[
                (
                    "xl/workbook.xml",
                    r#"<workbook xmlns:r="r"><sheets><sheet name="S" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
                ),
                (
                    "xl/worksheets/sheet1.xml",
                    r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>city</t></is></c><c r="B1" t="inlineStr"><is><t>pop</t></is></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>Cluj</t></is></c><c r="B2"><v>286598</v></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>Iași</t></is></c></row>
</sheetData></worksheet>"#,
                ),
            ],
        );

        let mut doc = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(doc.source_kind(), SourceKind::Excel);
        assert_eq!(doc.columns().unwrap(), ["city", "pop"]);
        assert!(doc.raw_text().contains("NaN"));

        doc.select_column("city").unwrap();
        assert_eq!(doc.raw_text(), "0    Cluj\n1    Iași");
    }

    #[cfg(feature = "spreadsheet")]
    #[test]
    fn workbook_without_sheets_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = write_workbook(
            &tmp,
            "empty.xlsx",
            &[("xl/workbook.xml", "<workbook><sheets/></workbook>")],
        );
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyWorkbook { .. }), "{err}");
    }

    #[cfg(feature = "spreadsheet")]
    #[test]
    fn out_of_range_cell_reference_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = write_workbook(
            &tmp,
            "wide.xlsx",
            &[
                (
                    "xl/workbook.xml",
                    r#"<workbook xmlns:r="r"><sheets><sheet name="S" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
                ),
                (
                    "xl/worksheets/sheet1.xml",
                    r#"<worksheet><sheetData><row r="1"><c r="ZZZZZZ1"><v>1</v></c></row></sheetData></worksheet>"#,
                ),
            ],
        );
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(
            matches!(err, LoadError::Spreadsheet { ref message, .. } if message.contains("bad cell reference")),
            "{err}"
        );
    }

    #[cfg(feature = "spreadsheet")]
    #[test]
    fn garbage_xlsx_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "broken.xlsx", b"not a zip");
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet { .. }), "{err}");
    }
}
