//! Error types for freqscope-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a document or selecting a column.
///
/// A failed load never replaces the document that was loaded before it.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("{path} is not valid UTF-8 (invalid byte at offset {offset})")]
    Decode {
        /// Path that was being decoded.
        path: Utf8PathBuf,
        /// Offset of the first invalid byte.
        offset: usize,
    },

    /// The file exceeds the configured input limit.
    #[error("input too large: {path} is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// Path that was rejected.
        path: Utf8PathBuf,
        /// Size of the file in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The CSV content is malformed.
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        /// Path of the CSV file.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// The spreadsheet archive or one of its XML parts is malformed.
    #[error("malformed spreadsheet {path}: {message}")]
    Spreadsheet {
        /// Path of the workbook.
        path: Utf8PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The workbook has no worksheet to read.
    #[error("{path} contains no worksheets")]
    EmptyWorkbook {
        /// Path of the workbook.
        path: Utf8PathBuf,
    },

    /// The spreadsheet format cannot be read by the available engine.
    #[error(".{extension} files are not supported by the {engine} spreadsheet engine; save {path} as .xlsx")]
    UnsupportedSpreadsheet {
        /// Path of the workbook.
        path: Utf8PathBuf,
        /// File extension that was rejected.
        extension: String,
        /// Name of the available engine.
        engine: &'static str,
    },

    /// This build has no spreadsheet reader at all.
    #[error("spreadsheet support is not available in this build (enable the `spreadsheet` feature)")]
    NoSpreadsheetEngine,

    /// Column data was requested but the current document is not tabular.
    #[error("no CSV or spreadsheet document is loaded")]
    NotTabular,

    /// Column selection was requested without a column name.
    #[error("no column selected")]
    NoColumnSelected,

    /// The requested column does not exist.
    #[error("unknown column: {name}. Available: {available}")]
    UnknownColumn {
        /// The column name that was requested.
        name: String,
        /// Comma-separated list of available column names.
        available: String,
    },
}

/// Result type alias using [`LoadError`].
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur during frequency analysis.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalysisError {
    /// The input text is empty.
    #[error("no content to analyze")]
    EmptyInput,

    /// Analysis was requested before any document was loaded.
    #[error("no document loaded")]
    NoContent,

    /// Charts or statistics were requested before running an analysis.
    #[error("no analysis has been run yet")]
    NotAnalyzed,

    /// The analysis found nothing countable, so no percentages exist.
    #[error("no data: nothing countable was found")]
    NoData,
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while writing chart output.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The chart had no data to draw.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
