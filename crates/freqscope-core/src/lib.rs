//! Core library for freqscope.
//!
//! Loads text, CSV and spreadsheet documents, counts words, numbers,
//! letters or characters, and prepares the ranked results for display and
//! charting.
//!
//! # Modules
//!
//! - [`loader`] - Documents from text, CSV and `.xlsx` files
//! - [`analysis`] - Tokenization, filtering, counting and ranking
//! - [`chart`] - Top-N truncation and small-slice aggregation
//! - [`report`] - Statistics text and JSON reports
//! - [`render`] - SVG charts
//! - [`session`] - Document, mode and analysis held together
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use freqscope_core::{AnalysisMode, analyze, report};
//!
//! let table = analyze("Cat cat CAT dog.", AnalysisMode::Words).unwrap();
//! print!("{}", report::statistics_text(&table));
//! ```
#![deny(unsafe_code)]

pub mod analysis;
pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod render;
pub mod report;
pub mod session;
pub mod stopwords;

pub use analysis::{AnalysisMode, Entry, FrequencyRow, FrequencyTable, analyze};
pub use chart::{ChartData, chart_data};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{
    AnalysisError, AnalysisResult, ConfigError, ConfigResult, LoadError, LoadResult, RenderError,
};
pub use loader::{Document, LoadOptions, SourceKind, Table, load};
pub use session::Session;
