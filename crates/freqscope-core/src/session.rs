//! Application state for one user working on one document.
//!
//! A [`Session`] holds the loaded document, the selected mode and the last
//! analysis. Every operation either succeeds completely or leaves the
//! session as it was.

use camino::Utf8Path;
use tracing::{debug, info};

use crate::analysis::{AnalysisMode, FrequencyTable, analyze};
use crate::chart::{ChartData, chart_data};
use crate::error::{AnalysisError, AnalysisResult, LoadResult};
use crate::loader::{self, Document, LoadOptions};

/// Current document, mode and analysis.
#[derive(Debug, Clone, Default)]
pub struct Session {
    document: Option<Document>,
    table: Option<FrequencyTable>,
    mode: AnalysisMode,
    options: LoadOptions,
}

impl Session {
    /// An empty session analyzing in `mode`.
    pub fn new(mode: AnalysisMode, options: LoadOptions) -> Self {
        Self {
            mode,
            options,
            ..Self::default()
        }
    }

    /// The loaded document, if any.
    pub const fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The last analysis, if it is still current.
    pub const fn table(&self) -> Option<&FrequencyTable> {
        self.table.as_ref()
    }

    /// The selected mode.
    pub const fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Load a document, replacing the current one.
    ///
    /// The previous analysis is dropped because it described the old
    /// document. On error nothing changes.
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self, path: &Utf8Path) -> LoadResult<&Document> {
        let doc = loader::load(path, &self.options)?;
        self.table = None;
        Ok(self.document.insert(doc))
    }

    /// Replace the working text with one column of the loaded table.
    ///
    /// Like the document-level operation, the current analysis is kept
    /// until the next [`analyze`](Self::analyze).
    pub fn select_column(&mut self, name: &str) -> LoadResult<()> {
        match self.document.as_mut() {
            Some(doc) => doc.select_column(name),
            None => Err(crate::error::LoadError::NotTabular),
        }
    }

    /// Select the mode for the next analysis.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        if mode != self.mode {
            debug!(from = %self.mode, to = %mode, "mode changed");
        }
        self.mode = mode;
    }

    /// Analyze the working text in the selected mode.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NoContent`] without a document and
    /// [`AnalysisError::EmptyInput`] if the document is empty.
    #[tracing::instrument(skip(self), fields(mode = %self.mode))]
    pub fn analyze(&mut self) -> AnalysisResult<&FrequencyTable> {
        let doc = self.document.as_ref().ok_or(AnalysisError::NoContent)?;
        let table = analyze(doc.raw_text(), self.mode)?;
        info!(
            counted = table.counted_units,
            distinct = table.ranked_entries.len(),
            "analysis stored"
        );
        Ok(self.table.insert(table))
    }

    /// Chart data for the last analysis.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotAnalyzed`] before any analysis and
    /// [`AnalysisError::NoData`] if the analysis counted nothing.
    pub fn chart_data(&self) -> AnalysisResult<ChartData> {
        let table = self.table.as_ref().ok_or(AnalysisError::NotAnalyzed)?;
        chart_data(table)
    }

    /// Forget the document and analysis. The selected mode is kept.
    pub fn clear(&mut self) {
        *self = Self::new(self.mode, self.options);
        info!("session cleared");
    }
}
