//! Frequency analysis.
//!
//! [`analyze`] turns a text blob into a [`FrequencyTable`] for one
//! [`AnalysisMode`]. The modes differ only in how they normalize, tokenize
//! and filter; counting and ranking are shared.

pub mod mode;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use mode::{AnalysisMode, DEFAULT_TOP_N, LETTERS_TOP_N, ParseModeError};

use crate::error::{AnalysisError, AnalysisResult};

/// One ranked label and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The counted token.
    pub label: String,
    /// Number of occurrences.
    pub count: usize,
}

impl Entry {
    /// Create an entry.
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Result of analyzing one text in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    /// Mode the table was computed with.
    pub mode: AnalysisMode,
    /// Tokens extracted before filtering.
    pub total_units: usize,
    /// Tokens retained after filtering; the sum of all entry counts.
    pub counted_units: usize,
    /// Entries by count descending, ties in first-seen order.
    pub ranked_entries: Vec<Entry>,
}

/// A ranked entry with its share of the counted total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    /// The counted token.
    pub label: String,
    /// Number of occurrences.
    pub count: usize,
    /// `count / counted_units * 100`.
    pub percentage: f64,
}

impl FrequencyTable {
    /// Returns `true` if nothing survived filtering.
    pub const fn is_empty(&self) -> bool {
        self.counted_units == 0
    }

    /// Share of the counted total, as a percentage.
    ///
    /// Fails with [`AnalysisError::NoData`] instead of dividing by zero.
    pub fn percentage(&self, count: usize) -> AnalysisResult<f64> {
        if self.is_empty() {
            return Err(AnalysisError::NoData);
        }
        Ok(count as f64 / self.counted_units as f64 * 100.0)
    }

    /// Ranked entries with percentages attached.
    pub fn rows(&self) -> AnalysisResult<Vec<FrequencyRow>> {
        self.ranked_entries
            .iter()
            .map(|e| {
                Ok(FrequencyRow {
                    label: e.label.clone(),
                    count: e.count,
                    percentage: self.percentage(e.count)?,
                })
            })
            .collect::<AnalysisResult<Vec<_>>>()
            .and_then(|rows| {
                if rows.is_empty() {
                    Err(AnalysisError::NoData)
                } else {
                    Ok(rows)
                }
            })
    }

    /// The first `n` ranked entries.
    pub fn top(&self, n: usize) -> &[Entry] {
        &self.ranked_entries[..n.min(self.ranked_entries.len())]
    }
}

/// Analyze `text` in the given mode.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInput`] if `text` is empty. Text that
/// yields no countable units, whitespace included, is not an error; the
/// table comes back empty and [`FrequencyTable::rows`] reports no data.
#[tracing::instrument(skip(text), fields(text_len = text.len(), mode = %mode))]
pub fn analyze(text: &str, mode: AnalysisMode) -> AnalysisResult<FrequencyTable> {
    if text.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let normalized = mode.normalize(text);
    let tokens = mode.tokenize(&normalized);
    let total_units = tokens.len();

    let ranked_entries = rank(tokens.into_iter().filter(|t| mode.keep(t)));
    let counted_units = ranked_entries.iter().map(|e| e.count).sum();

    debug!(
        total_units,
        counted_units,
        distinct = ranked_entries.len(),
        "analysis complete"
    );

    Ok(FrequencyTable {
        mode,
        total_units,
        counted_units,
        ranked_entries,
    })
}

/// Count tokens and sort by count descending.
///
/// Entries are created in first-seen order and the sort is stable, so equal
/// counts keep that order.
fn rank<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<Entry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<Entry> = Vec::new();

    for token in tokens {
        match index.get(token) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(token, entries.len());
                entries.push(Entry::new(token, 1));
            }
        }
    }

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}
