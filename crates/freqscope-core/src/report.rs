//! Statistics display.
//!
//! Formats a [`FrequencyTable`] as the plain-text statistics block, and
//! packages it with its source for JSON output.

use std::fmt::Write as _;

use serde::Serialize;

use crate::analysis::{AnalysisMode, FrequencyRow, FrequencyTable};
use crate::loader::{Document, SourceKind};

/// Width of the horizontal rules around the column header.
const RULE_WIDTH: usize = 40;

/// Render the statistics block for a table.
///
/// ```text
/// Total Words: 4
/// Meaningful Words: 4
///
/// Word Frequency Statistics:
/// ----------------------------------------
/// Word		Count		Percentage
/// ----------------------------------------
/// cat		3		75.00%
/// dog		1		25.00%
/// ```
///
/// A table with nothing counted renders the two totals and the empty
/// header; the caller decides how to report the missing data.
pub fn statistics_text(table: &FrequencyTable) -> String {
    let mode = table.mode;
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Total {}: {}", mode.unit_plural(), table.total_units);
    let _ = writeln!(
        out,
        "{} {}: {}",
        mode.counted_label(),
        mode.unit_plural(),
        table.counted_units
    );
    out.push('\n');
    let _ = writeln!(out, "{} Frequency Statistics:", mode.unit_singular());
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{}\t\tCount\t\tPercentage", mode.unit_singular());
    let _ = writeln!(out, "{rule}");

    for row in table.rows().unwrap_or_default() {
        let _ = writeln!(out, "{}\t\t{}\t\t{:.2}%", row.label, row.count, row.percentage);
    }

    out
}

/// Serializable summary of one analysis, for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Source file.
    pub file: String,
    /// Kind of source.
    pub source_kind: SourceKind,
    /// Selected column, if the working text is a single column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_column: Option<String>,
    /// Mode the analysis ran in.
    pub mode: AnalysisMode,
    /// Tokens before filtering.
    pub total_units: usize,
    /// Tokens after filtering.
    pub counted_units: usize,
    /// Ranked entries with percentages; empty when nothing was counted.
    pub entries: Vec<FrequencyRow>,
}

impl Report {
    /// Build a report for a document and its analysis.
    pub fn new(document: &Document, table: &FrequencyTable) -> Self {
        Self {
            file: document.path().to_string(),
            source_kind: document.source_kind(),
            selected_column: document.selected_column().map(String::from),
            mode: table.mode,
            total_units: table.total_units,
            counted_units: table.counted_units,
            entries: table.rows().unwrap_or_default(),
        }
    }
}
