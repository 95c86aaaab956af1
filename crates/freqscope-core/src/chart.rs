//! Chart pre-processing.
//!
//! Truncates a [`FrequencyTable`] to its top entries and folds slices too
//! thin to read into a synthetic "Other" slice. Drawing is left to
//! [`crate::render`] and the CLI.

use serde::{Deserialize, Serialize};

use crate::analysis::{Entry, FrequencyTable};
use crate::error::{AnalysisError, AnalysisResult};

/// Minimum share of the top-N total a slice needs to be drawn on its own.
pub const OTHER_THRESHOLD: f64 = 0.02;

/// Label of the aggregated slice.
pub const OTHER_LABEL: &str = "Other";

/// Fill color of the aggregated slice.
pub const OTHER_COLOR: Rgb = Rgb(0x80, 0x80, 0x80);

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// CSS hex notation, e.g. `#4292c6`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Sequential blue ramp, light to dark.
const BLUES: [Rgb; 9] = [
    Rgb(0xf7, 0xfb, 0xff),
    Rgb(0xde, 0xeb, 0xf7),
    Rgb(0xc6, 0xdb, 0xef),
    Rgb(0x9e, 0xca, 0xe1),
    Rgb(0x6b, 0xae, 0xd6),
    Rgb(0x42, 0x92, 0xc6),
    Rgb(0x21, 0x71, 0xb5),
    Rgb(0x08, 0x51, 0x9c),
    Rgb(0x08, 0x30, 0x6b),
];

/// Sample the blue ramp at `t` in `[0, 1]`.
pub fn blues(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0) * (BLUES.len() - 1) as f64;
    let lo = t.floor() as usize;
    let hi = (lo + 1).min(BLUES.len() - 1);
    let frac = t - lo as f64;
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    Rgb(
        mix(BLUES[lo].0, BLUES[hi].0),
        mix(BLUES[lo].1, BLUES[hi].1),
        mix(BLUES[lo].2, BLUES[hi].2),
    )
}

/// Whether a pie slice is a real entry or the aggregated remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceKind {
    /// A ranked entry.
    Entry,
    /// The sum of entries below [`OTHER_THRESHOLD`].
    Other,
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Slice label.
    pub label: String,
    /// Count represented by the slice.
    pub count: usize,
    /// Share of the top-N total, in `[0, 1]`.
    pub share: f64,
    /// Fill color.
    pub color: Rgb,
    /// Entry or aggregate.
    pub kind: SliceKind,
}

/// A legend line for one of the top-N entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    /// `label (xx.x%)`.
    pub text: String,
    /// Color assigned to the entry on the ramp.
    pub color: Rgb,
}

/// One bar of the bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar label.
    pub label: String,
    /// `count / counted_units`, printed above the bar.
    pub frequency: f64,
}

/// Everything needed to draw the pie and bar charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Plural unit name for titles ("Words", "Letters").
    pub unit: String,
    /// Cap that was applied.
    pub top_n: usize,
    /// The top-N ranked entries.
    pub entries: Vec<Entry>,
    /// Pie slices: entries at or above the threshold, then "Other".
    pub slices: Vec<Slice>,
    /// Legend for every top-N entry, including those folded into "Other".
    pub legend: Vec<LegendItem>,
    /// Bars for the top-N entries.
    pub bars: Vec<Bar>,
}

impl ChartData {
    /// Pie title, e.g. `Top 10 Words - Distribution`.
    pub fn pie_title(&self) -> String {
        format!("Top {} {} - Distribution", self.entries.len(), self.unit)
    }

    /// Bar chart title, e.g. `Words Frequencies`.
    pub fn bar_title(&self) -> String {
        format!("{} Frequencies", self.unit)
    }

    /// Sum of all slice counts; always equals the top-N total.
    pub fn slice_total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }
}

/// Fold entries under `threshold` of their combined total into one slice.
///
/// `entries` should already be truncated to the displayed set. Real slices
/// keep their rank order; the "Other" slice, if any, comes last.
pub fn aggregate_small_slices(entries: &[Entry], threshold: f64) -> Vec<Slice> {
    let total: usize = entries.iter().map(|e| e.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let n = entries.len();
    let mut slices = Vec::with_capacity(n + 1);
    let mut other = 0;

    for (i, e) in entries.iter().enumerate() {
        let share = e.count as f64 / total as f64;
        if share >= threshold {
            slices.push(Slice {
                label: e.label.clone(),
                count: e.count,
                share,
                color: ramp_color(i, n),
                kind: SliceKind::Entry,
            });
        } else {
            other += e.count;
        }
    }

    if other > 0 {
        slices.push(Slice {
            label: OTHER_LABEL.to_string(),
            count: other,
            share: other as f64 / total as f64,
            color: OTHER_COLOR,
            kind: SliceKind::Other,
        });
    }

    slices
}

/// Build chart data for a table using its mode's top-N cap.
///
/// # Errors
///
/// Returns [`AnalysisError::NoData`] if the table is empty.
#[tracing::instrument(skip_all, fields(mode = %table.mode))]
pub fn chart_data(table: &FrequencyTable) -> AnalysisResult<ChartData> {
    chart_data_with(table, table.mode.top_n(), OTHER_THRESHOLD)
}

/// Build chart data with an explicit cap and threshold.
pub fn chart_data_with(
    table: &FrequencyTable,
    top_n: usize,
    threshold: f64,
) -> AnalysisResult<ChartData> {
    if table.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let entries = table.top(top_n).to_vec();
    let top_total: usize = entries.iter().map(|e| e.count).sum();
    let n = entries.len();

    let legend = entries
        .iter()
        .enumerate()
        .map(|(i, e)| LegendItem {
            text: format!(
                "{} ({:.1}%)",
                e.label,
                e.count as f64 / top_total as f64 * 100.0
            ),
            color: ramp_color(i, n),
        })
        .collect();

    let bars = entries
        .iter()
        .map(|e| Bar {
            label: e.label.clone(),
            frequency: e.count as f64 / table.counted_units as f64,
        })
        .collect();

    let slices = aggregate_small_slices(&entries, threshold);
    tracing::debug!(top_n, slices = slices.len(), "chart data built");

    Ok(ChartData {
        unit: table.mode.unit_plural().to_string(),
        top_n,
        entries,
        slices,
        legend,
        bars,
    })
}

/// Color of the `i`-th of `n` entries on the blue ramp.
fn ramp_color(i: usize, n: usize) -> Rgb {
    blues((i + 1) as f64 / (n + 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisMode, analyze};

    fn table(entries: &[(&str, usize)]) -> FrequencyTable {
        let ranked_entries: Vec<Entry> = entries.iter().map(|&(l, c)| Entry::new(l, c)).collect();
        let counted_units = ranked_entries.iter().map(|e| e.count).sum();
        FrequencyTable {
            mode: AnalysisMode::Words,
            total_units: counted_units,
            counted_units,
            ranked_entries,
        }
    }

    #[test]
    fn small_entries_fold_into_other() {
        // Top 10 total is 500; the last four hold 1..4 each (< 2% = 10).
        let t = table(&[
            ("a", 120),
            ("b", 100),
            ("c", 90),
            ("d", 80),
            ("e", 50),
            ("f", 50),
            ("g", 4),
            ("h", 3),
            ("i", 2),
            ("j", 1),
            ("k", 1),
            ("l", 1),
        ]);
        let data = chart_data(&t).unwrap();

        assert_eq!(data.entries.len(), 10);
        let top_total: usize = data.entries.iter().map(|e| e.count).sum();
        assert_eq!(top_total, 500);

        let real: Vec<&str> = data
            .slices
            .iter()
            .filter(|s| s.kind == SliceKind::Entry)
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(real, vec!["a", "b", "c", "d", "e", "f"]);

        let other = data.slices.last().unwrap();
        assert_eq!(other.kind, SliceKind::Other);
        assert_eq!(other.label, "Other");
        assert_eq!(other.count, 4 + 3 + 2 + 1);
        assert_eq!(other.color, OTHER_COLOR);

        assert_eq!(data.slice_total(), top_total);
    }

    #[test]
    fn no_other_slice_when_everything_is_large() {
        let t = table(&[("cat", 3), ("dog", 1)]);
        let data = chart_data(&t).unwrap();
        assert_eq!(data.slices.len(), 2);
        assert!(data.slices.iter().all(|s| s.kind == SliceKind::Entry));
    }

    #[test]
    fn literal_other_label_is_not_merged() {
        let t = table(&[("Other", 50), ("x", 49), ("y", 1)]);
        let data = chart_data_with(&t, 10, OTHER_THRESHOLD).unwrap();
        let others: Vec<_> = data.slices.iter().filter(|s| s.label == "Other").collect();
        assert_eq!(others.len(), 2);
        assert_eq!(data.slice_total(), 100);
    }

    #[test]
    fn letters_use_twenty_slices() {
        let t = analyze("abcdefghijklmnopqrstuvwxyz", AnalysisMode::Letters).unwrap();
        let data = chart_data(&t).unwrap();
        assert_eq!(data.top_n, 20);
        assert_eq!(data.entries.len(), 20);
        assert_eq!(data.bars.len(), 20);
        assert_eq!(data.pie_title(), "Top 20 Letters - Distribution");
    }

    #[test]
    fn bars_use_share_of_counted_total() {
        let t = table(&[("cat", 3), ("dog", 1)]);
        let data = chart_data(&t).unwrap();
        assert!((data.bars[0].frequency - 0.75).abs() < f64::EPSILON);
        assert!((data.bars[1].frequency - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn legend_labels_show_share_of_top_total() {
        let t = table(&[("cat", 3), ("dog", 1)]);
        let data = chart_data(&t).unwrap();
        assert_eq!(data.legend[0].text, "cat (75.0%)");
        assert_eq!(data.legend[1].text, "dog (25.0%)");
        assert_eq!(data.bar_title(), "Words Frequencies");
    }

    #[test]
    fn empty_table_has_no_chart() {
        let t = analyze("the the the", AnalysisMode::Words).unwrap();
        assert_eq!(chart_data(&t), Err(AnalysisError::NoData));
    }

    #[test]
    fn ramp_endpoints() {
        assert_eq!(blues(0.0), BLUES[0]);
        assert_eq!(blues(1.0), BLUES[8]);
        assert_eq!(Rgb(0x42, 0x92, 0xc6).hex(), "#4292c6");
    }
}
