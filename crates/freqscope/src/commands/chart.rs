//! Chart command: pie and bar charts of the top entries.

use std::fmt::Write as _;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use freqscope_core::chart::{ChartData, OTHER_THRESHOLD, Rgb, SliceKind};
use freqscope_core::render::write_svg;
use freqscope_core::{AnalysisMode, Config};
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, instrument};

/// Longest bar drawn in the terminal, in cells.
const BAR_CELLS: usize = 40;

/// Arguments for the `chart` subcommand.
#[derive(Args, Debug)]
pub struct ChartArgs {
    /// File to analyze (.txt, .csv, .xlsx; anything else is read as text).
    pub file: Utf8PathBuf,

    /// What to count (defaults to the configured mode).
    #[arg(short, long, value_enum)]
    pub mode: Option<AnalysisMode>,

    /// Chart only this column of a CSV or spreadsheet file.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Also write both charts to an SVG file.
    #[arg(long, value_name = "OUT")]
    pub svg: Option<Utf8PathBuf>,
}

/// Analyze a file and draw its charts.
#[instrument(name = "cmd_chart", skip_all, fields(file = %args.file))]
pub fn cmd_chart(args: ChartArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(file = %args.file, mode = ?args.mode, svg = ?args.svg, "executing chart command");

    let mut session =
        super::open_session(&args.file, args.column.as_deref(), args.mode, config)?;
    session
        .analyze()
        .with_context(|| format!("failed to analyze {}", args.file))?;
    let data = session
        .chart_data()
        .with_context(|| format!("cannot chart {}", args.file))?;

    if let Some(ref out) = args.svg {
        write_svg(&data, out)?;
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print!("{}", terminal_chart(&data));
        if let Some(ref out) = args.svg {
            println!();
            println!(
                "{} {out}",
                "Chart written to".if_supports_color(Stream::Stdout, |t| t.dimmed())
            );
        }
    }

    Ok(())
}

/// Render both charts for a terminal.
///
/// The pie becomes a colored legend of its slices with their shares; bars
/// are horizontal and labelled with their two-decimal frequency.
pub fn terminal_chart(data: &ChartData) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", heading(&data.pie_title()));
    let label_width = data
        .slices
        .iter()
        .map(|s| s.label.chars().count())
        .chain(data.bars.iter().map(|b| b.label.chars().count()))
        .max()
        .unwrap_or(0);

    for slice in &data.slices {
        let pct = format!("{:>5.1}%", slice.share * 100.0);
        let note = match slice.kind {
            SliceKind::Entry => String::new(),
            SliceKind::Other => format!(
                "  ({} entries under {:.0}%)",
                other_members(data),
                OTHER_THRESHOLD * 100.0
            ),
        };
        let _ = writeln!(
            out,
            "  {} {:<label_width$}  {pct}  {}{note}",
            swatch(slice.color),
            slice.label,
            slice.count
        );
    }

    out.push('\n');
    let _ = writeln!(out, "{}", heading(&data.bar_title()));

    let max = data
        .bars
        .iter()
        .map(|b| b.frequency)
        .fold(0.0_f64, f64::max);
    for bar in &data.bars {
        let cells = if max > 0.0 {
            ((bar.frequency / max) * BAR_CELLS as f64).round() as usize
        } else {
            0
        };
        let drawn = "█".repeat(cells.max(1));
        let _ = writeln!(
            out,
            "  {:<label_width$}  {} {:.2}",
            bar.label,
            drawn.if_supports_color(Stream::Stdout, |t| t.green()),
            bar.frequency
        );
    }

    out
}

fn heading(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.bold())
        .to_string()
}

fn swatch(color: Rgb) -> String {
    "██"
        .if_supports_color(Stream::Stdout, |t| t.truecolor(color.0, color.1, color.2))
        .to_string()
}

/// Number of top entries folded into the "Other" slice.
fn other_members(data: &ChartData) -> usize {
    data.entries.len()
        - data
            .slices
            .iter()
            .filter(|s| s.kind == SliceKind::Entry)
            .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use freqscope_core::{analyze, chart_data};

    #[test]
    fn terminal_chart_lists_slices_and_bars() {
        let t = analyze("cat cat cat dog", AnalysisMode::Words).unwrap();
        let text = terminal_chart(&chart_data(&t).unwrap());
        assert!(text.contains("Top 2 Words - Distribution"));
        assert!(text.contains("Words Frequencies"));
        assert!(text.contains(" 75.0%"));
        assert!(text.contains("0.75"));
        assert!(text.contains("0.25"));
    }

    #[test]
    fn other_slice_counts_its_members() {
        let mut text = String::new();
        for (word, n) in [("alpha", 90), ("bravo", 8), ("charlie", 1), ("delta", 1)] {
            for _ in 0..n {
                text.push_str(word);
                text.push(' ');
            }
        }
        let t = analyze(&text, AnalysisMode::Words).unwrap();
        let rendered = terminal_chart(&chart_data(&t).unwrap());
        assert!(rendered.contains("Other"));
        assert!(rendered.contains("(2 entries under 2%)"));
    }
}
