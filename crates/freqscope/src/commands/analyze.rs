//! Analyze command: frequency statistics for one file.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use freqscope_core::report::{Report, statistics_text};
use freqscope_core::{AnalysisMode, Config};
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, instrument, warn};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// File to analyze (.txt, .csv, .xlsx; anything else is read as text).
    pub file: Utf8PathBuf,

    /// What to count (defaults to the configured mode).
    #[arg(short, long, value_enum)]
    pub mode: Option<AnalysisMode>,

    /// Analyze only this column of a CSV or spreadsheet file.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,
}

/// Print the ranked statistics for a file.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(args: AnalyzeArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(file = %args.file, mode = ?args.mode, column = ?args.column, "executing analyze command");

    let mut session =
        super::open_session(&args.file, args.column.as_deref(), args.mode, config)?;
    session
        .analyze()
        .with_context(|| format!("failed to analyze {}", args.file))?;

    let (Some(document), Some(table)) = (session.document(), session.table()) else {
        anyhow::bail!("analysis produced no result for {}", args.file);
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&Report::new(document, table))?);
        return Ok(());
    }

    print!("{}", statistics_text(table));
    if table.is_empty() {
        warn!(file = %args.file, mode = %table.mode, "nothing countable found");
        println!();
        println!(
            "{} no {} found in {}",
            "No data:".if_supports_color(Stream::Stdout, |t| t.yellow()),
            table.mode.unit_plural().to_lowercase(),
            args.file
        );
    }

    Ok(())
}
