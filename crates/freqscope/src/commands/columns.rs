//! Columns command: list the columns of a tabular file.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use freqscope_core::{Config, SourceKind, load};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `columns` subcommand.
#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// CSV or spreadsheet file.
    pub file: Utf8PathBuf,
}

#[derive(Serialize)]
struct ColumnsOutput<'a> {
    file: &'a str,
    source_kind: SourceKind,
    rows: usize,
    columns: &'a [String],
}

/// Print the column names of a CSV or spreadsheet file, one per line.
#[instrument(name = "cmd_columns", skip_all, fields(file = %args.file))]
pub fn cmd_columns(args: ColumnsArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(file = %args.file, "executing columns command");

    let doc = load(&args.file, &config.load_options())
        .with_context(|| format!("failed to load {}", args.file))?;
    let columns = doc
        .columns()
        .with_context(|| format!("{} has no columns", args.file))?;
    let rows = doc.table().map_or(0, |t| t.rows().len());

    if global_json {
        let output = ColumnsOutput {
            file: args.file.as_str(),
            source_kind: doc.source_kind(),
            rows,
            columns,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for name in columns {
            println!("{name}");
        }
        debug!(rows, columns = columns.len(), "columns listed");
        if columns.is_empty() {
            eprintln!(
                "{} {} has a header row with no columns",
                "note:".if_supports_color(Stream::Stderr, |t| t.yellow()),
                args.file
            );
        }
    }

    Ok(())
}
