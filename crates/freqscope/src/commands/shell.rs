//! Shell command: an interactive, line-oriented session.
//!
//! Mirrors working with a single document by hand: load a file, optionally
//! narrow it to one column, pick a mode, analyze, chart, clear. A failed
//! command prints its error and leaves the session as it was.

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use freqscope_core::render::write_svg;
use freqscope_core::report::statistics_text;
use freqscope_core::{AnalysisMode, Config, Session};
use tracing::{debug, info, instrument};

use super::chart::terminal_chart;

const PROMPT: &str = "freqscope> ";

const HELP: &str = "\
Commands:
  load PATH      Load a text, CSV or .xlsx file
  columns        List the columns of the loaded table
  column NAME    Analyze only this column from now on
  mode [MODE]    Show or set the mode (words, numbers, letters, all)
  analyze        Print frequency statistics
  chart          Draw pie and bar charts of the last analysis
  svg PATH       Write the charts of the last analysis to an SVG file
  clear          Forget the document and analysis
  status         Show what is loaded
  help           Show this help
  quit           Leave the shell
";

/// Arguments for the `shell` subcommand.
#[derive(Args, Debug, Default)]
pub struct ShellArgs {
    /// Load this file before reading commands.
    pub file: Option<Utf8PathBuf>,

    /// Starting mode (defaults to the configured mode).
    #[arg(short, long, value_enum)]
    pub mode: Option<AnalysisMode>,
}

/// Whether the shell keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Quit,
}

/// A session driven by text commands.
#[derive(Debug, Default)]
pub struct Shell {
    session: Session,
}

impl Shell {
    /// Wrap a session.
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The underlying session.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Run one command line, writing its output to `out`.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<Flow> {
        let line = line.trim();
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };
        debug!(cmd, arg, "shell command");

        match cmd.to_ascii_lowercase().as_str() {
            "" => {}
            "load" => self.load(required(arg, "load PATH")?, out)?,
            "columns" => {
                let doc = self
                    .session
                    .document()
                    .context("no document loaded")?;
                for name in doc.columns()? {
                    writeln!(out, "{name}")?;
                }
            }
            "column" => {
                self.session.select_column(arg)?;
                writeln!(out, "Selected column {arg}")?;
            }
            "mode" if arg.is_empty() => writeln!(out, "{}", self.session.mode())?,
            "mode" => {
                let mode: AnalysisMode = arg.parse()?;
                self.session.set_mode(mode);
                writeln!(out, "Mode set to {mode}")?;
            }
            "analyze" => {
                let table = self.session.analyze()?;
                write!(out, "{}", statistics_text(table))?;
                if table.is_empty() {
                    writeln!(out)?;
                    writeln!(out, "No data: nothing countable was found")?;
                }
            }
            "chart" => {
                let data = self.session.chart_data()?;
                write!(out, "{}", terminal_chart(&data))?;
            }
            "svg" => {
                let path = Utf8Path::new(required(arg, "svg PATH")?);
                let data = self.session.chart_data()?;
                write_svg(&data, path)?;
                writeln!(out, "Chart written to {path}")?;
            }
            "clear" => {
                self.session.clear();
                writeln!(out, "Cleared")?;
            }
            "status" => self.status(out)?,
            "help" | "?" => write!(out, "{HELP}")?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => bail!("unknown command: {other} (try `help`)"),
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self, path: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let doc = self
            .session
            .load(Utf8Path::new(path))
            .with_context(|| format!("failed to load {path}"))?;
        writeln!(out, "Loaded {} ({})", doc.file_name(), doc.source_kind())?;
        if let Ok(columns) = doc.columns() {
            writeln!(out, "Columns: {}", columns.join(", "))?;
        }
        Ok(())
    }

    fn status(&self, out: &mut impl Write) -> anyhow::Result<()> {
        match self.session.document() {
            Some(doc) => {
                writeln!(out, "File: {} ({})", doc.path(), doc.source_kind())?;
                if let Some(column) = doc.selected_column() {
                    writeln!(out, "Column: {column}")?;
                }
            }
            None => writeln!(out, "File: none")?,
        }
        writeln!(out, "Mode: {}", self.session.mode())?;
        match self.session.table() {
            Some(table) => writeln!(
                out,
                "Analysis: {} {} counted",
                table.counted_units,
                table.mode.unit_plural().to_lowercase()
            )?,
            None => writeln!(out, "Analysis: none")?,
        }
        Ok(())
    }
}

fn required<'a>(arg: &'a str, usage: &str) -> anyhow::Result<&'a str> {
    if arg.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(arg)
}

/// Read commands from `input` until `quit` or end of input.
///
/// Errors from individual commands go to `err` and do not stop the loop.
pub fn run(
    shell: &mut Shell,
    input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
    prompt: bool,
) -> anyhow::Result<()> {
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read command")?;
        match shell.execute(&line, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => writeln!(err, "error: {e:#}")?,
        }
    }
    Ok(())
}

/// Start an interactive session on stdin.
#[instrument(name = "cmd_shell", skip_all)]
pub fn cmd_shell(args: ShellArgs, config: &Config) -> anyhow::Result<()> {
    debug!(file = ?args.file, mode = ?args.mode, "executing shell command");

    let session = Session::new(args.mode.unwrap_or(config.default_mode), config.load_options());
    let mut shell = Shell::new(session);

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();

    if let Some(ref file) = args.file {
        shell.load(file.as_str(), &mut stdout)?;
    }
    if interactive {
        writeln!(stdout, "Type `help` for commands, `quit` to leave.")?;
    }

    run(&mut shell, stdin.lock(), &mut stdout, &mut stderr, interactive)?;
    info!("shell finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;

    fn script(shell: &mut Shell, input: &str) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(shell, Cursor::new(input), &mut out, &mut err, false).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn analyze_before_load_reports_and_continues() {
        let mut shell = Shell::default();
        let (out, err) = script(&mut shell, "analyze\nmode letters\nmode\n");
        assert!(err.contains("no document loaded"));
        assert!(out.contains("Mode set to letters"));
        assert!(out.ends_with("letters\n"));
    }

    #[test]
    fn full_workflow_on_csv() {
        let tmp = TempDir::new().unwrap();
        let csv = tmp.path().join("pets.csv");
        std::fs::write(&csv, "name,kind\nRex,dog\nTom,cat\nMax,dog\n").unwrap();
        let svg = tmp.path().join("pets.svg");

        let mut shell = Shell::default();
        let input = format!(
            "load {}\ncolumns\ncolumn kind\nanalyze\nchart\nsvg {}\nstatus\n",
            csv.display(),
            svg.display()
        );
        let (out, err) = script(&mut shell, &input);

        assert!(err.is_empty(), "unexpected errors: {err}");
        assert!(out.contains("Loaded pets.csv (csv)"));
        assert!(out.contains("Columns: name, kind"));
        assert!(out.contains("Selected column kind"));
        assert!(out.contains("dog\t\t2\t\t66.67%"));
        assert!(out.contains("Words Frequencies"));
        assert!(out.contains("Column: kind"));
        assert!(svg.exists());
    }

    #[test]
    fn failed_load_keeps_document() {
        let tmp = TempDir::new().unwrap();
        let txt = tmp.path().join("a.txt");
        std::fs::write(&txt, "cat dog").unwrap();

        let mut shell = Shell::default();
        let input = format!("load {}\nload {}/missing.txt\n", txt.display(), tmp.path().display());
        let (_out, err) = script(&mut shell, &input);

        assert!(err.contains("failed to load"));
        let doc = shell.session().document().unwrap();
        assert_eq!(doc.raw_text(), "cat dog");
    }

    #[test]
    fn chart_needs_analysis() {
        let mut shell = Shell::default();
        let (_out, err) = script(&mut shell, "chart\n");
        assert!(err.contains("no analysis has been run yet"));
    }

    #[test]
    fn quit_stops_reading() {
        let mut shell = Shell::default();
        let (out, err) = script(&mut shell, "quit\nbogus\n");
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_and_bad_arguments_are_reported() {
        let mut shell = Shell::default();
        let (_out, err) = script(&mut shell, "frobnicate\nmode sentences\nload\n");
        assert!(err.contains("unknown command: frobnicate"));
        assert!(err.contains("sentences"));
        assert!(err.contains("usage: load PATH"));
    }

    #[test]
    fn clear_keeps_mode() {
        let mut shell = Shell::default();
        let (out, _err) = script(&mut shell, "mode numbers\nclear\nstatus\n");
        assert!(out.contains("Cleared"));
        assert!(out.contains("File: none"));
        assert!(out.contains("Mode: numbers"));
    }
}
