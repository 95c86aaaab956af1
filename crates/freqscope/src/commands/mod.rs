//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use freqscope_core::{AnalysisMode, Config, Session};

pub mod analyze;
pub mod chart;
pub mod columns;
pub mod info;
pub mod shell;

/// Load a file into a fresh session, optionally narrowing it to one column.
///
/// Shared by every command that analyzes a single file.
pub fn open_session(
    file: &Utf8Path,
    column: Option<&str>,
    mode: Option<AnalysisMode>,
    config: &Config,
) -> anyhow::Result<Session> {
    let mut session = Session::new(
        mode.unwrap_or(config.default_mode),
        config.load_options(),
    );
    session
        .load(file)
        .with_context(|| format!("failed to load {file}"))?;
    if let Some(name) = column {
        session
            .select_column(name)
            .with_context(|| format!("failed to select column in {file}"))?;
    }
    Ok(session)
}
