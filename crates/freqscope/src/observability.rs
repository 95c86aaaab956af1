//! Logging and tracing setup.
//!
//! Human-readable events go to stderr. When a log directory or file is
//! configured, every event is also written there as JSON lines.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Explicit log file path.
const ENV_LOG_PATH: &str = "FREQSCOPE_LOG_PATH";
/// Directory for the default log file.
const ENV_LOG_DIR: &str = "FREQSCOPE_LOG_DIR";
/// File name used inside a log directory.
const LOG_FILE_NAME: &str = "freqscope.jsonl";

/// Where, if anywhere, to write the JSONL log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Full path of the log file.
    pub log_path: Option<PathBuf>,
    /// Directory to create [`LOG_FILE_NAME`] in.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to the configured directory.
    ///
    /// `FREQSCOPE_LOG_PATH` wins over `FREQSCOPE_LOG_DIR`, which wins over
    /// `config_log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let non_empty = |key: &str| {
            std::env::var_os(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            log_path: non_empty(ENV_LOG_PATH),
            log_dir: non_empty(ENV_LOG_DIR).or(config_log_dir),
        }
    }

    /// Directory and file name of the log file, if file logging is on.
    fn log_file(&self) -> Option<(PathBuf, PathBuf)> {
        if let Some(path) = &self.log_path {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path.file_name()?;
            return Some((dir.to_path_buf(), PathBuf::from(name)));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), PathBuf::from(LOG_FILE_NAME)))
    }
}

/// Build the global filter from the CLI flags and configured level.
///
/// `-q` forces `error`; `-v` and `-vv` force `debug` and `trace`.
/// Otherwise `RUST_LOG` is used if set, then the configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
        }
        (false, 1) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("trace"),
    }
}

/// Level shown on stderr; the global filter still decides what reaches the log file.
fn console_level(quiet: bool, verbose: u8) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) if std::env::var_os("RUST_LOG").is_some() => LevelFilter::TRACE,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive until exit so buffered file output is
/// flushed.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
    quiet: bool,
    verbose: u8,
) -> anyhow::Result<Option<WorkerGuard>> {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(console_level(quiet, verbose));

    let (file_layer, guard) = match config.log_file() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}
