//! Logging setup.
//!
//! Human-readable logs always go to stderr so stdout stays clean for command
//! output and the MCP protocol. A JSON Lines file log is added when a path
//! can be resolved, in this order:
//!
//! 1. `READABLE_IQ_LOG_PATH` (exact file)
//! 2. `READABLE_IQ_LOG_DIR` (directory, file named `readable-iq.jsonl`)
//! 3. `log_dir` from the configuration file

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_PATH_ENV: &str = "READABLE_IQ_LOG_PATH";
const LOG_DIR_ENV: &str = "READABLE_IQ_LOG_DIR";
const LOG_FILE_NAME: &str = "readable-iq.jsonl";

/// Where logs are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSON Lines log file, if file logging is enabled.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, falling back to the
    /// configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let log_file = log_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| {
                env_dir
                    .filter(|d| !d.as_os_str().is_empty())
                    .or(config_dir)
                    .map(|dir| dir.join(LOG_FILE_NAME))
            });
        Self { log_file }
    }
}

/// Build the log filter.
///
/// `RUST_LOG` wins when set. Otherwise `--quiet` means errors only, each
/// `-v` raises the level one step, and the configured level is the base.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(directive(quiet, verbose, config_level))
}

fn directive(quiet: bool, verbose: u8, config_level: &str) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => config_level.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes the file log.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    let (file_layer, guard) = match config.log_file {
        Some(ref path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;
    Ok(guard)
}

fn file_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
