use std::io;
use configs::{LogFormat, LoggerConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber described by `config`.
/// - Respects `RUST_LOG` if set, otherwise uses `config.level`
/// - Writes to stdout so container runtimes pick the logs up
pub fn init_logging(config: &LoggerConfig) {
    match config.format {
        LogFormat::Compact => init_logging_compact(&config.level),
        LogFormat::Json => init_logging_json(&config.level),
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Human-readable compact output.
pub fn init_logging_compact(default_level: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_level))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Structured JSON output for machine parsing.
pub fn init_logging_json(default_level: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_level))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
