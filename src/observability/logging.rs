//! Logging initialization for `td-authorizer`.
//!
//! Provides structured logging via `tracing` with human-readable and
//! JSON output formats, configurable verbosity, and environment-based
//! override via `TD_AUTHORIZER_LOG_LEVEL`.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable that overrides the verbosity flags.
pub const LOG_LEVEL_ENV: &str = "TD_AUTHORIZER_LOG_LEVEL";

/// Log output format.
///
/// Controls how log messages are rendered to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Target of the scripted engine's per-transition events.
const SCRIPTED_ENGINE_TARGET: &str = "td_authorizer::engine::scripted";

/// Maps a verbosity level to a tracing filter directive.
///
/// - 0: `warn`
/// - 1: `info`
/// - 2: `debug`, except the scripted engine's transition log, which stays
///   at `info`
/// - 3+: `trace` everywhere (saturates)
#[must_use]
pub fn verbosity_to_directive(verbosity: u8) -> String {
    match verbosity {
        0 => "warn".to_string(),
        1 => "info".to_string(),
        2 => format!("debug,{SCRIPTED_ENGINE_TARGET}=info"),
        _ => "trace".to_string(),
    }
}

/// Initializes the global tracing subscriber.
///
/// If `TD_AUTHORIZER_LOG_LEVEL` is set it takes precedence over `verbosity`.
/// Logs go to stderr so credential prompts and command output on stdout
/// stay clean.
///
/// Uses `try_init()` so calling this more than once (e.g. in tests) is safe.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let default_directive = verbosity_to_directive(verbosity);

    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&default_directive));

    let show_target = verbosity >= 2;

    let use_ansi = match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
