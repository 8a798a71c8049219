//! CLI argument definitions
//!
//! All Clap derive structs for `td-authorizer` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Authorization handshake driver for TDLib-style session engines.
#[derive(Parser, Debug)]
#[command(name = "td-authorizer", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "TD_AUTHORIZER_LOG_JSON")]
    pub log_json: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TD_AUTHORIZER_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate a session parameters file.
    CheckConfig(CheckConfigArgs),

    /// Run the full handshake against the built-in scripted engine.
    Simulate(SimulateArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for `check-config`.
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Path to the session parameters YAML file.
    #[arg(env = "TD_AUTHORIZER_CONFIG")]
    pub config: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to the session parameters YAML file.
    #[arg(short, long, env = "TD_AUTHORIZER_CONFIG")]
    pub config: PathBuf,

    /// Code the scripted engine accepts.
    #[arg(long, default_value = crate::engine::scripted::DEFAULT_CODE)]
    pub code: String,

    /// Require a two-factor password.
    #[arg(long, value_name = "PASSWORD")]
    pub two_factor: Option<String>,

    /// Hint shown with the two-factor password prompt.
    #[arg(long, requires = "two_factor")]
    pub password_hint: Option<String>,

    /// Read answers from this file instead of the terminal, one per line.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Wait after the session becomes ready, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub flush_delay_ms: u64,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_config_positional() {
        let cli = Cli::try_parse_from(["td-authorizer", "check-config", "params.yaml"]).unwrap();
        match cli.command {
            Commands::CheckConfig(args) => {
                assert_eq!(args.config, PathBuf::from("params.yaml"));
                assert_eq!(args.format, OutputFormat::Human);
            }
            other => panic!("Expected CheckConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_simulate_defaults() {
        let cli =
            Cli::try_parse_from(["td-authorizer", "simulate", "--config", "p.yaml"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.code, "12345");
                assert!(args.two_factor.is_none());
                assert!(args.script.is_none());
                assert_eq!(args.flush_delay_ms, 1000);
            }
            other => panic!("Expected Simulate, got {other:?}"),
        }
    }

    #[test]
    fn test_password_hint_requires_two_factor() {
        let cli = Cli::try_parse_from([
            "td-authorizer",
            "simulate",
            "--config",
            "p.yaml",
            "--password-hint",
            "pet",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["td-authorizer", "-vvv", "version"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["td-authorizer", "--color", variant, "version"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["td-authorizer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
