//! Error types for `td-authorizer`
//!
//! The library surfaces two failure kinds during the handshake: the
//! authorization phase could not be read, or a submission was rejected by
//! the session engine. Both wrap the engine's own [`EngineError`]. The
//! binary adds configuration and I/O failures on top and maps everything
//! to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `td-authorizer` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied, prompt closed)
    pub const IO_ERROR: i32 = 3;

    /// Authorization error (engine query or submission failed)
    pub const AUTHORIZATION_ERROR: i32 = 4;

    /// Session closed before the handshake completed
    pub const SESSION_CLOSED: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `td-authorizer` operations.
///
/// Aggregates all domain-specific errors and provides a unified
/// interface for exit code mapping.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Authorization handshake error
    #[error(transparent)]
    Authorize(#[from] AuthorizeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) => ExitCode::CONFIG_ERROR,
            Self::Authorize(AuthorizeError::Closed) => ExitCode::SESSION_CLOSED,
            Self::Authorize(AuthorizeError::Prompt(_)) | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Authorize(_) => ExitCode::AUTHORIZATION_ERROR,
        }
    }
}

// ============================================================================
// Session Engine Errors
// ============================================================================

/// Error object reported by the session engine.
///
/// Mirrors the engine's `error` payload: a numeric code plus a message
/// such as `PHONE_NUMBER_INVALID` or `FLOOD_WAIT_30`. This crate never
/// interprets either field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct EngineError {
    /// Numeric error code (HTTP-like: 400 bad request, 429 rate limited, ...)
    pub code: i32,
    /// Engine-provided message
    pub message: String,
}

impl EngineError {
    /// Creates a new engine error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// ============================================================================
// Authorization Errors
// ============================================================================

/// Failures of the authorization handshake.
///
/// Every variant corresponds to the `Unknown` authorization phase: the
/// caller cannot know where the engine stands until it polls again.
#[derive(Debug, Error)]
pub enum AuthorizeError {
    /// The current authorization phase could not be read.
    #[error("failed to query authorization state: {0}")]
    Query(#[source] EngineError),

    /// A mechanical or interactive submission was rejected.
    #[error("{request} rejected: {source}")]
    Submit {
        /// Engine request that failed (e.g. `setTdlibParameters`)
        request: &'static str,
        /// Error reported by the engine
        #[source]
        source: EngineError,
    },

    /// The session closed before reaching the ready phase.
    #[error("session closed before authorization completed")]
    Closed,

    /// The phase update stream ended while the handshake was in progress.
    #[error("authorization updates ended before the session became ready")]
    UpdatesEnded,

    /// Reading a credential from the user failed.
    #[error("failed to read credential: {0}")]
    Prompt(#[from] std::io::Error),
}

impl AuthorizeError {
    /// Wraps an engine error from the named submission.
    #[must_use]
    pub const fn submit(request: &'static str, source: EngineError) -> Self {
        Self::Submit { request, source }
    }

    /// Returns the engine error behind this failure, if any.
    #[must_use]
    pub const fn engine_error(&self) -> Option<&EngineError> {
        match self {
            Self::Query(source) | Self::Submit { source, .. } => Some(source),
            Self::Closed | Self::UpdatesEnded | Self::Prompt(_) => None,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Session parameter loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {}", join_issues(.errors))]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file exceeds the size limit
    #[error("configuration too large: {size} bytes (limit: {limit})")]
    TooLarge {
        /// Actual file size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message supplied with the `${VAR:?message}` reference
        location: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found in the session parameters.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Field path (e.g., "`api_hash`")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Prevents the parameters from being used
    Error,
    /// Potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `td-authorizer` operations.
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Tests
// ============================================================================
