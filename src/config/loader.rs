//! Session parameter loader
//!
//! Loading pipeline:
//! 1. Size check
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. YAML parsing into [`SessionParameters`]
//! 4. Validation
//! 5. Freeze with `Arc`

use crate::config::schema::SessionParameters;
use crate::config::validation::Validator;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_config_size: env_or("TD_AUTHORIZER_MAX_CONFIG_SIZE", 64 * 1024),
        }
    }
}

/// Result of loading a parameters file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated parameters.
    pub parameters: Arc<SessionParameters>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a parameters file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - A required environment variable is unset
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        self.check_size(file_size)?;

        let raw_content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.load_from_str(&raw_content, path)
    }

    /// Loads parameters from YAML text; `source_path` is used in messages.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`], minus file access.
    pub fn load_from_str(&self, raw: &str, source_path: &Path) -> Result<LoadResult, ConfigError> {
        self.check_size(raw.len())?;

        // Handle UTF-8 BOM
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let mut env_sub = EnvSubstitution::new();
        let substituted = env_sub
            .substitute(raw)
            .map_err(|err| with_path(err, source_path))?;
        let mut warnings: Vec<LoadWarning> = env_sub
            .missing
            .into_iter()
            .map(|var| LoadWarning {
                message: format!("Environment variable '{var}' is not set, using empty string"),
                location: Some(source_path.display().to_string()),
            })
            .collect();

        if substituted.trim().is_empty() {
            return Err(ConfigError::ParseError {
                path: source_path.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        let parameters: SessionParameters =
            serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
                path: source_path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        let validation_result = Validator::new().validate(&parameters);
        if validation_result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: source_path.display().to_string(),
                errors: validation_result.errors,
            });
        }

        warnings.extend(validation_result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        Ok(LoadResult {
            parameters: Arc::new(parameters),
            warnings,
        })
    }

    const fn check_size(&self, size: usize) -> Result<(), ConfigError> {
        if size > self.options.max_config_size {
            return Err(ConfigError::TooLarge {
                size,
                limit: self.options.max_config_size,
            });
        }
        Ok(())
    }
}

fn with_path(err: ConfigError, path: &Path) -> ConfigError {
    match err {
        ConfigError::ParseError { line, message, .. } => ConfigError::ParseError {
            path: path.to_path_buf(),
            line,
            message,
        },
        other => other,
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Pre-parse environment variable substitution.
///
/// Runs on raw YAML text BEFORE parsing so substituted values keep their
/// YAML type (an `api_id: ${TD_API_ID}` stays an integer).
struct EnvSubstitution {
    missing: Vec<String>,
}

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            missing: Vec::new(),
        }
    }

    /// Substitutes environment variables in raw YAML text.
    ///
    /// Supports:
    /// - `${VAR}` - expand to value (empty string if unset, recorded in `missing`)
    /// - `${VAR:-default}` - expand to default if unset
    /// - `${VAR:?message}` - fail if unset
    /// - `$$` - literal `$`
    fn substitute(&mut self, raw_yaml: &str) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw_yaml.len());
        let mut chars = raw_yaml.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let (var_name, default, error_msg) = Self::parse_var_spec(&mut chars)?;

                    match std::env::var(&var_name) {
                        Ok(value) => result.push_str(&value),
                        Err(_) => {
                            if let Some(default_val) = default {
                                result.push_str(&default_val);
                            } else if let Some(msg) = error_msg {
                                return Err(ConfigError::EnvVarNotSet {
                                    var: var_name,
                                    location: msg,
                                });
                            } else {
                                self.missing.push(var_name);
                            }
                        }
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    /// Parses a variable specification from `${...}`.
    ///
    /// Returns (`var_name`, `default_value`, `error_message`).
    fn parse_var_spec(
        chars: &mut std::iter::Peekable<std::str::Chars>,
    ) -> Result<(String, Option<String>, Option<String>), ConfigError> {
        let mut var_name = String::new();

        while let Some(c) = chars.next() {
            match c {
                '}' => return Ok((var_name, None, None)),
                ':' => match chars.peek() {
                    Some('-') => {
                        chars.next();
                        let default = Self::read_until_close(chars)?;
                        return Ok((var_name, Some(default), None));
                    }
                    Some('?') => {
                        chars.next();
                        let msg = Self::read_until_close(chars)?;
                        return Ok((var_name, None, Some(msg)));
                    }
                    _ => var_name.push(':'),
                },
                _ => var_name.push(c),
            }
        }

        Err(unclosed(&format!(
            "Unclosed environment variable reference: ${{{var_name}"
        )))
    }

    /// Reads content until closing `}`, handling nested braces.
    fn read_until_close(
        chars: &mut std::iter::Peekable<std::str::Chars>,
    ) -> Result<String, ConfigError> {
        let mut value = String::new();
        let mut depth = 1;

        for c in chars.by_ref() {
            match c {
                '{' => {
                    depth += 1;
                    value.push(c);
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                    value.push(c);
                }
                _ => value.push(c),
            }
        }

        Err(unclosed("Unclosed environment variable reference"))
    }
}

fn unclosed(message: &str) -> ConfigError {
    ConfigError::ParseError {
        path: PathBuf::new(),
        line: None,
        message: message.to_string(),
    }
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
