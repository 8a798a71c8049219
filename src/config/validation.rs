//! Session parameter validation.
//!
//! Runs on the deserialized [`SessionParameters`] and collects every issue
//! instead of stopping at the first one.

use crate::config::schema::SessionParameters;
use crate::error::{Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Result of parameter validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parameter validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates parameters and returns all issues found.
    pub fn validate(&mut self, params: &SessionParameters) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_credentials(params);
        self.validate_storage(params);
        self.validate_descriptors(params);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Checks
    // ========================================================================

    fn validate_credentials(&mut self, params: &SessionParameters) {
        if params.api_id <= 0 {
            self.add_error("api_id", "API id must be a positive integer");
        }
        if params.api_hash.trim().is_empty() {
            self.add_error("api_hash", "API hash is required and cannot be empty");
        } else if params.api_hash.len() != 32
            || !params.api_hash.chars().all(|c| c.is_ascii_hexdigit())
        {
            self.add_warning("api_hash", "API hash is usually 32 hexadecimal characters");
        }
    }

    fn validate_storage(&mut self, params: &SessionParameters) {
        if params.database_directory.trim().is_empty() {
            self.add_error(
                "database_directory",
                "Database directory is required and cannot be empty",
            );
        }
        if params.use_message_database && !params.use_chat_info_database {
            self.add_warning(
                "use_chat_info_database",
                "use_message_database implies use_chat_info_database",
            );
        }
    }

    fn validate_descriptors(&mut self, params: &SessionParameters) {
        if params.system_language_code.trim().is_empty() {
            self.add_error("system_language_code", "Language code cannot be empty");
        }
        if params.device_model.trim().is_empty() {
            self.add_error("device_model", "Device model cannot be empty");
        }
        if params.application_version.trim().is_empty() {
            self.add_error("application_version", "Application version cannot be empty");
        }
    }

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "a3406de8d171bb422bb6ddf3bbd800e2";

    #[test]
    fn valid_parameters_pass() {
        let result = Validator::new().validate(&SessionParameters::new(94575, HASH));
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn collects_all_errors() {
        let mut params = SessionParameters::new(0, "");
        params.database_directory = String::new();
        params.device_model = " ".to_string();

        let result = Validator::new().validate(&params);
        assert!(result.has_errors());
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["api_id", "api_hash", "database_directory", "device_model"]
        );
    }

    #[test]
    fn odd_api_hash_is_a_warning() {
        let result = Validator::new().validate(&SessionParameters::new(1, "not-hex"));
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn message_database_without_chat_info_warns() {
        let mut params = SessionParameters::new(1, HASH);
        params.use_chat_info_database = false;
        let result = Validator::new().validate(&params);
        assert!(result.is_valid());
        assert_eq!(result.warnings[0].path, "use_chat_info_database");
    }
}
