//! Session parameter schema.
//!
//! [`SessionParameters`] is the bundle forwarded to the engine's
//! `setTdlibParameters` request. Field names match the engine's JSON so the
//! struct serializes straight into the request body.

use serde::{Deserialize, Serialize};

/// Placeholder printed in place of secrets.
pub const REDACTED: &str = "<redacted>";

/// Session configuration sent to the engine while it waits for parameters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParameters {
    /// Use the test data center environment
    #[serde(default)]
    pub use_test_dc: bool,

    /// Directory for the engine's persistent database
    #[serde(default = "default_database_directory")]
    pub database_directory: String,

    /// Directory for downloaded files; empty means `database_directory`
    #[serde(default)]
    pub files_directory: String,

    /// Keep information about downloaded and uploaded files
    #[serde(default = "default_true")]
    pub use_file_database: bool,

    /// Cache users, basic groups, supergroups and channels
    #[serde(default = "default_true")]
    pub use_chat_info_database: bool,

    /// Cache chats and messages (implies `use_chat_info_database`)
    #[serde(default = "default_true")]
    pub use_message_database: bool,

    /// Support secret chats
    #[serde(default)]
    pub use_secret_chats: bool,

    /// Application identifier
    pub api_id: i32,

    /// Application identifier hash
    pub api_hash: String,

    /// IETF language tag of the user's OS
    #[serde(default = "default_language_code")]
    pub system_language_code: String,

    /// Model of the device the application runs on
    #[serde(default = "default_device_model")]
    pub device_model: String,

    /// Version of the operating system
    #[serde(default)]
    pub system_version: String,

    /// Application version
    #[serde(default = "default_application_version")]
    pub application_version: String,

    /// Let the engine delete old files automatically
    #[serde(default = "default_true")]
    pub enable_storage_optimizer: bool,

    /// Ignore original file names of downloaded files
    #[serde(default)]
    pub ignore_file_names: bool,
}

fn default_true() -> bool {
    true
}

fn default_database_directory() -> String {
    "tdlib".to_string()
}

fn default_language_code() -> String {
    "en".to_string()
}

fn default_device_model() -> String {
    "Server".to_string()
}

fn default_application_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl SessionParameters {
    /// Creates parameters with the given API credentials and defaults for
    /// everything else.
    #[must_use]
    pub fn new(api_id: i32, api_hash: impl Into<String>) -> Self {
        Self {
            use_test_dc: false,
            database_directory: default_database_directory(),
            files_directory: String::new(),
            use_file_database: true,
            use_chat_info_database: true,
            use_message_database: true,
            use_secret_chats: false,
            api_id,
            api_hash: api_hash.into(),
            system_language_code: default_language_code(),
            device_model: default_device_model(),
            system_version: String::new(),
            application_version: default_application_version(),
            enable_storage_optimizer: true,
            ignore_file_names: false,
        }
    }

    /// Copy with the API hash replaced by [`REDACTED`], for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            api_hash: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for SessionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionParameters")
            .field("use_test_dc", &self.use_test_dc)
            .field("database_directory", &self.database_directory)
            .field("files_directory", &self.files_directory)
            .field("api_id", &self.api_id)
            .field("api_hash", &REDACTED)
            .field("system_language_code", &self.system_language_code)
            .field("device_model", &self.device_model)
            .field("application_version", &self.application_version)
            .finish_non_exhaustive()
    }
}
