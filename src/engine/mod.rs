//! Session engine abstraction.
//!
//! Provides the [`SessionEngine`] trait: the narrow request/response surface
//! through which the handshake reads the authorization phase and submits
//! parameters, keys and credentials. Wire protocol, encryption and
//! persistence all live behind it.

pub mod scripted;

pub use scripted::{EngineCall, ScriptedEngine};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SessionParameters;
use crate::error::EngineError;
use crate::phase::AuthorizationPhase;

/// Result type alias for engine requests.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fixed wait after the engine reports `Ready`.
///
/// The engine flushes session state to its local database shortly after
/// authorization completes and offers no completion signal.
pub const READY_FLUSH_DELAY: Duration = Duration::from_secs(1);

/// Settings sent along with the phone number.
///
/// Always all-disabled: no flash-call fallback, not the device's own
/// number, no SMS retriever API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumberSettings {
    /// Allow a flash call instead of a code
    pub allow_flash_call: bool,
    /// The number is the one of the current device
    pub is_current_phone_number: bool,
    /// Allow the Android SMS retriever API
    pub allow_sms_retriever_api: bool,
}

/// Local database encryption key.
///
/// Empty by default, which tells the engine to use an unencrypted database
/// (or the key it already knows).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EncryptionKey(Vec<u8>);

impl EncryptionKey {
    /// Wraps raw key bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether no key is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Key material stays out of logs.
impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Request/response surface of the session engine.
///
/// Every method is one blocking round-trip to the engine. Implementations
/// use `&self` with whatever interior synchronization they need; the
/// handshake itself never calls an engine concurrently, but it does not
/// serialize independent callers either.
#[async_trait::async_trait]
pub trait SessionEngine: Send + Sync {
    /// Reads the current authorization phase (`getAuthorizationState`).
    async fn get_authorization_phase(&self) -> Result<AuthorizationPhase>;

    /// Submits the session parameters (`setTdlibParameters`).
    async fn set_session_parameters(&self, parameters: &SessionParameters) -> Result<()>;

    /// Submits the local database key (`checkDatabaseEncryptionKey`).
    async fn check_encryption_key(&self, key: &EncryptionKey) -> Result<()>;

    /// Submits the user's phone number (`setAuthenticationPhoneNumber`).
    async fn set_phone_number(&self, phone: &str, settings: &PhoneNumberSettings) -> Result<()>;

    /// Submits the one-time code (`checkAuthenticationCode`).
    async fn check_authentication_code(&self, code: &str) -> Result<()>;

    /// Submits the two-factor password (`checkAuthenticationPassword`).
    async fn check_password(&self, password: &str) -> Result<()>;

    /// Resolves once session state reached by `Ready` is safe on disk.
    ///
    /// The default waits [`READY_FLUSH_DELAY`]. Engines that can signal
    /// flush completion override this to await that signal instead.
    async fn wait_for_persistence(&self) {
        tokio::time::sleep(READY_FLUSH_DELAY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_settings_default_all_disabled() {
        let settings = PhoneNumberSettings::default();
        assert!(!settings.allow_flash_call);
        assert!(!settings.is_current_phone_number);
        assert!(!settings.allow_sms_retriever_api);
    }

    #[test]
    fn default_encryption_key_is_empty() {
        let key = EncryptionKey::default();
        assert!(key.is_empty());
        assert!(key.as_bytes().is_empty());
    }

    #[test]
    fn encryption_key_debug_hides_bytes() {
        let key = EncryptionKey::new(b"secret".to_vec());
        let debug = format!("{key:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("len: 6"));
    }

    #[test]
    fn flush_delay_is_one_second() {
        assert_eq!(READY_FLUSH_DELAY, Duration::from_secs(1));
    }
}
