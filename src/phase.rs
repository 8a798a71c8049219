//! Authorization phases reported by the session engine.
//!
//! The engine owns the handshake state; this crate only reads it. Each
//! variant carries the engine's wire tag so phases round-trip through the
//! engine's JSON update stream unchanged.

use serde::{Deserialize, Serialize};

use crate::error::AuthorizeError;

/// Current position of the session engine in the authorization handshake.
///
/// Only a handful of variants drive behavior here: `Closed` and `Ready`
/// end polling, `WaitParameters` and `WaitEncryptionKey` are advanced
/// mechanically, and the three credential phases are handed to the
/// embedding application. Every other phase is "in progress".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum AuthorizationPhase {
    /// The engine could not be queried. Never reported by the engine itself.
    #[serde(rename = "authorizationStateUnknown")]
    Unknown,

    /// Waiting for session parameters.
    #[serde(rename = "authorizationStateWaitTdlibParameters")]
    WaitParameters,

    /// Waiting for the local database encryption key.
    #[serde(rename = "authorizationStateWaitEncryptionKey")]
    WaitEncryptionKey {
        /// Whether the local database is already encrypted
        #[serde(default)]
        is_encrypted: bool,
    },

    /// Waiting for the user's phone number.
    #[serde(rename = "authorizationStateWaitPhoneNumber")]
    WaitPhoneNumber,

    /// Waiting for the one-time code sent to the user.
    #[serde(rename = "authorizationStateWaitCode")]
    WaitCode {
        /// Phone number the code was sent to
        #[serde(default)]
        phone_number: String,
    },

    /// Waiting for the two-factor password.
    #[serde(rename = "authorizationStateWaitPassword")]
    WaitPassword {
        /// Hint configured together with the password
        #[serde(default)]
        password_hint: String,
    },

    /// Waiting for first and last name of a new account.
    #[serde(rename = "authorizationStateWaitRegistration")]
    WaitRegistration,

    /// Waiting for confirmation on another logged-in device.
    #[serde(rename = "authorizationStateWaitOtherDeviceConfirmation")]
    WaitOtherDeviceConfirmation {
        /// Link to open on the other device
        #[serde(default)]
        link: String,
    },

    /// Waiting for the login email address.
    #[serde(rename = "authorizationStateWaitEmailAddress")]
    WaitEmailAddress,

    /// Waiting for the code sent to the login email address.
    #[serde(rename = "authorizationStateWaitEmailCode")]
    WaitEmailCode,

    /// The session is authorized.
    #[serde(rename = "authorizationStateReady")]
    Ready,

    /// The user is logging out.
    #[serde(rename = "authorizationStateLoggingOut")]
    LoggingOut,

    /// The engine is releasing its resources.
    #[serde(rename = "authorizationStateClosing")]
    Closing,

    /// The session is closed; terminal.
    #[serde(rename = "authorizationStateClosed")]
    Closed,

    /// A phase this crate does not recognize, kept by its engine tag.
    #[serde(skip)]
    Other(String),
}

impl AuthorizationPhase {
    /// Returns the engine tag for this phase.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Unknown => "authorizationStateUnknown",
            Self::WaitParameters => "authorizationStateWaitTdlibParameters",
            Self::WaitEncryptionKey { .. } => "authorizationStateWaitEncryptionKey",
            Self::WaitPhoneNumber => "authorizationStateWaitPhoneNumber",
            Self::WaitCode { .. } => "authorizationStateWaitCode",
            Self::WaitPassword { .. } => "authorizationStateWaitPassword",
            Self::WaitRegistration => "authorizationStateWaitRegistration",
            Self::WaitOtherDeviceConfirmation { .. } => {
                "authorizationStateWaitOtherDeviceConfirmation"
            }
            Self::WaitEmailAddress => "authorizationStateWaitEmailAddress",
            Self::WaitEmailCode => "authorizationStateWaitEmailCode",
            Self::Ready => "authorizationStateReady",
            Self::LoggingOut => "authorizationStateLoggingOut",
            Self::Closing => "authorizationStateClosing",
            Self::Closed => "authorizationStateClosed",
            Self::Other(tag) => tag,
        }
    }

    /// Parses an engine JSON object into a phase.
    ///
    /// Objects with an unrecognized `@type` become [`Self::Other`] rather
    /// than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has no string `@type` field or a
    /// known variant carries malformed fields.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let tag = value
            .get("@type")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        match serde_json::from_value(value) {
            Ok(phase) => Ok(phase),
            Err(err) => match tag {
                Some(tag) if !Self::is_known_tag(&tag) => Ok(Self::Other(tag)),
                _ => Err(err),
            },
        }
    }

    fn is_known_tag(tag: &str) -> bool {
        [
            Self::Unknown,
            Self::WaitParameters,
            Self::WaitEncryptionKey {
                is_encrypted: false,
            },
            Self::WaitPhoneNumber,
            Self::WaitCode {
                phone_number: String::new(),
            },
            Self::WaitPassword {
                password_hint: String::new(),
            },
            Self::WaitRegistration,
            Self::WaitOtherDeviceConfirmation {
                link: String::new(),
            },
            Self::WaitEmailAddress,
            Self::WaitEmailCode,
            Self::Ready,
            Self::LoggingOut,
            Self::Closing,
            Self::Closed,
        ]
        .iter()
        .any(|phase| phase.tag() == tag)
    }

    /// Maps a poll outcome to the phase the caller should record.
    ///
    /// Any error means the phase is [`Self::Unknown`].
    #[must_use]
    pub fn from_outcome(outcome: &Result<Self, AuthorizeError>) -> Self {
        outcome.as_ref().map_or(Self::Unknown, Clone::clone)
    }

    /// `Closed` ends the session for good.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether this phase waits on a credential the user must type.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        matches!(
            self,
            Self::WaitPhoneNumber | Self::WaitCode { .. } | Self::WaitPassword { .. }
        )
    }

    /// Whether the default handler advances this phase without user input.
    #[must_use]
    pub const fn is_mechanical(&self) -> bool {
        matches!(self, Self::WaitParameters | Self::WaitEncryptionKey { .. })
    }
}

impl std::fmt::Display for AuthorizationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
