//! In-memory session engine for tests and dry runs.
//!
//! [`ScriptedEngine`] follows the same phase transitions as a real
//! TDLib-style engine for a single account: parameters, then the database
//! key, then phone number, code and (optionally) password. It records every
//! request it receives, lets callers inject failures, and publishes phase
//! changes the way the real engine pushes `updateAuthorizationState`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use super::{EncryptionKey, PhoneNumberSettings, READY_FLUSH_DELAY, Result, SessionEngine};
use crate::config::SessionParameters;
use crate::error::EngineError;
use crate::phase::AuthorizationPhase;

/// Code the engine accepts unless configured otherwise.
pub const DEFAULT_CODE: &str = "12345";

/// A request received by the [`ScriptedEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `getAuthorizationState`
    GetAuthorizationPhase,
    /// `setTdlibParameters`
    SetSessionParameters,
    /// `checkDatabaseEncryptionKey`
    CheckEncryptionKey {
        /// Length of the submitted key
        key_len: usize,
    },
    /// `setAuthenticationPhoneNumber`
    SetPhoneNumber {
        /// Submitted number
        phone: String,
        /// Submitted settings
        settings: PhoneNumberSettings,
    },
    /// `checkAuthenticationCode`
    CheckAuthenticationCode {
        /// Submitted code
        code: String,
    },
    /// `checkAuthenticationPassword`
    CheckPassword,
    /// Persistence wait after `Ready`
    WaitForPersistence,
}

impl EngineCall {
    /// Whether this call submits something (anything but a query or wait).
    #[must_use]
    pub const fn is_submission(&self) -> bool {
        !matches!(self, Self::GetAuthorizationPhase | Self::WaitForPersistence)
    }
}

/// Submission kinds that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// `setTdlibParameters`
    Parameters,
    /// `checkDatabaseEncryptionKey`
    EncryptionKey,
    /// `setAuthenticationPhoneNumber`
    PhoneNumber,
    /// `checkAuthenticationCode`
    Code,
    /// `checkAuthenticationPassword`
    Password,
}

#[derive(Debug)]
struct TwoFactor {
    password: String,
    hint: String,
}

#[derive(Debug)]
struct Inner {
    phase: AuthorizationPhase,
    code: String,
    two_factor: Option<TwoFactor>,
    parameters: Option<SessionParameters>,
    calls: Vec<EngineCall>,
    query_failures: VecDeque<EngineError>,
    submit_failures: VecDeque<(Submission, EngineError)>,
    subscribers: Vec<mpsc::UnboundedSender<AuthorizationPhase>>,
}

impl Inner {
    fn transition(&mut self, next: AuthorizationPhase) {
        debug!(from = %self.phase, to = %next, "scripted engine transition");
        self.phase = next;
        let phase = &self.phase;
        self.subscribers.retain(|tx| tx.send(phase.clone()).is_ok());
    }

    fn take_failure(&mut self, kind: Submission) -> Option<EngineError> {
        let index = self
            .submit_failures
            .iter()
            .position(|(queued, _)| *queued == kind)?;
        self.submit_failures.remove(index).map(|(_, err)| err)
    }

    fn expect_phase(
        &self,
        request: &str,
        accepts: fn(&AuthorizationPhase) -> bool,
    ) -> Result<()> {
        if accepts(&self.phase) {
            Ok(())
        } else {
            Err(EngineError::new(400, format!("Unexpected {request}")))
        }
    }
}

/// In-memory [`SessionEngine`] with scripted transitions.
///
/// Cloning yields another handle to the same engine.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    inner: Arc<Mutex<Inner>>,
    persistence_delay: Duration,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    /// Creates an engine waiting for parameters, accepting [`DEFAULT_CODE`],
    /// without two-factor authentication.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                phase: AuthorizationPhase::WaitParameters,
                code: DEFAULT_CODE.to_string(),
                two_factor: None,
                parameters: None,
                calls: Vec::new(),
                query_failures: VecDeque::new(),
                submit_failures: VecDeque::new(),
                subscribers: Vec::new(),
            })),
            persistence_delay: READY_FLUSH_DELAY,
        }
    }

    /// Sets the code the engine accepts.
    #[must_use]
    pub fn with_code(self, code: impl Into<String>) -> Self {
        self.lock().code = code.into();
        self
    }

    /// Enables two-factor authentication with the given password and hint.
    #[must_use]
    pub fn with_password(self, password: impl Into<String>, hint: impl Into<String>) -> Self {
        self.lock().two_factor = Some(TwoFactor {
            password: password.into(),
            hint: hint.into(),
        });
        self
    }

    /// Overrides the wait performed once the session is ready.
    #[must_use]
    pub const fn with_persistence_delay(mut self, delay: Duration) -> Self {
        self.persistence_delay = delay;
        self
    }

    /// Starts the engine at an arbitrary phase.
    #[must_use]
    pub fn starting_at(self, phase: AuthorizationPhase) -> Self {
        self.lock().phase = phase;
        self
    }

    /// Forces the engine into `phase`, notifying subscribers.
    pub fn set_phase(&self, phase: AuthorizationPhase) {
        self.lock().transition(phase);
    }

    /// Closes the session.
    pub fn close(&self) {
        self.set_phase(AuthorizationPhase::Closed);
    }

    /// Makes the next phase query fail with `error`.
    pub fn fail_next_query(&self, error: EngineError) {
        self.lock().query_failures.push_back(error);
    }

    /// Makes the next submission of `kind` fail with `error`.
    pub fn fail_next(&self, kind: Submission, error: EngineError) {
        self.lock().submit_failures.push_back((kind, error));
    }

    /// Subscribes to phase changes.
    ///
    /// Only changes after the call are delivered.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<AuthorizationPhase> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Current phase, without recording a query.
    #[must_use]
    pub fn phase(&self) -> AuthorizationPhase {
        self.lock().phase.clone()
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|&call| predicate(call)).count()
    }

    /// Parameters accepted by the engine, if any.
    #[must_use]
    pub fn parameters(&self) -> Option<SessionParameters> {
        self.lock().parameters.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl SessionEngine for ScriptedEngine {
    async fn get_authorization_phase(&self) -> Result<AuthorizationPhase> {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::GetAuthorizationPhase);
        match inner.query_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(inner.phase.clone()),
        }
    }

    async fn set_session_parameters(&self, parameters: &SessionParameters) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::SetSessionParameters);
        if let Some(err) = inner.take_failure(Submission::Parameters) {
            return Err(err);
        }
        inner.expect_phase("setTdlibParameters", |phase| {
            matches!(phase, AuthorizationPhase::WaitParameters)
        })?;
        inner.parameters = Some(parameters.clone());
        inner.transition(AuthorizationPhase::WaitEncryptionKey {
            is_encrypted: false,
        });
        Ok(())
    }

    async fn check_encryption_key(&self, key: &EncryptionKey) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::CheckEncryptionKey {
            key_len: key.as_bytes().len(),
        });
        if let Some(err) = inner.take_failure(Submission::EncryptionKey) {
            return Err(err);
        }
        inner.expect_phase("checkDatabaseEncryptionKey", |phase| {
            matches!(phase, AuthorizationPhase::WaitEncryptionKey { .. })
        })?;
        inner.transition(AuthorizationPhase::WaitPhoneNumber);
        Ok(())
    }

    async fn set_phone_number(&self, phone: &str, settings: &PhoneNumberSettings) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::SetPhoneNumber {
            phone: phone.to_string(),
            settings: *settings,
        });
        if let Some(err) = inner.take_failure(Submission::PhoneNumber) {
            return Err(err);
        }
        inner.expect_phase("setAuthenticationPhoneNumber", |phase| {
            matches!(phase, AuthorizationPhase::WaitPhoneNumber)
        })?;
        if phone.trim().is_empty() {
            return Err(EngineError::new(400, "PHONE_NUMBER_INVALID"));
        }
        inner.transition(AuthorizationPhase::WaitCode {
            phone_number: phone.to_string(),
        });
        Ok(())
    }

    async fn check_authentication_code(&self, code: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::CheckAuthenticationCode {
            code: code.to_string(),
        });
        if let Some(err) = inner.take_failure(Submission::Code) {
            return Err(err);
        }
        inner.expect_phase("checkAuthenticationCode", |phase| {
            matches!(phase, AuthorizationPhase::WaitCode { .. })
        })?;
        if code != inner.code {
            return Err(EngineError::new(400, "PHONE_CODE_INVALID"));
        }
        let next = match &inner.two_factor {
            Some(two_factor) => AuthorizationPhase::WaitPassword {
                password_hint: two_factor.hint.clone(),
            },
            None => AuthorizationPhase::Ready,
        };
        inner.transition(next);
        Ok(())
    }

    async fn check_password(&self, password: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::CheckPassword);
        if let Some(err) = inner.take_failure(Submission::Password) {
            return Err(err);
        }
        inner.expect_phase("checkAuthenticationPassword", |phase| {
            matches!(phase, AuthorizationPhase::WaitPassword { .. })
        })?;
        let accepted = inner
            .two_factor
            .as_ref()
            .is_some_and(|two_factor| two_factor.password == password);
        if !accepted {
            return Err(EngineError::new(400, "PASSWORD_HASH_INVALID"));
        }
        inner.transition(AuthorizationPhase::Ready);
        Ok(())
    }

    async fn wait_for_persistence(&self) {
        self.lock().calls.push(EngineCall::WaitForPersistence);
        tokio::time::sleep(self.persistence_delay).await;
    }
}
