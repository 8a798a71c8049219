//! Default handshake handler.
//!
//! [`ClientAuthorizer`] automates the two setup phases (session parameters
//! and database key) and exposes one-shot entry points for the credentials
//! only the user can provide.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::poller::{AuthorizationHandler, Result};
use crate::config::SessionParameters;
use crate::engine::{EncryptionKey, PhoneNumberSettings, SessionEngine};
use crate::error::{AuthorizeError, EngineError};
use crate::phase::AuthorizationPhase;

const SET_PARAMETERS: &str = "setTdlibParameters";
const CHECK_ENCRYPTION_KEY: &str = "checkDatabaseEncryptionKey";
const SET_PHONE_NUMBER: &str = "setAuthenticationPhoneNumber";
const CHECK_CODE: &str = "checkAuthenticationCode";
const CHECK_PASSWORD: &str = "checkAuthenticationPassword";

/// Handler that submits session parameters and an empty database key.
///
/// Credential phases are left untouched by [`handle`](AuthorizationHandler::handle);
/// the embedding application watches for them and calls
/// [`send_phone_number`](Self::send_phone_number),
/// [`send_authentication_code`](Self::send_authentication_code) or
/// [`send_password`](Self::send_password).
///
/// Cloning shares the same parameters.
#[derive(Debug, Clone)]
pub struct ClientAuthorizer {
    parameters: Arc<SessionParameters>,
}

impl ClientAuthorizer {
    /// Creates a handler forwarding `parameters` when the engine asks.
    #[must_use]
    pub fn new(parameters: impl Into<Arc<SessionParameters>>) -> Self {
        Self {
            parameters: parameters.into(),
        }
    }

    /// Parameters forwarded at the `WaitParameters` phase.
    #[must_use]
    pub fn parameters(&self) -> &SessionParameters {
        &self.parameters
    }

    /// Submits the user's phone number.
    ///
    /// Settings are fixed: no flash call, not the current device's number,
    /// no SMS retriever. The resulting phase is not queried.
    ///
    /// # Errors
    ///
    /// Returns the engine's rejection (bad format, rate limit, wrong phase).
    pub async fn send_phone_number(&self, engine: &dyn SessionEngine, phone: &str) -> Result<()> {
        info!(phone = %mask_phone(phone), "submitting phone number");
        engine
            .set_phone_number(phone, &PhoneNumberSettings::default())
            .await
            .map_err(|err| rejected(SET_PHONE_NUMBER, err))
    }

    /// Submits the one-time authentication code.
    ///
    /// # Errors
    ///
    /// Returns the engine's rejection.
    pub async fn send_authentication_code(
        &self,
        engine: &dyn SessionEngine,
        code: &str,
    ) -> Result<()> {
        info!("submitting authentication code");
        engine
            .check_authentication_code(code)
            .await
            .map_err(|err| rejected(CHECK_CODE, err))
    }

    /// Submits the two-factor password.
    ///
    /// # Errors
    ///
    /// Returns the engine's rejection.
    pub async fn send_password(&self, engine: &dyn SessionEngine, password: &str) -> Result<()> {
        info!("submitting password");
        engine
            .check_password(password)
            .await
            .map_err(|err| rejected(CHECK_PASSWORD, err))
    }
}

#[async_trait::async_trait]
impl AuthorizationHandler for ClientAuthorizer {
    async fn handle(&self, engine: &dyn SessionEngine) -> Result<AuthorizationPhase> {
        let phase = query(engine).await?;

        match phase {
            AuthorizationPhase::WaitParameters => {
                info!(api_id = self.parameters.api_id, "submitting session parameters");
                engine
                    .set_session_parameters(&self.parameters)
                    .await
                    .map_err(|err| rejected(SET_PARAMETERS, err))?;
                query(engine).await
            }
            AuthorizationPhase::WaitEncryptionKey { .. } => {
                info!("submitting database encryption key");
                engine
                    .check_encryption_key(&EncryptionKey::default())
                    .await
                    .map_err(|err| rejected(CHECK_ENCRYPTION_KEY, err))?;
                query(engine).await
            }
            other => {
                debug!(phase = %other, "no automatic action");
                Ok(other)
            }
        }
    }
}

async fn query(engine: &dyn SessionEngine) -> Result<AuthorizationPhase> {
    engine.get_authorization_phase().await.map_err(|err| {
        warn!(error = %err, "failed to query authorization state");
        AuthorizeError::Query(err)
    })
}

fn rejected(request: &'static str, err: EngineError) -> AuthorizeError {
    warn!(request, error = %err, "engine rejected request");
    AuthorizeError::submit(request, err)
}

/// Keeps only the last two digits of a phone number for logging.
fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    let visible: String = digits.iter().skip(digits.len().saturating_sub(2)).collect();
    format!("***{visible}")
}
