//! Handshake driver.
//!
//! [`run_until_ready`] is the polling loop an application would otherwise
//! write by hand: poll, answer credential phases through a
//! [`CredentialPrompt`], and wait for the engine's next phase update
//! whenever nothing can be done locally.

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::client::ClientAuthorizer;
use super::poller::{Result, authorize};
use super::prompt::CredentialPrompt;
use crate::engine::SessionEngine;
use crate::error::AuthorizeError;
use crate::phase::AuthorizationPhase;

/// Drives the handshake until the session is ready.
///
/// `updates` carries the engine's phase-change notifications; their
/// payload is only a wake-up signal since every iteration re-reads the
/// phase from the engine. Errors from the engine or the prompt end the
/// loop unchanged; nothing is retried and there is no overall timeout.
///
/// # Errors
///
/// - [`AuthorizeError::Closed`] if the session closes first.
/// - [`AuthorizeError::UpdatesEnded`] if `updates` ends while waiting.
/// - [`AuthorizeError::Prompt`] if a credential cannot be read.
/// - Any query or submission failure.
pub async fn run_until_ready<P>(
    engine: &dyn SessionEngine,
    authorizer: &ClientAuthorizer,
    prompt: &mut P,
    updates: &mut mpsc::UnboundedReceiver<AuthorizationPhase>,
) -> Result<AuthorizationPhase>
where
    P: CredentialPrompt + ?Sized,
{
    loop {
        let phase = authorize(engine, authorizer).await?;

        match phase {
            AuthorizationPhase::Ready => return Ok(phase),
            AuthorizationPhase::Closed => return Err(AuthorizeError::Closed),
            AuthorizationPhase::WaitPhoneNumber => {
                info!("phone number required");
                let phone = prompt.phone_number().await?;
                authorizer.send_phone_number(engine, &phone).await?;
                continue;
            }
            AuthorizationPhase::WaitCode { ref phone_number } => {
                info!("authentication code required");
                let code = prompt.code(phone_number).await?;
                authorizer.send_authentication_code(engine, &code).await?;
                continue;
            }
            AuthorizationPhase::WaitPassword { ref password_hint } => {
                info!("password required");
                let password = prompt.password(password_hint).await?;
                authorizer.send_password(engine, &password).await?;
                continue;
            }
            _ => {}
        }

        debug!(%phase, "waiting for next authorization update");
        let next = updates.recv().await.ok_or(AuthorizeError::UpdatesEnded)?;
        debug!(phase = %next, "authorization update");
    }
}
