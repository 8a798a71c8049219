//! State poller.
//!
//! One call to [`authorize`] reads the engine's phase once and decides:
//! stop (`Closed`), wait for persistence and stop (`Ready`), or hand the
//! engine to the [`AuthorizationHandler`] for at most one mechanical step.

use tracing::{debug, info, warn};

use crate::engine::SessionEngine;
use crate::error::AuthorizeError;
use crate::phase::AuthorizationPhase;

/// Result type alias for handshake steps.
pub type Result<T> = std::result::Result<T, AuthorizeError>;

/// Capability to advance an in-progress handshake by one mechanical step.
///
/// Implementations inspect the phase themselves, perform at most one
/// submission, and return the phase the engine reports afterwards. Phases
/// they do not automate are returned unchanged.
#[async_trait::async_trait]
pub trait AuthorizationHandler: Send + Sync {
    /// Advances the handshake if the current phase is mechanical.
    ///
    /// # Errors
    ///
    /// Returns an error if a phase query or a submission fails.
    async fn handle(&self, engine: &dyn SessionEngine) -> Result<AuthorizationPhase>;
}

/// Polls the engine once and advances the handshake if possible.
///
/// - `Closed` is returned immediately.
/// - `Ready` is returned once [`SessionEngine::wait_for_persistence`]
///   resolves (one second by default), so callers never tear down the
///   engine before session state is on disk.
/// - Every other phase is delegated to `handler` exactly once and its
///   result is returned verbatim.
///
/// Call this again after every phase change until it returns `Ready` or
/// `Closed`.
///
/// # Errors
///
/// Returns [`AuthorizeError::Query`] if the phase cannot be read, or
/// whatever `handler` returns. Nothing is retried.
pub async fn authorize(
    engine: &dyn SessionEngine,
    handler: &dyn AuthorizationHandler,
) -> Result<AuthorizationPhase> {
    let phase = engine.get_authorization_phase().await.map_err(|err| {
        warn!(error = %err, "failed to query authorization state");
        AuthorizeError::Query(err)
    })?;
    debug!(%phase, "authorization state");

    match phase {
        AuthorizationPhase::Closed => {
            info!("session closed");
            Ok(phase)
        }
        AuthorizationPhase::Ready => {
            engine.wait_for_persistence().await;
            info!("authorization complete");
            Ok(phase)
        }
        _ => handler.handle(engine).await,
    }
}
