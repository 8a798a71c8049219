//! `td-authorizer` - authorization handshake driver for TDLib-style
//! session engines
//!
//! The session engine owns the handshake state machine; this crate reads
//! the current phase, advances the mechanical setup steps on its own and
//! hands the credential steps to the application.
//!
//! ```no_run
//! use td_authorizer::authorization::{ClientAuthorizer, TerminalPrompt, run_until_ready};
//! use td_authorizer::config::SessionParameters;
//! use td_authorizer::engine::ScriptedEngine;
//!
//! # async fn demo() -> Result<(), td_authorizer::error::AuthorizeError> {
//! let engine = ScriptedEngine::new();
//! let mut updates = engine.subscribe();
//! let authorizer = ClientAuthorizer::new(SessionParameters::new(94575, "a3406de8d171bb422bb6ddf3bbd800e2"));
//! let mut prompt = TerminalPrompt::stdio();
//! run_until_ready(&engine, &authorizer, &mut prompt, &mut updates).await?;
//! # Ok(())
//! # }
//! ```

pub mod authorization;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod observability;
pub mod phase;

pub use authorization::{AuthorizationHandler, ClientAuthorizer, authorize};
pub use engine::SessionEngine;
pub use phase::AuthorizationPhase;
