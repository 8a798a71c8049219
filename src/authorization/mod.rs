//! Authorization handshake.
//!
//! # Architecture
//!
//! - [`authorize`]: state poller; reads the phase once and either stops or
//!   delegates to an [`AuthorizationHandler`]
//! - [`ClientAuthorizer`]: default handler; submits parameters and the
//!   database key, and forwards user credentials on request
//! - [`run_until_ready`]: complete polling loop wired to a
//!   [`CredentialPrompt`]
//!
//! # Phases
//!
//! ```text
//! WaitParameters ─> WaitEncryptionKey ─> { WaitPhoneNumber | WaitCode | WaitPassword }* ─> Ready
//!        │                 │                          │                                    │
//!        └─────────────────┴──────────────────────────┴──────────> Closed <────────────────┘
//! ```
//!
//! The engine enforces the transitions; this module only observes them.

pub mod client;
pub mod driver;
pub mod poller;
pub mod prompt;

pub use client::ClientAuthorizer;
pub use driver::run_until_ready;
pub use poller::{AuthorizationHandler, authorize};
pub use prompt::{CredentialPrompt, TerminalPrompt};
