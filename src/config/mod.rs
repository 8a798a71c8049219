//! Configuration module
//!
//! Loads and validates the [`SessionParameters`] bundle handed to the
//! session engine during the handshake.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::SessionParameters;
pub use validation::{ValidationResult, Validator};
