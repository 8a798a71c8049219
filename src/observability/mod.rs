//! Observability module
//!
//! Logging setup for the binary. The library itself only emits `tracing`
//! events and leaves subscriber installation to the application.

pub mod logging;

pub use logging::{LogFormat, init_logging};
