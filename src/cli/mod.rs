//! Command-line interface
//!
//! Argument definitions and command handlers for the `td-authorizer` binary.

pub mod args;
pub mod commands;
