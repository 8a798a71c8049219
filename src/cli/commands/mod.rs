//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod check;
pub mod simulate;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::Error;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Commands::CheckConfig(args) => check::run(&args),
        Commands::Simulate(args) => simulate::run(&args).await,
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
