//! `simulate` command
//!
//! Runs the whole handshake against [`ScriptedEngine`], asking for the
//! phone number, code and password on the terminal or reading them from a
//! script file.

use std::time::Duration;

use tokio::io::BufReader;

use crate::authorization::{ClientAuthorizer, CredentialPrompt, TerminalPrompt, run_until_ready};
use crate::cli::args::SimulateArgs;
use crate::config::loader::ConfigLoader;
use crate::engine::ScriptedEngine;
use crate::error::Error;

/// Drive a simulated login to completion.
///
/// # Errors
///
/// Returns a configuration error for a bad parameters file, an I/O error
/// if the answer script cannot be opened, or the handshake error.
pub async fn run(args: &SimulateArgs) -> Result<(), Error> {
    let loaded = ConfigLoader::with_defaults().load(&args.config)?;
    for warning in &loaded.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let mut engine = ScriptedEngine::new()
        .with_code(args.code.clone())
        .with_persistence_delay(Duration::from_millis(args.flush_delay_ms));
    if let Some(password) = &args.two_factor {
        engine = engine.with_password(
            password.clone(),
            args.password_hint.clone().unwrap_or_default(),
        );
    }
    let mut updates = engine.subscribe();
    let authorizer = ClientAuthorizer::new(loaded.parameters);

    let mut prompt: Box<dyn CredentialPrompt> = match &args.script {
        Some(path) => {
            tracing::info!(script = %path.display(), "reading answers from script");
            let file = tokio::fs::File::open(path).await?;
            Box::new(TerminalPrompt::new(BufReader::new(file), tokio::io::stderr()))
        }
        None => Box::new(TerminalPrompt::stdio()),
    };

    let phase = run_until_ready(&engine, &authorizer, prompt.as_mut(), &mut updates).await?;
    println!("{phase}");
    Ok(())
}
