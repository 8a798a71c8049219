//! `check-config` command
//!
//! Loads a session parameters file and prints a redacted summary.

use serde_json::json;

use crate::cli::args::{CheckConfigArgs, OutputFormat};
use crate::config::loader::ConfigLoader;
use crate::error::Error;

/// Validate a parameters file.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be loaded or fails
/// validation.
pub fn run(args: &CheckConfigArgs) -> Result<(), Error> {
    tracing::info!(file = %args.config.display(), "validating session parameters");

    let result = ConfigLoader::with_defaults().load(&args.config)?;
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let params = result.parameters.redacted();
    match args.format {
        OutputFormat::Human => {
            println!("{}: valid", args.config.display());
            println!("  api_id:             {}", params.api_id);
            println!("  database_directory: {}", params.database_directory);
            println!("  use_test_dc:        {}", params.use_test_dc);
            println!("  device_model:       {}", params.device_model);
            println!("  warnings:           {}", result.warnings.len());
        }
        OutputFormat::Json => {
            let warnings: Vec<_> = result
                .warnings
                .iter()
                .map(|w| json!({ "message": w.message, "location": w.location }))
                .collect();
            let output = json!({
                "file": args.config.display().to_string(),
                "valid": true,
                "parameters": params,
                "warnings": warnings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
