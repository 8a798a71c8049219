//! `td-authorizer` command-line entry point

use clap::Parser;

use td_authorizer::cli::args::Cli;
use td_authorizer::cli::commands;
use td_authorizer::error::ExitCode;
use td_authorizer::observability::{LogFormat, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        let format = if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Human
        };
        init_logging(format, cli.verbose, cli.color);
    }

    // Prompts block on stdin; exit directly on SIGINT/SIGTERM
    tokio::spawn(async {
        let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        else {
            eprintln!("failed to register SIGTERM handler");
            return;
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
            _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
        }
    });

    let result = commands::dispatch(cli).await;

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
