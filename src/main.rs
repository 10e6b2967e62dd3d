use clap::Parser;
use consent_export::cli::{Cli, Commands};
use consent_export::config::{resolve_config, LoggingConfig};
use consent_export::logging::init_logging;
use std::path::Path;
use std::process;

/// Exit code used when the run is interrupted with Ctrl+C
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the same sources as the rest of the
    // configuration; a broken config is reported later by the command itself
    let config = resolve_config(cli.config.as_deref().map(Path::new)).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config.map(|c| c.logging).unwrap_or_else(LoggingConfig::default);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "consent-export");

    let exit_code = tokio::select! {
        result = execute_command(&cli) => match result {
            Ok(code) => code,
            Err(e) => {
                tracing::error!(error = %e, "Command execution failed");
                eprintln!("Error: {e}");
                5
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Received SIGINT (Ctrl+C), aborting");
            eprintln!("\nInterrupted, the output file may be incomplete");
            EXIT_INTERRUPTED
        }
    };

    // process::exit skips destructors; flush buffered file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Export(args) => args.execute(config_path).await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
    }
}
