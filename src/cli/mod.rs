//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Export consent records of an organization's published projects to CSV
#[derive(Parser, Debug)]
#[command(name = "consent-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "CONSENT_EXPORT_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export consents of all published projects to a CSV file
    Export(commands::export::ExportArgs),

    /// Validate configuration and environment
    ValidateConfig(commands::validate::ValidateArgs),

    /// Write a sample configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["consent-export", "export"]);
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_export_overrides() {
        let cli = Cli::parse_from([
            "consent-export",
            "export",
            "--organization-id",
            "org-1",
            "--start-date",
            "2024-01-01",
            "--end-date",
            "2024-01-31",
            "--output-dir",
            "out",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("Expected export command");
        };
        assert_eq!(args.organization_id.as_deref(), Some("org-1"));
        assert_eq!(args.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(args.end_date.as_deref(), Some("2024-01-31"));
        assert_eq!(args.output_dir.as_deref(), Some("out"));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["consent-export", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["consent-export", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["consent-export", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["consent-export", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
