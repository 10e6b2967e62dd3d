//! Validate config command implementation

use super::EXIT_CONFIG_ERROR;
use crate::config::resolve_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("environment");
        tracing::info!(source = %source, "Validating configuration");

        println!("Validating configuration from: {source}");
        println!();

        let config = match resolve_config(config_path.map(Path::new)) {
            Ok(c) => c,
            Err(e) => {
                println!("Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  API Base URL: {}", config.api.base_url);
                println!(
                    "  Access Token: {}",
                    if config.api.access_token.is_some() {
                        "configured"
                    } else {
                        "missing"
                    }
                );
                println!(
                    "  Rate Limit: {} requests / {}s",
                    config.api.rate_limit.max_requests, config.api.rate_limit.period_seconds
                );
                println!("  Max Retries: {}", config.api.retry.max_retries);
                println!(
                    "  Organization: {}",
                    config.export.organization_id.as_deref().unwrap_or("-")
                );
                if let (Some(start), Some(end)) = (config.export.start_date, config.export.end_date)
                {
                    println!("  Window: {start} to {end}");
                }
                println!("  Output Directory: {}", config.export.output_dir);
                Ok(0)
            }
            Err(e) => {
                println!("Configuration validation failed");
                println!("   Error: {e}");
                Ok(EXIT_CONFIG_ERROR)
            }
        }
    }
}
