//! Init command implementation
//!
//! Generates a sample configuration file.

use super::EXIT_CONFIG_ERROR;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "consent-export.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        fs::write(&self.output, sample_config())?;

        println!("Configuration file created: {}", self.output);
        println!();
        println!("Next steps:");
        println!("  1. Set organization_id, start_date and end_date in {}", self.output);
        println!("  2. Put ACCESS_TOKEN in your environment or a .env file");
        println!("  3. Run: consent-export --config {} export", self.output);
        Ok(0)
    }
}

/// Sample configuration with every setting at its default
pub fn sample_config() -> &'static str {
    r#"# consent-export configuration

[application]
# trace, debug, info, warn, error
log_level = "info"

[api]
base_url = "https://api.axept.io/v1"
access_token = "${ACCESS_TOKEN}"
timeout_seconds = 60

[api.retry]
# Retries after the first attempt; the n-th retry waits initial_delay_ms * 2^n
max_retries = 10
initial_delay_ms = 100
max_delay_ms = 120000
jitter = true

[api.rate_limit]
# Requests are spaced evenly: 100 per 60 seconds is one every 600 ms
max_requests = 100
period_seconds = 60

[export]
organization_id = "your-organization-id"
# Quoted YYYY-MM-DD dates, both inclusive
start_date = "2024-01-01"
end_date = "2024-01-31"
output_dir = "results"
projects_per_page = 100

[logging]
local_enabled = false
local_path = "logs"
# daily, hourly, never
local_rotation = "daily"
"#
}
