//! Export command implementation
//!
//! This module implements the `export` command: resolve configuration, run
//! the export coordinator, print the summary.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_INIT_ERROR};
use crate::config::{resolve_config, ExporterConfig};
use crate::core::export::{ExportCoordinator, ExportOutcome};
use crate::domain::{parse_date, Result};
use clap::Args;
use std::path::Path;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Organization to export (overrides ORGANIZATION_ID)
    #[arg(long)]
    pub organization_id: Option<String>,

    /// First day of the window, YYYY-MM-DD (overrides START_DATE)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last day of the window, YYYY-MM-DD (overrides END_DATE)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Directory the CSV file is written to
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match resolve_config(config_path.map(Path::new))
            .and_then(|config| self.apply_overrides(config))
        {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let coordinator = match ExportCoordinator::new(&config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(EXIT_INIT_ERROR);
            }
        };

        let outcome = match coordinator.execute().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        match outcome {
            ExportOutcome::NoPublishedProjects => {
                println!("No published projects found.");
            }
            ExportOutcome::Completed(summary) => {
                println!();
                println!("Export Summary:");
                println!("  Organization: {}", summary.organization_id);
                println!("  Projects: {}", summary.total_projects);
                println!("  Projects without consents: {}", summary.empty_projects);
                println!("  Pages fetched: {}", summary.pages_fetched);
                println!("  Consents written: {}", summary.consents_written);
                println!("  Output: {}", summary.output_path.display());
                println!(
                    "  Duration: {:.2}s ({})",
                    summary.duration.as_secs_f64(),
                    summary.elapsed_human()
                );
            }
        }

        tracing::info!("done");
        Ok(0)
    }

    fn apply_overrides(&self, mut config: ExporterConfig) -> Result<ExporterConfig> {
        if let Some(organization_id) = &self.organization_id {
            tracing::info!(organization_id = %organization_id, "Overriding organization from CLI");
            config.export.organization_id = Some(organization_id.clone());
        }
        if let Some(start) = &self.start_date {
            config.export.start_date = Some(parse_date(start)?);
        }
        if let Some(end) = &self.end_date {
            config.export.end_date = Some(parse_date(end)?);
        }
        if let Some(output_dir) = &self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
        Ok(config)
    }
}
