//! Configuration management for the exporter.
//!
//! # Overview
//!
//! Configuration comes from an optional TOML file plus environment
//! variables. Without a file, the four run parameters are read straight
//! from the environment (a `.env` file is honoured):
//!
//! ```bash
//! ORGANIZATION_ID=5fb3e3c3a1b2c3d4e5f60718
//! START_DATE=2024-01-01
//! END_DATE=2024-01-31
//! ACCESS_TOKEN=eyJhbGciOi...
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ApiConfig`] - Base URL, token, timeout, [`RetryConfig`], [`RateLimitConfig`]
//! - [`ExportConfig`] - Organization, date range, output directory
//! - [`LoggingConfig`] - Optional rolling file logs
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! access_token = "${ACCESS_TOKEN}"
//!
//! [api.rate_limit]
//! max_requests = 100
//! period_seconds = 60
//!
//! [export]
//! organization_id = "5fb3e3c3a1b2c3d4e5f60718"
//! start_date = "2024-01-01"
//! end_date = "2024-01-31"
//! ```
//!
//! ```rust,no_run
//! use consent_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("consent-export.toml")?;
//! println!("Exporting to {}", config.export.output_dir);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_from_env, resolve_config};
pub use schema::{
    ApiConfig, ApplicationConfig, ExportConfig, ExporterConfig, LoggingConfig, RateLimitConfig,
    RetryConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
