//! Configuration schema types
//!
//! This module defines the configuration structure of the exporter. Every
//! section has defaults so a run can be configured from environment
//! variables alone.

use crate::config::SecretString;
use chrono::NaiveDate;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Consent API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// What to export and where to write it
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Consent API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL all request paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry behaviour for transient failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Client-side throughput cap
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }

        match &self.access_token {
            None => return Err("api.access_token is required (set ACCESS_TOKEN)".to_string()),
            Some(token) if token.expose_secret().is_blank() => {
                return Err("api.access_token cannot be empty".to_string())
            }
            Some(_) => {}
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }
}

/// Retry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds; the n-th retry waits `initial_delay_ms * 2^n`
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound for a single backoff delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Add up to 20% random jitter to each delay
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: true,
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(format!(
                "api.retry.max_delay_ms ({}) must be >= initial_delay_ms ({})",
                self.max_delay_ms, self.initial_delay_ms
            ));
        }
        Ok(())
    }
}

/// Client-side rate limit
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per period
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Period length in seconds
    #[serde(default = "default_period_seconds")]
    pub period_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            period_seconds: default_period_seconds(),
        }
    }
}

impl RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_requests == 0 {
            return Err("api.rate_limit.max_requests must be > 0".to_string());
        }
        if self.period_seconds == 0 {
            return Err("api.rate_limit.period_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Export settings
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Organization whose published projects are exported
    #[serde(default)]
    pub organization_id: Option<String>,

    /// First day of the window (inclusive)
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the window (inclusive)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Directory the CSV file is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Page size used when listing projects
    #[serde(default = "default_projects_per_page")]
    pub projects_per_page: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            organization_id: None,
            start_date: None,
            end_date: None,
            output_dir: default_output_dir(),
            projects_per_page: default_projects_per_page(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        match self.organization_id.as_deref() {
            None => {
                return Err(
                    "export.organization_id is required (set ORGANIZATION_ID)".to_string()
                )
            }
            Some(id) if id.trim().is_empty() => {
                return Err("export.organization_id cannot be empty".to_string())
            }
            Some(_) => {}
        }

        let start = self
            .start_date
            .ok_or_else(|| "export.start_date is required (set START_DATE)".to_string())?;
        let end = self
            .end_date
            .ok_or_else(|| "export.end_date is required (set END_DATE)".to_string())?;
        if end < start {
            return Err(format!(
                "export.end_date ({end}) must not be before export.start_date ({start})"
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        if self.projects_per_page == 0 || self.projects_per_page > 100 {
            return Err(format!(
                "export.projects_per_page must be between 1 and 100, got {}",
                self.projects_per_page
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Also write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }
        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://api.axept.io/v1".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    10
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    120_000
}

fn default_true() -> bool {
    true
}

fn default_max_requests() -> u32 {
    100
}

fn default_period_seconds() -> u64 {
    60
}

fn default_output_dir() -> String {
    "results".to_string()
}

fn default_projects_per_page() -> u32 {
    100
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn valid_config() -> ExporterConfig {
        let mut config = ExporterConfig::default();
        config.api.access_token = Some(secret_string("token".to_string()));
        config.export.organization_id = Some("org-1".to_string());
        config.export.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        config.export.end_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        config
    }

    #[test]
    fn test_defaults() {
        let config = ExporterConfig::default();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.api.base_url, "https://api.axept.io/v1");
        assert_eq!(config.api.retry.max_retries, 10);
        assert_eq!(config.api.retry.initial_delay_ms, 100);
        assert_eq!(config.api.rate_limit.max_requests, 100);
        assert_eq!(config.api.rate_limit.period_seconds, 60);
        assert_eq!(config.export.output_dir, "results");
        assert_eq!(config.export.projects_per_page, 100);
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_token() {
        let mut config = valid_config();
        config.api.access_token = None;
        let err = config.validate().unwrap_err();
        assert!(err.contains("access_token"));
    }

    #[test]
    fn test_blank_token() {
        let mut config = valid_config();
        config.api.access_token = Some(secret_string("   ".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = valid_config();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_organization() {
        let mut config = valid_config();
        config.export.organization_id = None;
        let err = config.validate().unwrap_err();
        assert!(err.contains("ORGANIZATION_ID"));
    }

    #[test]
    fn test_missing_dates() {
        let mut config = valid_config();
        config.export.end_date = None;
        let err = config.validate().unwrap_err();
        assert!(err.contains("END_DATE"));
    }

    #[test]
    fn test_reversed_dates() {
        let mut config = valid_config();
        config.export.start_date = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_projects_per_page_bounds() {
        let mut config = valid_config();
        config.export.projects_per_page = 0;
        assert!(config.validate().is_err());
        config.export.projects_per_page = 101;
        assert!(config.validate().is_err());
        config.export.projects_per_page = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rate_limit() {
        let mut config = valid_config();
        config.api.rate_limit.max_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = valid_config();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
