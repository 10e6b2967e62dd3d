//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use super::secret::secret_string;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use crate::domain::window::parse_date;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced variable is
/// unset, parsing fails, or the resulting configuration is invalid.
///
/// # Examples
///
/// ```no_run
/// use consent_export::config::loader::load_config;
///
/// let config = load_config("consent-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let config = resolve_config(Some(path.as_ref()))?;
    validate(config)
}

/// Builds the configuration from defaults and environment variables only
///
/// This is the path taken when no configuration file is given: the four
/// variables `ORGANIZATION_ID`, `START_DATE`, `END_DATE` and `ACCESS_TOKEN`
/// are enough for a run.
pub fn load_from_env() -> Result<ExporterConfig> {
    let config = resolve_config(None)?;
    validate(config)
}

/// Reads the file (or starts from defaults) and applies environment
/// overrides, without validating
///
/// Used by the CLI, which layers its own flags on top before validating.
pub fn resolve_config(path: Option<&Path>) -> Result<ExporterConfig> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ExporterConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Reads and parses a configuration file without applying overrides or
/// validating it
pub fn read_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    toml::from_str(&contents)
        .map_err(|e| ExporterError::Configuration(format!("Failed to parse TOML: {e}")))
}

fn validate(config: ExporterConfig) -> Result<ExporterConfig> {
    config.validate().map_err(|e| {
        ExporterError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExporterError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// The run parameters use their bare names (`ORGANIZATION_ID`, `START_DATE`,
/// `END_DATE`, `ACCESS_TOKEN`); tuning knobs use the `CONSENT_EXPORT_` prefix.
fn apply_env_overrides(config: &mut ExporterConfig) -> Result<()> {
    // Run parameters
    if let Ok(val) = std::env::var("ORGANIZATION_ID") {
        config.export.organization_id = Some(val);
    }
    if let Ok(val) = std::env::var("START_DATE") {
        config.export.start_date = Some(parse_env_date("START_DATE", &val)?);
    }
    if let Ok(val) = std::env::var("END_DATE") {
        config.export.end_date = Some(parse_env_date("END_DATE", &val)?);
    }
    if let Ok(val) = std::env::var("ACCESS_TOKEN") {
        config.api.access_token = Some(secret_string(val));
    }

    // Application overrides
    if let Ok(val) = std::env::var("CONSENT_EXPORT_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("CONSENT_EXPORT_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("CONSENT_EXPORT_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("CONSENT_EXPORT_API_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.api.retry.max_retries = retries;
        }
    }
    if let Ok(val) = std::env::var("CONSENT_EXPORT_RATE_LIMIT_MAX_REQUESTS") {
        if let Ok(max) = val.parse() {
            config.api.rate_limit.max_requests = max;
        }
    }
    if let Ok(val) = std::env::var("CONSENT_EXPORT_RATE_LIMIT_PERIOD_SECONDS") {
        if let Ok(period) = val.parse() {
            config.api.rate_limit.period_seconds = period;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("CONSENT_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CONSENT_EXPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CONSENT_EXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_env_date(name: &str, value: &str) -> Result<chrono::NaiveDate> {
    parse_date(value)
        .map_err(|e| ExporterError::Configuration(format!("{name}: {e}")))
}
