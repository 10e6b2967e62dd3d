//! Structured logging setup using tracing
//!
//! Human-readable events go to stderr so stdout stays free for the command
//! summary. With `logging.local_enabled`, the same events are also written as
//! JSON lines to `{local_path}/consent-export.log`, rotated per
//! `local_rotation`.
//!
//! The export runs inside an `export` span (organization and window) and
//! each project inside a nested `project` span, so every page log line
//! carries the ids it belongs to.

use crate::config::LoggingConfig;
use crate::domain::{DateWindow, ExporterError, OrganizationId, ProjectId, Result};
use tracing::{Level, Span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// File name prefix of the rolling log files
const LOG_FILE_NAME: &str = "consent-export.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the background file writer alive; logs still buffered are flushed
/// when it is dropped
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `log_level` when set.
///
/// ```no_run
/// use consent_export::logging::init_logging;
/// use consent_export::config::LoggingConfig;
///
/// let _guard = init_logging("info", &LoggingConfig::default()).expect("logging");
/// ```
pub fn init_logging(log_level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = crate_filter(parse_log_level(log_level)?);

    let mut layers: Vec<BoxedLayer> = vec![tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter.clone())
        .boxed()];

    let file_guard = if config.local_enabled {
        let (layer, guard) = json_file_layer(config, filter)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        file_logging = config.local_enabled,
        local_path = %config.local_path,
        rotation = %config.local_rotation,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Span wrapping a whole export run
pub fn export_span(organization_id: &OrganizationId, window: &DateWindow) -> Span {
    tracing::info_span!(
        "export",
        organization_id = %organization_id,
        from = %window.start_date(),
        to = %window.end_date(),
    )
}

/// Span wrapping the consent pages of one project
pub fn project_span(project_id: &ProjectId, position: usize, total: usize) -> Span {
    tracing::info_span!("project", project_id = %project_id, position, total)
}

fn crate_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("consent_export={level}")))
}

fn json_file_layer(
    config: &LoggingConfig,
    filter: EnvFilter,
) -> Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            config.local_path
        ))
    })?;

    let appender = RollingFileAppender::new(
        rotation(&config.local_rotation),
        &config.local_path,
        LOG_FILE_NAME,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();

    Ok((layer, guard))
}

/// Rotation policy; unknown names were already rejected by config validation
fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    level.to_lowercase().parse::<Level>().map_err(|_| {
        ExporterError::Configuration(format!(
            "Invalid log level: {level}. Must be one of: trace, debug, info, warn, error"
        ))
    })
}
