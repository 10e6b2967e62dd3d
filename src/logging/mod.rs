//! Logging and observability
//!
//! Structured logging with `tracing`: human-readable console output and
//! optional JSON files with rotation.
//!
//! ```no_run
//! use consent_export::logging::init_logging;
//! use consent_export::config::LoggingConfig;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).expect("logging");
//! tracing::info!(project_id = "p1", page = 1, "Fetching consents");
//! ```

pub mod structured;

pub use structured::{export_span, init_logging, project_span, LoggingGuard};
