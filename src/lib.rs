//! # consent-export
//!
//! Exports the consent records of an organization's published projects from
//! the consent API into a single `;`-delimited CSV file.
//!
//! ## Overview
//!
//! - **Listing** the organization's projects page by page and keeping the
//!   published ones
//! - **Fetching** each project's consents for a date window, newest first
//! - **Formatting** every consent as one eight-column row
//! - **Writing** the rows to `results/organization_{id}_consents_from_{start}_to_{end}.csv`
//!
//! Every HTTP request goes through one shared rate limiter (100 requests per
//! 60 seconds, evenly spaced) and is retried with exponential backoff on
//! transient failures.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export orchestration and row formatting
//! - [`adapters`] - Consent API client, rate limiting and retries
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use consent_export::config::load_from_env;
//! use consent_export::core::export::{ExportCoordinator, ExportOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // ORGANIZATION_ID, START_DATE, END_DATE and ACCESS_TOKEN
//!     let config = load_from_env()?;
//!
//!     let coordinator = ExportCoordinator::new(&config)?;
//!     if let ExportOutcome::Completed(summary) = coordinator.execute().await? {
//!         println!("Wrote {} consents", summary.consents_written);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error type is
//! [`domain::ExporterError`]. HTTP failures are carried as [`domain::ApiError`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
