//! Core business logic
//!
//! - [`export`] - Orchestration of a run and the export file
//! - [`format`] - Consent record to CSV row mapping

pub mod export;
pub mod format;
