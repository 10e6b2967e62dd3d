//! Export orchestration
//!
//! This module provides the core export logic:
//! - Export coordination and orchestration
//! - Streaming CSV output
//! - Summary and reporting

pub mod coordinator;
pub mod summary;
pub mod writer;

pub use coordinator::{export_file_path, ExportCoordinator};
pub use summary::{humanize_elapsed, ExportOutcome, ExportSummary};
pub use writer::ConsentCsvWriter;
