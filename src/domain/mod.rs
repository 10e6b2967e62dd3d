//! Domain models and types for the exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrganizationId`], [`ProjectId`])
//! - **Domain models** ([`Project`], [`ConsentRecord`], [`DateWindow`])
//! - **Error types** ([`ExporterError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExporterError>`]:
//!
//! ```rust
//! use consent_export::domain::{ConsentRecord, Result};
//!
//! fn example() -> Result<ConsentRecord> {
//!     // Non-object values are rejected as invalid arguments
//!     ConsentRecord::try_from(serde_json::json!({ "token": "abc" }))
//! }
//! ```

pub mod consent;
pub mod errors;
pub mod ids;
pub mod project;
pub mod result;
pub mod window;

// Re-export commonly used types for convenience
pub use consent::ConsentRecord;
pub use errors::{ApiError, ExporterError};
pub use ids::{OrganizationId, ProjectId};
pub use project::{Project, ProjectMetadata};
pub use result::Result;
pub use window::{parse_date, DateWindow};
