//! Consent-management API adapter
//!
//! This module provides the rate-limited HTTP client, the shared pagination
//! cursor, and the two listings the export needs: published projects of an
//! organization and consents of a project.

pub mod client;
pub mod consents;
pub mod models;
pub mod pagination;
pub mod projects;
pub mod rate_limit;
pub mod retry;

pub use client::ConsentApiClient;
pub use consents::{ConsentFetcher, ConsentPages};
pub use models::{Page, LAST_PAGE_HEADER};
pub use pagination::PageCursor;
pub use projects::ProjectLister;
pub use rate_limit::RateLimiter;
pub use retry::RetryPolicy;
