//! Consent API wire models
//!
//! Paginated endpoints return a bare JSON array as body and announce the
//! total number of pages in the `x-last-page` response header.

use crate::domain::ApiError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

/// Response header carrying the last page number of a paginated query
pub const LAST_PAGE_HEADER: &str = "x-last-page";

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items of this page, in server order
    pub items: Vec<T>,

    /// Last page number the server reported for the query
    pub last_page: u32,
}

/// Reads the last page number from response headers
///
/// # Errors
///
/// A missing or non-numeric header would leave the pagination loop without a
/// stop condition, so it is reported as [`ApiError::InvalidResponse`].
pub fn parse_last_page(headers: &HeaderMap) -> Result<u32, ApiError> {
    let value = headers.get(LAST_PAGE_HEADER).ok_or_else(|| {
        ApiError::InvalidResponse(format!("missing {LAST_PAGE_HEADER} header"))
    })?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .ok_or_else(|| {
            ApiError::InvalidResponse(format!(
                "non-numeric {LAST_PAGE_HEADER} header: {value:?}"
            ))
        })
}

/// Reads a `Retry-After` header expressed in seconds
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
