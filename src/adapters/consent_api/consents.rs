//! Consent fetching
//!
//! Pages through `/app/consents/{projectId}` newest first, restricted to a
//! date window. Pages are pulled lazily so the caller can write each one out
//! before the next request is made.

use super::client::{ConsentApiClient, QueryParams};
use super::pagination::PageCursor;
use crate::domain::{DateWindow, ExporterError, ProjectId, Result};
use serde_json::Value;

/// Path prefix of the consent listing endpoint
pub const CONSENTS_PATH: &str = "/app/consents";

/// Opens consent listings for single projects
pub struct ConsentFetcher<'a> {
    client: &'a ConsentApiClient,
}

impl<'a> ConsentFetcher<'a> {
    /// Create a fetcher on top of a shared client
    pub fn new(client: &'a ConsentApiClient) -> Self {
        Self { client }
    }

    /// Start listing the consents of `project_id` within `window`
    ///
    /// No request is sent until [`ConsentPages::next_page`] is awaited.
    ///
    /// # Errors
    ///
    /// Returns [`ExporterError::InvalidArgument`] for a blank project id.
    pub fn fetch_consents(
        &self,
        project_id: impl AsRef<str>,
        window: &DateWindow,
    ) -> Result<ConsentPages<'a>> {
        let project_id = ProjectId::new(project_id.as_ref())
            .map_err(|_| ExporterError::InvalidArgument("projectId is required".to_string()))?;

        Ok(ConsentPages {
            client: self.client,
            path: format!("{CONSENTS_PATH}/{project_id}"),
            project_id,
            start: window.start_iso(),
            end: window.end_iso(),
            cursor: PageCursor::new(),
        })
    }
}

/// Lazy, page-at-a-time consent listing of one project
pub struct ConsentPages<'a> {
    client: &'a ConsentApiClient,
    project_id: ProjectId,
    path: String,
    start: String,
    end: String,
    cursor: PageCursor,
}

impl ConsentPages<'_> {
    /// Fetch the next page
    ///
    /// Returns `Ok(None)` once the last page has been fetched. A page may
    /// hold zero items without ending the listing. Items are returned as
    /// sent; turning them into [`ConsentRecord`](crate::domain::ConsentRecord)s is left to the caller so
    /// that a malformed item only fails once the items before it are handled.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>> {
        let Some(page) = self.cursor.next_page() else {
            return Ok(None);
        };

        tracing::info!(
            project_id = %self.project_id,
            page = page,
            last_page = %self
                .cursor
                .last_page()
                .map_or_else(|| "?".to_string(), |p| p.to_string()),
            "Fetching consents"
        );

        let response = self
            .client
            .get_page::<Value>(&self.path, &self.query(page))
            .await?;

        self.cursor.advance(page, response.last_page);
        Ok(Some(response.items))
    }

    fn query(&self, page: u32) -> QueryParams {
        vec![
            ("sort", "-createdAt".to_string()),
            ("page", page.to_string()),
            ("start", self.start.clone()),
            ("end", self.end.clone()),
        ]
    }
}
