//! Project listing
//!
//! Pages through `/vault/projects` for one organization and keeps the
//! projects that have been published at least once.

use super::client::{ConsentApiClient, QueryParams};
use super::pagination::PageCursor;
use crate::domain::{OrganizationId, Project, ProjectId, Result};

/// Path of the project listing endpoint
pub const PROJECTS_PATH: &str = "/vault/projects";

/// Lists the published projects of an organization
pub struct ProjectLister<'a> {
    client: &'a ConsentApiClient,
    per_page: u32,
}

impl<'a> ProjectLister<'a> {
    /// Create a lister requesting `per_page` projects per page
    pub fn new(client: &'a ConsentApiClient, per_page: u32) -> Self {
        Self { client, per_page }
    }

    /// Identifiers of every published project of `organization_id`
    ///
    /// Order follows the listing: page order, then order within the page.
    /// An empty vector is a valid outcome.
    pub async fn list_published_project_ids(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<ProjectId>> {
        let mut cursor = PageCursor::new();
        let mut project_ids = Vec::new();
        let mut total_projects = 0usize;

        while let Some(page) = cursor.next_page() {
            tracing::debug!(
                organization_id = %organization_id,
                page = page,
                "Fetching projects page"
            );

            let response = self
                .client
                .get_page::<Project>(PROJECTS_PATH, &self.query(organization_id, page))
                .await?;

            total_projects += response.items.len();
            project_ids.extend(response.items.iter().filter_map(Project::published_id));
            cursor.advance(page, response.last_page);
        }

        tracing::info!(
            organization_id = %organization_id,
            total_projects = total_projects,
            published_projects = project_ids.len(),
            "Listed organization projects"
        );

        Ok(project_ids)
    }

    fn query(&self, organization_id: &OrganizationId, page: u32) -> QueryParams {
        vec![
            ("data.organizationId", organization_id.to_string()),
            ("with", "metadata".to_string()),
            ("page", page.to_string()),
            ("perPage", self.per_page.to_string()),
        ]
    }
}
