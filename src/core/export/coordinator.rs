//! Export coordinator - main orchestrator for the export process
//!
//! Lists the published projects of the organization once, then streams the
//! consents of each project, in listing order, into the export file.

use crate::adapters::consent_api::{ConsentApiClient, ConsentFetcher, ProjectLister};
use crate::config::ExporterConfig;
use crate::core::export::summary::{ExportOutcome, ExportSummary};
use crate::core::export::writer::ConsentCsvWriter;
use crate::domain::{
    ConsentRecord, DateWindow, ExporterError, OrganizationId, ProjectId, Result,
};
use crate::logging::{export_span, project_span};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Instrument;

/// Export coordinator
pub struct ExportCoordinator {
    organization_id: OrganizationId,
    window: DateWindow,
    output_dir: PathBuf,
    projects_per_page: u32,
    client: ConsentApiClient,
}

impl ExportCoordinator {
    /// Create a coordinator whose date window uses the local time zone
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the organization or dates are
    /// missing, or the API client cannot be built.
    pub fn new(config: &ExporterConfig) -> Result<Self> {
        let (start, end) = match (config.export.start_date, config.export.end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(ExporterError::Configuration(
                    "export.start_date and export.end_date are required".to_string(),
                ))
            }
        };
        let window = DateWindow::local(start, end)?;
        Self::with_window(config, window)
    }

    /// Create a coordinator for an explicit date window
    pub fn with_window(config: &ExporterConfig, window: DateWindow) -> Result<Self> {
        let organization_id = config
            .export
            .organization_id
            .as_deref()
            .ok_or_else(|| {
                ExporterError::Configuration("export.organization_id is required".to_string())
            })
            .and_then(|id| OrganizationId::new(id).map_err(ExporterError::Configuration))?;

        let client = ConsentApiClient::new(&config.api)?;

        Ok(Self {
            organization_id,
            window,
            output_dir: PathBuf::from(&config.export.output_dir),
            projects_per_page: config.export.projects_per_page,
            client,
        })
    }

    /// Path of the export file for this run
    ///
    /// `{output_dir}/organization_{id}_consents_from_{start}_to_{end}.csv`
    pub fn output_path(&self) -> PathBuf {
        export_file_path(&self.output_dir, &self.organization_id, &self.window)
    }

    /// Execute the export
    ///
    /// 1. Lists the published projects; stops without touching the file if
    ///    there are none
    /// 2. Replaces the export file and writes the header
    /// 3. For each project, in listing order, writes every consent of every
    ///    page in server order
    /// 4. Flushes the file and reports the summary
    ///
    /// Any error aborts the run; rows written before the error stay on disk.
    pub async fn execute(&self) -> Result<ExportOutcome> {
        self.run()
            .instrument(export_span(&self.organization_id, &self.window))
            .await
    }

    async fn run(&self) -> Result<ExportOutcome> {
        tracing::info!(
            organization_id = %self.organization_id,
            start = %self.window.start_iso(),
            end = %self.window.end_iso(),
            "Starting consent export"
        );

        let project_ids = ProjectLister::new(&self.client, self.projects_per_page)
            .list_published_project_ids(&self.organization_id)
            .await?;

        if project_ids.is_empty() {
            tracing::info!(
                organization_id = %self.organization_id,
                "No published projects found"
            );
            return Ok(ExportOutcome::NoPublishedProjects);
        }

        tracing::info!(
            count = project_ids.len(),
            "{} published projects found",
            project_ids.len()
        );

        let path = self.output_path();
        let mut writer = ConsentCsvWriter::create(&path).await?;
        // Elapsed time covers the consent transfer, not the project listing
        let start_time = Instant::now();
        let mut summary = ExportSummary::new(self.organization_id.clone(), path.clone());

        let fetcher = ConsentFetcher::new(&self.client);
        for (index, project_id) in project_ids.iter().enumerate() {
            let span = project_span(project_id, index + 1, project_ids.len());
            match self
                .export_project(&fetcher, project_id, &mut writer)
                .instrument(span)
                .await
            {
                Ok((pages, consents)) => summary.record_project(pages, consents),
                Err(e) => {
                    // Keep what was already written
                    if let Err(flush_err) = writer.finish().await {
                        tracing::warn!(error = %flush_err, "Failed to flush partial export");
                    }
                    return Err(e);
                }
            }
        }

        writer.finish().await?;

        let summary = summary.with_duration(start_time.elapsed());
        tracing::info!(
            path = %path.display(),
            projects = summary.total_projects,
            consents = summary.consents_written,
            duration_ms = summary.duration.as_millis() as u64,
            "Consents written to {} {}",
            path.display(),
            summary.elapsed_human()
        );

        Ok(ExportOutcome::Completed(summary))
    }

    /// Streams every page of one project; returns (pages, consents)
    async fn export_project(
        &self,
        fetcher: &ConsentFetcher<'_>,
        project_id: &ProjectId,
        writer: &mut ConsentCsvWriter,
    ) -> Result<(usize, usize)> {
        let mut pages = fetcher.fetch_consents(project_id, &self.window)?;
        let mut page_count = 0;
        let mut consent_count = 0;

        while let Some(items) = pages.next_page().await? {
            page_count += 1;
            for item in items {
                let record = ConsentRecord::try_from(item)?;
                writer.write_record(&record).await?;
                consent_count += 1;
            }
        }

        tracing::debug!(
            pages = page_count,
            consents = consent_count,
            "Project exported"
        );

        Ok((page_count, consent_count))
    }
}

/// Deterministic export file path for an organization and window
pub fn export_file_path(
    output_dir: &Path,
    organization_id: &OrganizationId,
    window: &DateWindow,
) -> PathBuf {
    output_dir.join(format!(
        "organization_{}_consents_from_{}_to_{}.csv",
        organization_id,
        window.start_date().format("%Y-%m-%d"),
        window.end_date().format("%Y-%m-%d"),
    ))
}
