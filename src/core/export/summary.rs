//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::OrganizationId;
use std::path::PathBuf;
use std::time::Duration;

/// Result of an export run
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// The organization has no published project; no file was written
    NoPublishedProjects,

    /// The file was written
    Completed(ExportSummary),
}

/// Summary of a completed export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Organization that was exported
    pub organization_id: OrganizationId,

    /// File the rows were written to
    pub output_path: PathBuf,

    /// Number of published projects processed
    pub total_projects: usize,

    /// Number of consent pages fetched across all projects
    pub pages_fetched: usize,

    /// Number of data rows written (header excluded)
    pub consents_written: usize,

    /// Projects whose listing returned no consent in the window
    pub empty_projects: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty summary
    pub fn new(organization_id: OrganizationId, output_path: PathBuf) -> Self {
        Self {
            organization_id,
            output_path,
            total_projects: 0,
            pages_fetched: 0,
            consents_written: 0,
            empty_projects: 0,
            duration: Duration::ZERO,
        }
    }

    /// Record the result of one project
    pub fn record_project(&mut self, pages: usize, consents: usize) {
        self.total_projects += 1;
        self.pages_fetched += pages;
        self.consents_written += consents;
        if consents == 0 {
            self.empty_projects += 1;
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Duration in relative words, e.g. `in 3 minutes`
    pub fn elapsed_human(&self) -> String {
        humanize_elapsed(self.duration)
    }
}

/// Describes a duration in relative words (`in a few seconds`, `in 2 hours`)
///
/// Thresholds: under 45 s is "a few seconds", under 90 s "a minute", under
/// 45 min counted in minutes, under 90 min "an hour", under 22 h counted in
/// hours, under 36 h "a day", under 26 days counted in days, under 46 days "a
/// month", under 320 days counted in months, under 548 days "a year", and
/// years beyond.
pub fn humanize_elapsed(duration: Duration) -> String {
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 60.0 * MINUTE;
    const DAY: f64 = 24.0 * HOUR;

    let secs = duration.as_secs_f64();
    let count = |unit: f64| (secs / unit).round() as u64;

    let words = if secs < 45.0 {
        "a few seconds".to_string()
    } else if secs < 90.0 {
        "a minute".to_string()
    } else if secs < 45.0 * MINUTE {
        format!("{} minutes", count(MINUTE).max(2))
    } else if secs < 90.0 * MINUTE {
        "an hour".to_string()
    } else if secs < 22.0 * HOUR {
        format!("{} hours", count(HOUR).max(2))
    } else if secs < 36.0 * HOUR {
        "a day".to_string()
    } else if secs < 26.0 * DAY {
        format!("{} days", count(DAY).max(2))
    } else if secs < 46.0 * DAY {
        "a month".to_string()
    } else if secs < 320.0 * DAY {
        format!("{} months", count(30.4 * DAY).max(2))
    } else if secs < 548.0 * DAY {
        "a year".to_string()
    } else {
        format!("{} years", count(365.25 * DAY).max(2))
    };

    format!("in {words}")
}
