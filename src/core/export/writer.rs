//! Streaming CSV output
//!
//! The file at the target path is removed and recreated on every run; rows
//! go through a buffered writer and are never collected in memory. A run
//! that fails midway leaves the rows written so far on disk.

use crate::core::format::{format_row, header_row};
use crate::domain::{ConsentRecord, ExporterError, Result};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Writer for one export file
pub struct ConsentCsvWriter {
    path: PathBuf,
    inner: BufWriter<File>,
    rows: usize,
}

impl ConsentCsvWriter {
    /// Create (or replace) the file at `path` and write the header line
    ///
    /// Missing parent directories are created.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                ExporterError::Io(format!(
                    "Failed to create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        if fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "Removing previous export file");
            fs::remove_file(&path).await?;
        }

        let file = File::create(&path).await.map_err(|e| {
            ExporterError::Io(format!("Failed to create {}: {e}", path.display()))
        })?;

        let mut writer = Self {
            path,
            inner: BufWriter::new(file),
            rows: 0,
        };
        writer.write_line(&header_row()).await?;
        Ok(writer)
    }

    /// Append one consent record as a row
    pub async fn write_record(&mut self, record: &ConsentRecord) -> Result<()> {
        self.write_line(&format_row(record)).await?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and close the file, returning the number of data rows
    pub async fn finish(mut self) -> Result<usize> {
        self.inner.flush().await?;
        self.inner.shutdown().await?;
        tracing::debug!(path = %self.path.display(), rows = self.rows, "Export file closed");
        Ok(self.rows)
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.inner.write_all(line.as_bytes()).await?;
        self.inner.write_all(b"\n").await?;
        Ok(())
    }
}
