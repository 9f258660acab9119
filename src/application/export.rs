//! Transcript export use case

use std::path::PathBuf;

use chrono::{DateTime, Local};
use tokio::fs;

use crate::domain::transcript::ExportRequest;

use super::ports::{ExportError, Exporter};

/// Output from a successful export
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// The `transcription_<timestamp>.txt` filename
    pub file_name: String,
    /// Where the gateway delivered the file
    pub destination: PathBuf,
}

/// Transcript export use case.
///
/// Stages the text in a transient file first; the export gateway is only
/// invoked once that write has succeeded, so a disk failure never produces
/// a half-delivered export.
pub struct ExportTranscriptUseCase<E>
where
    E: Exporter,
{
    exporter: E,
    staging_dir: PathBuf,
}

impl<E> ExportTranscriptUseCase<E>
where
    E: Exporter,
{
    /// Create a new use case staging through the system temp directory
    pub fn new(exporter: E) -> Self {
        Self {
            exporter,
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Create a new use case staging through the given directory
    pub fn with_staging_dir(exporter: E, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            exporter,
            staging_dir: staging_dir.into(),
        }
    }

    /// Export `text` under a name derived from `timestamp`.
    ///
    /// The staged file holds exactly the given text, UTF-8 encoded, no
    /// header. Write failure aborts before the gateway sees anything.
    pub async fn execute(
        &self,
        text: &str,
        timestamp: DateTime<Local>,
    ) -> Result<ExportOutput, ExportError> {
        let request = ExportRequest::new(text, timestamp);
        let staged = self.staging_dir.join(request.suggested_name());

        fs::write(&staged, request.payload())
            .await
            .map_err(|e| ExportError::WriteFailed(format!("{}: {}", staged.display(), e)))?;

        let destination = self.exporter.deliver(&staged).await?;

        Ok(ExportOutput {
            file_name: request.suggested_name().to_string(),
            destination,
        })
    }
}
