//! Transcript export port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Export errors
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("Failed to write transcript: {0}")]
    WriteFailed(String),

    #[error("No export destination available")]
    NoDestination,

    #[error("Failed to deliver transcript: {0}")]
    DeliverFailed(String),
}

/// Port for delivering a staged transcript file to its destination.
///
/// The adapter decides where the file ends up (a documents directory, a
/// user-chosen path) and reports the final location back.
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Deliver the staged file, returning its final location.
    async fn deliver(&self, staged: &Path) -> Result<PathBuf, ExportError>;
}
