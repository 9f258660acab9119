//! Directory export gateway
//!
//! The CLI stand-in for a destination picker: delivers a staged transcript
//! by copying it into a destination directory and reporting the final path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{ExportError, Exporter};

/// Exporter that copies staged files into a destination directory
pub struct DirectoryExporter {
    destination: PathBuf,
}

impl DirectoryExporter {
    /// Create an exporter targeting the user's documents directory,
    /// falling back to the download directory, then home.
    pub fn new() -> Result<Self, ExportError> {
        let destination = dirs::document_dir()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
            .ok_or(ExportError::NoDestination)?;

        Ok(Self { destination })
    }

    /// Create an exporter targeting a specific directory
    pub fn with_destination(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// Get the destination directory
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

#[async_trait]
impl Exporter for DirectoryExporter {
    async fn deliver(&self, staged: &Path) -> Result<PathBuf, ExportError> {
        let file_name = staged
            .file_name()
            .ok_or_else(|| ExportError::DeliverFailed("staged file has no name".into()))?;

        fs::create_dir_all(&self.destination)
            .await
            .map_err(|e| ExportError::DeliverFailed(e.to_string()))?;

        let target = self.destination.join(file_name);
        fs::copy(staged, &target)
            .await
            .map_err(|e| ExportError::DeliverFailed(e.to_string()))?;

        Ok(target)
    }
}
