//! Transcript naming and export value objects

use std::fmt;

use chrono::{DateTime, Local};

/// Timestamp format shared by session labels and export filenames
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Value object tagging a transcription session.
/// Derived from the wall-clock time the session began,
/// e.g. `transcription_2024-07-03_15-04-05`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLabel(String);

impl SourceLabel {
    /// Create a label for the given timestamp
    pub fn at(timestamp: DateTime<Local>) -> Self {
        Self(format!(
            "transcription_{}",
            timestamp.format(TIMESTAMP_FORMAT)
        ))
    }

    /// Create a label for the current wall-clock time
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    /// Create a label from an already-formatted string (used by tests)
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the label string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the export filename for this label
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value object carrying a transcript snapshot on its way to the export
/// gateway. The payload is frozen at construction; the suggested name is
/// derived from the given timestamp.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    payload: String,
    suggested_name: String,
}

impl ExportRequest {
    /// Create an export request for `payload`, named after `timestamp`
    pub fn new(payload: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            payload: payload.into(),
            suggested_name: SourceLabel::at(timestamp).file_name(),
        }
    }

    /// Get the text to be written
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Get the suggested filename, `transcription_<timestamp>.txt`
    pub fn suggested_name(&self) -> &str {
        &self.suggested_name
    }
}
