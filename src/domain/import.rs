//! Imported audio job entity

use std::fmt;
use std::path::{Path, PathBuf};

/// Job states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Completed,
    Failed,
}

impl JobState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One-shot import-and-transcribe job.
/// Created when the user selects an audio file, terminated by the first
/// provider callback, and never reused afterwards.
#[derive(Debug, Clone)]
pub struct ImportJob {
    source: PathBuf,
    result_text: String,
    state: JobState,
}

impl ImportJob {
    /// Create a pending job for the given audio source
    pub fn pending(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            result_text: String::new(),
            state: JobState::Pending,
        }
    }

    /// Terminate the job with the provider's transcript.
    /// Has no effect if the job is already terminal.
    pub fn complete(mut self, text: impl Into<String>) -> Self {
        if self.state == JobState::Pending {
            self.result_text = text.into();
            self.state = JobState::Completed;
        }
        self
    }

    /// Terminate the job with a failure.
    /// The result text becomes a human-readable `Error: <reason>` string.
    /// Has no effect if the job is already terminal.
    pub fn fail(mut self, reason: impl fmt::Display) -> Self {
        if self.state == JobState::Pending {
            self.result_text = format!("Error: {}", reason);
            self.state = JobState::Failed;
        }
        self
    }

    /// Get the source path
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Get the result text (empty while pending)
    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    /// Get the job state
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Check if the job has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.state != JobState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_is_pending() {
        let job = ImportJob::pending("/tmp/audio.wav");
        assert_eq!(job.state(), JobState::Pending);
        assert_eq!(job.result_text(), "");
        assert!(!job.is_terminal());
    }

    #[test]
    fn complete_stores_transcript() {
        let job = ImportJob::pending("/tmp/audio.wav").complete("hello there");
        assert_eq!(job.state(), JobState::Completed);
        assert_eq!(job.result_text(), "hello there");
        assert!(job.is_terminal());
    }

    #[test]
    fn fail_prefixes_error() {
        let job = ImportJob::pending("/tmp/audio.wav").fail("unsupported format");
        assert_eq!(job.state(), JobState::Failed);
        assert_eq!(job.result_text(), "Error: unsupported format");
        assert!(job.is_terminal());
    }

    #[test]
    fn terminal_job_ignores_further_callbacks() {
        let job = ImportJob::pending("/tmp/audio.wav")
            .complete("first")
            .fail("late error")
            .complete("second");
        assert_eq!(job.state(), JobState::Completed);
        assert_eq!(job.result_text(), "first");
    }

    #[test]
    fn source_is_preserved() {
        let job = ImportJob::pending("/tmp/audio.wav");
        assert_eq!(job.source(), Path::new("/tmp/audio.wav"));
    }

    #[test]
    fn state_display() {
        assert_eq!(JobState::Pending.to_string(), "pending");
        assert_eq!(JobState::Completed.to_string(), "completed");
        assert_eq!(JobState::Failed.to_string(), "failed");
    }
}
