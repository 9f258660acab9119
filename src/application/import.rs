//! Import-and-transcribe use case

use std::path::Path;

use tokio::fs;

use crate::domain::audio::{AudioData, AudioMimeType};
use crate::domain::import::ImportJob;

use super::ports::Recognizer;

/// One-shot file transcription use case
pub struct ImportTranscriptionUseCase<R>
where
    R: Recognizer,
{
    recognizer: R,
}

impl<R> ImportTranscriptionUseCase<R>
where
    R: Recognizer,
{
    /// Create a new use case instance
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Submit the audio file as a single non-streaming recognition request.
    ///
    /// The returned job is always terminal: completed with the provider's
    /// transcript, or failed with a human-readable reason. There is no
    /// retry and no cancellation path.
    pub async fn execute(&self, path: &Path) -> ImportJob {
        let job = ImportJob::pending(path);

        let Some(mime) = AudioMimeType::from_path(path) else {
            return job.fail(format!(
                "unsupported audio format: {}",
                path.display()
            ));
        };

        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return job.fail(format!("failed to read {}: {}", path.display(), e));
            }
        };

        let audio = AudioData::new(bytes, mime);
        match self.recognizer.recognize_file(&audio).await {
            Ok(text) => job.complete(text),
            Err(e) => job.fail(e),
        }
    }
}
