//! Speech synthesis port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::speech::LanguageTag;

/// Synthesis and playback errors
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("espeak-ng not found")]
    EspeakNotFound,

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio output device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port for spoken output.
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text` aloud in the given language.
    ///
    /// Empty text produces silence, never an error.
    async fn speak(&self, text: &str, language: &LanguageTag) -> Result<(), SpeechError>;
}

/// Blanket implementation for boxed speaker types
#[async_trait]
impl Speaker for Box<dyn Speaker> {
    async fn speak(&self, text: &str, language: &LanguageTag) -> Result<(), SpeechError> {
        self.as_ref().speak(text, language).await
    }
}
