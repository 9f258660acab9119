//! No-op speaker adapter
//!
//! Used when spoken read-back is disabled.

use async_trait::async_trait;

use crate::application::ports::{Speaker, SpeechError};
use crate::domain::speech::LanguageTag;

/// No-op speaker that does nothing
pub struct NoOpSpeaker;

impl NoOpSpeaker {
    /// Create a new no-op speaker
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Speaker for NoOpSpeaker {
    async fn speak(&self, _text: &str, _language: &LanguageTag) -> Result<(), SpeechError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_returns_ok() {
        let speaker = NoOpSpeaker::new();
        assert!(speaker.speak("hello", &LanguageTag::default()).await.is_ok());
        assert!(speaker.speak("", &LanguageTag::default()).await.is_ok());
    }
}
