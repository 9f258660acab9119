//! espeak-ng speech synthesis adapter
//!
//! Synthesizes speech by running `espeak-ng --stdout` as a subprocess and
//! playing the resulting WAV through rodio.

use std::process::Stdio;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{Speaker, SpeechError};
use crate::domain::speech::LanguageTag;

/// espeak-ng speaker adapter
pub struct EspeakSpeaker {
    binary: String,
}

impl EspeakSpeaker {
    /// Create a new speaker using `espeak-ng` from PATH
    pub fn new() -> Self {
        Self {
            binary: "espeak-ng".to_string(),
        }
    }

    /// Create with a custom binary path
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for EspeakSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a language tag to an espeak-ng voice name (espeak voices are
/// lowercase, e.g. `en-us`)
fn voice_for(language: &LanguageTag) -> String {
    language.as_str().to_ascii_lowercase()
}

/// Play WAV bytes to the default output device (called from spawn_blocking)
fn play_wav_sync(bytes: Vec<u8>) -> Result<(), SpeechError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| SpeechError::DeviceNotAvailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| SpeechError::PlaybackFailed(e.to_string()))?;

    let source = Decoder::new(std::io::Cursor::new(bytes))
        .map_err(|e| SpeechError::PlaybackFailed(e.to_string()))?;

    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}

#[async_trait]
impl Speaker for EspeakSpeaker {
    async fn speak(&self, text: &str, language: &LanguageTag) -> Result<(), SpeechError> {
        // Empty text is silence, not an error
        if text.trim().is_empty() {
            return Ok(());
        }

        let mut child = Command::new(&self.binary)
            .args(["--stdout", "-v", &voice_for(language)])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SpeechError::EspeakNotFound
                } else {
                    SpeechError::SynthesisFailed(e.to_string())
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| SpeechError::SynthesisFailed(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(SpeechError::SynthesisFailed(format!(
                "espeak-ng exited with status: {}",
                output.status
            )));
        }

        if output.stdout.is_empty() {
            return Ok(());
        }

        // Playback blocks until the utterance finishes
        tokio::task::spawn_blocking(move || play_wav_sync(output.stdout))
            .await
            .map_err(|e| SpeechError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}
