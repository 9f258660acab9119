//! Microphone capture port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::audio::AudioChunk;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Capture device error: {0}")]
    DeviceFailed(String),

    #[error("Capture is already running")]
    AlreadyCapturing,
}

/// Port for unbounded microphone capture.
///
/// The input device and its stream are exclusively owned: at most one
/// capture may be active at a time, and `start` while capturing is an
/// error. The device callback hands chunks to `sink` without blocking,
/// dropping them if the consumer falls behind.
#[async_trait]
pub trait Capture: Send + Sync {
    /// Start capturing into `sink`.
    async fn start(&self, sink: mpsc::Sender<AudioChunk>) -> Result<(), CaptureError>;

    /// Stop capturing and release the input device.
    ///
    /// Returns only once the device is released; the held sink is dropped
    /// here, which closes the audio channel and signals end of input to the
    /// recognizer.
    async fn stop(&self) -> Result<(), CaptureError>;

    /// Check if currently capturing
    fn is_capturing(&self) -> bool;
}
