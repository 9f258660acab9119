//! Recognition port interfaces

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::audio::{AudioChunk, AudioData};

/// Recognition errors
#[derive(Debug, Clone, Error)]
pub enum RecognitionError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Empty recognition response")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to encode audio: {0}")]
    EncodingFailed(String),
}

/// Authorization outcome reported by the recognition provider.
///
/// The set is closed; an unknown platform status is unrepresentable, so no
/// runtime escape hatch exists or is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authorization {
    Authorized,
    Denied,
    Restricted,
    NotDetermined,
}

impl Authorization {
    /// Check whether recognition may proceed
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::Denied => "denied",
            Self::Restricted => "restricted",
            Self::NotDetermined => "not-determined",
        }
    }
}

impl std::fmt::Display for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single update emitted by a streaming recognition session.
///
/// Every `Partial` and `Final` carries the full running transcript, not a
/// delta; consumers replace their text rather than appending.
#[derive(Debug)]
pub enum StreamUpdate {
    /// Latest best-guess transcript
    Partial(String),
    /// Final transcript; emitted at most once, after the last partial
    Final(String),
    /// The provider failed mid-stream; terminal for the session
    Failed(RecognitionError),
}

/// Handle to an in-flight streaming recognition task.
pub struct StreamHandle {
    task: JoinHandle<()>,
}

impl StreamHandle {
    /// Wrap the provider task driving a stream
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Abort the recognition task. Updates already queued may still be
    /// delivered; anything later is dropped.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

/// Port for speech recognition
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Ask the provider whether recognition may be used.
    async fn request_authorization(&self) -> Authorization;

    /// Start a streaming recognition session.
    ///
    /// The provider consumes `audio` until that channel closes (the end-of-
    /// input signal), emitting updates on `updates`: any number of
    /// `Partial`s followed by exactly one `Final` or `Failed`.
    async fn start_stream(
        &self,
        audio: mpsc::Receiver<AudioChunk>,
        updates: mpsc::Sender<StreamUpdate>,
    ) -> Result<StreamHandle, RecognitionError>;

    /// Recognize a complete recorded audio clip in a single request.
    async fn recognize_file(&self, audio: &AudioData) -> Result<String, RecognitionError>;
}
