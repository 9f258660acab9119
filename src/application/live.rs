//! Live dictation use case

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

use crate::domain::session::{DictationSession, InvalidStateTransition, SessionState};
use crate::domain::speech::LanguageTag;
use crate::domain::transcript::SourceLabel;

use super::ports::{
    Authorization, Capture, CaptureError, RecognitionError, Recognizer, Speaker, StreamHandle,
    StreamUpdate,
};

/// Errors from the live dictation use case
#[derive(Debug, Error)]
pub enum LiveError {
    #[error("Speech recognition not authorized ({0})")]
    NotAuthorized(Authorization),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Recognition failed: {0}")]
    Recognition(#[from] RecognitionError),

    #[error("Invalid state transition: {0}")]
    InvalidState(#[from] InvalidStateTransition),
}

/// Configuration for live dictation
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// Voice language for the spoken read-back
    pub language: LanguageTag,
    /// Whether the finalized transcript is spoken back
    pub read_back: bool,
    /// Depth of the capture-to-recognizer audio queue
    pub audio_queue_depth: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            language: LanguageTag::default(),
            read_back: true,
            audio_queue_depth: 64,
        }
    }
}

/// Shared state and collaborators of the active session.
/// Arc-shared between the use case and the per-session update pump.
struct SessionCore<C, S>
where
    C: Capture,
    S: Speaker,
{
    capture: C,
    speaker: S,
    session: Mutex<DictationSession>,
    active: Mutex<Option<StreamHandle>>,
    last_error: Mutex<Option<String>>,
    config: LiveConfig,
}

impl<C, S> SessionCore<C, S>
where
    C: Capture + 'static,
    S: Speaker + 'static,
{
    /// Drain provider updates for one session. Updates that arrive after
    /// the session has moved on are rejected by the state machine and
    /// dropped.
    async fn run_pump(self: Arc<Self>, mut updates: mpsc::Receiver<StreamUpdate>) {
        while let Some(update) = updates.recv().await {
            match update {
                StreamUpdate::Partial(text) => {
                    let _ = self.session.lock().await.apply_result(text);
                }
                StreamUpdate::Final(text) => {
                    let _ = self.session.lock().await.apply_result(text);
                    self.finalize().await;
                    break;
                }
                StreamUpdate::Failed(err) => {
                    self.record_error(err).await;
                    self.finalize().await;
                    break;
                }
            }
        }
    }

    /// Drive RECORDING -> FINALIZING -> IDLE. Returns false if the session
    /// was not recording; the transition guard also makes sure a racing
    /// user stop and provider final result produce exactly one read-back.
    async fn finalize(&self) -> bool {
        if self.session.lock().await.begin_finalizing().is_err() {
            return false;
        }

        // Release the input device first; dropping its sink closes the
        // audio channel, which is the end-of-input signal upstream.
        if let Err(e) = self.capture.stop().await {
            self.record_error(e).await;
        }

        if let Some(active) = self.active.lock().await.take() {
            active.cancel();
        }

        let text = self.session.lock().await.transcript().to_string();
        if self.config.read_back {
            if let Err(e) = self.speaker.speak(&text, &self.config.language).await {
                self.record_error(e).await;
            }
        }

        let _ = self.session.lock().await.complete();
        true
    }

    async fn record_error(&self, err: impl std::fmt::Display) {
        *self.last_error.lock().await = Some(err.to_string());
    }
}

/// Live dictation use case.
///
/// Owns the session state machine and the single execution context that
/// applies provider updates to it: capture chunks flow to the recognizer
/// over a bounded channel, recognition updates flow back over a second
/// channel drained by one pump task per session. `start()` and `stop()`
/// serialize against the pump on the session mutex and on the state-machine
/// guards, so no two callers can race a transition.
///
/// A provider final result or mid-stream error finalizes the session
/// automatically, exactly as an explicit `stop()` would.
pub struct LiveDictationUseCase<R, C, S>
where
    R: Recognizer,
    C: Capture + 'static,
    S: Speaker + 'static,
{
    recognizer: R,
    core: Arc<SessionCore<C, S>>,
}

impl<R, C, S> LiveDictationUseCase<R, C, S>
where
    R: Recognizer,
    C: Capture + 'static,
    S: Speaker + 'static,
{
    /// Create a new use case instance
    pub fn new(recognizer: R, capture: C, speaker: S, config: LiveConfig) -> Self {
        Self {
            recognizer,
            core: Arc::new(SessionCore {
                capture,
                speaker,
                session: Mutex::new(DictationSession::new()),
                active: Mutex::new(None),
                last_error: Mutex::new(None),
                config,
            }),
        }
    }

    /// Get current session state
    pub async fn state(&self) -> SessionState {
        self.core.session.lock().await.state()
    }

    /// Get the current transcript
    pub async fn transcript(&self) -> String {
        self.core.session.lock().await.transcript().to_string()
    }

    /// Get the label of the current session, if one has begun
    pub async fn source_label(&self) -> Option<SourceLabel> {
        self.core.session.lock().await.source_label().cloned()
    }

    /// Take the most recent non-fatal error, if any
    pub async fn take_last_error(&self) -> Option<String> {
        self.core.last_error.lock().await.take()
    }

    /// Start a new live session.
    ///
    /// No-op returning `Ok(false)` unless the session is idle. Requests
    /// authorization first; a refusal is terminal for this attempt and the
    /// session returns to idle without recording. Capture or stream startup
    /// failures likewise abort without ever entering the recording state.
    pub async fn start(&self) -> Result<bool, LiveError> {
        {
            let mut session = self.core.session.lock().await;
            if !session.is_idle() {
                return Ok(false);
            }
            session.begin(SourceLabel::now())?;
        }

        let auth = self.recognizer.request_authorization().await;
        if !auth.is_authorized() {
            self.core.session.lock().await.deny()?;
            return Err(LiveError::NotAuthorized(auth));
        }

        // Clear any stale stream handle before acquiring the device, so a
        // re-entrant start can never double-attach the input.
        if let Some(stale) = self.core.active.lock().await.take() {
            stale.cancel();
        }

        let (audio_tx, audio_rx) = mpsc::channel(self.core.config.audio_queue_depth);
        let (update_tx, update_rx) = mpsc::channel(16);

        let handle = match self.recognizer.start_stream(audio_rx, update_tx).await {
            Ok(handle) => handle,
            Err(e) => {
                self.core.session.lock().await.deny()?;
                return Err(e.into());
            }
        };

        if let Err(e) = self.core.capture.start(audio_tx).await {
            handle.cancel();
            self.core.session.lock().await.deny()?;
            return Err(e.into());
        }

        *self.core.active.lock().await = Some(handle);
        self.core.session.lock().await.grant()?;

        let pump = Arc::clone(&self.core);
        tokio::spawn(pump.run_pump(update_rx));

        Ok(true)
    }

    /// Stop the current session.
    ///
    /// Idempotent: returns `Ok(false)` when there is nothing to stop.
    /// Otherwise finalizes - the capture device is released before this
    /// returns, the in-flight recognition task is cancelled, and the
    /// transcript accumulated so far is spoken back.
    pub async fn stop(&self) -> Result<bool, LiveError> {
        Ok(self.core.finalize().await)
    }
}
