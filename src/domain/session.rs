//! Dictation session state machine

use std::fmt;
use thiserror::Error;

use crate::domain::transcript::SourceLabel;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    RequestingAuthorization,
    Recording,
    Finalizing,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RequestingAuthorization => "requesting-authorization",
            Self::Recording => "recording",
            Self::Finalizing => "finalizing",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Dictation session entity.
/// Manages state transitions for a live transcription session and owns the
/// running transcript.
///
/// State machine:
///   IDLE -> REQUESTING_AUTHORIZATION (begin)
///   REQUESTING_AUTHORIZATION -> RECORDING (grant)
///   REQUESTING_AUTHORIZATION -> IDLE (deny)
///   RECORDING -> RECORDING (apply_result, transcript replaced)
///   RECORDING -> FINALIZING (begin_finalizing)
///   FINALIZING -> IDLE (complete)
///
/// The transcript is cleared when recording begins and frozen once the
/// session returns to idle.
#[derive(Debug, Default)]
pub struct DictationSession {
    state: SessionState,
    transcript: String,
    source_label: Option<SourceLabel>,
}

impl DictationSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            transcript: String::new(),
            source_label: None,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Check if currently finalizing
    pub fn is_finalizing(&self) -> bool {
        self.state == SessionState::Finalizing
    }

    /// Get the running transcript
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Get the label tagging the current session, if one has begun
    pub fn source_label(&self) -> Option<&SourceLabel> {
        self.source_label.as_ref()
    }

    /// Transition from IDLE to REQUESTING_AUTHORIZATION, tagging the new
    /// session with `label`.
    pub fn begin(&mut self, label: SourceLabel) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "begin session".to_string(),
            });
        }
        self.source_label = Some(label);
        self.state = SessionState::RequestingAuthorization;
        Ok(())
    }

    /// Transition from REQUESTING_AUTHORIZATION to RECORDING.
    /// The transcript of the previous session is discarded here, so a denied
    /// attempt leaves the old text observable.
    pub fn grant(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::RequestingAuthorization {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "grant authorization".to_string(),
            });
        }
        self.transcript.clear();
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Transition from REQUESTING_AUTHORIZATION back to IDLE (authorization
    /// refused, or the capture engine failed to start).
    pub fn deny(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::RequestingAuthorization {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "deny authorization".to_string(),
            });
        }
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Apply a recognition result while RECORDING.
    ///
    /// Each result carries the full running transcript, so the stored text is
    /// replaced, never appended to.
    pub fn apply_result(&mut self, text: impl Into<String>) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "apply recognition result".to_string(),
            });
        }
        self.transcript = text.into();
        Ok(())
    }

    /// Transition from RECORDING to FINALIZING
    pub fn begin_finalizing(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "begin finalizing".to_string(),
            });
        }
        self.state = SessionState::Finalizing;
        Ok(())
    }

    /// Transition from FINALIZING to IDLE
    pub fn complete(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Finalizing {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "complete session".to_string(),
            });
        }
        self.state = SessionState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> SourceLabel {
        SourceLabel::from_raw("transcription_2024-07-03_15-04-05")
    }

    #[test]
    fn new_session_is_idle() {
        let session = DictationSession::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
        assert!(!session.is_finalizing());
        assert_eq!(session.transcript(), "");
        assert!(session.source_label().is_none());
    }

    #[test]
    fn begin_from_idle() {
        let mut session = DictationSession::new();
        assert!(session.begin(label()).is_ok());
        assert_eq!(session.state(), SessionState::RequestingAuthorization);
        assert_eq!(session.source_label().unwrap().as_str(), label().as_str());
    }

    #[test]
    fn begin_while_recording_fails() {
        let mut session = DictationSession::new();
        session.begin(label()).unwrap();
        session.grant().unwrap();

        let err = session.begin(label()).unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
        assert!(err.action.contains("begin"));
    }

    #[test]
    fn grant_enters_recording_and_clears_transcript() {
        let mut session = DictationSession::new();
        session.begin(label()).unwrap();
        session.grant().unwrap();
        session.apply_result("leftover").unwrap();
        session.begin_finalizing().unwrap();
        session.complete().unwrap();

        session.begin(label()).unwrap();
        assert_eq!(session.transcript(), "leftover");
        session.grant().unwrap();
        assert!(session.is_recording());
        assert_eq!(session.transcript(), "");
    }

    #[test]
    fn deny_returns_to_idle_with_transcript_untouched() {
        let mut session = DictationSession::new();
        session.begin(label()).unwrap();
        session.grant().unwrap();
        session.apply_result("earlier text").unwrap();
        session.begin_finalizing().unwrap();
        session.complete().unwrap();

        session.begin(label()).unwrap();
        session.deny().unwrap();
        assert!(session.is_idle());
        assert_eq!(session.transcript(), "earlier text");
    }

    #[test]
    fn deny_from_recording_fails() {
        let mut session = DictationSession::new();
        session.begin(label()).unwrap();
        session.grant().unwrap();

        let err = session.deny().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
    }

    #[test]
    fn apply_result_replaces_rather_than_appends() {
        let mut session = DictationSession::new();
        session.begin(label()).unwrap();
        session.grant().unwrap();

        session.apply_result("h").unwrap();
        session.apply_result("he").unwrap();
        session.apply_result("hello").unwrap();
        assert_eq!(session.transcript(), "hello");
    }

    #[test]
    fn apply_result_outside_recording_fails() {
        let mut session = DictationSession::new();
        let err = session.apply_result("x").unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);

        session.begin(label()).unwrap();
        let err = session.apply_result("x").unwrap_err();
        assert_eq!(err.current_state, SessionState::RequestingAuthorization);
    }

    #[test]
    fn transcript_is_frozen_once_idle() {
        let mut session = DictationSession::new();
        session.begin(label()).unwrap();
        session.grant().unwrap();
        session.apply_result("final words").unwrap();
        session.begin_finalizing().unwrap();
        session.complete().unwrap();

        assert!(session.apply_result("late callback").is_err());
        assert_eq!(session.transcript(), "final words");
    }

    #[test]
    fn begin_finalizing_from_idle_fails() {
        let mut session = DictationSession::new();
        let err = session.begin_finalizing().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn complete_from_recording_fails() {
        let mut session = DictationSession::new();
        session.begin(label()).unwrap();
        session.grant().unwrap();

        let err = session.complete().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
    }

    #[test]
    fn full_cycle() {
        let mut session = DictationSession::new();
        assert!(session.is_idle());

        session.begin(label()).unwrap();
        assert_eq!(session.state(), SessionState::RequestingAuthorization);

        session.grant().unwrap();
        assert!(session.is_recording());

        session.apply_result("hello").unwrap();
        session.begin_finalizing().unwrap();
        assert!(session.is_finalizing());

        session.complete().unwrap();
        assert!(session.is_idle());
        assert_eq!(session.transcript(), "hello");

        // Can start another cycle
        session.begin(label()).unwrap();
        assert_eq!(session.state(), SessionState::RequestingAuthorization);
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(
            SessionState::RequestingAuthorization.to_string(),
            "requesting-authorization"
        );
        assert_eq!(SessionState::Recording.to_string(), "recording");
        assert_eq!(SessionState::Finalizing.to_string(), "finalizing");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Finalizing,
            action: "begin session".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("begin session"));
        assert!(msg.contains("finalizing"));
    }
}
