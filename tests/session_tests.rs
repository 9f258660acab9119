//! Live session integration tests
//!
//! Drives the session lifecycle through the public API with in-memory
//! providers standing in for the recognizer, microphone, and synthesizer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use echo_scribe::application::ports::{
    Authorization, Capture, CaptureError, RecognitionError, Recognizer, Speaker, SpeechError,
    StreamHandle, StreamUpdate,
};
use echo_scribe::application::{LiveConfig, LiveDictationUseCase};
use echo_scribe::domain::audio::{AudioChunk, AudioData};
use echo_scribe::domain::session::SessionState;
use echo_scribe::domain::speech::LanguageTag;

type UpdateSlot = Arc<StdMutex<Option<mpsc::Sender<StreamUpdate>>>>;

struct FakeRecognizer {
    auth: Authorization,
    updates: UpdateSlot,
}

#[async_trait]
impl Recognizer for FakeRecognizer {
    async fn request_authorization(&self) -> Authorization {
        self.auth
    }

    async fn start_stream(
        &self,
        mut audio: mpsc::Receiver<AudioChunk>,
        updates: mpsc::Sender<StreamUpdate>,
    ) -> Result<StreamHandle, RecognitionError> {
        *self.updates.lock().unwrap() = Some(updates);
        let task = tokio::spawn(async move { while audio.recv().await.is_some() {} });
        Ok(StreamHandle::new(task))
    }

    async fn recognize_file(&self, _audio: &AudioData) -> Result<String, RecognitionError> {
        Ok("unused".to_string())
    }
}

struct FakeCapture {
    capturing: AtomicBool,
    sink: StdMutex<Option<mpsc::Sender<AudioChunk>>>,
}

impl FakeCapture {
    fn new() -> Self {
        Self {
            capturing: AtomicBool::new(false),
            sink: StdMutex::new(None),
        }
    }
}

#[async_trait]
impl Capture for FakeCapture {
    async fn start(&self, sink: mpsc::Sender<AudioChunk>) -> Result<(), CaptureError> {
        *self.sink.lock().unwrap() = Some(sink);
        self.capturing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), CaptureError> {
        self.sink.lock().unwrap().take();
        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct FakeSpeaker {
    spoken: Arc<StdMutex<Vec<String>>>,
}

impl FakeSpeaker {
    fn new() -> Self {
        Self {
            spoken: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speaker for FakeSpeaker {
    async fn speak(&self, text: &str, _language: &LanguageTag) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn fixture() -> (
    UpdateSlot,
    FakeSpeaker,
    LiveDictationUseCase<FakeRecognizer, FakeCapture, FakeSpeaker>,
) {
    let slot: UpdateSlot = Arc::new(StdMutex::new(None));
    let speaker = FakeSpeaker::new();
    let use_case = LiveDictationUseCase::new(
        FakeRecognizer {
            auth: Authorization::Authorized,
            updates: Arc::clone(&slot),
        },
        FakeCapture::new(),
        speaker.clone(),
        LiveConfig::default(),
    );
    (slot, speaker, use_case)
}

fn sender(slot: &UpdateSlot) -> mpsc::Sender<StreamUpdate> {
    slot.lock().unwrap().clone().expect("stream not started")
}

async fn wait_for_idle(
    use_case: &LiveDictationUseCase<FakeRecognizer, FakeCapture, FakeSpeaker>,
) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while use_case.state().await != SessionState::Idle {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("session did not return to idle");
}

#[tokio::test]
async fn full_scenario_start_partials_final_readback() {
    let (slot, speaker, use_case) = fixture();

    assert!(use_case.start().await.unwrap());
    assert_eq!(use_case.state().await, SessionState::Recording);

    let tx = sender(&slot);
    for text in ["h", "he", "hello"] {
        tx.send(StreamUpdate::Partial(text.to_string()))
            .await
            .unwrap();
    }
    tx.send(StreamUpdate::Final("hello".to_string()))
        .await
        .unwrap();

    wait_for_idle(&use_case).await;

    assert_eq!(use_case.transcript().await, "hello");
    assert_eq!(use_case.state().await, SessionState::Idle);
    assert_eq!(speaker.spoken(), vec!["hello".to_string()]);
}

#[tokio::test]
async fn late_updates_after_stop_are_ignored() {
    let (slot, speaker, use_case) = fixture();

    use_case.start().await.unwrap();
    let tx = sender(&slot);
    tx.send(StreamUpdate::Partial("kept".to_string()))
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(2), async {
        while use_case.transcript().await != "kept" {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    assert!(use_case.stop().await.unwrap());
    assert_eq!(use_case.state().await, SessionState::Idle);

    // The provider fires one more callback after cancellation
    tx.send(StreamUpdate::Partial("late straggler".to_string()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(use_case.transcript().await, "kept");
    assert_eq!(speaker.spoken(), vec!["kept".to_string()]);
}

#[tokio::test]
async fn stop_is_idempotent_across_repeated_calls() {
    let (slot, speaker, use_case) = fixture();

    assert!(!use_case.stop().await.unwrap());
    assert!(!use_case.stop().await.unwrap());

    use_case.start().await.unwrap();
    let _ = sender(&slot);
    assert!(use_case.stop().await.unwrap());
    assert!(!use_case.stop().await.unwrap());

    assert_eq!(speaker.spoken().len(), 1);
}

#[tokio::test]
async fn denial_leaves_previous_transcript_observable() {
    let (slot, _speaker, use_case) = fixture();

    use_case.start().await.unwrap();
    sender(&slot)
        .send(StreamUpdate::Final("first words".to_string()))
        .await
        .unwrap();
    wait_for_idle(&use_case).await;

    // Second attempt against a provider that now refuses
    let denied = LiveDictationUseCase::new(
        FakeRecognizer {
            auth: Authorization::Denied,
            updates: Arc::new(StdMutex::new(None)),
        },
        FakeCapture::new(),
        FakeSpeaker::new(),
        LiveConfig::default(),
    );
    assert!(denied.start().await.is_err());
    assert_eq!(denied.state().await, SessionState::Idle);

    // And the first use case still holds its frozen text
    assert_eq!(use_case.transcript().await, "first words");
}
