//! Gemini API recognizer adapter
//!
//! One adapter covers both recognition paths: `recognize_file` submits a
//! complete clip in a single generateContent request, and `start_stream`
//! approximates streaming recognition by accumulating captured PCM and
//! periodically re-recognizing the whole buffer, so every partial carries
//! the full running transcript.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::application::ports::{
    Authorization, RecognitionError, Recognizer, StreamHandle, StreamUpdate,
};
use crate::domain::audio::{AudioChunk, AudioData, AudioMimeType};
use crate::domain::duration::Duration;
use crate::infrastructure::capture::flac_encoder::encode_pcm_to_flac;

/// Gemini API model to use
const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Instruction pinning the model to verbatim transcription
const TRANSCRIBE_INSTRUCTION: &str = "You are a transcription tool. Transcribe the spoken audio \
verbatim. Output only the transcript text, with no commentary, labels, or formatting.";

// Request types for the Gemini API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Option<SystemInstruction>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

// Response types for the Gemini API

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<i32>,
    message: Option<String>,
}

/// Gemini recognizer adapter
#[derive(Clone)]
pub struct GeminiRecognizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    refresh: Duration,
}

impl GeminiRecognizer {
    /// Create a new recognizer with the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            refresh: Duration::default_refresh(),
        }
    }

    /// Override the API base URL (used by tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the partial-refresh cadence
    pub fn with_refresh(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }

    fn request_url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(&self, audio: &AudioData) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: audio.mime_type().to_string(),
                        data: audio.to_base64(),
                    }),
                }],
            }],
            system_instruction: Some(SystemInstruction {
                parts: vec![TextPart {
                    text: TRANSCRIBE_INSTRUCTION.to_string(),
                }],
            }),
        }
    }

    /// Encode accumulated PCM and run it through `recognize_file`
    async fn recognize_pcm(
        &self,
        samples: &[i16],
        sample_rate: u32,
    ) -> Result<String, RecognitionError> {
        let owned = samples.to_vec();
        let flac = tokio::task::spawn_blocking(move || encode_pcm_to_flac(&owned, sample_rate))
            .await
            .map_err(|e| RecognitionError::EncodingFailed(e.to_string()))?
            .map_err(|e| RecognitionError::EncodingFailed(e.to_string()))?;

        self.recognize_file(&AudioData::new(flac, AudioMimeType::Flac))
            .await
    }
}

#[async_trait]
impl Recognizer for GeminiRecognizer {
    async fn request_authorization(&self) -> Authorization {
        // There is no OS permission dialog here; a configured key is the
        // authorization to use the service.
        if self.api_key.trim().is_empty() {
            Authorization::Denied
        } else {
            Authorization::Authorized
        }
    }

    async fn start_stream(
        &self,
        mut audio: mpsc::Receiver<AudioChunk>,
        updates: mpsc::Sender<StreamUpdate>,
    ) -> Result<StreamHandle, RecognitionError> {
        let recognizer = self.clone();
        let refresh = self.refresh.as_std();

        let task = tokio::spawn(async move {
            let mut buffer: Vec<i16> = Vec::new();
            let mut sample_rate = 0u32;
            let mut ticker = tokio::time::interval(refresh);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval fires immediately; consume the zeroth tick
            ticker.tick().await;

            loop {
                tokio::select! {
                    chunk = audio.recv() => match chunk {
                        Some(chunk) => {
                            sample_rate = chunk.sample_rate();
                            buffer.extend_from_slice(chunk.samples());
                        }
                        // Channel closed: end of input
                        None => break,
                    },
                    _ = ticker.tick() => {
                        if buffer.is_empty() {
                            continue;
                        }
                        match recognizer.recognize_pcm(&buffer, sample_rate).await {
                            Ok(text) => {
                                if updates.send(StreamUpdate::Partial(text)).await.is_err() {
                                    return;
                                }
                            }
                            // Nothing intelligible yet is not a failure
                            Err(RecognitionError::EmptyResponse) => {}
                            Err(e) => {
                                let _ = updates.send(StreamUpdate::Failed(e)).await;
                                return;
                            }
                        }
                    }
                }
            }

            // One full-buffer pass for the final transcript
            let final_update = if buffer.is_empty() {
                StreamUpdate::Final(String::new())
            } else {
                match recognizer.recognize_pcm(&buffer, sample_rate).await {
                    Ok(text) => StreamUpdate::Final(text),
                    Err(RecognitionError::EmptyResponse) => StreamUpdate::Final(String::new()),
                    Err(e) => StreamUpdate::Failed(e),
                }
            };
            let _ = updates.send(final_update).await;
        });

        Ok(StreamHandle::new(task))
    }

    async fn recognize_file(&self, audio: &AudioData) -> Result<String, RecognitionError> {
        let request = self.build_request(audio);

        let response = self
            .client
            .post(self.request_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| RecognitionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RecognitionError::InvalidApiKey);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RecognitionError::RateLimited);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::ParseError(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(RecognitionError::ApiError(format!(
                "{} (code {})",
                error.message.unwrap_or_else(|| "unknown error".to_string()),
                error.code.unwrap_or_default()
            )));
        }

        let text = body
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.content)
            .filter_map(|c| c.parts)
            .flatten()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(RecognitionError::EmptyResponse);
        }

        Ok(text)
    }
}
