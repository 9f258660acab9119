//! App runners for live, import, speak, and export modes

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use chrono::Local;
use tokio::io::AsyncReadExt;

use crate::application::ports::{ConfigStore, Speaker};
use crate::application::{
    ExportTranscriptUseCase, ImportTranscriptionUseCase, LiveConfig, LiveDictationUseCase,
    LiveError,
};
use crate::domain::config::AppConfig;
use crate::domain::import::JobState;
use crate::domain::session::SessionState;
use crate::domain::speech::LanguageTag;
use crate::infrastructure::{
    CpalCapture, DirectoryExporter, EspeakSpeaker, GeminiRecognizer, XdgConfigStore,
};

use super::args::LiveOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

const MISSING_KEY_HINT: &str =
    "Missing API key. Set GEMINI_API_KEY or configure via 'echo-scribe config set api_key <key>'";

/// Load config merged from defaults, the config file, and CLI overrides
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}", e);
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Resolve the API key from the environment or the config file.
/// Returns an empty string when unset; the recognizer then reports the
/// attempt as not authorized.
pub async fn resolve_api_key() -> String {
    if let Ok(key) = env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            return key;
        }
    }

    let store = XdgConfigStore::new();
    store
        .load()
        .await
        .ok()
        .and_then(|config| config.api_key)
        .unwrap_or_default()
}

/// Run a live dictation session until the provider finalizes it, the user
/// interrupts, or the safety limit trips
pub async fn run_live(options: LiveOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let api_key = resolve_api_key().await;

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let recognizer = GeminiRecognizer::new(api_key).with_refresh(options.refresh);
    let capture = CpalCapture::new();
    let speaker = EspeakSpeaker::new();

    let use_case = LiveDictationUseCase::new(
        recognizer,
        capture,
        speaker,
        LiveConfig {
            language: options.language.clone(),
            read_back: options.read_back,
            audio_queue_depth: 64,
        },
    );

    match use_case.start().await {
        Ok(_) => {}
        Err(LiveError::NotAuthorized(auth)) => {
            presenter.error(&format!("Speech recognition not authorized ({})", auth));
            presenter.info(MISSING_KEY_HINT);
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    }

    presenter.start_spinner("Listening... (Ctrl+C to stop)");

    let started = Instant::now();
    let max_duration = options.max_duration.as_std();
    loop {
        tokio::time::sleep(std::time::Duration::from_millis(150)).await;

        // The provider delivered a final result and the session finalized
        // itself
        if use_case.state().await == SessionState::Idle {
            break;
        }

        if shutdown.is_shutdown() {
            let _ = use_case.stop().await;
            break;
        }

        if started.elapsed() >= max_duration {
            presenter.warn("Max duration reached, stopping");
            let _ = use_case.stop().await;
            break;
        }

        presenter.live_transcript(&use_case.transcript().await);
    }

    presenter.stop_spinner();

    if let Some(err) = use_case.take_last_error().await {
        presenter.warn(&err);
    }

    let transcript = use_case.transcript().await;
    presenter.output(&transcript);

    if options.export {
        return export_text(&transcript, options.export_dir.as_deref(), &presenter).await;
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Transcribe a recorded audio file in one shot
pub async fn run_import(file: &Path) -> ExitCode {
    let mut presenter = Presenter::new();

    let api_key = resolve_api_key().await;
    if api_key.trim().is_empty() {
        presenter.error(MISSING_KEY_HINT);
        return ExitCode::from(EXIT_ERROR);
    }

    let use_case = ImportTranscriptionUseCase::new(GeminiRecognizer::new(api_key));

    presenter.start_spinner(&format!("Transcribing {}...", file.display()));
    let job = use_case.execute(file).await;

    match job.state() {
        JobState::Completed => {
            presenter.spinner_success("Transcription complete");
            presenter.output(job.result_text());
            ExitCode::from(EXIT_SUCCESS)
        }
        _ => {
            presenter.spinner_fail("Transcription failed");
            presenter.error(job.result_text());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Speak the given text (or stdin) aloud
pub async fn run_speak(text: Option<String>, language: LanguageTag) -> ExitCode {
    let presenter = Presenter::new();

    let text = match text {
        Some(text) => text,
        None => match read_stdin().await {
            Ok(text) => text,
            Err(e) => {
                presenter.error(&format!("Failed to read stdin: {}", e));
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    let speaker = EspeakSpeaker::new();
    if let Err(e) = speaker.speak(&text, &language).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Export stdin to a transcription_<timestamp>.txt file
pub async fn run_export_stdin(to: Option<PathBuf>) -> ExitCode {
    let presenter = Presenter::new();

    let text = match read_stdin().await {
        Ok(text) => text,
        Err(e) => {
            presenter.error(&format!("Failed to read stdin: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    export_text(&text, to.as_deref(), &presenter).await
}

async fn export_text(text: &str, to: Option<&Path>, presenter: &Presenter) -> ExitCode {
    let exporter = match to {
        Some(dir) => DirectoryExporter::with_destination(dir),
        None => match DirectoryExporter::new() {
            Ok(exporter) => exporter,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    let use_case = ExportTranscriptUseCase::new(exporter);
    match use_case.execute(text, Local::now()).await {
        Ok(output) => {
            presenter.success(&format!(
                "Saved {} to {}",
                output.file_name,
                output.destination.display()
            ));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn read_stdin() -> Result<String, std::io::Error> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text)
}
