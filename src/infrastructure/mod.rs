//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, the Gemini API,
//! espeak-ng, and the filesystem.

pub mod capture;
pub mod config;
pub mod export;
pub mod recognition;
pub mod speech;

// Re-export adapters
pub use capture::CpalCapture;
pub use config::XdgConfigStore;
pub use export::DirectoryExporter;
pub use recognition::GeminiRecognizer;
pub use speech::{EspeakSpeaker, NoOpSpeaker};
