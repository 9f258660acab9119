//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod exporter;
pub mod recognizer;
pub mod speaker;

// Re-export common types
pub use capture::{Capture, CaptureError};
pub use config::ConfigStore;
pub use exporter::{ExportError, Exporter};
pub use recognizer::{
    Authorization, RecognitionError, Recognizer, StreamHandle, StreamUpdate,
};
pub use speaker::{Speaker, SpeechError};
