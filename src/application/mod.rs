//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod export;
pub mod import;
pub mod live;
pub mod ports;

// Re-export use cases
pub use export::{ExportOutput, ExportTranscriptUseCase};
pub use import::ImportTranscriptionUseCase;
pub use live::{LiveConfig, LiveDictationUseCase, LiveError};
