//! EchoScribe - voice transcription CLI with spoken read-back
//!
//! This crate records speech from the microphone, streams it through the
//! Gemini API for transcription, and speaks the finalized transcript back
//! through espeak-ng. Recorded audio files can be transcribed in one shot,
//! and transcripts exported to timestamp-named text files.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors -
//!   most importantly the dictation session state machine
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Gemini, espeak-ng,
//!   filesystem export, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
