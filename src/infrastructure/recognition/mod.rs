//! Recognition adapters

mod gemini;

pub use gemini::GeminiRecognizer;
