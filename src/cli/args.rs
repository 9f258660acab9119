//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::duration::Duration;
use crate::domain::speech::LanguageTag;

/// EchoScribe - voice transcription with spoken read-back
#[derive(Parser, Debug)]
#[command(name = "echo-scribe")]
#[command(version = "1.0.0")]
#[command(about = "Voice transcription with spoken read-back using Google Gemini")]
#[command(long_about = None)]
pub struct Cli {
    /// Synthesis language for the read-back (e.g. en-US)
    #[arg(short = 'l', long, value_name = "TAG")]
    pub language: Option<String>,

    /// Skip the spoken read-back when the session finalizes
    #[arg(long)]
    pub no_read_back: bool,

    /// Export the final transcript to a transcription_<timestamp>.txt file
    #[arg(short = 'e', long)]
    pub export: bool,

    /// Export destination directory (defaults to the documents directory)
    #[arg(long, value_name = "DIR")]
    pub to: Option<PathBuf>,

    /// Partial transcript refresh cadence (e.g. 3s)
    #[arg(long, value_name = "TIME")]
    pub refresh: Option<String>,

    /// Safety limit for a live session (e.g. 5m)
    #[arg(long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Subcommand (live transcription runs when none is given)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a recorded audio file in one shot
    Import {
        /// Audio file to transcribe (wav, flac, ogg, mp3, m4a, webm)
        file: PathBuf,
    },
    /// Speak text aloud (reads stdin when no text is given)
    Speak {
        /// Text to speak
        text: Option<String>,
        /// Synthesis language (e.g. en-US)
        #[arg(short = 'l', long, value_name = "TAG")]
        language: Option<String>,
    },
    /// Export text from stdin to a transcription_<timestamp>.txt file
    Export {
        /// Export destination directory
        #[arg(long, value_name = "DIR")]
        to: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show the config file path
    Path,
}

/// Valid configuration keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "language",
    "read_back",
    "export_dir",
    "refresh",
    "max_duration",
];

/// Check whether `key` names a known config field
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

/// Resolved options for live dictation
#[derive(Debug, Clone)]
pub struct LiveOptions {
    pub language: LanguageTag,
    pub read_back: bool,
    pub export: bool,
    pub export_dir: Option<PathBuf>,
    pub refresh: Duration,
    pub max_duration: Duration,
}
