//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::duration::Duration;
use crate::domain::speech::LanguageTag;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub read_back: Option<bool>,
    pub export_dir: Option<String>,
    pub refresh: Option<String>,
    pub max_duration: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            language: Some("en-US".to_string()),
            read_back: Some(true),
            export_dir: None,
            refresh: Some(Duration::default_refresh().to_string()),
            max_duration: Some(Duration::default_max_duration().to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            language: other.language.or(self.language),
            read_back: other.read_back.or(self.read_back),
            export_dir: other.export_dir.or(self.export_dir),
            refresh: other.refresh.or(self.refresh),
            max_duration: other.max_duration.or(self.max_duration),
        }
    }

    /// Synthesis language, falling back to en-US on missing or invalid tags
    pub fn language_or_default(&self) -> LanguageTag {
        self.language
            .as_deref()
            .and_then(|tag| tag.parse().ok())
            .unwrap_or_default()
    }

    /// Whether the finalized transcript is spoken back (defaults to true)
    pub fn read_back_or_default(&self) -> bool {
        self.read_back.unwrap_or(true)
    }

    /// Partial-refresh cadence, falling back to the default on missing or
    /// invalid values
    pub fn refresh_or_default(&self) -> Duration {
        self.refresh
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_refresh)
    }

    /// Live-session safety limit, falling back to the default on missing or
    /// invalid values
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_values() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.language.is_none());
        assert!(config.read_back.is_none());
    }

    #[test]
    fn merge_prefers_other() {
        let base = AppConfig {
            api_key: Some("base-key".to_string()),
            language: Some("en-US".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            api_key: Some("other-key".to_string()),
            read_back: Some(false),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.api_key.as_deref(), Some("other-key"));
        assert_eq!(merged.language.as_deref(), Some("en-US"));
        assert_eq!(merged.read_back, Some(false));
    }

    #[test]
    fn language_falls_back_on_invalid_tag() {
        let config = AppConfig {
            language: Some("not a tag".to_string()),
            ..Default::default()
        };
        assert_eq!(config.language_or_default().as_str(), "en-US");
    }

    #[test]
    fn read_back_defaults_to_true() {
        assert!(AppConfig::empty().read_back_or_default());

        let off = AppConfig {
            read_back: Some(false),
            ..Default::default()
        };
        assert!(!off.read_back_or_default());
    }

    #[test]
    fn durations_fall_back_on_invalid_values() {
        let config = AppConfig {
            refresh: Some("garbage".to_string()),
            max_duration: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(config.refresh_or_default(), Duration::default_refresh());
        assert_eq!(
            config.max_duration_or_default(),
            Duration::default_max_duration()
        );
    }

    #[test]
    fn defaults_round_trip_through_parsing() {
        let config = AppConfig::defaults();
        assert_eq!(config.refresh_or_default(), Duration::default_refresh());
        assert_eq!(
            config.max_duration_or_default(),
            Duration::default_max_duration()
        );
        assert_eq!(config.language_or_default().as_str(), "en-US");
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig {
            api_key: Some("k".to_string()),
            language: Some("de-DE".to_string()),
            read_back: Some(false),
            export_dir: Some("/tmp/out".to_string()),
            refresh: Some("5s".to_string()),
            max_duration: Some("2m".to_string()),
        };

        let serialized = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some("k"));
        assert_eq!(parsed.language.as_deref(), Some("de-DE"));
        assert_eq!(parsed.read_back, Some(false));
        assert_eq!(parsed.export_dir.as_deref(), Some("/tmp/out"));
    }
}
