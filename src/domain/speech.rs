//! Speech synthesis value objects

use std::fmt;
use std::str::FromStr;

use crate::domain::error::LanguageTagParseError;

/// Value object holding the voice language for synthesis, e.g. `en-US`.
/// Loosely BCP-47 shaped: one or more alphanumeric segments of up to eight
/// characters, joined by hyphens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Create a validated language tag
    pub fn new(tag: impl Into<String>) -> Result<Self, LanguageTagParseError> {
        let tag = tag.into();
        let valid = !tag.is_empty()
            && tag.split('-').all(|segment| {
                !segment.is_empty()
                    && segment.len() <= 8
                    && segment.chars().all(|c| c.is_ascii_alphanumeric())
            });

        if !valid {
            return Err(LanguageTagParseError { input: tag });
        }
        Ok(Self(tag))
    }

    /// Get the tag string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self("en-US".to_string())
    }
}

impl FromStr for LanguageTag {
    type Err = LanguageTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_en_us() {
        assert_eq!(LanguageTag::default().as_str(), "en-US");
    }

    #[test]
    fn accepts_common_tags() {
        assert!(LanguageTag::new("en").is_ok());
        assert!(LanguageTag::new("en-US").is_ok());
        assert!(LanguageTag::new("pt-BR").is_ok());
        assert!(LanguageTag::new("zh-Hans-CN").is_ok());
    }

    #[test]
    fn rejects_malformed_tags() {
        assert!(LanguageTag::new("").is_err());
        assert!(LanguageTag::new("-US").is_err());
        assert!(LanguageTag::new("en-").is_err());
        assert!(LanguageTag::new("en US").is_err());
        assert!(LanguageTag::new("verylongsegment").is_err());
    }

    #[test]
    fn from_str_round_trips() {
        let tag: LanguageTag = "de-DE".parse().unwrap();
        assert_eq!(tag.to_string(), "de-DE");
    }
}
