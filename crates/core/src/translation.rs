//! Translation contract used by the quote dialog.
//!
//! The core only defines the request/result types and the `Translator` seam;
//! the HTTP provider lives in `quoteflow-translate`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    De,
    Zh,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::De, Language::Zh];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Zh => "zh",
        }
    }

    /// Locale code understood by the translation provider.
    pub fn provider_code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Zh => "zh-CN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::De => "Deutsch",
            Self::Zh => "中文",
        }
    }

    /// Targets offered to a user whose interface is already in `current`.
    pub fn targets_excluding(current: Language) -> Vec<Language> {
        Self::ALL.into_iter().filter(|language| *language != current).collect()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = TranslationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            "zh" | "zh-cn" => Ok(Self::Zh),
            other => Err(TranslationError::UnsupportedLanguage(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub target: Language,
    /// Optional hint; the provider detects the source language when absent.
    pub source: Option<Language>,
}

impl TranslationRequest {
    /// Rejects text that is empty after trimming, so no provider call is ever
    /// made for it.
    pub fn new(text: impl Into<String>, target: Language) -> Result<Self, TranslationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyText);
        }
        Ok(Self { text, target, source: None })
    }

    pub fn with_source(mut self, source: Language) -> Self {
        self.source = Some(source);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    /// Advisory only.
    pub detected_source_language: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TranslationError {
    #[error("nothing to translate")]
    EmptyText,
    #[error("unsupported language `{0}` (expected en|de|zh)")]
    UnsupportedLanguage(String),
    #[error("translation provider credential is not configured")]
    MissingCredential,
    #[error("translation provider returned HTTP {status}")]
    ProviderStatus { status: u16 },
    #[error("translation provider returned no candidates")]
    EmptyResponse,
    #[error("translation transport failure: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslationError>;
}

#[cfg(test)]
mod tests {
    use super::{Language, TranslationError, TranslationRequest};

    #[test]
    fn chinese_maps_to_region_qualified_code() {
        assert_eq!(Language::Zh.provider_code(), "zh-CN");
        assert_eq!(Language::En.provider_code(), "en");
        assert_eq!(Language::De.provider_code(), "de");
    }

    #[test]
    fn parses_language_identifiers() {
        assert_eq!(" DE ".parse::<Language>(), Ok(Language::De));
        assert_eq!("zh-CN".parse::<Language>(), Ok(Language::Zh));
        assert!(matches!(
            "fr".parse::<Language>(),
            Err(TranslationError::UnsupportedLanguage(ref code)) if code == "fr"
        ));
    }

    #[test]
    fn targets_exclude_current_language() {
        assert_eq!(Language::targets_excluding(Language::En), vec![Language::De, Language::Zh]);
        assert_eq!(Language::targets_excluding(Language::Zh), vec![Language::En, Language::De]);
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        for text in ["", " ", "\n\t  "] {
            assert_eq!(TranslationRequest::new(text, Language::De), Err(TranslationError::EmptyText));
        }
    }

    #[test]
    fn request_keeps_text_untrimmed() {
        let request = TranslationRequest::new("  Hello ", Language::De)
            .expect("non-empty text")
            .with_source(Language::En);

        assert_eq!(request.text, "  Hello ");
        assert_eq!(request.source, Some(Language::En));
    }
}
