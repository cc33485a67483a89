//! Active language resolution
//!
//! Precedence, highest first: URL prefix, persisted preference, negotiated
//! client locale, fixed fallback. Every signal is passed in explicitly so the
//! resolver stays a pure function of its inputs.

use super::{parse_accept_language, SupportedLanguage};

/// Raw language signals gathered for one navigation
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageSignals<'a> {
    /// Leading path segment, if the request had one
    pub url_path_segment: Option<&'a str>,
    /// Value stored by an earlier explicit language switch
    pub persisted_preference: Option<&'a str>,
    /// Accept-Language header or a single browser locale
    pub accept_language: Option<&'a str>,
}

/// Resolves the active language with a configurable fallback
#[derive(Debug, Clone, Copy)]
pub struct LanguageResolver {
    fallback: SupportedLanguage,
}

impl LanguageResolver {
    pub fn new(fallback: SupportedLanguage) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> SupportedLanguage {
        self.fallback
    }

    /// Pick the active language. Never fails.
    pub fn resolve(&self, signals: &LanguageSignals<'_>) -> SupportedLanguage {
        signals
            .url_path_segment
            .and_then(SupportedLanguage::from_code)
            .or_else(|| {
                signals
                    .persisted_preference
                    .map(str::trim)
                    .and_then(SupportedLanguage::from_code)
            })
            .or_else(|| signals.accept_language.and_then(parse_accept_language))
            .unwrap_or(self.fallback)
    }
}

impl Default for LanguageResolver {
    fn default() -> Self {
        Self::new(SupportedLanguage::DEFAULT)
    }
}

/// Resolve with the default `en` fallback
pub fn resolve_language(signals: &LanguageSignals<'_>) -> SupportedLanguage {
    LanguageResolver::default().resolve(signals)
}
