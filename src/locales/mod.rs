//! Localization module for Agrimarket
//!
//! Handles the supported language set, locale negotiation and translation.

mod resolver;
mod translations;

pub use resolver::{resolve_language, LanguageResolver, LanguageSignals};
pub use translations::{TranslationError, Translations};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Languages the storefront is published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    En,
    Fr,
    De,
    Es,
    It,
    Pt,
}

impl SupportedLanguage {
    /// Language used when nothing else matches
    pub const DEFAULT: SupportedLanguage = SupportedLanguage::En;

    const ALL: [SupportedLanguage; 6] = [
        SupportedLanguage::En,
        SupportedLanguage::Fr,
        SupportedLanguage::De,
        SupportedLanguage::Es,
        SupportedLanguage::It,
        SupportedLanguage::Pt,
    ];

    /// Every supported language, in publication order
    pub fn all() -> &'static [SupportedLanguage] {
        &Self::ALL
    }

    /// ISO 639-1 code, also used as the URL prefix
    pub fn code(self) -> &'static str {
        match self {
            SupportedLanguage::En => "en",
            SupportedLanguage::Fr => "fr",
            SupportedLanguage::De => "de",
            SupportedLanguage::Es => "es",
            SupportedLanguage::It => "it",
            SupportedLanguage::Pt => "pt",
        }
    }

    /// Name of the language in itself, for the language switcher
    pub fn native_name(self) -> &'static str {
        match self {
            SupportedLanguage::En => "English",
            SupportedLanguage::Fr => "Français",
            SupportedLanguage::De => "Deutsch",
            SupportedLanguage::Es => "Español",
            SupportedLanguage::It => "Italiano",
            SupportedLanguage::Pt => "Português",
        }
    }

    /// Exact lookup by code; no case folding, no region stripping
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|lang| lang.code() == code)
    }
}

impl Default for SupportedLanguage {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for a code outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code '{0}'")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for SupportedLanguage {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}

/// Return the first path segment if it looks like a language prefix.
///
/// Only the shape is checked here (exactly two ASCII letters); the
/// segment may still name a language outside the supported set.
pub fn language_from_path(path: &str) -> Option<&str> {
    let first = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .split('/')
        .find(|s| !s.is_empty())?;

    if first.len() == 2 && first.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(first)
    } else {
        None
    }
}

/// Reduce a single locale tag ("de-AT", "pt_BR") to a supported language
pub fn primary_language(tag: &str) -> Option<SupportedLanguage> {
    let langid: LanguageIdentifier = tag.trim().replace('_', "-").parse().ok()?;
    SupportedLanguage::from_code(langid.language.as_str())
}

/// Parse Accept-Language header and return best matching language
pub fn parse_accept_language(header: &str) -> Option<SupportedLanguage> {
    // Parse header like "en-US,en;q=0.9,de;q=0.8"
    let mut locales: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut parts = part.trim().split(';');
            let lang = parts.next()?.trim();
            if lang.is_empty() {
                return None;
            }

            let quality = parts
                .find_map(|q| q.trim().strip_prefix("q="))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1.0);

            Some((lang, quality))
        })
        .filter(|(_, quality)| *quality > 0.0)
        .collect();

    // Stable sort keeps header order among equal weights
    locales.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    locales.into_iter().find_map(|(lang, _)| primary_language(lang))
}

/// Read the raw value of the preference cookie from a Cookie header
pub fn preference_from_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Build the Set-Cookie value persisting an explicit language choice
pub fn preference_cookie(name: &str, lang: SupportedLanguage, max_age_secs: u64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        name,
        lang.code(),
        max_age_secs
    )
}
