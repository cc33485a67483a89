//! Per-language URL segments for route families
//!
//! The table is built and validated once at startup and never mutated
//! afterwards. Request handling only reads it.

use super::pages::is_reserved_segment;
use crate::locales::SupportedLanguage;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("slug pattern is valid"));

/// Built-in spellings, one row per route family
const DEFAULT_SLUGS: &[(RouteKey, [(SupportedLanguage, &str); 6])] = &[
    (
        RouteKey::Listings,
        [
            (SupportedLanguage::En, "listings"),
            (SupportedLanguage::Fr, "annonces"),
            (SupportedLanguage::De, "anzeigen"),
            (SupportedLanguage::Es, "anuncios"),
            (SupportedLanguage::It, "annunci"),
            (SupportedLanguage::Pt, "anuncios"),
        ],
    ),
    (
        RouteKey::Listing,
        [
            (SupportedLanguage::En, "listing"),
            (SupportedLanguage::Fr, "annonce"),
            (SupportedLanguage::De, "anzeige"),
            (SupportedLanguage::Es, "anuncio"),
            (SupportedLanguage::It, "annuncio"),
            (SupportedLanguage::Pt, "anuncio"),
        ],
    ),
];

/// Semantic identifier of a route family with language-dependent spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKey {
    /// Listing index
    Listings,
    /// Single listing, followed by its id
    Listing,
}

impl RouteKey {
    const ALL: [RouteKey; 2] = [RouteKey::Listings, RouteKey::Listing];

    pub fn all() -> &'static [RouteKey] {
        &Self::ALL
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteKey::Listings => "listings",
            RouteKey::Listing => "listing",
        }
    }

    /// Number of path components that follow the slug
    pub fn param_count(self) -> usize {
        match self {
            RouteKey::Listings => 0,
            RouteKey::Listing => 1,
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteKey {
    type Err = SlugTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SlugTableError::UnknownRouteKey(s.to_string()))
    }
}

/// Slug table construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugTableError {
    #[error("unknown route key '{0}'")]
    UnknownRouteKey(String),

    #[error("unsupported language '{0}' in slug table")]
    UnknownLanguage(String),

    #[error("slug '{segment}' for {key}/{lang} is not URL-safe")]
    NotUrlSafe {
        key: RouteKey,
        lang: SupportedLanguage,
        segment: String,
    },

    #[error("slug '{segment}' for {key}/{lang} collides with a reserved path segment")]
    Reserved {
        key: RouteKey,
        lang: SupportedLanguage,
        segment: String,
    },

    #[error("slug '{segment}' is used by both {first} and {second} in {lang}")]
    Ambiguous {
        lang: SupportedLanguage,
        segment: String,
        first: RouteKey,
        second: RouteKey,
    },
}

/// Mapping (route key, language) -> URL segment, with its inverse
#[derive(Debug, Clone)]
pub struct SlugTable {
    slugs: HashMap<(RouteKey, SupportedLanguage), String>,
    reverse: HashMap<(SupportedLanguage, String), RouteKey>,
}

impl SlugTable {
    /// Start a table from the built-in spellings
    pub fn builder() -> SlugTableBuilder {
        SlugTableBuilder::with_defaults()
    }

    /// Built-in table with per-key, per-language overrides applied.
    ///
    /// Overrides are keyed by route key name, then language code.
    pub fn from_overrides(
        overrides: &HashMap<String, HashMap<String, String>>,
    ) -> Result<Self, SlugTableError> {
        let mut builder = Self::builder();
        for (key, per_lang) in overrides {
            let key: RouteKey = key.parse()?;
            for (code, segment) in per_lang {
                let lang = SupportedLanguage::from_code(code)
                    .ok_or_else(|| SlugTableError::UnknownLanguage(code.clone()))?;
                builder = builder.slug(key, lang, segment.clone());
            }
        }
        builder.build()
    }

    /// URL segment for a route family in a language.
    ///
    /// Total: a missing entry falls back to the route key's own name.
    pub fn segment_for(&self, key: RouteKey, lang: SupportedLanguage) -> &str {
        self.slugs
            .get(&(key, lang))
            .map(String::as_str)
            .unwrap_or_else(|| key.as_str())
    }

    /// Route family whose slug in `lang` is exactly `segment`
    pub fn route_key_for(&self, segment: &str, lang: SupportedLanguage) -> Option<RouteKey> {
        self.reverse.get(&(lang, segment.to_string())).copied()
    }

    /// Route family spelled `segment` in some language that takes
    /// `param_count` trailing parameters.
    ///
    /// Slugs are only unique within a language, so the same spelling may
    /// name different families in different languages; the arity decides.
    pub fn route_key_in_any_language(&self, segment: &str, param_count: usize) -> Option<RouteKey> {
        SupportedLanguage::all()
            .iter()
            .filter_map(|lang| self.route_key_for(segment, *lang))
            .find(|key| key.param_count() == param_count)
    }

    /// Route family for a path segment followed by `param_count` parameters.
    ///
    /// The spelling in `preferred` wins; any other language's spelling is
    /// the fallback.
    pub fn route_key_matching(
        &self,
        segment: &str,
        preferred: SupportedLanguage,
        param_count: usize,
    ) -> Option<RouteKey> {
        self.route_key_for(segment, preferred)
            .filter(|key| key.param_count() == param_count)
            .or_else(|| self.route_key_in_any_language(segment, param_count))
    }

    /// Iterate over every (key, language, segment) entry
    pub fn entries(&self) -> impl Iterator<Item = (RouteKey, SupportedLanguage, &str)> + '_ {
        RouteKey::all().iter().flat_map(move |key| {
            SupportedLanguage::all()
                .iter()
                .map(move |lang| (*key, *lang, self.segment_for(*key, *lang)))
        })
    }

    /// Check every construction invariant
    pub fn validate(&self) -> Result<(), SlugTableError> {
        let mut seen: HashMap<(SupportedLanguage, &str), RouteKey> = HashMap::new();

        for (key, lang, segment) in self.entries() {
            if !SLUG_RE.is_match(segment) {
                return Err(SlugTableError::NotUrlSafe {
                    key,
                    lang,
                    segment: segment.to_string(),
                });
            }
            if is_reserved_segment(segment) || SupportedLanguage::from_code(segment).is_some() {
                return Err(SlugTableError::Reserved {
                    key,
                    lang,
                    segment: segment.to_string(),
                });
            }
            if let Some(first) = seen.insert((lang, segment), key) {
                return Err(SlugTableError::Ambiguous {
                    lang,
                    segment: segment.to_string(),
                    first,
                    second: key,
                });
            }
        }

        Ok(())
    }

    fn from_slugs(slugs: HashMap<(RouteKey, SupportedLanguage), String>) -> Self {
        let reverse = slugs
            .iter()
            .map(|((key, lang), segment)| ((*lang, segment.clone()), *key))
            .collect();
        Self { slugs, reverse }
    }
}

impl Default for SlugTable {
    /// Built-in table; covered by the validation tests below
    fn default() -> Self {
        Self::from_slugs(SlugTableBuilder::with_defaults().slugs)
    }
}

/// Builder that default-fills omitted entries with the key's own name
#[derive(Debug, Clone, Default)]
pub struct SlugTableBuilder {
    slugs: HashMap<(RouteKey, SupportedLanguage), String>,
}

impl SlugTableBuilder {
    /// Empty builder; every entry defaults to the route key name
    pub fn new() -> Self {
        Self::default()
    }

    fn with_defaults() -> Self {
        let slugs = DEFAULT_SLUGS
            .iter()
            .flat_map(|(key, row)| {
                row.iter()
                    .map(move |(lang, segment)| ((*key, *lang), segment.to_string()))
            })
            .collect();
        Self { slugs }
    }

    /// Set the segment for one (key, language) pair
    pub fn slug(mut self, key: RouteKey, lang: SupportedLanguage, segment: impl Into<String>) -> Self {
        self.slugs.insert((key, lang), segment.into());
        self
    }

    /// Fill gaps, then validate
    pub fn build(mut self) -> Result<SlugTable, SlugTableError> {
        for key in RouteKey::all() {
            for lang in SupportedLanguage::all() {
                self.slugs
                    .entry((*key, *lang))
                    .or_insert_with(|| key.as_str().to_string());
            }
        }

        let table = SlugTable::from_slugs(self.slugs);
        table.validate()?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert_eq!(SlugTable::default().validate(), Ok(()));
        assert!(SlugTable::builder().build().is_ok());
    }

    #[test]
    fn test_segment_lookup() {
        let table = SlugTable::default();
        assert_eq!(table.segment_for(RouteKey::Listings, SupportedLanguage::De), "anzeigen");
        assert_eq!(table.segment_for(RouteKey::Listings, SupportedLanguage::Fr), "annonces");
        assert_eq!(table.segment_for(RouteKey::Listing, SupportedLanguage::It), "annuncio");
        assert_eq!(table.segment_for(RouteKey::Listing, SupportedLanguage::En), "listing");
    }

    #[test]
    fn test_round_trip_law() {
        let table = SlugTable::default();
        for (key, lang, segment) in table.entries() {
            assert_eq!(table.route_key_for(segment, lang), Some(key), "{}/{}", key, lang);
        }
    }

    #[test]
    fn test_reverse_lookup_is_per_language() {
        let table = SlugTable::default();
        assert_eq!(table.route_key_for("annonces", SupportedLanguage::Fr), Some(RouteKey::Listings));
        assert_eq!(table.route_key_for("annonces", SupportedLanguage::De), None);
        assert_eq!(table.route_key_for("42", SupportedLanguage::En), None);
        assert_eq!(table.route_key_in_any_language("annonces", 0), Some(RouteKey::Listings));
        assert_eq!(table.route_key_in_any_language("anuncio", 1), Some(RouteKey::Listing));
        assert_eq!(table.route_key_in_any_language("anuncio", 0), None);
    }

    #[test]
    fn test_shared_spelling_across_languages() {
        // "annonces" is the English detail slug and the French index slug
        let table = SlugTable::builder()
            .slug(RouteKey::Listing, SupportedLanguage::En, "annonces")
            .build()
            .unwrap();

        assert_eq!(
            table.route_key_matching("annonces", SupportedLanguage::Fr, 0),
            Some(RouteKey::Listings)
        );
        assert_eq!(
            table.route_key_matching("annonces", SupportedLanguage::En, 1),
            Some(RouteKey::Listing)
        );
        // English has no index spelled "annonces"; the French one is found
        assert_eq!(
            table.route_key_matching("annonces", SupportedLanguage::En, 0),
            Some(RouteKey::Listings)
        );
        assert_eq!(table.route_key_matching("annonces", SupportedLanguage::De, 2), None);
    }

    #[test]
    fn test_missing_entries_default_to_key_name() {
        let table = SlugTable::from_slugs(HashMap::new());
        assert_eq!(table.segment_for(RouteKey::Listings, SupportedLanguage::Pt), "listings");

        let table = SlugTableBuilder::new()
            .slug(RouteKey::Listings, SupportedLanguage::Fr, "annonces")
            .slug(RouteKey::Listing, SupportedLanguage::Fr, "annonce")
            .build()
            .unwrap();
        assert_eq!(table.segment_for(RouteKey::Listings, SupportedLanguage::De), "listings");
        assert_eq!(table.segment_for(RouteKey::Listings, SupportedLanguage::Fr), "annonces");
    }

    #[test]
    fn test_ambiguous_slug_rejected() {
        let err = SlugTable::builder()
            .slug(RouteKey::Listing, SupportedLanguage::De, "anzeigen")
            .build()
            .unwrap_err();
        assert!(matches!(err, SlugTableError::Ambiguous { lang: SupportedLanguage::De, .. }));
    }

    #[test]
    fn test_unsafe_and_reserved_rejected() {
        let err = SlugTable::builder()
            .slug(RouteKey::Listings, SupportedLanguage::Es, "anuncios?x")
            .build()
            .unwrap_err();
        assert!(matches!(err, SlugTableError::NotUrlSafe { .. }));

        let err = SlugTable::builder()
            .slug(RouteKey::Listings, SupportedLanguage::En, "cart")
            .build()
            .unwrap_err();
        assert!(matches!(err, SlugTableError::Reserved { .. }));

        let err = SlugTable::builder()
            .slug(RouteKey::Listing, SupportedLanguage::En, "de")
            .build()
            .unwrap_err();
        assert!(matches!(err, SlugTableError::Reserved { .. }));
    }

    #[test]
    fn test_from_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "listings".to_string(),
            HashMap::from([("pt".to_string(), "classificados".to_string())]),
        );
        let table = SlugTable::from_overrides(&overrides).unwrap();
        assert_eq!(table.segment_for(RouteKey::Listings, SupportedLanguage::Pt), "classificados");
        assert_eq!(table.segment_for(RouteKey::Listings, SupportedLanguage::Es), "anuncios");

        overrides.insert("tractors".to_string(), HashMap::new());
        assert_eq!(
            SlugTable::from_overrides(&overrides).unwrap_err(),
            SlugTableError::UnknownRouteKey("tractors".to_string())
        );
    }
}
