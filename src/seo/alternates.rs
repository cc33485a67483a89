//! hreflang alternate URLs for a canonical page

use crate::locales::SupportedLanguage;
use crate::routing::{decode_segment, join_segments, RequestPath, SlugTable};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Language used for the `x-default` entry
pub const X_DEFAULT_LANGUAGE: SupportedLanguage = SupportedLanguage::En;

/// One URL per supported language plus `x-default`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlternateLinkSet {
    links: BTreeMap<SupportedLanguage, String>,
    x_default: String,
}

impl AlternateLinkSet {
    pub fn get(&self, lang: SupportedLanguage) -> Option<&str> {
        self.links.get(&lang).map(String::as_str)
    }

    pub fn x_default(&self) -> &str {
        &self.x_default
    }

    pub fn iter(&self) -> impl Iterator<Item = (SupportedLanguage, &str)> {
        self.links.iter().map(|(lang, url)| (*lang, url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Qualify every path against the site's base URL
    pub fn absolute(&self, base: &Url) -> AlternateLinkSet {
        let qualify = |path: &str| {
            base.join(path)
                .map(String::from)
                .unwrap_or_else(|_| path.to_string())
        };

        AlternateLinkSet {
            links: self
                .links
                .iter()
                .map(|(lang, path)| (*lang, qualify(path)))
                .collect(),
            x_default: qualify(&self.x_default),
        }
    }
}

/// Alternate paths for the page published at `canonical_path` in `active`.
///
/// The `/{active}` prefix is stripped, each route slug is re-spelled for
/// the target language and every other segment is kept as-is. The query
/// string is not part of the alternates.
pub fn alternate_links_for(
    table: &SlugTable,
    canonical_path: &str,
    active: SupportedLanguage,
) -> AlternateLinkSet {
    let request = RequestPath::parse(canonical_path);
    let segments = request.segments();

    let remainder = match segments.split_first() {
        Some((first, rest)) if *first == active.code() => rest,
        _ => &segments[..],
    };

    let links: BTreeMap<SupportedLanguage, String> = SupportedLanguage::all()
        .iter()
        .map(|target| {
            let mut localized = vec![target.code()];
            localized.extend(remainder.iter().map(|segment| {
                match table.route_key_for(&decode_segment(segment), active) {
                    Some(key) => table.segment_for(key, *target),
                    None => *segment,
                }
            }));
            (*target, join_segments(&localized))
        })
        .collect();

    let x_default = links
        .get(&X_DEFAULT_LANGUAGE)
        .cloned()
        .unwrap_or_else(|| format!("/{}", X_DEFAULT_LANGUAGE.code()));

    AlternateLinkSet { links, x_default }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_alternates() {
        let table = SlugTable::default();
        let set = alternate_links_for(&table, "/fr/annonce/42", SupportedLanguage::Fr);

        assert_eq!(set.len(), 6);
        assert_eq!(set.get(SupportedLanguage::En), Some("/en/listing/42"));
        assert_eq!(set.get(SupportedLanguage::De), Some("/de/anzeige/42"));
        assert_eq!(set.get(SupportedLanguage::Fr), Some("/fr/annonce/42"));
        assert_eq!(set.get(SupportedLanguage::Pt), Some("/pt/anuncio/42"));
        assert_eq!(set.x_default(), "/en/listing/42");
    }

    #[test]
    fn test_non_localized_pages() {
        let table = SlugTable::default();
        let set = alternate_links_for(&table, "/de", SupportedLanguage::De);
        assert_eq!(set.get(SupportedLanguage::It), Some("/it"));

        let set = alternate_links_for(&table, "/es/how-it-works", SupportedLanguage::Es);
        assert_eq!(set.get(SupportedLanguage::Fr), Some("/fr/how-it-works"));
    }

    #[test]
    fn test_query_is_dropped() {
        let table = SlugTable::default();
        let set = alternate_links_for(&table, "/de/anzeigen?category=tracteurs", SupportedLanguage::De);
        assert_eq!(set.get(SupportedLanguage::Fr), Some("/fr/annonces"));
    }

    #[test]
    fn test_idempotent_under_reentry() {
        let table = SlugTable::default();
        for path in ["/fr/annonce/42", "/it/annunci", "/pt", "/en/faq"] {
            let active = crate::locales::language_from_path(path)
                .and_then(SupportedLanguage::from_code)
                .unwrap();
            let first = alternate_links_for(&table, path, active);
            for (lang, alternate) in first.iter() {
                assert_eq!(alternate_links_for(&table, alternate, lang), first);
            }
        }
    }

    #[test]
    fn test_overridden_table() {
        // "annonces" is both the English detail slug and the French index slug
        let table = SlugTable::builder()
            .slug(crate::routing::RouteKey::Listing, SupportedLanguage::En, "annonces")
            .slug(crate::routing::RouteKey::Listings, SupportedLanguage::Pt, "classificados")
            .build()
            .unwrap();

        let set = alternate_links_for(&table, "/en/annonces/42", SupportedLanguage::En);
        assert_eq!(set.get(SupportedLanguage::Fr), Some("/fr/annonce/42"));
        assert_eq!(set.x_default(), "/en/annonces/42");

        let set = alternate_links_for(&table, "/fr/annonces", SupportedLanguage::Fr);
        assert_eq!(set.get(SupportedLanguage::En), Some("/en/listings"));
        assert_eq!(set.get(SupportedLanguage::Pt), Some("/pt/classificados"));

        for (lang, alternate) in set.iter() {
            assert_eq!(alternate_links_for(&table, alternate, lang), set);
        }
    }

    #[test]
    fn test_absolute() {
        let table = SlugTable::default();
        let base = Url::parse("https://agrimarket.example").unwrap();
        let set = alternate_links_for(&table, "/de/anzeige/7", SupportedLanguage::De).absolute(&base);
        assert_eq!(set.get(SupportedLanguage::Es), Some("https://agrimarket.example/es/anuncio/7"));
        assert_eq!(set.x_default(), "https://agrimarket.example/en/listing/7");
    }
}
