//! Sitemap generation
//!
//! Every published page appears once per language, each entry carrying
//! the full hreflang alternate set. The XML itself is rendered by the
//! `sitemap.xml` template.

use crate::locales::SupportedLanguage;
use crate::routing::{join_segments, Page, RouteKey, SlugTable, StaticPage};
use crate::seo::alternate_links_for;
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

/// Source of catalog records published in the sitemap
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Ids of every published listing
    async fn listing_ids(&self) -> Vec<String>;
}

/// Catalog backed by a fixed list of ids
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    listing_ids: Vec<String>,
}

impl StaticCatalog {
    pub fn new(listing_ids: Vec<String>) -> Self {
        Self { listing_ids }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn listing_ids(&self) -> Vec<String> {
        self.listing_ids.clone()
    }
}

/// English path of an indexable page; alternates are derived from it
fn english_path(table: &SlugTable, page: &Page) -> String {
    let lang = SupportedLanguage::En;
    match page {
        Page::Home => join_segments(&[lang.code()]),
        Page::Static { page } => join_segments(&[lang.code(), page.slug()]),
        Page::Listings => join_segments(&[lang.code(), table.segment_for(RouteKey::Listings, lang)]),
        Page::Listing { id } => {
            let id = urlencoding::encode(id);
            join_segments(&[lang.code(), table.segment_for(RouteKey::Listing, lang), &*id])
        }
        Page::Account { .. } | Page::Admin => join_segments(&[lang.code()]),
    }
}

/// Every page the sitemap lists
pub async fn published_pages(catalog: &dyn Catalog) -> Vec<Page> {
    let mut pages = vec![Page::Home, Page::Listings];
    pages.extend(StaticPage::ALL.iter().map(|page| Page::Static { page: *page }));
    pages.extend(
        catalog
            .listing_ids()
            .await
            .into_iter()
            .map(|id| Page::Listing { id }),
    );
    pages
}

/// Alternate link of a sitemap entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapLink {
    pub hreflang: String,
    pub href: String,
}

/// One `<url>` of the sitemap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    /// Every language variant, then `x-default`
    pub alternates: Vec<SitemapLink>,
}

/// Sitemap entries: every published page once per language
pub async fn sitemap_entries(
    table: &SlugTable,
    base_url: &Url,
    catalog: &dyn Catalog,
) -> Vec<SitemapEntry> {
    let pages = published_pages(catalog).await;
    let mut entries = Vec::new();

    for page in pages.iter().filter(|page| page.is_indexable()) {
        let path = english_path(table, page);
        let alternates =
            alternate_links_for(table, &path, SupportedLanguage::En).absolute(base_url);

        let mut links: Vec<SitemapLink> = alternates
            .iter()
            .map(|(lang, href)| SitemapLink {
                hreflang: lang.code().to_string(),
                href: href.to_string(),
            })
            .collect();
        links.push(SitemapLink {
            hreflang: "x-default".to_string(),
            href: alternates.x_default().to_string(),
        });

        entries.extend(alternates.iter().map(|(_, loc)| SitemapEntry {
            loc: loc.to_string(),
            alternates: links.clone(),
        }));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://agrimarket.example").unwrap()
    }

    fn locs(entries: &[SitemapEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.loc.as_str()).collect()
    }

    #[tokio::test]
    async fn test_sitemap_lists_every_language() {
        let table = SlugTable::default();
        let catalog = StaticCatalog::new(vec!["42".to_string()]);
        let entries = sitemap_entries(&table, &base(), &catalog).await;
        let locs = locs(&entries);

        assert!(locs.contains(&"https://agrimarket.example/de/anzeige/42"));
        assert!(locs.contains(&"https://agrimarket.example/fr/annonces"));
        assert!(locs.contains(&"https://agrimarket.example/it/faq"));
        assert!(!locs.iter().any(|loc| loc.contains("/cart")));

        let listing = entries
            .iter()
            .find(|entry| entry.loc.ends_with("/pt/anuncio/42"))
            .unwrap();
        assert_eq!(listing.alternates.len(), 7);
        assert_eq!(
            listing.alternates.last(),
            Some(&SitemapLink {
                hreflang: "x-default".to_string(),
                href: "https://agrimarket.example/en/listing/42".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_entry_count() {
        let table = SlugTable::default();
        let catalog = StaticCatalog::new(vec!["1".to_string(), "2".to_string()]);
        let entries = sitemap_entries(&table, &base(), &catalog).await;

        // home, listings, seven static pages, two listings; six languages each
        assert_eq!(entries.len(), (2 + 7 + 2) * 6);
    }

    #[tokio::test]
    async fn test_listing_ids_are_encoded() {
        let table = SlugTable::default();
        let catalog = StaticCatalog::new(vec!["a b&c".to_string()]);
        let entries = sitemap_entries(&table, &base(), &catalog).await;

        assert!(locs(&entries).contains(&"https://agrimarket.example/en/listing/a%20b%26c"));
    }
}
