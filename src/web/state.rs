//! Application state shared across handlers

use crate::cache::SitemapCache;
use crate::config::Settings;
use crate::locales::Translations;
use crate::metrics::Metrics;
use crate::routing::{RouteMatcher, SlugTable};
use crate::sitemap::{Catalog, StaticCatalog};
use std::sync::Arc;
use url::Url;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Validated slug table
    pub table: Arc<SlugTable>,
    /// Locale router
    pub matcher: Arc<RouteMatcher>,
    /// UI strings
    pub translations: Arc<Translations>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
    /// Navigation counters
    pub metrics: Arc<Metrics>,
    /// Rendered sitemap cache
    pub sitemap_cache: Arc<SitemapCache>,
    /// Catalog published in the sitemap
    pub catalog: Arc<dyn Catalog>,
    /// Public base URL
    pub base_url: Url,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let catalog = Arc::new(StaticCatalog::new(settings.catalog.listing_ids.clone()));
        Self::with_catalog(settings, catalog)
    }

    /// Create application state around an external catalog
    pub fn with_catalog(settings: Settings, catalog: Arc<dyn Catalog>) -> anyhow::Result<Self> {
        let base_url = settings.base_url()?;
        let table = Arc::new(SlugTable::from_overrides(&settings.routing.slugs)?);
        let matcher = Arc::new(RouteMatcher::new(table.clone(), settings.i18n.default_lang));
        let translations = Arc::new(Translations::new()?);
        let templates = Arc::new(super::Templates::new()?);
        let sitemap_cache = Arc::new(SitemapCache::new(
            settings.cache.sitemap_ttl_secs,
            settings.cache.max_capacity,
        ));

        Ok(Self {
            settings: Arc::new(settings),
            table,
            matcher,
            translations,
            templates,
            metrics: Arc::new(Metrics::new()),
            sitemap_cache,
            catalog,
            base_url,
        })
    }

    /// Get site name
    pub fn site_name(&self) -> &str {
        &self.settings.general.site_name
    }

    /// Check if instance is public
    pub fn is_public(&self) -> bool {
        self.settings.server.public_instance
    }

    /// Absolute URL for a site path
    pub fn absolute(&self, path: &str) -> String {
        self.base_url
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| path.to_string())
    }
}
