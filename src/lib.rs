//! Agrimarket: localized storefront for an agricultural equipment marketplace
//!
//! The routing core (`locales`, `routing`, `seo`) is pure and framework
//! free. The `web` module wraps it in an axum server that renders pages,
//! issues canonical redirects and publishes hreflang metadata.

pub mod cache;
pub mod config;
pub mod locales;
pub mod metrics;
pub mod routing;
pub mod seo;
pub mod sitemap;
pub mod web;

pub use config::Settings;
pub use locales::{resolve_language, LanguageSignals, SupportedLanguage};
pub use routing::{Navigation, RouteKey, RouteMatcher, RouteState, SlugTable};
pub use seo::{alternate_links_for, AlternateLinkSet};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
