//! Route matching and canonicalization.
//!
//! # Responsibilities
//! - Redirect the bare root to the resolved language prefix
//! - Keep the admin namespace out of the locale router
//! - Redirect legacy un-prefixed listing paths to the default language
//! - Check localized slugs against the active language and correct them
//!
//! # Design Decisions
//! - One navigation is a small state machine driven by a pure `step`
//! - Every input ends in a terminal state; nothing here returns an error
//! - Unknown language prefixes are never corrected, only reported missing

use super::pages::{AccountPage, Page, StaticPage, ADMIN_SEGMENT};
use super::path::{decode_segment, join_segments, RequestPath};
use super::slugs::{RouteKey, SlugTable};
use crate::locales::{language_from_path, LanguageResolver, LanguageSignals, SupportedLanguage};
use std::sync::Arc;

/// Per-navigation routing state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteState {
    /// Language-prefixed path not inspected yet
    Unchecked { path: RequestPath },
    /// Path names a localized route family; slug not compared yet
    Checking { path: RequestPath, key: RouteKey },
    /// Render as-is; the page has no localized slug
    PassThrough(Page),
    /// Render as-is; the localized slug is already correct
    Canonical(Page),
    /// Send the client to the corrected path
    Redirecting { location: String },
    /// Nothing matches
    NotFound,
}

impl RouteState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RouteState::Unchecked { .. } | RouteState::Checking { .. })
    }

    /// Advance one transition. Terminal states map to themselves.
    pub fn step(self, table: &SlugTable, active: SupportedLanguage) -> RouteState {
        match self {
            RouteState::Unchecked { path } => inspect(path, table, active),
            RouteState::Checking { path, key } => check(path, key, table, active),
            terminal => terminal,
        }
    }

    /// Run transitions until a terminal state is reached
    pub fn settle(self, table: &SlugTable, active: SupportedLanguage) -> RouteState {
        let mut state = self;
        while !state.is_terminal() {
            state = state.step(table, active);
        }
        state
    }
}

/// `Unchecked` transition: classify the path under its language prefix
fn inspect(path: RequestPath, table: &SlugTable, active: SupportedLanguage) -> RouteState {
    match classify(&path, table, active) {
        Ok(key) => RouteState::Checking { path, key },
        Err(terminal) => terminal,
    }
}

/// Route family named by the path, or the terminal state it settles in
fn classify(path: &RequestPath, table: &SlugTable, active: SupportedLanguage) -> Result<RouteKey, RouteState> {
    let segments = path.segments();
    let rest = segments.get(1..).unwrap_or_default();

    let Some((first, params)) = rest.split_first() else {
        return Err(RouteState::PassThrough(Page::Home));
    };
    let first = decode_segment(first);

    if params.is_empty() {
        if let Some(page) = StaticPage::from_segment(&first) {
            return Err(RouteState::PassThrough(Page::Static { page }));
        }
        if let Some(page) = AccountPage::from_segment(&first) {
            return Err(RouteState::PassThrough(Page::Account { page }));
        }
    }

    table
        .route_key_matching(&first, active, params.len())
        .ok_or(RouteState::NotFound)
}

/// `Checking` transition: compare the slug with the active language's spelling.
///
/// The raw segment is compared, so a percent-encoded spelling of the right
/// slug is redirected to the literal one.
fn check(path: RequestPath, key: RouteKey, table: &SlugTable, active: SupportedLanguage) -> RouteState {
    let segments = path.segments();
    let expected = table.segment_for(key, active);

    let Some(actual) = segments.get(1) else {
        return RouteState::NotFound;
    };

    if *actual == expected {
        return RouteState::Canonical(page_for(key, &segments[2..]));
    }

    let mut corrected: Vec<&str> = segments.clone();
    corrected[1] = expected;
    RouteState::Redirecting {
        location: path.with_path(&join_segments(&corrected)),
    }
}

fn page_for(key: RouteKey, params: &[&str]) -> Page {
    match key {
        RouteKey::Listings => Page::Listings,
        RouteKey::Listing => Page::Listing {
            id: params
                .first()
                .map(|id| decode_segment(id).into_owned())
                .unwrap_or_default(),
        },
    }
}

/// Derived state for one navigation, discarded once it settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    pub active_language: SupportedLanguage,
    pub request_path: RequestPath,
    /// Corrected target when a redirect applies
    pub canonical_path: Option<String>,
}

/// Settled outcome of routing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub context: LocaleContext,
    pub state: RouteState,
}

impl Navigation {
    pub fn redirect_location(&self) -> Option<&str> {
        match &self.state {
            RouteState::Redirecting { location } => Some(location),
            _ => None,
        }
    }

    /// Page to render, for pass-through and canonical outcomes
    pub fn page(&self) -> Option<&Page> {
        match &self.state {
            RouteState::PassThrough(page) | RouteState::Canonical(page) => Some(page),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.state, RouteState::NotFound)
    }
}

/// Routes incoming paths against the slug table
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    table: Arc<SlugTable>,
    resolver: LanguageResolver,
}

impl RouteMatcher {
    pub fn new(table: Arc<SlugTable>, default_lang: SupportedLanguage) -> Self {
        Self {
            table,
            resolver: LanguageResolver::new(default_lang),
        }
    }

    pub fn table(&self) -> &SlugTable {
        &self.table
    }

    pub fn default_language(&self) -> SupportedLanguage {
        self.resolver.fallback()
    }

    /// Route a raw request target.
    ///
    /// The URL prefix in `target` overrides any `url_path_segment` in
    /// `signals`; the other signals are used as given.
    pub fn route(&self, target: &str, signals: &LanguageSignals<'_>) -> Navigation {
        let request = RequestPath::parse(target);
        let prefix = language_from_path(request.path());

        let signals = LanguageSignals {
            url_path_segment: prefix,
            ..*signals
        };
        let active = self.resolver.resolve(&signals);

        let state = self.initial_state(&request, prefix, active);
        let state = state.settle(&self.table, active);

        tracing::debug!(
            "Routed {} ({}) -> {:?}",
            request.target(),
            active,
            state
        );

        let canonical_path = match &state {
            RouteState::Redirecting { location } => Some(location.clone()),
            _ => None,
        };

        Navigation {
            context: LocaleContext {
                active_language: active,
                request_path: request,
                canonical_path,
            },
            state,
        }
    }

    /// Cases decided before the per-language state machine runs
    fn initial_state(
        &self,
        request: &RequestPath,
        prefix: Option<&str>,
        active: SupportedLanguage,
    ) -> RouteState {
        let segments = request.segments();

        let Some((first, rest)) = segments.split_first() else {
            return RouteState::Redirecting {
                location: request.with_path(&join_segments(&[active.code()])),
            };
        };

        if *first == ADMIN_SEGMENT {
            return RouteState::PassThrough(Page::Admin);
        }

        if let Some(code) = prefix {
            return match SupportedLanguage::from_code(code) {
                Some(_) => RouteState::Unchecked {
                    path: request.clone(),
                },
                None => RouteState::NotFound,
            };
        }

        self.legacy_redirect(request, first, rest)
            .unwrap_or(RouteState::NotFound)
    }

    /// Un-prefixed listing paths from before localization
    fn legacy_redirect(&self, request: &RequestPath, first: &str, rest: &[&str]) -> Option<RouteState> {
        let lang = self.default_language();
        let key = self
            .table
            .route_key_matching(&decode_segment(first), lang, rest.len())?;

        let mut segments = vec![lang.code(), self.table.segment_for(key, lang)];
        segments.extend_from_slice(rest);

        Some(RouteState::Redirecting {
            location: request.with_path(&join_segments(&segments)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::alternate_links_for;

    fn matcher() -> RouteMatcher {
        RouteMatcher::new(Arc::new(SlugTable::default()), SupportedLanguage::En)
    }

    fn route(target: &str) -> Navigation {
        matcher().route(target, &LanguageSignals::default())
    }

    #[test]
    fn test_canonical_keeps_query() {
        let nav = route("/de/anzeigen?category=tracteurs");
        assert_eq!(nav.state, RouteState::Canonical(Page::Listings));
        assert_eq!(nav.context.active_language, SupportedLanguage::De);
        assert_eq!(nav.context.canonical_path, None);
    }

    #[test]
    fn test_wrong_language_slug_redirects() {
        let nav = route("/de/annonces");
        assert_eq!(nav.redirect_location(), Some("/de/anzeigen"));

        let nav = route("/it/listing/42?ref=mail");
        assert_eq!(nav.redirect_location(), Some("/it/annuncio/42?ref=mail"));
        assert_eq!(nav.context.canonical_path.as_deref(), Some("/it/annuncio/42?ref=mail"));
    }

    #[test]
    fn test_listing_detail() {
        let nav = route("/fr/annonce/42");
        assert_eq!(
            nav.state,
            RouteState::Canonical(Page::Listing { id: "42".to_string() })
        );
    }

    #[test]
    fn test_root_redirect_uses_resolver() {
        let signals = LanguageSignals {
            persisted_preference: Some("es"),
            ..Default::default()
        };
        let nav = matcher().route("/", &signals);
        assert_eq!(nav.redirect_location(), Some("/es"));

        let signals = LanguageSignals {
            accept_language: Some("de-CH,de;q=0.9"),
            ..Default::default()
        };
        let nav = matcher().route("/?utm=x", &signals);
        assert_eq!(nav.redirect_location(), Some("/de?utm=x"));

        assert_eq!(route("/").redirect_location(), Some("/en"));
    }

    #[test]
    fn test_pass_through_pages() {
        assert_eq!(route("/pt").state, RouteState::PassThrough(Page::Home));
        assert_eq!(
            route("/es/faq").state,
            RouteState::PassThrough(Page::Static { page: StaticPage::Faq })
        );
        assert_eq!(
            route("/de/panier").state,
            RouteState::PassThrough(Page::Account { page: AccountPage::Cart })
        );
        assert_eq!(
            route("/fr/account").state,
            RouteState::PassThrough(Page::Account { page: AccountPage::Account })
        );
        assert_eq!(route("/admin").state, RouteState::PassThrough(Page::Admin));
        assert_eq!(route("/admin/products/3").state, RouteState::PassThrough(Page::Admin));
    }

    #[test]
    fn test_unknown_prefix_is_not_found() {
        let nav = route("/xx/listings");
        assert!(nav.is_not_found());
        assert_eq!(nav.redirect_location(), None);
    }

    #[test]
    fn test_not_found_cases() {
        assert!(route("/en/tractors").is_not_found());
        assert!(route("/en/listing").is_not_found());
        assert!(route("/en/listings/42").is_not_found());
        assert!(route("/en/faq/extra").is_not_found());
        assert!(route("/about").is_not_found());
    }

    #[test]
    fn test_legacy_redirects() {
        assert_eq!(route("/annonces").redirect_location(), Some("/en/listings"));
        assert_eq!(route("/annonce/42").redirect_location(), Some("/en/listing/42"));
        assert_eq!(
            route("/annonces?category=tracteurs").redirect_location(),
            Some("/en/listings?category=tracteurs")
        );
        assert!(route("/annonce").is_not_found());
    }

    #[test]
    fn test_redirect_output_is_canonical() {
        let m = matcher();
        let targets = [
            "/",
            "/de/annonces",
            "/fr/listing/9",
            "/annonce/42",
            "/es/annunci?page=2",
            "/pt/anzeige/abc",
        ];
        for target in targets {
            let first = m.route(target, &LanguageSignals::default());
            let location = first.redirect_location().expect("redirects").to_string();
            let second = m.route(&location, &LanguageSignals::default());
            assert!(second.redirect_location().is_none(), "{} -> {} redirected again", target, location);
            assert!(!second.is_not_found(), "{} -> {} not found", target, location);
        }
    }

    #[test]
    fn test_shared_spelling_routes_by_active_language() {
        // English detail slug collides with the French index slug
        let table = SlugTable::builder()
            .slug(RouteKey::Listing, SupportedLanguage::En, "annonces")
            .build()
            .unwrap();
        let m = RouteMatcher::new(Arc::new(table), SupportedLanguage::En);
        let route = |target: &str| m.route(target, &LanguageSignals::default());

        assert_eq!(route("/fr/annonces").state, RouteState::Canonical(Page::Listings));
        assert_eq!(
            route("/en/annonces/42").state,
            RouteState::Canonical(Page::Listing { id: "42".to_string() })
        );
        assert_eq!(
            route("/fr/annonce/42").state,
            RouteState::Canonical(Page::Listing { id: "42".to_string() })
        );
        assert_eq!(route("/en/annonces").redirect_location(), Some("/en/listings"));
        assert_eq!(route("/de/annonces/42").redirect_location(), Some("/de/anzeige/42"));

        // Every advertised alternate settles without a redirect
        for (path, lang) in [("/en/annonces/42", SupportedLanguage::En), ("/fr/annonces", SupportedLanguage::Fr)] {
            let alternates = alternate_links_for(m.table(), path, lang);
            for (_, href) in alternates.iter() {
                let nav = route(href);
                assert!(
                    matches!(nav.state, RouteState::Canonical(_)),
                    "{} -> {:?}",
                    href,
                    nav.state
                );
            }
        }
    }

    #[test]
    fn test_overridden_slugs() {
        let table = SlugTable::builder()
            .slug(RouteKey::Listings, SupportedLanguage::Pt, "classificados")
            .build()
            .unwrap();
        let m = RouteMatcher::new(Arc::new(table), SupportedLanguage::En);

        let nav = m.route("/pt/anuncios", &LanguageSignals::default());
        assert_eq!(nav.redirect_location(), Some("/pt/classificados"));
        let nav = m.route("/pt/classificados", &LanguageSignals::default());
        assert_eq!(nav.state, RouteState::Canonical(Page::Listings));
        let nav = m.route("/classificados", &LanguageSignals::default());
        assert_eq!(nav.redirect_location(), Some("/en/listings"));
    }

    #[test]
    fn test_default_language_drives_fallbacks() {
        let m = RouteMatcher::new(Arc::new(SlugTable::default()), SupportedLanguage::Fr);
        let signals = LanguageSignals::default();

        assert_eq!(m.route("/annonce/42", &signals).redirect_location(), Some("/fr/annonce/42"));
        assert_eq!(m.route("/listings", &signals).redirect_location(), Some("/fr/annonces"));
        assert_eq!(m.route("/", &signals).redirect_location(), Some("/fr"));

        let signals = LanguageSignals {
            accept_language: Some("nl-NL,nl;q=0.9"),
            ..Default::default()
        };
        assert_eq!(m.route("/", &signals).redirect_location(), Some("/fr"));
    }

    #[test]
    fn test_encoded_slug_redirects_to_literal() {
        let nav = route("/de/anzeig%65n?category=tracteurs");
        assert_eq!(nav.redirect_location(), Some("/de/anzeigen?category=tracteurs"));
        assert_eq!(route("/de/anzeigen").state, RouteState::Canonical(Page::Listings));
    }

    #[test]
    fn test_step_is_pure() {
        let table = SlugTable::default();
        let start = RouteState::Unchecked {
            path: RequestPath::parse("/de/annonces"),
        };
        let checking = start.clone().step(&table, SupportedLanguage::De);
        assert_eq!(
            checking,
            RouteState::Checking {
                path: RequestPath::parse("/de/annonces"),
                key: RouteKey::Listings
            }
        );
        assert_eq!(start.step(&table, SupportedLanguage::De), checking);
        assert_eq!(RouteState::NotFound.step(&table, SupportedLanguage::De), RouteState::NotFound);
    }
}
