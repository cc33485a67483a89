//! HTTP request handlers

use super::state::AppState;
use crate::locales::{preference_cookie, preference_from_cookie, LanguageSignals, SupportedLanguage};
use crate::routing::{join_segments, LocaleContext, Page, RouteKey, RouteState, StaticPage};
use crate::seo::{alternate_links_for, sync_metadata, HeadTags, PageMeta};
use crate::sitemap::sitemap_entries;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;

/// Query parameters for the language switch
#[derive(Debug, Deserialize)]
pub struct SwitchParams {
    /// Page to return to, as a site-local path
    pub next: Option<String>,
}

/// Entry of the language switcher
#[derive(Debug, Serialize)]
struct LanguageLink {
    code: &'static str,
    name: &'static str,
    href: String,
    active: bool,
}

#[derive(Debug, Serialize)]
struct FooterLink {
    href: String,
    title: String,
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Storefront handler: every localized path goes through the route matcher
pub async fn storefront(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let signals = LanguageSignals {
        url_path_segment: None,
        persisted_preference: header_str(&headers, header::COOKIE)
            .and_then(|cookie| preference_from_cookie(cookie, &state.settings.i18n.preference_cookie)),
        accept_language: header_str(&headers, header::ACCEPT_LANGUAGE),
    };

    let navigation = state.matcher.route(target, &signals);
    state.metrics.record(&navigation);

    match &navigation.state {
        RouteState::Redirecting { location } => Redirect::temporary(location).into_response(),
        RouteState::PassThrough(Page::Admin) => admin_page(&state, navigation.context.request_path.path()),
        RouteState::PassThrough(page) | RouteState::Canonical(page) => {
            render_page(&state, page, &navigation.context)
        }
        _ => not_found(&state, navigation.context.active_language),
    }
}

/// Render a settled storefront page
fn render_page(state: &AppState, page: &Page, locale: &LocaleContext) -> Response {
    let lang = locale.active_language;
    let path = join_segments(&locale.request_path.segments());

    let (heading, description) = page_text(state, page, lang);
    let alternates = page
        .is_indexable()
        .then(|| alternate_links_for(&state.table, &path, lang).absolute(&state.base_url));

    let meta = PageMeta {
        title: format!("{} | {}", heading, state.site_name()),
        description,
        canonical_url: state.absolute(&path),
        alternates,
        indexable: page.is_indexable(),
    };
    let mut head = HeadTags::new();
    sync_metadata(&mut head, &meta);

    let mut ctx = base_context(state, lang, &path, &head, &heading);
    ctx.insert("description", &meta.description);
    ctx.insert("page", page);
    ctx.insert("query", locale.request_path.query().unwrap_or_default());

    let template = match page {
        Page::Home => "home.html",
        Page::Listings => "listings.html",
        Page::Listing { .. } => "listing.html",
        Page::Static { .. } | Page::Account { .. } => "page.html",
        Page::Admin => "admin.html",
    };

    render(state, template, &ctx, StatusCode::OK)
}

/// Heading and meta description of a page
fn page_text(state: &AppState, page: &Page, lang: SupportedLanguage) -> (String, String) {
    let t = &state.translations;
    let title = |prefix: &str| t.get(lang, &format!("{}-title", prefix));

    match page {
        Page::Listing { id } => (
            t.get_with_args(lang, "listing-title", &[("id", id.as_str())]),
            t.get_with_args(lang, "listing-description", &[("id", id.as_str())]),
        ),
        Page::Static { .. } => (
            title(page.message_prefix()),
            t.get(lang, "static-description"),
        ),
        Page::Account { .. } => (
            title(page.message_prefix()),
            t.get(lang, "account-description"),
        ),
        _ => (
            title(page.message_prefix()),
            t.get(lang, &format!("{}-description", page.message_prefix())),
        ),
    }
}

/// Variables shared by every storefront template
fn base_context(
    state: &AppState,
    lang: SupportedLanguage,
    path: &str,
    head: &HeadTags,
    heading: &str,
) -> Context {
    let t = &state.translations;
    let home_path = join_segments(&[lang.code()]);
    let listings_path = join_segments(&[lang.code(), state.table.segment_for(RouteKey::Listings, lang)]);

    let next = urlencoding::encode(path);
    let languages: Vec<LanguageLink> = SupportedLanguage::all()
        .iter()
        .map(|other| LanguageLink {
            code: other.code(),
            name: other.native_name(),
            href: format!("/language/{}?next={}", other.code(), next),
            active: *other == lang,
        })
        .collect();

    let footer_links: Vec<FooterLink> = StaticPage::ALL
        .iter()
        .map(|page| FooterLink {
            href: join_segments(&[lang.code(), page.slug()]),
            title: t.get(lang, &format!("{}-title", Page::Static { page: *page }.message_prefix())),
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("lang", lang.code());
    ctx.insert("head", &head.render());
    ctx.insert("site_name", state.site_name());
    ctx.insert("contact_email", &state.settings.general.contact_email);
    ctx.insert("title", heading);
    ctx.insert("home_path", &home_path);
    ctx.insert("listings_path", &listings_path);
    ctx.insert("nav_home", &t.get(lang, "nav-home"));
    ctx.insert("nav_listings", &t.get(lang, "nav-listings"));
    ctx.insert("language_label", &t.get(lang, "language-label"));
    ctx.insert("languages", &languages);
    ctx.insert("footer_links", &footer_links);
    ctx
}

fn render(state: &AppState, template: &str, ctx: &Context, status: StatusCode) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Not-found page in the active language
fn not_found(state: &AppState, lang: SupportedLanguage) -> Response {
    let t = &state.translations;
    let home_path = join_segments(&[lang.code()]);

    let heading = t.get(lang, "not-found-title");
    let meta = PageMeta {
        title: format!("{} | {}", heading, state.site_name()),
        description: t.get(lang, "not-found-description"),
        canonical_url: state.absolute(&home_path),
        alternates: None,
        indexable: false,
    };
    let mut head = HeadTags::new();
    sync_metadata(&mut head, &meta);

    let mut ctx = base_context(state, lang, &home_path, &head, &heading);
    ctx.insert("description", &meta.description);
    ctx.insert("back_label", &t.get(lang, "not-found-back"));

    render(state, "not_found.html", &ctx, StatusCode::NOT_FOUND)
}

/// Back-office shell; not language-prefixed and never localized
fn admin_page(state: &AppState, path: &str) -> Response {
    let meta = PageMeta {
        title: format!("Admin | {}", state.site_name()),
        description: String::new(),
        canonical_url: state.absolute(path),
        alternates: None,
        indexable: false,
    };
    let mut head = HeadTags::new();
    sync_metadata(&mut head, &meta);

    let mut ctx = Context::new();
    ctx.insert("lang", SupportedLanguage::En.code());
    ctx.insert("head", &head.render());
    ctx.insert("site_name", state.site_name());
    ctx.insert("home_path", "/admin");
    ctx.insert("footer_links", &Vec::<FooterLink>::new());
    ctx.insert("title", "Admin");
    ctx.insert("admin_path", path);

    render(state, "admin.html", &ctx, StatusCode::OK)
}

/// Admin namespace handler
pub async fn admin(State(state): State<AppState>, uri: Uri) -> Response {
    admin_page(&state, uri.path())
}

/// Explicit language switch: persist the choice and return to the same page
pub async fn switch_language(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<SwitchParams>,
) -> Response {
    let Some(lang) = SupportedLanguage::from_code(&code) else {
        return not_found(&state, state.matcher.default_language());
    };
    state.metrics.record_switch();

    let target = params
        .next
        .as_deref()
        .filter(|next| is_local_path(next))
        .and_then(|next| localized_target(&state, next, lang))
        .unwrap_or_else(|| join_segments(&[lang.code()]));

    tracing::debug!("Language switch to {} -> {}", lang, target);

    let cookie = preference_cookie(
        &state.settings.i18n.preference_cookie,
        lang,
        state.settings.i18n.preference_max_age,
    );
    ([(header::SET_COOKIE, cookie)], Redirect::to(&target)).into_response()
}

/// The page at `next`, spelled for `lang`.
///
/// A non-canonical `next` is corrected first, following one redirect.
fn localized_target(state: &AppState, next: &str, lang: SupportedLanguage) -> Option<String> {
    let mut navigation = state.matcher.route(next, &LanguageSignals::default());
    if let Some(location) = navigation.redirect_location().map(str::to_string) {
        navigation = state.matcher.route(&location, &LanguageSignals::default());
    }

    match navigation.page()? {
        Page::Admin => None,
        _ => {
            let request = &navigation.context.request_path;
            let path = join_segments(&request.segments());
            let alternates = alternate_links_for(&state.table, &path, navigation.context.active_language);
            alternates.get(lang).map(|localized| request.with_path(localized))
        }
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Sitemap handler
pub async fn sitemap_xml(State(state): State<AppState>) -> Response {
    let build = async {
        let entries = sitemap_entries(&state.table, &state.base_url, state.catalog.as_ref()).await;
        let lastmod = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();

        let mut ctx = Context::new();
        ctx.insert("entries", &entries);
        ctx.insert("lastmod", &lastmod);
        state.templates.render_with_context("sitemap.xml", &ctx)
    };

    match state
        .sitemap_cache
        .get_or_try_build(state.base_url.as_str(), build)
        .await
    {
        Ok(document) => (
            [(header::CONTENT_TYPE, "application/xml")],
            document.as_str().to_string(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Sitemap error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Sitemap error").into_response()
        }
    }
}

/// Robots.txt handler
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let content = if state.is_public() {
        format!(
            "User-agent: *\nAllow: /\nDisallow: /admin\nSitemap: {}\n",
            state.absolute("/sitemap.xml")
        )
    } else {
        "User-agent: *\nDisallow: /\n".to_string()
    };
    ([(header::CONTENT_TYPE, "text/plain")], content)
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    state.sitemap_cache.run_pending_tasks().await;

    Json(serde_json::json!({
        "navigation": state.metrics.snapshot(),
        "sitemap_cache_entries": state.sitemap_cache.size(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/de/anzeigen"));
        assert!(!is_local_path("//evil.example/x"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("/\\evil.example"));
    }
}
