//! Page families the storefront renders

use serde::Serialize;

/// Informational pages; their slug is the same in every language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaticPage {
    About,
    HowItWorks,
    Faq,
    Contact,
    Terms,
    Privacy,
    Cookies,
}

impl StaticPage {
    pub const ALL: [StaticPage; 7] = [
        StaticPage::About,
        StaticPage::HowItWorks,
        StaticPage::Faq,
        StaticPage::Contact,
        StaticPage::Terms,
        StaticPage::Privacy,
        StaticPage::Cookies,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            StaticPage::About => "about",
            StaticPage::HowItWorks => "how-it-works",
            StaticPage::Faq => "faq",
            StaticPage::Contact => "contact",
            StaticPage::Terms => "terms",
            StaticPage::Privacy => "privacy",
            StaticPage::Cookies => "cookies",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|page| page.slug() == segment)
    }
}

/// Account and commerce pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountPage {
    Auth,
    Cart,
    Checkout,
    Account,
}

impl AccountPage {
    /// Every accepted spelling; `panier` and `compte` are aliases
    const SEGMENTS: [(&'static str, AccountPage); 6] = [
        ("auth", AccountPage::Auth),
        ("cart", AccountPage::Cart),
        ("panier", AccountPage::Cart),
        ("checkout", AccountPage::Checkout),
        ("account", AccountPage::Account),
        ("compte", AccountPage::Account),
    ];

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::SEGMENTS
            .iter()
            .find(|(slug, _)| *slug == segment)
            .map(|(_, page)| *page)
    }

    pub fn segments() -> impl Iterator<Item = &'static str> {
        Self::SEGMENTS.iter().map(|(slug, _)| *slug)
    }
}

/// Leading segment of the back-office namespace
pub const ADMIN_SEGMENT: &str = "admin";

/// Segments no localized slug may take
pub fn is_reserved_segment(segment: &str) -> bool {
    segment == ADMIN_SEGMENT
        || StaticPage::from_segment(segment).is_some()
        || AccountPage::from_segment(segment).is_some()
}

/// What a settled navigation renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    Home,
    Static { page: StaticPage },
    Account { page: AccountPage },
    Listings,
    Listing { id: String },
    Admin,
}

impl Page {
    /// Fluent message id prefix for the page's title and description
    pub fn message_prefix(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Static { page } => match page {
                StaticPage::About => "about",
                StaticPage::HowItWorks => "how-it-works",
                StaticPage::Faq => "faq",
                StaticPage::Contact => "contact",
                StaticPage::Terms => "terms",
                StaticPage::Privacy => "privacy",
                StaticPage::Cookies => "cookies",
            },
            Page::Account { page } => match page {
                AccountPage::Auth => "auth",
                AccountPage::Cart => "cart",
                AccountPage::Checkout => "checkout",
                AccountPage::Account => "account",
            },
            Page::Listings => "listings",
            Page::Listing { .. } => "listing",
            Page::Admin => "admin",
        }
    }

    /// Whether search engines should index the page
    pub fn is_indexable(&self) -> bool {
        !matches!(self, Page::Account { .. } | Page::Admin)
    }
}
