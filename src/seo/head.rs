//! Document head metadata
//!
//! The head is treated as one value per rendered page. `sync_metadata`
//! replaces whatever a previous render left behind, so exactly one set of
//! tags describes the current canonical page.

use super::AlternateLinkSet;
use serde::Serialize;
use tera::escape_html;

/// A single tag in the document head
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadTag {
    Title(String),
    Meta {
        name: String,
        content: String,
    },
    Link {
        rel: String,
        hreflang: Option<String>,
        href: String,
    },
}

impl HeadTag {
    pub fn alternate(hreflang: impl Into<String>, href: impl Into<String>) -> Self {
        HeadTag::Link {
            rel: "alternate".to_string(),
            hreflang: Some(hreflang.into()),
            href: href.into(),
        }
    }

    /// Serialize as HTML with escaped attribute values
    pub fn to_html(&self) -> String {
        match self {
            HeadTag::Title(text) => format!("<title>{}</title>", escape_html(text)),
            HeadTag::Meta { name, content } => format!(
                r#"<meta name="{}" content="{}">"#,
                escape_html(name),
                escape_html(content)
            ),
            HeadTag::Link { rel, hreflang, href } => match hreflang {
                Some(lang) => format!(
                    r#"<link rel="{}" hreflang="{}" href="{}">"#,
                    escape_html(rel),
                    escape_html(lang),
                    escape_html(href)
                ),
                None => format!(
                    r#"<link rel="{}" href="{}">"#,
                    escape_html(rel),
                    escape_html(href)
                ),
            },
        }
    }
}

/// Selects head tags for upsert and removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSelector {
    Title,
    MetaName(String),
    Canonical,
    /// Every `rel="alternate"` link carrying an hreflang
    Alternates,
}

impl TagSelector {
    pub fn matches(&self, tag: &HeadTag) -> bool {
        match (self, tag) {
            (TagSelector::Title, HeadTag::Title(_)) => true,
            (TagSelector::MetaName(wanted), HeadTag::Meta { name, .. }) => name == wanted,
            (TagSelector::Canonical, HeadTag::Link { rel, .. }) => rel == "canonical",
            (TagSelector::Alternates, HeadTag::Link { rel, hreflang, .. }) => {
                rel == "alternate" && hreflang.is_some()
            }
            _ => false,
        }
    }
}

/// Write surface for document metadata
pub trait MetaSink {
    /// Replace the first tag matching `selector`, or append `tag`
    fn upsert(&mut self, selector: &TagSelector, tag: HeadTag);

    /// Append a tag unconditionally
    fn append(&mut self, tag: HeadTag);

    /// Remove every tag matching `selector`
    fn remove_all(&mut self, selector: &TagSelector);
}

/// In-memory document head
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadTags {
    tags: Vec<HeadTag>,
}

impl HeadTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[HeadTag] {
        &self.tags
    }

    pub fn count(&self, selector: &TagSelector) -> usize {
        self.tags.iter().filter(|tag| selector.matches(tag)).count()
    }

    /// Render every tag, one per line
    pub fn render(&self) -> String {
        self.tags
            .iter()
            .map(HeadTag::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl MetaSink for HeadTags {
    fn upsert(&mut self, selector: &TagSelector, tag: HeadTag) {
        match self.tags.iter_mut().find(|existing| selector.matches(existing)) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    fn append(&mut self, tag: HeadTag) {
        self.tags.push(tag);
    }

    fn remove_all(&mut self, selector: &TagSelector) {
        self.tags.retain(|tag| !selector.matches(tag));
    }
}

/// Metadata describing one rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    /// Absent for pages that are not published in every language
    pub alternates: Option<AlternateLinkSet>,
    pub indexable: bool,
}

/// Bring the sink in line with `meta`, dropping stale alternates first
pub fn sync_metadata(sink: &mut impl MetaSink, meta: &PageMeta) {
    sink.remove_all(&TagSelector::Alternates);

    sink.upsert(&TagSelector::Title, HeadTag::Title(meta.title.clone()));
    sink.upsert(
        &TagSelector::MetaName("description".to_string()),
        HeadTag::Meta {
            name: "description".to_string(),
            content: meta.description.clone(),
        },
    );
    sink.upsert(
        &TagSelector::MetaName("robots".to_string()),
        HeadTag::Meta {
            name: "robots".to_string(),
            content: if meta.indexable { "index, follow" } else { "noindex, nofollow" }.to_string(),
        },
    );
    sink.upsert(
        &TagSelector::Canonical,
        HeadTag::Link {
            rel: "canonical".to_string(),
            hreflang: None,
            href: meta.canonical_url.clone(),
        },
    );

    if let Some(alternates) = &meta.alternates {
        for (lang, href) in alternates.iter() {
            sink.append(HeadTag::alternate(lang.code(), href));
        }
        sink.append(HeadTag::alternate("x-default", alternates.x_default()));
    }
}

/// Remove everything `sync_metadata` writes
pub fn clear_metadata(sink: &mut impl MetaSink) {
    sink.remove_all(&TagSelector::Alternates);
    sink.remove_all(&TagSelector::Canonical);
    sink.remove_all(&TagSelector::MetaName("description".to_string()));
    sink.remove_all(&TagSelector::MetaName("robots".to_string()));
    sink.remove_all(&TagSelector::Title);
}
