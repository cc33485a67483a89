//! SEO metadata: hreflang alternates and the document head

mod alternates;
mod head;

pub use alternates::{alternate_links_for, AlternateLinkSet, X_DEFAULT_LANGUAGE};
pub use head::{clear_metadata, sync_metadata, HeadTag, HeadTags, MetaSink, PageMeta, TagSelector};
