//! Locale-aware routing
//!
//! Maps route families to their per-language slugs and settles each
//! incoming path into a render, redirect or not-found decision.

mod matcher;
mod pages;
mod path;
mod slugs;

pub use matcher::{LocaleContext, Navigation, RouteMatcher, RouteState};
pub use pages::{is_reserved_segment, AccountPage, Page, StaticPage, ADMIN_SEGMENT};
pub use path::{decode_segment, join_segments, RequestPath};
pub use slugs::{RouteKey, SlugTable, SlugTableBuilder, SlugTableError};
