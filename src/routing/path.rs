//! Request target splitting

use std::borrow::Cow;

/// Incoming request target split into path and query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    path: String,
    query: Option<String>,
}

impl RequestPath {
    /// Split a raw target such as `/de/anzeigen?category=tracteurs`.
    ///
    /// Fragments are dropped; the query is kept verbatim.
    pub fn parse(target: &str) -> Self {
        let target = target.split('#').next().unwrap_or_default();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Self { path, query }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Non-empty path segments, still percent-encoded
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Attach this request's query string to another path
    pub fn with_path(&self, path: &str) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        }
    }

    /// Path and query as received
    pub fn target(&self) -> String {
        self.with_path(&self.path)
    }
}

/// Percent-decode a segment for comparison, keeping it raw if it is not UTF-8
pub fn decode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// Join segments into an absolute path
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        path.push_str(segment.as_ref());
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let p = RequestPath::parse("/de/anzeigen?category=tracteurs");
        assert_eq!(p.path(), "/de/anzeigen");
        assert_eq!(p.query(), Some("category=tracteurs"));
        assert_eq!(p.segments(), vec!["de", "anzeigen"]);
        assert_eq!(p.target(), "/de/anzeigen?category=tracteurs");

        let p = RequestPath::parse("/fr/annonce/42/#photos");
        assert_eq!(p.segments(), vec!["fr", "annonce", "42"]);
        assert_eq!(p.query(), None);

        assert!(RequestPath::parse("/").segments().is_empty());
        assert_eq!(RequestPath::parse("").path(), "/");
    }

    #[test]
    fn test_decode_and_join() {
        assert_eq!(decode_segment("anzeigen"), "anzeigen");
        assert_eq!(decode_segment("caf%C3%A9"), "café");
        assert_eq!(decode_segment("%FF"), "%FF");
        assert_eq!(join_segments(&["es", "anuncio", "7"]), "/es/anuncio/7");
        assert_eq!(join_segments::<&str>(&[]), "/");
    }
}
