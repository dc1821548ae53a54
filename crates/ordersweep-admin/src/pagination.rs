//! Cursor-based pagination via the `Link` response header.
//!
//! Admin API list endpoints return the adjacent pages in a `Link` header. The
//! next page's URL already carries `limit`, `fields`, and the opaque
//! `page_info` token, so the client requests it verbatim.
//!
//! ## Header format
//!
//! Single next link:
//! ```text
//! <https://shop.myshopify.com/admin/api/2023-01/orders.json?limit=250&page_info=CURSOR>; rel="next"
//! ```
//!
//! Combined previous and next:
//! ```text
//! <https://…/orders.json?limit=250&page_info=PREV>; rel="previous",
//! <https://…/orders.json?limit=250&page_info=NEXT>; rel="next"
//! ```

use reqwest::Url;

/// Continuation pointing at the next page of a filtered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    url: String,
}

impl PageCursor {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Full URL of the next page, exactly as the server sent it.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The opaque `page_info` token embedded in the URL, if present.
    #[must_use]
    pub fn page_info(&self) -> Option<String> {
        let url = Url::parse(&self.url).ok()?;
        url.query_pairs()
            .find(|(key, value)| *key == "page_info" && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    }
}

/// Parses a `Link` header value and returns the `rel="next"` target.
///
/// Returns `None` if:
/// - `link_header` is `None` (no header was present),
/// - there is no `rel="next"` entry (last page reached),
/// - the next entry has no `<…>` URL.
#[must_use]
pub fn extract_next_link(link_header: Option<&str>) -> Option<PageCursor> {
    link_header?
        .split(',')
        .filter_map(parse_link_entry)
        .find(|(_, rel)| *rel == "next")
        .map(|(target, _)| PageCursor::new(target))
}

/// Splits one `<url>; rel="x"` entry into its target and relation type.
fn parse_link_entry(entry: &str) -> Option<(&str, &str)> {
    let (target, params) = entry.trim().split_once(';')?;
    let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
    if target.is_empty() {
        return None;
    }
    let rel = params
        .split(';')
        .find_map(|param| param.trim().strip_prefix("rel="))?
        .trim_matches('"');
    Some((target, rel))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://shop.myshopify.com/admin/api/2023-01/orders.json";

    #[test]
    fn returns_none_when_header_is_none() {
        assert!(extract_next_link(None).is_none());
    }

    #[test]
    fn returns_none_when_header_is_empty() {
        assert!(extract_next_link(Some("")).is_none());
    }

    #[test]
    fn extracts_url_from_single_next_link() {
        let header = format!(r#"<{BASE}?limit=250&page_info=eyJsYXN0X2lkIjo2fQ>; rel="next""#);
        let cursor = extract_next_link(Some(&header)).unwrap();
        assert_eq!(
            cursor.url(),
            format!("{BASE}?limit=250&page_info=eyJsYXN0X2lkIjo2fQ")
        );
        assert_eq!(cursor.page_info().as_deref(), Some("eyJsYXN0X2lkIjo2fQ"));
    }

    #[test]
    fn picks_only_next_entry_from_two_entries() {
        let header = format!(
            r#"<{BASE}?limit=250&page_info=PREV>; rel="previous", <{BASE}?limit=250&page_info=NEXT>; rel="next""#
        );
        let cursor = extract_next_link(Some(&header)).unwrap();
        assert_eq!(cursor.url(), format!("{BASE}?limit=250&page_info=NEXT"));
    }

    #[test]
    fn next_entry_first_still_wins_over_previous() {
        let header = format!(
            r#"<{BASE}?page_info=NEXT>; rel="next", <{BASE}?page_info=PREV>; rel="previous""#
        );
        let cursor = extract_next_link(Some(&header)).unwrap();
        assert_eq!(cursor.page_info().as_deref(), Some("NEXT"));
    }

    #[test]
    fn returns_none_when_only_previous_link_present() {
        let header = format!(r#"<{BASE}?limit=250&page_info=PREV>; rel="previous""#);
        assert!(extract_next_link(Some(&header)).is_none());
    }

    #[test]
    fn returns_none_when_next_segment_has_no_brackets() {
        assert!(extract_next_link(Some(r#"no-url-here; rel="next""#)).is_none());
    }

    #[test]
    fn handles_extra_whitespace_between_segments() {
        let header = format!(
            r#"<{BASE}?page_info=ABC>; rel="previous",   <{BASE}?page_info=XYZ>; rel="next""#
        );
        let cursor = extract_next_link(Some(&header)).unwrap();
        assert_eq!(cursor.page_info().as_deref(), Some("XYZ"));
    }

    #[test]
    fn page_info_missing_returns_none() {
        let cursor = PageCursor::new(format!("{BASE}?limit=250"));
        assert!(cursor.page_info().is_none());
    }

    #[test]
    fn empty_target_is_ignored() {
        assert!(extract_next_link(Some(r#"<>; rel="next""#)).is_none());
    }

    #[test]
    fn link_entry_splits_target_and_rel() {
        assert_eq!(
            parse_link_entry(r#" <https://x.com/o.json?page_info=A>; rel="previous" "#),
            Some(("https://x.com/o.json?page_info=A", "previous"))
        );
        assert!(parse_link_entry("https://x.com/o.json").is_none());
    }

    #[test]
    fn page_info_is_read_from_any_query_position() {
        let cursor = PageCursor::new(format!("{BASE}?page_info=XYZ&limit=250"));
        assert_eq!(cursor.page_info().as_deref(), Some("XYZ"));
    }
}
