//! Helpers for the comma-separated order tag string.

/// Splits a tag string into trimmed, non-empty tags, preserving order.
#[must_use]
pub fn parse_tags(tags: &str) -> Vec<&str> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Whether `tag` appears as a whole tag (not a substring of another tag).
#[must_use]
pub fn has_tag(tags: &str, tag: &str) -> bool {
    let tag = tag.trim();
    parse_tags(tags).iter().any(|t| *t == tag)
}

/// Returns the rewritten tag string with `tag` appended, or `None` when the
/// tag is already present and no update is needed.
#[must_use]
pub fn with_tag(tags: &str, tag: &str) -> Option<String> {
    if has_tag(tags, tag) {
        return None;
    }
    let mut all = parse_tags(tags);
    all.push(tag.trim());
    Some(all.join(", "))
}
