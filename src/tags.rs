//! Tag normalization and the derived-view aggregators.
//!
//! Normalization turns free text into the canonical tag list stored on a
//! note: trimmed, non-empty, deduplicated, first occurrence wins. The
//! aggregators are pure projections over a fetched note set; they are
//! recomputed in full after every mutation, never maintained incrementally.

use std::collections::BTreeSet;

use crate::models::Note;

/// Parses comma-separated free text into a normalized tag list.
///
/// Splits on commas, trims whitespace, drops empty entries, and removes
/// duplicates while preserving first-occurrence order. Normalization is
/// idempotent: feeding the joined output back in yields the same list.
///
/// # Examples
///
/// ```
/// use ideabox::tags::normalize_tags;
///
/// assert_eq!(normalize_tags("x, y, x"), vec!["x", "y"]);
/// assert_eq!(normalize_tags(" rust ,, "), vec!["rust"]);
/// assert!(normalize_tags("").is_empty());
/// ```
pub fn normalize_tags(raw: &str) -> Vec<String> {
    dedup_tags(raw.split(',').map(str::trim))
}

/// Normalizes an already-split tag list.
///
/// Applies the same trimming, empty-stripping, and deduplication as
/// [`normalize_tags`].
pub fn normalize_tag_list<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<String> = tags
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .collect();
    dedup_tags(owned.iter().map(String::as_str))
}

fn dedup_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut result = Vec::new();
    for tag in tags {
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.to_string()) {
            result.push(tag.to_string());
        }
    }
    result
}

/// Computes the tag cloud: the distinct union of tags across a note set,
/// sorted lexicographically.
pub fn tag_cloud(notes: &[Note]) -> Vec<String> {
    let set: BTreeSet<&str> = notes
        .iter()
        .flat_map(|note| note.tags.iter().map(String::as_str))
        .collect();
    set.into_iter().map(String::from).collect()
}

/// Computes the group list: distinct group labels excluding the absent
/// ("none") sentinel, sorted lexicographically.
pub fn group_list<I, S>(groups: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let set: BTreeSet<String> = groups
        .into_iter()
        .flatten()
        .map(|g| g.as_ref().to_string())
        .filter(|g| !g.is_empty() && g != "none")
        .collect();
    set.into_iter().collect()
}

/// Maps form input for the group field to the stored value.
///
/// Empty input and the "none" sentinel both mean "no group".
pub fn normalize_group(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
