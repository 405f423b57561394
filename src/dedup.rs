//! First-occurrence deduplication by surface text.

use crate::record::Span;
use std::collections::HashSet;

/// Keep each item whose key has not been seen yet, preserving input order.
///
/// Keys are compared as exact strings: no case folding or whitespace
/// normalization. Later duplicates are dropped even if they carry a different
/// span.
pub fn dedup_by_text<T, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();
    for item in items {
        if seen.insert(key(&item).to_string()) {
            kept.push(item);
        }
    }
    kept
}

/// Deduplicate materialized spans by their text.
pub fn dedup_spans<'a>(spans: impl IntoIterator<Item = &'a Span>) -> Vec<&'a Span> {
    dedup_by_text(spans, |span| span.text.as_str())
}
