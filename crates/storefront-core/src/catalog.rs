//! Listing grid logic: search, tag filters, sorting, and tag suggestions.
//!
//! Items arrive from the document store in creation order, newest first.
//! Nothing here reorders the input unless a sort is requested.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::records::Item;

/// Grid ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Input order.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

/// Filters chosen in the grid toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Whitespace-separated terms; every term must match.
    pub search: String,
    /// Tags an item must all carry.
    pub tags: Vec<String>,
    pub sort: SortOrder,
}

/// A tag offered by the autocomplete, with how many items carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSuggestion {
    pub tag: String,
    pub count: usize,
}

/// Trimmed, lowercased form of a tag; `None` when nothing is left.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_lowercase())
    }
}

/// Normalize a tag list, dropping blanks and keeping the first occurrence of
/// each duplicate.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().filter_map(|t| normalize_tag(t.as_ref())) {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn matches_term(item: &Item, term: &str) -> bool {
    item.name.to_lowercase().contains(term)
        || item.description.to_lowercase().contains(term)
        || item.tags.iter().any(|t| t.to_lowercase().contains(term))
}

fn has_tag(item: &Item, wanted: &str) -> bool {
    item.tags
        .iter()
        .any(|t| normalize_tag(t).as_deref() == Some(wanted))
}

/// Items matching `query`, ordered by `query.sort`.
pub fn filter_items<'a>(items: &'a [Item], query: &CatalogQuery) -> Vec<&'a Item> {
    let search = query.search.to_lowercase();
    let terms: Vec<&str> = search.split_whitespace().collect();
    let wanted = normalize_tags(&query.tags);

    let mut matched: Vec<&Item> = items
        .iter()
        .filter(|item| terms.iter().all(|term| matches_term(item, term)))
        .filter(|item| wanted.iter().all(|tag| has_tag(item, tag)))
        .collect();

    sort_items(&mut matched, query.sort);
    matched
}

fn compare_price(a: &Item, b: &Item, descending: bool) -> Ordering {
    match (a.price.amount(), b.price.amount()) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        // Items without a numeric price go last in both directions.
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort; ties keep their input order.
pub fn sort_items(items: &mut [&Item], order: SortOrder) {
    match order {
        SortOrder::Newest => {}
        SortOrder::PriceAsc => items.sort_by(|a, b| compare_price(a, b, false)),
        SortOrder::PriceDesc => items.sort_by(|a, b| compare_price(a, b, true)),
        SortOrder::Name => items.sort_by_cached_key(|item| item.name.to_lowercase()),
    }
}

/// Tags starting with `prefix`, most used first, then alphabetical.
///
/// Each item counts once per tag however it was capitalized. An empty
/// prefix suggests from every tag.
pub fn suggest_tags(items: &[Item], prefix: &str, limit: usize) -> Vec<TagSuggestion> {
    let prefix = prefix.trim().to_lowercase();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for item in items {
        for tag in normalize_tags(&item.tags) {
            if tag.starts_with(&prefix) {
                *counts.entry(tag).or_default() += 1;
            }
        }
    }

    let mut suggestions: Vec<TagSuggestion> = counts
        .into_iter()
        .map(|(tag, count)| TagSuggestion { tag, count })
        .collect();
    // BTreeMap order is alphabetical already; the stable sort keeps it for ties.
    suggestions.sort_by(|a, b| b.count.cmp(&a.count));
    suggestions.truncate(limit);
    suggestions
}
