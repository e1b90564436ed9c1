//! Category and free-text predicates.
//!
//! Both are substring checks over keys precomputed by the normalizer. For a
//! catalog of a few hundred entries this is all the search we need.

use crate::text::normalize;

use super::types::CatalogItem;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// True when `active_category` is "all" or appears in the item's category key.
///
/// `active_category` is expected in normalized form; see [`normalize_category`].
pub fn matches_category(item: &CatalogItem, active_category: &str) -> bool {
    active_category == ALL_CATEGORIES || item.category_key.contains(active_category)
}

/// True when `term` is empty or its normalized form appears in the item's
/// search text.
pub fn matches_search(item: &CatalogItem, term: &str) -> bool {
    let term = normalize(term);
    term.is_empty() || item.search_text.contains(&term)
}

/// Canonical form of a category selection. Blank selects everything.
pub fn normalize_category(category: &str) -> String {
    let normalized = normalize(category);
    if normalized.is_empty() {
        ALL_CATEGORIES.to_string()
    } else {
        normalized
    }
}

/// Evaluate both predicates for every item.
pub fn visibility(items: &[CatalogItem], active_category: &str, term: &str) -> Vec<bool> {
    items
        .iter()
        .map(|item| {
            let in_category = matches_category(item, active_category);
            let in_search = matches_search(item, term);
            in_category && in_search
        })
        .collect()
}
