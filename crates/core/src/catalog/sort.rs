//! Ordering of the catalog for display.
//!
//! Visible items always come before hidden ones, whatever the key. Inside
//! each group the order is a stable sort by the selected key.

use std::cmp::Ordering;

use super::types::{CatalogItem, Difficulty, SortKey};

/// Order `items` for display, returning indices into `items`.
///
/// `visible[i]` tells whether `items[i]` passed the current filters; missing
/// entries count as hidden.
pub fn sort_indices(items: &[CatalogItem], visible: &[bool], key: SortKey) -> Vec<usize> {
    let is_visible = |i: usize| visible.get(i).copied().unwrap_or(false);

    let mut order: Vec<usize> = (0..items.len()).collect();
    // slice::sort_by is stable, ties keep load order.
    order.sort_by(|&a, &b| {
        is_visible(b)
            .cmp(&is_visible(a))
            .then_with(|| compare(&items[a], &items[b], key))
    });
    order
}

/// Compare two items by `key`. `Default` treats everything as equal.
///
/// Titles and composers compare by their accent-folded, case-insensitive
/// collation keys. An unrecognized difficulty has no rank and sorts after
/// every known level in both directions, the same as an unparsable price.
pub fn compare(a: &CatalogItem, b: &CatalogItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Default => Ordering::Equal,
        SortKey::TitleAsc => a.title_key.cmp(&b.title_key),
        SortKey::TitleDesc => b.title_key.cmp(&a.title_key),
        SortKey::ComposerAsc => a.composer_key.cmp(&b.composer_key),
        SortKey::ComposerDesc => b.composer_key.cmp(&a.composer_key),
        SortKey::DifficultyAsc => compare_missing_last(difficulty(a), difficulty(b), false),
        SortKey::DifficultyDesc => compare_missing_last(difficulty(a), difficulty(b), true),
        SortKey::PriceAsc => compare_missing_last(a.price_value, b.price_value, false),
        SortKey::PriceDesc => compare_missing_last(a.price_value, b.price_value, true),
    }
}

/// Difficulty as a sortable number; unrecognized labels have none.
fn difficulty(item: &CatalogItem) -> Option<f64> {
    match item.difficulty {
        Difficulty::Unrecognized => None,
        _ => Some(f64::from(item.difficulty_rank)),
    }
}

/// Numeric comparison where missing values go last in both directions.
fn compare_missing_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemNormalizer;
    use crate::testing::fixtures;

    fn item(title: &str, composer: &str, difficulty: &str, price: &str) -> CatalogItem {
        ItemNormalizer::default()
            .normalize(fixtures::raw_item(title, composer, "pop", difficulty, price))
            .unwrap()
    }

    fn titles(items: &[CatalogItem], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| items[i].title.clone()).collect()
    }

    fn sample() -> Vec<CatalogItem> {
        vec![
            item("Canon in D", "Pachelbel", "Intermediate", "$3.99"),
            item("air on G", "Bach", "Beginner", "Free"),
            item("Bourrée", "bach", "Advanced", "$9.50"),
            item("Drowsy Maggie", "Traditional", "Mystery", "$1"),
        ]
    }

    #[test]
    fn test_default_keeps_load_order() {
        let items = sample();
        let order = sort_indices(&items, &[true; 4], SortKey::Default);
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_title_sort_is_case_insensitive() {
        let items = sample();
        let order = sort_indices(&items, &[true; 4], SortKey::TitleAsc);
        assert_eq!(
            titles(&items, &order),
            vec!["air on G", "Bourrée", "Canon in D", "Drowsy Maggie"]
        );

        let order = sort_indices(&items, &[true; 4], SortKey::TitleDesc);
        assert_eq!(
            titles(&items, &order),
            vec!["Drowsy Maggie", "Canon in D", "Bourrée", "air on G"]
        );
    }

    #[test]
    fn test_title_sort_folds_accents() {
        let items = vec![
            item("Zebra Waltz", "A", "Beginner", "$1"),
            item("Étude No. 1", "B", "Beginner", "$1"),
            item("Eleanor Rigby", "C", "Beginner", "$1"),
        ];
        let order = sort_indices(&items, &[true; 3], SortKey::TitleAsc);
        assert_eq!(
            titles(&items, &order),
            vec!["Eleanor Rigby", "Étude No. 1", "Zebra Waltz"]
        );

        let order = sort_indices(&items, &[true; 3], SortKey::TitleDesc);
        assert_eq!(
            titles(&items, &order),
            vec!["Zebra Waltz", "Étude No. 1", "Eleanor Rigby"]
        );
    }

    #[test]
    fn test_composer_sort_folds_accents() {
        let items = vec![
            item("One", "Fauré", "Beginner", "$1"),
            item("Two", "Éric Satie", "Beginner", "$1"),
            item("Three", "Elgar", "Beginner", "$1"),
        ];
        let order = sort_indices(&items, &[true; 3], SortKey::ComposerAsc);
        assert_eq!(titles(&items, &order), vec!["Three", "Two", "One"]);
    }

    #[test]
    fn test_composer_sort_ties_keep_load_order() {
        let items = sample();
        let order = sort_indices(&items, &[true; 4], SortKey::ComposerAsc);
        // "Bach" and "bach" tie; load order decides.
        assert_eq!(order, vec![1, 2, 0, 3]);

        let order = sort_indices(&items, &[true; 4], SortKey::ComposerDesc);
        assert_eq!(order, vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_price_sort_puts_unparsable_last_both_ways() {
        let items = sample();
        let order = sort_indices(&items, &[true; 4], SortKey::PriceAsc);
        assert_eq!(order, vec![3, 0, 2, 1]);

        let order = sort_indices(&items, &[true; 4], SortKey::PriceDesc);
        assert_eq!(order, vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_difficulty_sort_puts_unrecognized_last_both_ways() {
        let items = sample();
        let order = sort_indices(&items, &[true; 4], SortKey::DifficultyAsc);
        assert_eq!(order, vec![1, 0, 2, 3]);

        let order = sort_indices(&items, &[true; 4], SortKey::DifficultyDesc);
        assert_eq!(order, vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_difficulty_ties_are_stable() {
        let items = vec![
            item("First", "A", "Beginner", "$1"),
            item("Second", "B", "Advanced", "$1"),
            item("Third", "C", "Beginner", "$1"),
        ];
        let order = sort_indices(&items, &[true; 3], SortKey::DifficultyAsc);
        assert_eq!(titles(&items, &order), vec!["First", "Third", "Second"]);
    }

    #[test]
    fn test_hidden_items_never_precede_visible() {
        let items = sample();
        let visible = [false, true, false, true];
        for key in SortKey::ALL {
            let order = sort_indices(&items, &visible, key);
            let flags: Vec<bool> = order.iter().map(|&i| visible[i]).collect();
            let first_hidden = flags.iter().position(|v| !v).unwrap_or(flags.len());
            assert!(
                flags[first_hidden..].iter().all(|v| !v),
                "hidden item precedes visible for {}",
                key
            );
        }
    }

    #[test]
    fn test_hidden_group_is_sorted_too() {
        let items = sample();
        let visible = [false, false, true, false];
        let order = sort_indices(&items, &visible, SortKey::PriceAsc);
        assert_eq!(order, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_sorting_twice_is_stable() {
        let items = sample();
        let visible = [true, false, true, true];
        for key in SortKey::ALL {
            let once = sort_indices(&items, &visible, key);
            let resorted: Vec<CatalogItem> = once.iter().map(|&i| items[i].clone()).collect();
            let resorted_visible: Vec<bool> = once.iter().map(|&i| visible[i]).collect();
            let twice = sort_indices(&resorted, &resorted_visible, key);
            assert_eq!(twice, (0..items.len()).collect::<Vec<_>>(), "{}", key);
        }
    }

    #[test]
    fn test_missing_visibility_counts_as_hidden() {
        let items = sample();
        let order = sort_indices(&items, &[false, true], SortKey::Default);
        assert_eq!(order, vec![1, 0, 2, 3]);
    }
}
