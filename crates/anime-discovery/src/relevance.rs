//! Relevance scoring over the surviving result set.

use crate::criteria::FilterCriteria;
use crate::filter::{category_satisfied, match_count};
use shared::{CatalogItem, ScoredItem, TagCategory};

/// Bonus for two matched categories
pub const TWO_CATEGORY_BONUS: i64 = 2000;
/// Bonus for all three matched categories
pub const THREE_CATEGORY_BONUS: i64 = 5000;

/// Base bonus and per-match weight for a category
pub fn category_weights(category: TagCategory) -> (i64, i64) {
    match category {
        TagCategory::Genre => (1000, 10),
        TagCategory::Theme => (500, 5),
        TagCategory::Demographic => (300, 3),
    }
}

/// Score one item against the criteria's include sets.
///
/// In loose mode a category scores whenever it matched at all, even if the
/// item passed the filter because of a different category.
pub fn score(item: &CatalogItem, criteria: &FilterCriteria) -> i64 {
    let mut total = 0;
    let mut matched_categories = 0;

    for category in TagCategory::ALL {
        let include = criteria.category(category).included();
        if include.is_empty() {
            continue;
        }

        let matches = match_count(item.tags(category), include);
        if category_satisfied(matches, include.len(), criteria.strict_mode) {
            let (base, weight) = category_weights(category);
            total += base + matches as i64 * weight;
            matched_categories += 1;
        }
    }

    total
        + match matched_categories {
            2 => TWO_CATEGORY_BONUS,
            3 => THREE_CATEGORY_BONUS,
            _ => 0,
        }
}

/// Score every item once for the run
pub fn score_all(items: Vec<CatalogItem>, criteria: &FilterCriteria) -> Vec<ScoredItem> {
    items
        .into_iter()
        .map(|item| {
            let relevance = score(&item, criteria);
            ScoredItem::new(item, relevance)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(genres: &[u32], themes: &[u32], demographics: &[u32]) -> CatalogItem {
        CatalogItem {
            mal_id: 1,
            title: "Test".to_string(),
            genres: genres.iter().copied().collect(),
            themes: themes.iter().copied().collect(),
            demographics: demographics.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn criteria(strict: bool) -> FilterCriteria {
        FilterCriteria::builder()
            .strict(strict)
            .include(TagCategory::Genre, 1)
            .include(TagCategory::Genre, 2)
            .include(TagCategory::Theme, 38)
            .include(TagCategory::Theme, 50)
            .include(TagCategory::Demographic, 27)
            .build()
            .unwrap()
    }

    #[test]
    fn test_loose_full_match_formula() {
        let item = item(&[1, 2], &[38, 50], &[27]);
        let (gm, tm, dm) = (2, 2, 1);
        assert_eq!(
            score(&item, &criteria(false)),
            1000 + 500 + 300 + 10 * gm + 5 * tm + 3 * dm + 5000
        );
    }

    #[test]
    fn test_single_category_gets_no_cross_bonus() {
        let item = item(&[1], &[], &[]);
        assert_eq!(score(&item, &criteria(false)), 1000 + 10);
    }

    #[test]
    fn test_two_categories_bonus() {
        let item = item(&[2], &[], &[27]);
        assert_eq!(score(&item, &criteria(false)), 1000 + 10 + 300 + 3 + 2000);
    }

    #[test]
    fn test_strict_partial_category_does_not_count() {
        // Genres fully matched, themes only half matched
        let item = item(&[1, 2], &[38], &[27]);
        assert_eq!(
            score(&item, &criteria(true)),
            1000 + 20 + 300 + 3 + 2000
        );
    }

    #[test]
    fn test_no_include_sets_scores_zero() {
        let item = item(&[1, 2], &[38], &[27]);
        assert_eq!(score(&item, &FilterCriteria::default()), 0);
    }

    #[test]
    fn test_loose_scores_categories_that_did_not_decide_the_filter() {
        // Documented quirk: the theme match scores even though the genre
        // match alone was enough to pass the loose filter.
        let criteria = FilterCriteria::builder()
            .include(TagCategory::Genre, 1)
            .include(TagCategory::Theme, 38)
            .build()
            .unwrap();
        let item = item(&[1], &[38], &[]);

        assert!(crate::filter::matches(&item, &criteria));
        assert_eq!(score(&item, &criteria), 1000 + 10 + 500 + 5 + 2000);
    }

    #[test]
    fn test_score_all_preserves_order() {
        let items = vec![item(&[1], &[], &[]), item(&[], &[], &[])];
        let scored = score_all(items, &criteria(false));
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].relevance_score, 1010);
        assert_eq!(scored[1].relevance_score, 0);
    }
}
