//! Client-side filtering of fetched catalog items.
//!
//! Applies the predicates the search endpoint cannot express: episode
//! bounds, tag exclusions, studio/producer substrings, multiple types and
//! strict/loose tag inclusion across the three categories.

use crate::criteria::FilterCriteria;
use shared::{CatalogItem, TagCategory};
use std::collections::BTreeSet;
use tracing::debug;

/// Number of included ids present on the item
pub fn match_count(tags: &BTreeSet<u32>, include: &BTreeSet<u32>) -> usize {
    include.iter().filter(|id| tags.contains(id)).count()
}

/// Whether a category's matches satisfy the mode: strict needs all, loose any
pub fn category_satisfied(matches: usize, include_len: usize, strict: bool) -> bool {
    if strict {
        matches == include_len
    } else {
        matches > 0
    }
}

/// Keep only the items that pass every client-side predicate
pub fn apply(items: Vec<CatalogItem>, criteria: &FilterCriteria) -> Vec<CatalogItem> {
    let before = items.len();
    let kept: Vec<CatalogItem> = items
        .into_iter()
        .filter(|item| matches(item, criteria))
        .collect();

    debug!(before = before, after = kept.len(), "Applied client-side filters");
    kept
}

/// Whether a single item passes every client-side predicate
pub fn matches(item: &CatalogItem, criteria: &FilterCriteria) -> bool {
    type_allowed(item, criteria)
        && episodes_in_range(item, criteria)
        && !has_excluded_tag(item, criteria)
        && names_match(&item.studios, &criteria.studios)
        && names_match(&item.producers, &criteria.producers)
        && inclusion_satisfied(item, criteria)
}

fn type_allowed(item: &CatalogItem, criteria: &FilterCriteria) -> bool {
    if criteria.types.is_empty() {
        return true;
    }
    match &item.item_type {
        Some(item_type) => criteria
            .types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(item_type)),
        None => false,
    }
}

fn episodes_in_range(item: &CatalogItem, criteria: &FilterCriteria) -> bool {
    if !criteria.has_episode_bounds() {
        return true;
    }
    let Some(episodes) = item.episodes else {
        return false;
    };
    criteria.min_episodes.map_or(true, |min| episodes >= min)
        && criteria.max_episodes.map_or(true, |max| episodes <= max)
}

fn has_excluded_tag(item: &CatalogItem, criteria: &FilterCriteria) -> bool {
    TagCategory::ALL.iter().any(|&category| {
        let tags = item.tags(category);
        criteria
            .category(category)
            .excluded()
            .iter()
            .any(|id| tags.contains(id))
    })
}

/// Any needle is a substring of any name, case-insensitively
pub fn names_match(names: &[String], needles: &[String]) -> bool {
    if needles.is_empty() {
        return true;
    }
    names.iter().any(|name| {
        let name = name.to_lowercase();
        needles.iter().any(|needle| name.contains(needle.as_str()))
    })
}

/// Strict: every non-empty category fully matched. Loose: at least one
/// non-empty category partially matched.
fn inclusion_satisfied(item: &CatalogItem, criteria: &FilterCriteria) -> bool {
    let mut active = TagCategory::ALL
        .iter()
        .map(|&category| (item.tags(category), criteria.category(category).included()))
        .filter(|(_, include)| !include.is_empty())
        .peekable();

    if active.peek().is_none() {
        return true;
    }

    let mut satisfied = active.map(|(tags, include)| {
        category_satisfied(match_count(tags, include), include.len(), criteria.strict_mode)
    });

    if criteria.strict_mode {
        satisfied.all(|ok| ok)
    } else {
        satisfied.any(|ok| ok)
    }
}
