//! Stable ordering of scored results.
//!
//! Ties on the primary key always fall back to ascending case-insensitive
//! title order, whatever the primary direction.

use crate::error::DiscoveryError;
use serde::{Deserialize, Serialize};
use shared::ScoredItem;
use std::cmp::Ordering;
use std::str::FromStr;

/// Primary sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    Score,
    StartDate,
    #[default]
    RelevanceScore,
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Title => "title",
            SortKey::Score => "score",
            SortKey::StartDate => "start_date",
            SortKey::RelevanceScore => "relevance_score",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortKey::Title),
            "score" => Ok(SortKey::Score),
            "start_date" => Ok(SortKey::StartDate),
            "relevance_score" | "relevance" => Ok(SortKey::RelevanceScore),
            _ => Err(DiscoveryError::InvalidSortKey(s.to_string())),
        }
    }
}

fn title_key(item: &ScoredItem) -> String {
    item.item.title.to_lowercase()
}

fn compare_primary(a: &ScoredItem, b: &ScoredItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => title_key(a).cmp(&title_key(b)),
        SortKey::Score => a
            .item
            .score
            .unwrap_or(0.0)
            .total_cmp(&b.item.score.unwrap_or(0.0)),
        SortKey::StartDate => a.item.start_date().cmp(&b.item.start_date()),
        SortKey::RelevanceScore => a.relevance_score.cmp(&b.relevance_score),
    }
}

/// Sort items by `key`; stable, and idempotent for a given key and direction
pub fn sort_items(mut items: Vec<ScoredItem>, key: SortKey, ascending: bool) -> Vec<ScoredItem> {
    items.sort_by(|a, b| {
        let primary = compare_primary(a, b, key);
        let primary = if ascending { primary } else { primary.reverse() };
        primary.then_with(|| title_key(a).cmp(&title_key(b)))
    });
    items
}
