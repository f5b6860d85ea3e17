//! Data models shared across the discovery pipeline.
//!
//! Items are owned transiently by a single discovery run and never persisted.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The three tag categories a catalog item can be classified under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Genre,
    Theme,
    Demographic,
}

impl TagCategory {
    pub const ALL: [TagCategory; 3] = [
        TagCategory::Genre,
        TagCategory::Theme,
        TagCategory::Demographic,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TagCategory::Genre => "genre",
            TagCategory::Theme => "theme",
            TagCategory::Demographic => "demographic",
        }
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anime entry as fetched from the remote catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    pub mal_id: u32,
    pub title: String,
    pub url: Option<String>,

    pub item_type: Option<String>, // TV, Movie, OVA, etc.
    pub episodes: Option<u32>,     // None while unknown or airing
    pub score: Option<f64>,
    pub year: Option<i32>,
    pub aired_from: Option<String>,

    // Tag identifiers
    pub genres: BTreeSet<u32>,
    pub themes: BTreeSet<u32>,
    pub demographics: BTreeSet<u32>,

    // Company names
    pub studios: Vec<String>,
    pub producers: Vec<String>,
}

impl CatalogItem {
    /// Start date used when an item has no parseable air date
    pub fn unknown_start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Tag identifiers for a category
    pub fn tags(&self, category: TagCategory) -> &BTreeSet<u32> {
        match category {
            TagCategory::Genre => &self.genres,
            TagCategory::Theme => &self.themes,
            TagCategory::Demographic => &self.demographics,
        }
    }

    /// Earliest known air date, or 1900-01-01 when missing or invalid
    pub fn start_date(&self) -> NaiveDate {
        self.aired_from
            .as_deref()
            .and_then(parse_air_date)
            .unwrap_or_else(Self::unknown_start_date)
    }
}

/// Parse either an RFC 3339 timestamp or a bare `YYYY-MM-DD` date
fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Catalog item with its relevance score for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub relevance_score: i64,
}

impl ScoredItem {
    pub fn new(item: CatalogItem, relevance_score: i64) -> Self {
        Self {
            item,
            relevance_score,
        }
    }
}
