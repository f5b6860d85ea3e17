//! Static option lists (genres, themes, demographics).
//!
//! These lists supply the identifiers used in `FilterCriteria`. They are
//! fetched once and served from the on-disk cache afterwards.

use crate::api::{CallBudget, CategoryItem, JikanClient};
use crate::cache::CacheManager;
use anyhow::{Context, Result};
use std::str::FromStr;
use tracing::info;

/// Kind of option list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Genres,
    ExplicitGenres,
    Themes,
    Demographics,
}

impl OptionKind {
    pub const ALL: [OptionKind; 4] = [
        OptionKind::Genres,
        OptionKind::ExplicitGenres,
        OptionKind::Themes,
        OptionKind::Demographics,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OptionKind::Genres => "genres",
            OptionKind::ExplicitGenres => "explicit_genres",
            OptionKind::Themes => "themes",
            OptionKind::Demographics => "demographics",
        }
    }

    /// `filter` query value of the genre endpoint
    fn endpoint_filter(&self) -> Option<&str> {
        match self {
            OptionKind::Genres => None,
            other => Some(other.as_str()),
        }
    }
}

impl FromStr for OptionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown option list: {}", s))
    }
}

/// Option lists backed by the cache
pub struct OptionsCatalog {
    client: JikanClient,
    cache: CacheManager,
}

impl OptionsCatalog {
    pub fn new(client: JikanClient, cache: CacheManager) -> Self {
        Self { client, cache }
    }

    /// Get an option list, fetching it when missing or when `refresh` is set
    pub async fn list(&self, kind: OptionKind, refresh: bool) -> Result<Vec<CategoryItem>> {
        let cache_key = format!("options_{}", kind.as_str());

        if refresh {
            self.cache.invalidate(&cache_key)?;
        } else if let Some(cached) = self.cache.get(&cache_key)? {
            return Ok(cached);
        }

        // One call per list, independent of any discovery run
        let mut budget = CallBudget::new(1);
        let mut items = self
            .client
            .genre_options(&mut budget, kind.endpoint_filter())
            .await
            .with_context(|| format!("Failed to fetch {} list", kind.as_str()))?;
        items.sort_by(|a, b| a.name.cmp(&b.name));

        self.cache.set(&cache_key, &items)?;
        info!(kind = kind.as_str(), count = items.len(), "Fetched option list");

        Ok(items)
    }
}
