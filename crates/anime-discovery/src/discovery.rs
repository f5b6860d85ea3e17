//! Discovery orchestration.
//!
//! Composes pagination, client-side filtering, credit enrichment, scoring
//! and sorting into the two user-facing operations. Every operation starts
//! with a fresh call budget.

use crate::api::{CallBudget, HttpTransport, JikanClient, RateLimitedFetcher, ReqwestTransport};
use crate::criteria::FilterCriteria;
use crate::enrichment::StaffEnrichmentFilter;
use crate::error::{Advisory, DiscoveryError};
use crate::filter;
use crate::pager::CatalogPager;
use crate::relevance;
use crate::sorter::{self, SortKey};
use rand::Rng;
use serde::Serialize;
use shared::config::DiscoveryConfig;
use shared::{CatalogItem, ScoredItem};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A single randomly chosen match
#[derive(Debug, Clone, Serialize)]
pub struct RandomPick {
    pub item: CatalogItem,
    /// Size of the pool the pick was drawn from
    pub candidates: usize,
    pub calls_made: u32,
    pub advisories: Vec<Advisory>,
}

/// One page of the ranked result list
#[derive(Debug, Clone, Serialize)]
pub struct ListPage {
    pub items: Vec<ScoredItem>,
    /// Size of the full sorted set
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub sort_key: SortKey,
    pub ascending: bool,
    pub calls_made: u32,
    pub advisories: Vec<Advisory>,
}

impl ListPage {
    pub fn is_partial(&self) -> bool {
        !self.advisories.is_empty()
    }
}

struct PipelineOutput {
    items: Vec<CatalogItem>,
    advisories: Vec<Advisory>,
}

/// Entry point for discovery runs
pub struct DiscoveryService {
    pager: CatalogPager,
    enrichment: StaffEnrichmentFilter,
    max_calls: u32,
    items_per_page: usize,
}

impl DiscoveryService {
    /// Create a service around an existing client
    pub fn new(client: JikanClient, config: &DiscoveryConfig) -> Self {
        Self {
            pager: CatalogPager::new(client.clone(), config.max_results_per_page),
            enrichment: StaffEnrichmentFilter::new(client),
            max_calls: config.max_api_calls_total,
            items_per_page: config.items_per_list_page.max(1),
        }
    }

    /// Create a service that talks to the network through `transport`
    pub fn with_transport(transport: Arc<dyn HttpTransport>, config: &DiscoveryConfig) -> Self {
        let fetcher = RateLimitedFetcher::new(transport, Duration::from_millis(config.api_delay_ms));
        Self::new(JikanClient::new(fetcher, config.base_url.clone()), config)
    }

    /// Create a service backed by reqwest
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let transport = ReqwestTransport::new(
            &config.user_agent,
            config.timeout_secs.map(Duration::from_secs),
        )?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    async fn run_pipeline(
        &self,
        budget: &mut CallBudget,
        criteria: &FilterCriteria,
    ) -> Result<PipelineOutput, DiscoveryError> {
        let mut advisories = Vec::new();

        let fetched = self.pager.fetch_all(budget, criteria).await?;
        advisories.extend(fetched.advisory);

        let mut items = filter::apply(fetched.items, criteria);
        info!(
            fetched_pages = fetched.pages_fetched,
            surviving = items.len(),
            calls_made = budget.calls_made(),
            "Client-side filtering complete"
        );

        if !criteria.directors.is_empty() && !items.is_empty() {
            // Leave a call for the seiyuu pass when it has work to do
            let reserve = if criteria.seiyuus.is_empty() { 0 } else { 1 };
            let outcome = self
                .enrichment
                .filter_by_director(budget, items, &criteria.directors, reserve)
                .await;
            advisories.extend(outcome.advisories);
            items = outcome.items;
        }

        if !criteria.seiyuus.is_empty() && !items.is_empty() {
            let outcome = self
                .enrichment
                .filter_by_voice_actor(budget, items, &criteria.seiyuus, 0)
                .await;
            advisories.extend(outcome.advisories);
            items = outcome.items;
        }

        for advisory in &advisories {
            warn!(advisory = %advisory, "Results may be incomplete");
        }

        Ok(PipelineOutput { items, advisories })
    }

    /// Pick one matching anime uniformly at random
    pub async fn pick_random(&self, criteria: &FilterCriteria) -> Result<RandomPick, DiscoveryError> {
        let mut budget = CallBudget::new(self.max_calls);
        let output = self.run_pipeline(&mut budget, criteria).await?;

        if output.items.is_empty() {
            return Err(DiscoveryError::NoMatch {
                advisories: output.advisories,
            });
        }

        let candidates = output.items.len();
        let index = rand::rng().random_range(0..candidates);
        let mut items = output.items;
        let item = items.swap_remove(index);

        info!(
            mal_id = item.mal_id,
            title = %item.title,
            candidates = candidates,
            calls_made = budget.calls_made(),
            "Picked random anime"
        );

        Ok(RandomPick {
            item,
            candidates,
            calls_made: budget.calls_made(),
            advisories: output.advisories,
        })
    }

    /// Rank every match and return one page of the sorted list.
    ///
    /// `page` is 1-based; pages past the end are empty.
    pub async fn list_all(
        &self,
        criteria: &FilterCriteria,
        sort_key: SortKey,
        ascending: bool,
        page: usize,
    ) -> Result<ListPage, DiscoveryError> {
        let mut budget = CallBudget::new(self.max_calls);
        let output = self.run_pipeline(&mut budget, criteria).await?;

        let scored = relevance::score_all(output.items, criteria);
        let sorted = sorter::sort_items(scored, sort_key, ascending);

        let total = sorted.len();
        let total_pages = total.div_ceil(self.items_per_page);
        let page = page.max(1);
        // Offsets that overflow are past the end anyway
        let offset = (page - 1).saturating_mul(self.items_per_page);
        let items: Vec<ScoredItem> = sorted
            .into_iter()
            .skip(offset)
            .take(self.items_per_page)
            .collect();

        info!(
            total = total,
            page = page,
            total_pages = total_pages,
            sort_key = %sort_key,
            ascending = ascending,
            calls_made = budget.calls_made(),
            "Ranked discovery list ready"
        );

        Ok(ListPage {
            items,
            total,
            page,
            total_pages,
            sort_key,
            ascending,
            calls_made: budget.calls_made(),
            advisories: output.advisories,
        })
    }
}
