//! Paginated retrieval from the catalog search endpoint.
//!
//! Translates the natively supported part of `FilterCriteria` into query
//! parameters, then walks pages until the catalog runs out, the server
//! rate-limits us, or the run's call budget is spent.

use crate::api::{CallBudget, JikanClient};
use crate::criteria::FilterCriteria;
use crate::error::{Advisory, DiscoveryError};
use shared::{CatalogItem, TagCategory};
use std::collections::HashSet;
use tracing::{info, warn};

/// Query parameters understood by the remote search endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    params: Vec<(&'static str, String)>,
}

impl CatalogQuery {
    /// Build the base query for a run.
    ///
    /// Strict mode sends every included tag as one AND filter. Loose mode
    /// sends at most one tag per category since the endpoint cannot OR.
    pub fn from_criteria(criteria: &FilterCriteria, page_size: u32) -> Self {
        let mut params = Vec::new();

        if criteria.types.len() == 1 {
            if let Some(item_type) = criteria.types.iter().next() {
                params.push(("type", item_type.to_lowercase()));
            }
        }

        if let Some(min) = criteria.min_score {
            params.push(("min_score", min.to_string()));
        }
        if let Some(max) = criteria.max_score {
            params.push(("max_score", max.to_string()));
        }

        if let Some((start, end)) = criteria.year_range() {
            params.push(("start_date", format!("{:04}-01-01", start)));
            params.push(("end_date", format!("{:04}-12-31", end)));
        }

        let tags: Vec<String> = TagCategory::ALL
            .iter()
            .flat_map(|&category| {
                let included = criteria.category(category).included().iter();
                let take = if criteria.strict_mode { usize::MAX } else { 1 };
                included.take(take).map(|id| id.to_string())
            })
            .collect();
        if !tags.is_empty() {
            params.push(("genres", tags.join(",")));
        }

        params.push(("limit", page_size.to_string()));

        Self { params }
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Items gathered by the pager plus any reason they may be incomplete
#[derive(Debug, Clone, Default)]
pub struct PagerOutcome {
    pub items: Vec<CatalogItem>,
    pub pages_fetched: u32,
    pub advisory: Option<Advisory>,
}

/// Drives pagination over the catalog search endpoint
pub struct CatalogPager {
    client: JikanClient,
    page_size: u32,
}

impl CatalogPager {
    pub fn new(client: JikanClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Fetch every page the budget allows.
    ///
    /// Fails only when nothing was fetched: with `BudgetExhausted` if the
    /// budget ran out, with `CatalogFetch` for any other non-429 failure.
    pub async fn fetch_all(
        &self,
        budget: &mut CallBudget,
        criteria: &FilterCriteria,
    ) -> Result<PagerOutcome, DiscoveryError> {
        let query = CatalogQuery::from_criteria(criteria, self.page_size);
        let mut outcome = PagerOutcome::default();
        let mut seen = HashSet::new();
        let mut page = 1;

        loop {
            match self.client.search_anime(budget, query.params(), page).await {
                Ok(response) => {
                    outcome.pages_fetched += 1;
                    let fetched = response.data.len();
                    outcome.items.extend(
                        response
                            .data
                            .into_iter()
                            .filter(|entry| seen.insert(entry.mal_id))
                            .map(CatalogItem::from),
                    );

                    info!(
                        page = page,
                        fetched = fetched,
                        total = outcome.items.len(),
                        "Fetched catalog page"
                    );

                    if !response.pagination.has_next_page {
                        break;
                    }
                    page += 1;
                }
                Err(err @ DiscoveryError::RateLimited { .. }) => {
                    warn!(
                        page = page,
                        kept = outcome.items.len(),
                        "Rate limited during pagination, results may be incomplete"
                    );
                    outcome.advisory = err.to_advisory();
                    break;
                }
                Err(err @ DiscoveryError::BudgetExhausted { .. }) => {
                    if outcome.items.is_empty() {
                        return Err(err);
                    }
                    warn!(
                        page = page,
                        kept = outcome.items.len(),
                        "Call budget exhausted during pagination, keeping partial results"
                    );
                    outcome.advisory = err.to_advisory();
                    break;
                }
                Err(err) => {
                    if outcome.items.is_empty() {
                        return Err(into_catalog_fetch_error(err));
                    }
                    warn!(
                        page = page,
                        kept = outcome.items.len(),
                        error = %err,
                        "Catalog fetch failed mid-pagination, keeping partial results"
                    );
                    outcome.advisory = Some(Advisory::PartialFailure {
                        message: err.to_string(),
                    });
                    break;
                }
            }
        }

        Ok(outcome)
    }
}

fn into_catalog_fetch_error(err: DiscoveryError) -> DiscoveryError {
    match err {
        DiscoveryError::Api { status, message } => DiscoveryError::CatalogFetch { status, message },
        DiscoveryError::Transport(message) | DiscoveryError::Parse(message) => {
            DiscoveryError::CatalogFetch { status: 0, message }
        }
        other => other,
    }
}
