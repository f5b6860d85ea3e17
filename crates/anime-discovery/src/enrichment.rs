//! Staff and voice-actor filtering.
//!
//! Each candidate costs one extra remote call, so this is the stage that
//! usually runs into the call budget. Items are checked strictly in order;
//! once the budget gets too low the loop stops and only the items already
//! confirmed are kept.

use crate::api::{CallBudget, JikanClient};
use crate::error::{Advisory, DiscoveryError};
use crate::filter::names_match;
use shared::CatalogItem;
use tracing::{debug, info, warn};

const JAPANESE: &str = "Japanese";

/// Which credits a pass looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffStage {
    Director,
    VoiceActor,
}

impl StaffStage {
    pub fn as_str(&self) -> &str {
        match self {
            StaffStage::Director => "director",
            StaffStage::VoiceActor => "seiyuu",
        }
    }
}

/// Result of one enrichment pass
#[derive(Debug, Clone, Default)]
pub struct EnrichmentOutcome {
    pub items: Vec<CatalogItem>,
    /// Candidates whose credits were looked up (successfully or not)
    pub checked: usize,
    pub advisories: Vec<Advisory>,
}

/// Filters candidates by credited staff names
#[derive(Clone)]
pub struct StaffEnrichmentFilter {
    client: JikanClient,
}

impl StaffEnrichmentFilter {
    pub fn new(client: JikanClient) -> Self {
        Self { client }
    }

    /// Keep items whose director credits contain any needle.
    ///
    /// Stops once `reserve` or fewer calls remain in the budget.
    pub async fn filter_by_director(
        &self,
        budget: &mut CallBudget,
        items: Vec<CatalogItem>,
        needles: &[String],
        reserve: u32,
    ) -> EnrichmentOutcome {
        self.filter_by_credits(StaffStage::Director, budget, items, needles, reserve)
            .await
    }

    /// Keep items whose Japanese voice actors contain any needle.
    ///
    /// Stops once `reserve` or fewer calls remain in the budget.
    pub async fn filter_by_voice_actor(
        &self,
        budget: &mut CallBudget,
        items: Vec<CatalogItem>,
        needles: &[String],
        reserve: u32,
    ) -> EnrichmentOutcome {
        self.filter_by_credits(StaffStage::VoiceActor, budget, items, needles, reserve)
            .await
    }

    async fn credited_names(
        &self,
        stage: StaffStage,
        budget: &mut CallBudget,
        mal_id: u32,
    ) -> Result<Vec<String>, DiscoveryError> {
        match stage {
            StaffStage::Director => {
                let staff = self.client.anime_staff(budget, mal_id).await?;
                Ok(staff
                    .into_iter()
                    .filter(|entry| entry.is_director())
                    .map(|entry| entry.person.name)
                    .collect())
            }
            StaffStage::VoiceActor => {
                let characters = self.client.anime_characters(budget, mal_id).await?;
                Ok(characters
                    .into_iter()
                    .flat_map(|entry| entry.voice_actors)
                    .filter(|va| va.language == JAPANESE)
                    .map(|va| va.person.name)
                    .collect())
            }
        }
    }

    async fn filter_by_credits(
        &self,
        stage: StaffStage,
        budget: &mut CallBudget,
        items: Vec<CatalogItem>,
        needles: &[String],
        reserve: u32,
    ) -> EnrichmentOutcome {
        let total = items.len();
        if needles.is_empty() || items.is_empty() {
            return EnrichmentOutcome {
                items,
                ..Default::default()
            };
        }

        info!(
            stage = stage.as_str(),
            candidates = total,
            remaining_calls = budget.remaining(),
            "Starting credit enrichment"
        );

        let mut outcome = EnrichmentOutcome::default();
        let mut stopped_early = false;

        for item in items {
            if budget.remaining() <= reserve {
                debug!(
                    stage = stage.as_str(),
                    remaining_calls = budget.remaining(),
                    reserve = reserve,
                    "Stopping enrichment to stay within call budget"
                );
                stopped_early = true;
                break;
            }

            match self.credited_names(stage, budget, item.mal_id).await {
                Ok(names) => {
                    outcome.checked += 1;
                    if names_match(&names, needles) {
                        outcome.items.push(item);
                    }
                }
                Err(err) if err.is_soft() => {
                    warn!(
                        stage = stage.as_str(),
                        mal_id = item.mal_id,
                        error = %err,
                        "Stopping enrichment early"
                    );
                    outcome.advisories.extend(err.to_advisory());
                    stopped_early = true;
                    break;
                }
                Err(err) => {
                    outcome.checked += 1;
                    let err = DiscoveryError::EnrichmentFetch {
                        mal_id: item.mal_id,
                        message: err.to_string(),
                    };
                    warn!(stage = stage.as_str(), error = %err, "Skipping item");
                }
            }
        }

        if stopped_early {
            outcome.advisories.push(Advisory::EnrichmentTruncated {
                stage: stage.as_str().to_string(),
                checked: outcome.checked,
                total,
            });
        }

        info!(
            stage = stage.as_str(),
            checked = outcome.checked,
            kept = outcome.items.len(),
            calls_made = budget.calls_made(),
            "Credit enrichment complete"
        );

        outcome
    }
}
