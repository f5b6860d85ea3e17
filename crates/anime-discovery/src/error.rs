//! Error taxonomy for the discovery pipeline.
//!
//! Fatal failures are `DiscoveryError` values. Soft failures that only
//! degrade a run to partial results are reported as `Advisory` values
//! carried on the run outcome.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during a discovery run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The per-run call budget is spent; no request was attempted.
    #[error("API call budget exhausted ({calls_made}/{max_calls} calls used)")]
    BudgetExhausted { calls_made: u32, max_calls: u32 },

    /// The remote API answered with HTTP 429.
    #[error("Rate limited by the catalog API: {message}")]
    RateLimited { message: String },

    /// Primary pagination failed before any item was fetched.
    #[error("Catalog fetch failed: {status} - {message}")]
    CatalogFetch { status: u16, message: String },

    /// The filtered result set is empty. `advisories` tells a truly empty
    /// match apart from a run cut short before anything was found.
    #[error("No anime matched the selected filters")]
    NoMatch { advisories: Vec<Advisory> },

    /// A per-item staff or character lookup failed.
    #[error("Enrichment fetch failed for anime {mal_id}: {message}")]
    EnrichmentFetch { mal_id: u32, message: String },

    /// The remote API returned a non-OK status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The request could not be sent or the body could not be read.
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// Failed to parse a response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(String),

    #[error("Unknown sort key: {0}")]
    InvalidSortKey(String),
}

impl DiscoveryError {
    /// Soft errors stop further remote work but keep partial results.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            DiscoveryError::BudgetExhausted { .. } | DiscoveryError::RateLimited { .. }
        )
    }

    /// Convert a soft error into the advisory reported to the caller.
    pub fn to_advisory(&self) -> Option<Advisory> {
        match self {
            DiscoveryError::BudgetExhausted { calls_made, .. } => Some(Advisory::BudgetExhausted {
                calls_made: *calls_made,
            }),
            DiscoveryError::RateLimited { message } => Some(Advisory::RateLimited {
                message: message.clone(),
            }),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::Parse(err.to_string())
    }
}

/// Non-fatal notice that a run's results may be incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    RateLimited { message: String },
    BudgetExhausted { calls_made: u32 },
    PartialFailure { message: String },
    EnrichmentTruncated {
        stage: String,
        checked: usize,
        total: usize,
    },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::RateLimited { message } => {
                write!(f, "Rate limited by the catalog API, results may be incomplete ({})", message)
            }
            Advisory::BudgetExhausted { calls_made } => write!(
                f,
                "API call budget exhausted after {} calls, results may be incomplete",
                calls_made
            ),
            Advisory::PartialFailure { message } => {
                write!(f, "Catalog fetch stopped early, results may be incomplete ({})", message)
            }
            Advisory::EnrichmentTruncated {
                stage,
                checked,
                total,
            } => write!(
                f,
                "{} filter checked only {} of {} candidates",
                stage, checked, total
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_classification() {
        assert!(DiscoveryError::BudgetExhausted {
            calls_made: 45,
            max_calls: 45
        }
        .is_soft());
        assert!(DiscoveryError::RateLimited {
            message: "slow down".to_string()
        }
        .is_soft());
        assert!(!DiscoveryError::NoMatch { advisories: Vec::new() }.is_soft());
        assert!(!DiscoveryError::Api {
            status: 500,
            message: "boom".to_string()
        }
        .is_soft());
    }

    #[test]
    fn test_advisory_from_soft_error() {
        let err = DiscoveryError::BudgetExhausted {
            calls_made: 45,
            max_calls: 45,
        };
        assert_eq!(
            err.to_advisory(),
            Some(Advisory::BudgetExhausted { calls_made: 45 })
        );
        assert_eq!(DiscoveryError::NoMatch { advisories: Vec::new() }.to_advisory(), None);
    }
}
