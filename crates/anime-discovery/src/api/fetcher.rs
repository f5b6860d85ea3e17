//! Budgeted, throttled fetcher.
//!
//! Every remote call made during a discovery run goes through
//! `RateLimitedFetcher::fetch`, which waits a fixed delay before each
//! request and refuses to issue more than the run's `CallBudget` allows.

use super::transport::{HttpResponse, HttpTransport};
use crate::error::DiscoveryError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Per-run call counter with a hard ceiling.
///
/// Only the fetcher increments it; stages read it to decide whether
/// remaining work is worth starting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallBudget {
    calls_made: u32,
    max_calls: u32,
}

impl CallBudget {
    /// Fresh budget for a new run
    pub fn new(max_calls: u32) -> Self {
        Self {
            calls_made: 0,
            max_calls,
        }
    }

    /// Budget that has already spent `calls_made` calls
    pub fn with_calls_made(max_calls: u32, calls_made: u32) -> Self {
        Self {
            calls_made: calls_made.min(max_calls),
            max_calls,
        }
    }

    pub fn calls_made(&self) -> u32 {
        self.calls_made
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    pub fn remaining(&self) -> u32 {
        self.max_calls.saturating_sub(self.calls_made)
    }

    pub fn is_exhausted(&self) -> bool {
        self.calls_made >= self.max_calls
    }

    fn record_call(&mut self) {
        self.calls_made += 1;
    }

    fn exhausted_error(&self) -> DiscoveryError {
        DiscoveryError::BudgetExhausted {
            calls_made: self.calls_made,
            max_calls: self.max_calls,
        }
    }
}

/// Fetcher with a fixed inter-call delay and a per-run call ceiling
#[derive(Clone)]
pub struct RateLimitedFetcher {
    transport: Arc<dyn HttpTransport>,
    delay: Duration,
}

impl RateLimitedFetcher {
    /// Create a new fetcher
    pub fn new(transport: Arc<dyn HttpTransport>, delay: Duration) -> Self {
        Self { transport, delay }
    }

    /// Fetch a URL, spending one call from `budget`.
    ///
    /// Fails with `BudgetExhausted` without touching the network once the
    /// budget is spent. The call is counted whether or not it succeeds.
    pub async fn fetch(
        &self,
        budget: &mut CallBudget,
        url: &str,
    ) -> Result<HttpResponse, DiscoveryError> {
        if budget.is_exhausted() {
            debug!(
                url = %url,
                calls_made = budget.calls_made(),
                max_calls = budget.max_calls(),
                "Call budget exhausted, skipping request"
            );
            return Err(budget.exhausted_error());
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        debug!(
            url = %url,
            call = budget.calls_made() + 1,
            max_calls = budget.max_calls(),
            "Making API request"
        );

        let result = self.transport.get(url).await;
        budget.record_call();

        result
    }
}
