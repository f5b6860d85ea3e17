//! Jikan API v4 access layer.
//!
//! This module provides the HTTP transport seam, the budgeted and throttled
//! fetcher every remote call goes through, and a typed client for the
//! endpoints the discovery pipeline uses.

pub mod client;
pub mod fetcher;
pub mod transport;
pub mod types;

pub use client::JikanClient;
pub use fetcher::{CallBudget, RateLimitedFetcher};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use types::*;
