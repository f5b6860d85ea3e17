//! Anime discovery library.
//!
//! Finds anime on MyAnimeList (through the Jikan API v4) matching filter
//! combinations the search endpoint cannot express on its own. A discovery
//! run pages through the catalog under a fixed call budget, filters
//! client-side, optionally checks staff credits, then ranks and sorts the
//! survivors.

pub mod api;
pub mod cache;
pub mod criteria;
pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod filter;
pub mod options;
pub mod pager;
pub mod relevance;
pub mod sorter;

pub use api::{CallBudget, HttpResponse, HttpTransport, JikanClient, RateLimitedFetcher};
pub use cache::CacheManager;
pub use criteria::{CategoryFilter, FilterCriteria, FilterCriteriaBuilder, Toggle};
pub use discovery::{DiscoveryService, ListPage, RandomPick};
pub use enrichment::{EnrichmentOutcome, StaffEnrichmentFilter, StaffStage};
pub use error::{Advisory, DiscoveryError};
pub use options::{OptionKind, OptionsCatalog};
pub use pager::{CatalogPager, CatalogQuery, PagerOutcome};
pub use sorter::SortKey;
