//! Jikan API client on top of the budgeted fetcher.
//!
//! Maps HTTP statuses onto the pipeline's error taxonomy: 429 becomes
//! `RateLimited`, any other non-OK status becomes `Api`. There are no
//! retries; callers decide what a failure means for their stage.

use super::fetcher::{CallBudget, RateLimitedFetcher};
use super::transport::HttpResponse;
use super::types::*;
use crate::error::DiscoveryError;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const RATE_LIMIT_STATUS: u16 = 429;

/// Jikan API v4 client
#[derive(Clone)]
pub struct JikanClient {
    fetcher: RateLimitedFetcher,
    base_url: String,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(fetcher: RateLimitedFetcher, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetcher, base_url }
    }

    /// Build the URL for a page of the anime search endpoint
    pub fn search_url(&self, params: &[(&str, String)], page: u32) -> Result<Url, DiscoveryError> {
        let page = page.to_string();
        let pairs = params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .chain(std::iter::once(("page", page.as_str())));

        Url::parse_with_params(&format!("{}/anime", self.base_url), pairs)
            .map_err(|e| DiscoveryError::Transport(format!("Invalid search URL: {}", e)))
    }

    /// Make a budgeted GET request and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        budget: &mut CallBudget,
        url: &str,
    ) -> Result<T, DiscoveryError> {
        let response = self.fetcher.fetch(budget, url).await?;

        if response.is_success() {
            return response.json::<T>().map_err(|e| {
                warn!(url = %url, error = %e, "Failed to parse response");
                e
            });
        }

        let message = error_message(&response);
        if response.status == RATE_LIMIT_STATUS {
            warn!(url = %url, message = %message, "Rate limited by server");
            return Err(DiscoveryError::RateLimited { message });
        }

        warn!(url = %url, status = response.status, error = %message, "Request failed");
        Err(DiscoveryError::Api {
            status: response.status,
            message,
        })
    }

    /// Fetch one page of anime search results
    pub async fn search_anime(
        &self,
        budget: &mut CallBudget,
        params: &[(&str, String)],
        page: u32,
    ) -> Result<PaginatedResponse<AnimeEntry>, DiscoveryError> {
        let url = self.search_url(params, page)?;
        debug!(page = page, "Fetching catalog page");
        self.get(budget, url.as_str()).await
    }

    /// Fetch staff credits for an anime
    pub async fn anime_staff(
        &self,
        budget: &mut CallBudget,
        mal_id: u32,
    ) -> Result<Vec<StaffEntry>, DiscoveryError> {
        let url = format!("{}/anime/{}/staff", self.base_url, mal_id);
        let response: DataResponse<StaffEntry> = self.get(budget, &url).await?;
        Ok(response.data)
    }

    /// Fetch characters and their voice actors for an anime
    pub async fn anime_characters(
        &self,
        budget: &mut CallBudget,
        mal_id: u32,
    ) -> Result<Vec<CharacterEntry>, DiscoveryError> {
        let url = format!("{}/anime/{}/characters", self.base_url, mal_id);
        let response: DataResponse<CharacterEntry> = self.get(budget, &url).await?;
        Ok(response.data)
    }

    /// Fetch a genre option list (`filter` = themes, demographics, explicit_genres)
    pub async fn genre_options(
        &self,
        budget: &mut CallBudget,
        filter: Option<&str>,
    ) -> Result<Vec<CategoryItem>, DiscoveryError> {
        let url = match filter {
            Some(filter) => format!("{}/genres/anime?filter={}", self.base_url, filter),
            None => format!("{}/genres/anime", self.base_url),
        };
        let response: DataResponse<CategoryItem> = self.get(budget, &url).await?;
        Ok(response.data)
    }
}

/// Extract the `message` field of a JSON error envelope, or the raw body
fn error_message(response: &HttpResponse) -> String {
    match response.json::<JikanError>() {
        Ok(err) => err.message,
        Err(_) if response.body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => response.body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::ReqwestTransport;
    use std::sync::Arc;
    use std::time::Duration;

    fn client() -> JikanClient {
        let transport = ReqwestTransport::new("anime-discovery-test", None).unwrap();
        let fetcher = RateLimitedFetcher::new(Arc::new(transport), Duration::ZERO);
        JikanClient::new(fetcher, "https://api.jikan.moe/v4/")
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let url = client().search_url(&[], 1).unwrap();
        assert_eq!(url.as_str(), "https://api.jikan.moe/v4/anime?page=1");
    }

    #[test]
    fn test_search_url_encodes_params() {
        let params = vec![
            ("type", "tv".to_string()),
            ("genres", "1,2".to_string()),
            ("limit", "25".to_string()),
        ];
        let url = client().search_url(&params, 3).unwrap();

        assert_eq!(url.path(), "/v4/anime");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("type".to_string(), "tv".to_string())));
        assert!(pairs.contains(&("genres".to_string(), "1,2".to_string())));
        assert_eq!(pairs.last(), Some(&("page".to_string(), "3".to_string())));
    }

    #[test]
    fn test_error_message_extraction() {
        let response = HttpResponse::new(429, r#"{"status":429,"type":"RateLimitException","message":"You are being rate-limited."}"#);
        assert_eq!(error_message(&response), "You are being rate-limited.");

        let response = HttpResponse::new(500, "");
        assert_eq!(error_message(&response), "Unknown error");

        let response = HttpResponse::new(502, "Bad Gateway");
        assert_eq!(error_message(&response), "Bad Gateway");
    }
}
