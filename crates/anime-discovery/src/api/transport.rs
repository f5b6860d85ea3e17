//! HTTP transport used by the fetcher.
//!
//! The trait is the seam between the pipeline and the network; the real
//! implementation wraps a `reqwest::Client`.

use crate::error::DiscoveryError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Raw response from a single GET request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DiscoveryError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Something that can perform a GET request.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request. Non-OK statuses are returned as responses,
    /// only network-level failures are errors.
    async fn get(&self, url: &str) -> Result<HttpResponse, DiscoveryError>;
}

/// Transport backed by reqwest
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport. Without a timeout the client default applies.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, DiscoveryError> {
        let mut builder = Client::builder().user_agent(user_agent.to_string());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| DiscoveryError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, DiscoveryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Message {
        message: String,
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new("anime-discovery-test", None).is_ok());
        assert!(ReqwestTransport::new("anime-discovery-test", Some(Duration::from_secs(5))).is_ok());
    }

    #[test]
    fn test_response_status_and_json() {
        let response = HttpResponse::new(429, r#"{"message":"Too many requests"}"#);
        assert!(!response.is_success());
        let body: Message = response.json().unwrap();
        assert_eq!(body.message, "Too many requests");

        let bad = HttpResponse::new(200, "<html>");
        assert!(matches!(bad.json::<Message>(), Err(DiscoveryError::Parse(_))));
    }
}
