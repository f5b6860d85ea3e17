//! Test support: a scripted transport and Jikan-shaped fixtures.

#![allow(dead_code)]

use anime_discovery::api::{JikanClient, RateLimitedFetcher};
use anime_discovery::{DiscoveryError, HttpResponse, HttpTransport};
use async_trait::async_trait;
use serde_json::{json, Value};
use shared::config::DiscoveryConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "http://catalog.test/v4";

type Responder = dyn Fn(&str) -> Result<HttpResponse, DiscoveryError> + Send + Sync;

/// Answers every request through a closure and records the URLs it saw
pub struct ScriptedTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&str) -> Result<HttpResponse, DiscoveryError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, DiscoveryError> {
        self.requests.lock().unwrap().push(url.to_string());
        (self.responder)(url)
    }
}

/// Discovery settings with no delay, pointing at the fake catalog
pub fn test_config(max_calls: u32) -> DiscoveryConfig {
    DiscoveryConfig {
        base_url: BASE_URL.to_string(),
        api_delay_ms: 0,
        max_api_calls_total: max_calls,
        ..Default::default()
    }
}

pub fn client(transport: Arc<ScriptedTransport>) -> JikanClient {
    JikanClient::new(RateLimitedFetcher::new(transport, Duration::ZERO), BASE_URL)
}

/// Value of the `page` query parameter, 0 when absent
pub fn page_of(url: &str) -> u32 {
    url.split(&['?', '&'][..])
        .find_map(|pair| pair.strip_prefix("page="))
        .and_then(|page| page.parse().ok())
        .unwrap_or(0)
}

/// Value of any query parameter
pub fn param_of(url: &str, key: &str) -> Option<String> {
    let prefix = format!("{}=", key);
    url.split(&['?', '&'][..])
        .find_map(|pair| pair.strip_prefix(prefix.as_str()).map(str::to_string))
}

/// Numeric id in `/anime/{id}/...`
pub fn anime_id_of(url: &str) -> u32 {
    url.split('/')
        .skip_while(|segment| *segment != "anime")
        .nth(1)
        .and_then(|id| id.parse().ok())
        .unwrap_or(0)
}

pub fn entity(mal_id: u32, name: &str) -> Value {
    json!({ "mal_id": mal_id, "type": "anime", "name": name, "url": "" })
}

/// Minimal anime entry tagged with the given genre ids
pub fn anime(mal_id: u32, title: &str, genres: &[u32]) -> Value {
    json!({
        "mal_id": mal_id,
        "url": format!("https://myanimelist.net/anime/{}", mal_id),
        "title": title,
        "type": "TV",
        "episodes": 12,
        "score": 7.5,
        "year": 2010,
        "aired": { "from": "2010-04-01T00:00:00+00:00", "to": null },
        "studios": [entity(1, "Madhouse")],
        "producers": [entity(2, "Aniplex")],
        "genres": genres.iter().map(|id| entity(*id, "Genre")).collect::<Vec<_>>(),
        "explicit_genres": [],
        "themes": [],
        "demographics": []
    })
}

/// A page of `count` anime with ids starting at `first_id`
pub fn anime_page(first_id: u32, count: u32, genres: &[u32], has_next: bool) -> HttpResponse {
    let data: Vec<Value> = (first_id..first_id + count)
        .map(|id| anime(id, &format!("Anime {:03}", id), genres))
        .collect();
    search_page(data, has_next)
}

pub fn search_page(data: Vec<Value>, has_next: bool) -> HttpResponse {
    let body = json!({
        "data": data,
        "pagination": { "has_next_page": has_next, "last_visible_page": 10, "current_page": 1 }
    });
    HttpResponse::new(200, body.to_string())
}

pub fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = json!({ "status": status, "type": "Exception", "message": message });
    HttpResponse::new(status, body.to_string())
}

/// Staff listing with one person per (name, position)
pub fn staff_response(credits: &[(&str, &str)]) -> HttpResponse {
    let data: Vec<Value> = credits
        .iter()
        .enumerate()
        .map(|(idx, (name, position))| {
            json!({
                "person": { "mal_id": idx + 1, "name": name, "url": "" },
                "positions": [position]
            })
        })
        .collect();
    HttpResponse::new(200, json!({ "data": data }).to_string())
}

/// Character listing with one voice actor per (name, language)
pub fn characters_response(voices: &[(&str, &str)]) -> HttpResponse {
    let data: Vec<Value> = voices
        .iter()
        .enumerate()
        .map(|(idx, (name, language))| {
            json!({
                "character": { "mal_id": idx + 100, "name": "Character" },
                "role": "Main",
                "voice_actors": [
                    { "person": { "mal_id": idx + 1, "name": name, "url": "" }, "language": language }
                ]
            })
        })
        .collect();
    HttpResponse::new(200, json!({ "data": data }).to_string())
}
