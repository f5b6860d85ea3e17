mod common;

use anime_discovery::{CacheManager, HttpResponse, OptionKind, OptionsCatalog};
use common::*;
use serde_json::json;
use tempfile::TempDir;

fn genre_list() -> HttpResponse {
    let body = json!({
        "data": [
            { "mal_id": 4, "name": "Comedy", "url": "", "count": 7000 },
            { "mal_id": 1, "name": "Action", "url": "", "count": 5000 },
            { "mal_id": 8, "name": "Drama", "url": "", "count": 3000 }
        ]
    });
    HttpResponse::new(200, body.to_string())
}

#[tokio::test]
async fn test_option_list_is_cached_after_first_fetch() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(|_| Ok(genre_list()));
    let cache = CacheManager::new(dir.path(), true).unwrap();
    let catalog = OptionsCatalog::new(client(transport.clone()), cache);

    let first = catalog.list(OptionKind::Genres, false).await.unwrap();
    let names: Vec<_> = first.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Action", "Comedy", "Drama"]);
    assert!(dir.path().join("options_genres.json").exists());

    let second = catalog.list(OptionKind::Genres, false).await.unwrap();
    assert_eq!(second.len(), 3);
    assert_eq!(transport.request_count(), 1);

    catalog.list(OptionKind::Genres, true).await.unwrap();
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_option_kinds_use_the_filter_parameter() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(|_| Ok(genre_list()));
    let cache = CacheManager::new(dir.path(), true).unwrap();
    let catalog = OptionsCatalog::new(client(transport.clone()), cache);

    catalog.list(OptionKind::Themes, false).await.unwrap();
    catalog.list(OptionKind::Genres, false).await.unwrap();

    let requests = transport.requests();
    assert_eq!(param_of(&requests[0], "filter").as_deref(), Some("themes"));
    assert_eq!(param_of(&requests[1], "filter"), None);
}

#[tokio::test]
async fn test_disabled_cache_always_fetches() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(|_| Ok(genre_list()));
    let cache = CacheManager::new(dir.path().join("unused"), false).unwrap();
    let catalog = OptionsCatalog::new(client(transport.clone()), cache);

    catalog.list(OptionKind::Demographics, false).await.unwrap();
    catalog.list(OptionKind::Demographics, false).await.unwrap();
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new(|_| Ok(error_response(500, "Internal Server Error")));
    let cache = CacheManager::new(dir.path(), true).unwrap();
    let catalog = OptionsCatalog::new(client(transport), cache);

    assert!(catalog.list(OptionKind::Genres, false).await.is_err());
    assert!(!dir.path().join("options_genres.json").exists());
}
