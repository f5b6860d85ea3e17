//! Jikan API v4 response types.
//!
//! These types represent the JSON responses from the Jikan API. Fields the
//! pipeline does not need are omitted; optional ones default so that sparse
//! entries still parse.

use serde::{Deserialize, Serialize};
use shared::CatalogItem;

/// Generic pagination wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Simple data wrapper (without pagination)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub has_next_page: bool,
    #[serde(default)]
    pub last_visible_page: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}

/// Genre/Theme/Demographic option item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub mal_id: u32,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub count: u32,
}

/// Anime entry returned by the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeEntry {
    pub mal_id: u32,
    #[serde(default)]
    pub url: Option<String>,
    pub title: String,
    #[serde(rename = "type", default)]
    pub anime_type: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub aired: Option<Aired>,

    #[serde(default)]
    pub producers: Vec<MalEntity>,
    #[serde(default)]
    pub studios: Vec<MalEntity>,

    #[serde(default)]
    pub genres: Vec<MalEntity>,
    #[serde(default)]
    pub explicit_genres: Vec<MalEntity>,
    #[serde(default)]
    pub themes: Vec<MalEntity>,
    #[serde(default)]
    pub demographics: Vec<MalEntity>,
}

/// Aired dates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aired {
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// MAL entity (genre, studio, producer, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    #[serde(rename = "type", default)]
    pub entity_type: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Person credited on an anime (staff member or voice actor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub mal_id: u32,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Entry from `/anime/{id}/staff`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffEntry {
    pub person: Person,
    #[serde(default)]
    pub positions: Vec<String>,
}

impl StaffEntry {
    pub fn is_director(&self) -> bool {
        self.positions
            .iter()
            .any(|position| position.eq_ignore_ascii_case("Director"))
    }
}

/// Entry from `/anime/{id}/characters`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub character: CharacterRef,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub voice_actors: Vec<VoiceActor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRef {
    pub mal_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceActor {
    pub person: Person,
    #[serde(default)]
    pub language: String,
}

/// Error response from Jikan API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanError {
    #[serde(default)]
    pub status: Option<u16>,
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

impl From<AnimeEntry> for CatalogItem {
    fn from(entry: AnimeEntry) -> Self {
        // Explicit genres share the genre id space
        let genres = entry
            .genres
            .iter()
            .chain(entry.explicit_genres.iter())
            .map(|g| g.mal_id)
            .collect();

        CatalogItem {
            mal_id: entry.mal_id,
            title: entry.title,
            url: entry.url,
            item_type: entry.anime_type,
            episodes: entry.episodes,
            score: entry.score,
            year: entry.year,
            aired_from: entry.aired.and_then(|a| a.from),
            genres,
            themes: entry.themes.iter().map(|t| t.mal_id).collect(),
            demographics: entry.demographics.iter().map(|d| d.mal_id).collect(),
            studios: entry.studios.into_iter().map(|s| s.name).collect(),
            producers: entry.producers.into_iter().map(|p| p.name).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anime_entry_to_catalog_item() {
        let json = r#"{
            "mal_id": 5114,
            "url": "https://myanimelist.net/anime/5114",
            "title": "Fullmetal Alchemist: Brotherhood",
            "type": "TV",
            "episodes": 64,
            "score": 9.1,
            "year": 2009,
            "aired": { "from": "2009-04-05T00:00:00+00:00", "to": "2010-07-04T00:00:00+00:00" },
            "studios": [{ "mal_id": 4, "type": "anime", "name": "Bones", "url": "" }],
            "producers": [{ "mal_id": 17, "type": "anime", "name": "Aniplex", "url": "" }],
            "genres": [
                { "mal_id": 1, "type": "anime", "name": "Action", "url": "" },
                { "mal_id": 2, "type": "anime", "name": "Adventure", "url": "" }
            ],
            "explicit_genres": [],
            "themes": [{ "mal_id": 38, "type": "anime", "name": "Military", "url": "" }],
            "demographics": [{ "mal_id": 27, "type": "anime", "name": "Shounen", "url": "" }]
        }"#;

        let entry: AnimeEntry = serde_json::from_str(json).unwrap();
        let item = CatalogItem::from(entry);

        assert_eq!(item.mal_id, 5114);
        assert_eq!(item.item_type.as_deref(), Some("TV"));
        assert_eq!(item.episodes, Some(64));
        assert!(item.genres.contains(&1) && item.genres.contains(&2));
        assert!(item.themes.contains(&38));
        assert!(item.demographics.contains(&27));
        assert_eq!(item.studios, vec!["Bones".to_string()]);
        assert_eq!(item.producers, vec!["Aniplex".to_string()]);
        assert_eq!(item.aired_from.as_deref(), Some("2009-04-05T00:00:00+00:00"));
    }

    #[test]
    fn test_sparse_entry_parses() {
        let json = r#"{ "mal_id": 1, "title": "Airing Show", "episodes": null, "score": null }"#;
        let entry: AnimeEntry = serde_json::from_str(json).unwrap();
        let item = CatalogItem::from(entry);
        assert_eq!(item.episodes, None);
        assert!(item.genres.is_empty());
        assert!(item.studios.is_empty());
    }

    #[test]
    fn test_director_position() {
        let entry: StaffEntry = serde_json::from_str(
            r#"{ "person": { "mal_id": 1, "name": "Irie, Yasuhiro" }, "positions": ["Director", "Storyboard"] }"#,
        )
        .unwrap();
        assert!(entry.is_director());

        let entry: StaffEntry = serde_json::from_str(
            r#"{ "person": { "mal_id": 2, "name": "Someone" }, "positions": ["Sound Director"] }"#,
        )
        .unwrap();
        assert!(!entry.is_director());
    }
}
