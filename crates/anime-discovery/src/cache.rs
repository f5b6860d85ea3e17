//! On-disk cache for static option lists.
//!
//! Genre, theme and demographic lists rarely change, so they are stored as
//! JSON files and reused until explicitly refreshed. Discovery results are
//! never cached.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JSON file cache keyed by name
pub struct CacheManager {
    cache_dir: PathBuf,
    enabled: bool,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(cache_dir: impl AsRef<Path>, enabled: bool) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        if enabled {
            std::fs::create_dir_all(&cache_dir).with_context(|| {
                format!("Failed to create cache directory: {}", cache_dir.display())
            })?;
            debug!(cache_dir = %cache_dir.display(), "Option cache initialized");
        }

        Ok(Self { cache_dir, enabled })
    }

    /// Get a cached entry if it exists
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.cache_path(key);
        if !path.exists() {
            debug!(key = key, "Cache miss");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache file: {}", path.display()))?;

        debug!(key = key, "Cache hit");
        Ok(Some(data))
    }

    /// Store an entry
    pub fn set<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.cache_path(key);
        let content = serde_json::to_string_pretty(data).context("Failed to serialize cache data")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write cache file: {}", path.display()))?;

        debug!(key = key, path = %path.display(), "Cache stored");
        Ok(())
    }

    /// Drop a single entry; missing entries are fine
    pub fn invalidate(&self, key: &str) -> Result<()> {
        let path = self.cache_path(key);
        if self.enabled && path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove cache file: {}", path.display()))?;
            debug!(key = key, "Cache entry invalidated");
        }
        Ok(())
    }

    /// Remove every cached entry
    pub fn clear(&self) -> Result<()> {
        if !self.enabled || !self.cache_dir.exists() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove cache file: {}", path.display()))?;
            }
        }
        info!(cache_dir = %self.cache_dir.display(), "Option cache cleared");

        Ok(())
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(format!("{}.json", safe_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct OptionEntry {
        mal_id: u32,
        name: String,
    }

    fn sample() -> Vec<OptionEntry> {
        vec![OptionEntry {
            mal_id: 1,
            name: "Action".to_string(),
        }]
    }

    #[test]
    fn test_cache_roundtrip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = CacheManager::new(temp_dir.path(), true)?;

        cache.set("genres", &sample())?;
        let retrieved: Option<Vec<OptionEntry>> = cache.get("genres")?;
        assert_eq!(retrieved, Some(sample()));

        Ok(())
    }

    #[test]
    fn test_cache_disabled() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = CacheManager::new(temp_dir.path().join("off"), false)?;

        cache.set("genres", &sample())?;
        let retrieved: Option<Vec<OptionEntry>> = cache.get("genres")?;
        assert_eq!(retrieved, None);
        assert!(!temp_dir.path().join("off").exists());

        Ok(())
    }

    #[test]
    fn test_invalidate_and_clear() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = CacheManager::new(temp_dir.path(), true)?;

        cache.set("genres", &sample())?;
        cache.set("themes", &sample())?;

        cache.invalidate("genres")?;
        assert_eq!(cache.get::<Vec<OptionEntry>>("genres")?, None);
        assert!(cache.get::<Vec<OptionEntry>>("themes")?.is_some());

        cache.invalidate("never-stored")?;

        cache.clear()?;
        assert_eq!(cache.get::<Vec<OptionEntry>>("themes")?, None);

        Ok(())
    }

    #[test]
    fn test_keys_are_sanitized() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cache = CacheManager::new(temp_dir.path(), true)?;

        cache.set("genres/anime?filter=themes", &sample())?;
        assert!(temp_dir.path().join("genres_anime_filter_themes.json").exists());

        Ok(())
    }
}
