//! Directory-backed cache of sequence tables and rankings.
//!
//! One pretty-printed JSON file per entry, named `{key}.json`, where the key
//! is the content hash of everything that determines the value.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use lineuplab_core::{CacheKey, KeyValueCache};

#[derive(Debug, Clone)]
pub struct DirCache {
    cache_dir: PathBuf,
}

impl DirCache {
    /// Creates the directory if it doesn't exist.
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;

        Ok(Self { cache_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entry_path(key).exists()
    }

    /// `Ok(None)` when nothing is stored under `key`.
    pub fn read<V: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<V>> {
        let path = self.entry_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&path).context("Failed to read cache entry")?;

        let value = serde_json::from_str(&json).context("Failed to deserialize cache entry")?;

        Ok(Some(value))
    }

    pub fn write<V: Serialize>(&self, key: &CacheKey, value: &V) -> Result<()> {
        let path = self.entry_path(key);

        let json = serde_json::to_string_pretty(value).context("Failed to serialize cache entry")?;

        std::fs::write(&path, json).context("Failed to write cache entry")?;

        Ok(())
    }

    pub fn remove(&self, key: &CacheKey) -> Result<()> {
        let path = self.entry_path(key);

        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove cache entry")?;
        }

        Ok(())
    }

    /// Removes every `.json` entry; other files are left alone.
    pub fn clear(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();

            if is_entry(&path) {
                std::fs::remove_file(path)?;
            }
        }

        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count = std::fs::read_dir(&self.cache_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| is_entry(&entry.path()))
            .count();

        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{key}.json"))
    }
}

fn is_entry(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
}

impl<V> KeyValueCache<V> for DirCache
where
    V: Serialize + DeserializeOwned,
{
    fn get(&self, key: &CacheKey) -> Option<V> {
        match self.read(key) {
            Ok(hit) => {
                debug!(%key, hit = hit.is_some(), "cache lookup");
                hit
            }
            Err(err) => {
                warn!(%key, error = %format!("{err:#}"), "ignoring unreadable cache entry");
                None
            }
        }
    }

    fn put(&self, key: &CacheKey, value: &V) {
        if let Err(err) = self.write(key, value) {
            warn!(%key, error = %format!("{err:#}"), "failed to store cache entry");
        }
    }
}
