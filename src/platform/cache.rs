//! On-disk cache for GitHub API list responses
//!
//! One JSON file per request, keyed by a hash of the caller's key. Entries
//! older than the TTL are treated as missing. Deletions are never cached and
//! clear the whole cache.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Directory name under the user cache directory
const CACHE_DIR: &str = "gh-reaper";

/// Default time-to-live for cached responses
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    stored_at: DateTime<Utc>,
    key: String,
    body: serde_json::Value,
}

/// Response cache rooted at a directory
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache in `dir` with the given TTL
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Cache in the platform user cache directory, if one exists
    pub fn in_user_cache_dir(ttl: Duration) -> Option<Self> {
        dirs::cache_dir().map(|d| Self::new(d.join(CACHE_DIR), ttl))
    }

    /// Directory holding cache files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.dir.join(format!("{:016x}.json", hasher.finish()))
    }

    /// Look up a fresh response for `key`
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.entry_path(key);
        let content = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "ignoring unreadable cache entry");
                return None;
            }
        };

        if entry.key != key {
            return None;
        }
        let age = Utc::now().signed_duration_since(entry.stored_at);
        let fresh = age
            .to_std()
            .is_ok_and(|age| age < self.ttl);
        if !fresh {
            debug!(path = %path.display(), "cache entry expired");
            return None;
        }

        debug!(path = %path.display(), "cache hit");
        Some(entry.body)
    }

    /// Remove every cached response
    ///
    /// A missing cache directory is already clear.
    pub fn clear(&self) -> Result<()> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(Error::Cache(format!(
                    "failed to read {}: {e}",
                    self.dir.display()
                )));
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(Error::Cache(format!(
                        "failed to remove {}: {e}",
                        path.display()
                    )));
                }
            }
        }
        debug!(dir = %self.dir.display(), "response cache cleared");
        Ok(())
    }

    /// Store a response for `key`
    pub fn put(&self, key: &str, body: &serde_json::Value) -> Result<()> {
        self.put_at(key, body, Utc::now())
    }

    fn put_at(&self, key: &str, body: &serde_json::Value, stored_at: DateTime<Utc>) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Cache(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let entry = CacheEntry {
            stored_at,
            key: key.to_string(),
            body: body.clone(),
        };
        let content = serde_json::to_string(&entry)
            .map_err(|e| Error::Cache(format!("failed to serialize cache entry: {e}")))?;

        let path = self.entry_path(key);
        fs::write(&path, content)
            .map_err(|e| Error::Cache(format!("failed to write {}: {e}", path.display())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_put_then_get() {
        let temp = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp.path().join("cache"), DEFAULT_CACHE_TTL);

        cache.put("query-a", &json!({"data": 1})).unwrap();

        assert_eq!(cache.get("query-a"), Some(json!({"data": 1})));
        assert_eq!(cache.get("query-b"), None);
    }

    #[test]
    fn test_expired_entry_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp.path(), Duration::from_secs(60));

        let stale = Utc::now() - chrono::Duration::seconds(120);
        cache.put_at("query", &json!([]), stale).unwrap();

        assert_eq!(cache.get("query"), None);
    }

    #[test]
    fn test_clear_removes_entries() {
        let temp = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp.path(), DEFAULT_CACHE_TTL);
        cache.put("query-a", &json!(1)).unwrap();
        cache.put("query-b", &json!(2)).unwrap();
        fs::write(temp.path().join("notes.txt"), "keep").unwrap();

        cache.clear().unwrap();

        assert_eq!(cache.get("query-a"), None);
        assert_eq!(cache.get("query-b"), None);
        assert!(temp.path().join("notes.txt").exists());
    }

    #[test]
    fn test_clear_missing_dir() {
        let temp = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp.path().join("never-created"), DEFAULT_CACHE_TTL);

        assert!(cache.clear().is_ok());
    }

    #[test]
    fn test_corrupt_entry_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp.path(), DEFAULT_CACHE_TTL);
        fs::write(cache.entry_path("query"), "not json").unwrap();

        assert_eq!(cache.get("query"), None);
    }
}
