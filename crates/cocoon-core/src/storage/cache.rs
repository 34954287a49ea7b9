use std::path::Path;

use dashmap::DashMap;
use tracing::debug;

use super::CacheError;

/// A store of model responses keyed by the exact prompt text
pub trait ResponseCache: Send + Sync {
    fn get(&self, prompt: &str) -> Result<Option<String>, CacheError>;

    fn put(&self, prompt: &str, response: &str) -> Result<(), CacheError>;

    fn contains(&self, prompt: &str) -> Result<bool, CacheError> {
        Ok(self.get(prompt)?.is_some())
    }
}

/// Persistent cache in a sled database, flushed on every write so an
/// interrupted batch keeps every answer it paid for.
pub struct SledCache {
    db: sled::Db,
    responses: sled::Tree,
}

impl SledCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let db = sled::open(path.as_ref())?;
        let responses = db.open_tree("responses")?;
        debug!(path = %path.as_ref().display(), entries = responses.len(), "opened response cache");
        Ok(Self { db, responses })
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl ResponseCache for SledCache {
    fn get(&self, prompt: &str) -> Result<Option<String>, CacheError> {
        match self.responses.get(prompt.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| CacheError::Corrupt {
                    prompt: prompt.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn put(&self, prompt: &str, response: &str) -> Result<(), CacheError> {
        self.responses.insert(prompt.as_bytes(), response.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn contains(&self, prompt: &str) -> Result<bool, CacheError> {
        Ok(self.responses.contains_key(prompt.as_bytes())?)
    }
}

/// In-process cache, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryCache {
    responses: DashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, prompt: &str) -> Result<Option<String>, CacheError> {
        Ok(self.responses.get(prompt).map(|entry| entry.value().clone()))
    }

    fn put(&self, prompt: &str, response: &str) -> Result<(), CacheError> {
        self.responses
            .insert(prompt.to_string(), response.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_sled_cache_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("llm.sled");

        {
            let cache = SledCache::open(&path).unwrap();
            assert!(cache.is_empty());
            cache.put("prompt", "answer").unwrap();
            assert!(cache.contains("prompt").unwrap());
        }

        let cache = SledCache::open(&path).unwrap();
        assert_eq!(cache.get("prompt").unwrap(), Some("answer".to_string()));
        assert_eq!(cache.get("other").unwrap(), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_memory_cache_overwrites() {
        let cache = MemoryCache::new();
        assert!(!cache.contains("p").unwrap());
        cache.put("p", "one").unwrap();
        cache.put("p", "two").unwrap();
        assert_eq!(cache.get("p").unwrap(), Some("two".to_string()));
        assert_eq!(cache.len(), 1);
    }
}
