//! File-based cache for the remote registry descriptor

use super::manifest::Registry;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// How long a cached registry is trusted
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Default cache directory name under the home directory
pub const CACHE_DIR_NAME: &str = ".yantr-cache";

const CACHE_FILE: &str = "registry.json";

#[derive(Debug, Clone)]
pub struct RegistryCache {
    dir: PathBuf,
    ttl: Duration,
}

impl RegistryCache {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            ttl: CACHE_TTL,
        }
    }

    /// Cache under `$HOME/.yantr-cache`, or `./.yantr-cache` without a home directory
    pub fn in_home() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(CACHE_DIR_NAME))
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE)
    }

    /// Cached registry if it exists, is younger than the TTL and parses
    pub fn load(&self) -> Option<Registry> {
        let path = self.path();
        let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age > self.ttl {
            tracing::debug!(age_secs = age.as_secs(), "registry cache expired");
            return None;
        }

        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(registry) => {
                tracing::debug!(path = %path.display(), "using cached registry");
                Some(registry)
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable registry cache");
                None
            }
        }
    }

    /// Best effort: failures are logged and otherwise ignored
    pub fn store(&self, registry: &Registry) {
        let result = std::fs::create_dir_all(&self.dir).and_then(|_| {
            let content = serde_json::to_string(registry).map_err(std::io::Error::other)?;
            std::fs::write(self.path(), content)
        });
        if let Err(e) = result {
            tracing::debug!(error = %e, dir = %self.dir.display(), "failed to write registry cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn registry() -> Registry {
        Registry {
            version: "0.1.0".to_string(),
            min_cli_version: None,
            base_url: "https://example.com/templates".to_string(),
            base: Default::default(),
            components: BTreeMap::new(),
        }
    }

    #[test]
    fn test_store_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = RegistryCache::new(tmp.path().join("cache"));
        assert!(cache.load().is_none());

        cache.store(&registry());
        assert_eq!(cache.load(), Some(registry()));
    }

    #[test]
    fn test_expired_cache_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = RegistryCache::new(tmp.path().to_path_buf());
        cache.store(&registry());

        std::thread::sleep(Duration::from_millis(20));
        let expired = cache.clone().with_ttl(Duration::from_millis(1));
        assert!(expired.load().is_none());
        assert!(cache.load().is_some());
    }

    #[test]
    fn test_corrupt_cache_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = RegistryCache::new(tmp.path().to_path_buf());
        std::fs::write(cache.path(), "{ not json").unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_store_into_unwritable_location_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let cache = RegistryCache::new(blocker.join("nested"));
        cache.store(&registry());
        assert!(cache.load().is_none());
    }
}
