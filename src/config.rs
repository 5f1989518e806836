//! Worker configuration.
//!
//! A single [`WorkerConfig`] parameterizes the whole caching policy:
//! the partition version, the pre-cache manifest, the site origin, the
//! cross-origin passthrough flag, and the navigation strategy. One struct
//! replaces the near-duplicate per-deployment scripts that used to drift
//! apart.
//!
//! Configuration is stored at `~/.config/sitecache/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "sitecache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Partition version for the current deployment.
/// Bumping this string is the only cache invalidation mechanism: install
/// creates the new partition, activate deletes every other one.
const DEFAULT_CACHE_VERSION: &str = "v7";

/// Assets seeded into the partition on install.
const DEFAULT_PRECACHE_MANIFEST: &[&str] = &[
    "/",
    "/static/style.css",
    "/static/icons/icon-192x192.png",
    "/static/icons/icon-512x512.png",
];

/// Which side is consulted first when serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStrategy {
    /// Hit the network, fall back to the cache (then the offline page).
    NetworkFirst,
    /// Serve from the cache, hit the network only on a miss.
    CacheFirst,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Origin the worker serves; manifest paths resolve against it.
    pub origin: Url,
    /// Name of the current cache partition.
    pub cache_version: String,
    /// Site-relative paths seeded eagerly on install.
    pub precache_manifest: Vec<String>,
    /// When true, requests to other origins are never intercepted.
    pub cross_origin_passthrough: bool,
    /// Strategy for full-document navigation requests. Subresource
    /// requests are always cache-first.
    pub navigation_strategy: FetchStrategy,
}

impl WorkerConfig {
    /// Deployment defaults for a given site origin.
    pub fn for_origin(origin: Url) -> Self {
        Self {
            origin,
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
            precache_manifest: DEFAULT_PRECACHE_MANIFEST
                .iter()
                .map(|path| path.to_string())
                .collect(),
            cross_origin_passthrough: true,
            navigation_strategy: FetchStrategy::NetworkFirst,
        }
    }

    /// Load the saved configuration, if any.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(Some(config))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Default partition store root, one subdirectory per site host.
    pub fn store_root(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;

        let mut path = cache_dir.join(APP_NAME);
        if let Some(host) = self.origin.host_str() {
            path = path.join(host);
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://wiki.example").unwrap()
    }

    #[test]
    fn test_defaults_match_deployment() {
        let config = WorkerConfig::for_origin(origin());
        assert_eq!(config.cache_version, "v7");
        assert_eq!(config.precache_manifest.len(), 4);
        assert_eq!(config.precache_manifest[0], "/");
        assert!(config.cross_origin_passthrough);
        assert_eq!(config.navigation_strategy, FetchStrategy::NetworkFirst);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let mut config = WorkerConfig::for_origin(origin());
        config.cache_version = "v8".to_string();
        config.navigation_strategy = FetchStrategy::CacheFirst;

        let json = serde_json::to_string(&config).unwrap();
        let parsed: WorkerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cache_version, "v8");
        assert_eq!(parsed.navigation_strategy, FetchStrategy::CacheFirst);
        assert_eq!(parsed.origin, config.origin);
    }

    #[test]
    fn test_strategy_serializes_kebab_case() {
        let json = serde_json::to_string(&FetchStrategy::NetworkFirst).unwrap();
        assert_eq!(json, "\"network-first\"");
    }
}
