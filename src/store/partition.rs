//! Disk layout: one directory per partition, named by its version string;
//! one JSON entry file per cached response, named by the SHA-256 digest of
//! the request's cache key. Bodies are base64 so entry files stay valid
//! JSON regardless of content type.

use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::{AssetRequest, AssetResponse};

/// On-disk form of a cached response.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    status: u16,
    status_text: String,
    headers: Vec<(String, String)>,
    body: String,
    cached_at: DateTime<Utc>,
}

impl StoredEntry {
    fn from_response(request: &AssetRequest, response: &AssetResponse) -> Self {
        Self {
            key: request.cache_key(),
            status: response.status,
            status_text: response.status_text.clone(),
            headers: response.headers.clone(),
            body: BASE64.encode(&response.body),
            cached_at: response.fetched_at,
        }
    }

    fn into_response(self) -> Result<AssetResponse> {
        let body = BASE64
            .decode(&self.body)
            .with_context(|| format!("Invalid body encoding for entry: {}", self.key))?;
        let mut response = AssetResponse::new(
            self.status,
            self.status_text,
            self.headers,
            Bytes::from(body),
        );
        response.fetched_at = self.cached_at;
        Ok(response)
    }
}

/// Root directory holding every partition.
pub struct PartitionStore {
    root: PathBuf,
}

impl PartitionStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create store root: {}", root.display()))?;
        Ok(Self { root })
    }

    /// Open a partition, creating it if absent.
    pub fn open(&self, name: &str) -> Result<Partition> {
        let dir = self.root.join(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create partition: {}", name))?;
        Ok(Partition {
            name: name.to_string(),
            dir,
        })
    }

    /// Names of every partition currently on disk.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read store root: {}", self.root.display()))?
        {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a partition and everything in it.
    pub fn remove(&self, name: &str) -> Result<()> {
        let dir = self.root.join(name);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to delete partition: {}", name))?;
        }
        Ok(())
    }
}

/// A named key-value store of cached responses.
#[derive(Debug, Clone)]
pub struct Partition {
    name: String,
    dir: PathBuf,
}

impl Partition {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry_path(&self, request: &AssetRequest) -> PathBuf {
        let digest = Sha256::digest(request.cache_key().as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    /// Store a response, overwriting any prior entry for the same request.
    pub fn put(&self, request: &AssetRequest, response: &AssetResponse) -> Result<()> {
        let entry = StoredEntry::from_response(request, response);
        let contents = serde_json::to_string_pretty(&entry)?;
        std::fs::write(self.entry_path(request), contents)
            .with_context(|| format!("Failed to write cache entry: {}", request.cache_key()))?;
        Ok(())
    }

    fn load(&self, request: &AssetRequest) -> Result<Option<AssetResponse>> {
        let path = self.entry_path(request);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", request.cache_key()))?;
        let entry: StoredEntry = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry: {}", request.cache_key()))?;

        Ok(Some(entry.into_response()?))
    }

    /// Look up a request, treating unreadable entries as misses so a bad
    /// file can never fail a fetch.
    pub fn lookup(&self, request: &AssetRequest) -> Option<AssetResponse> {
        match self.load(request) {
            Ok(hit) => hit,
            Err(error) => {
                debug!(
                    partition = %self.name,
                    key = %request.cache_key(),
                    error = %error,
                    "Unreadable cache entry treated as miss"
                );
                None
            }
        }
    }

    pub fn contains(&self, request: &AssetRequest) -> bool {
        self.entry_path(request).exists()
    }

    pub fn entry_count(&self) -> Result<usize> {
        let mut count = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            if entry?.file_type()?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use url::Url;

    fn request(url: &str) -> AssetRequest {
        AssetRequest::get(Url::parse(url).unwrap())
    }

    fn response(body: &str) -> AssetResponse {
        AssetResponse::new(
            200,
            "OK",
            vec![("content-type".to_string(), "text/css".to_string())],
            Bytes::from(body.as_bytes().to_vec()),
        )
    }

    #[test]
    fn test_put_then_lookup_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = PartitionStore::new(tmp.path().to_path_buf()).unwrap();
        let partition = store.open("v1").unwrap();

        let req = request("https://wiki.example/static/style.css");
        partition.put(&req, &response("body { margin: 0 }")).unwrap();

        let hit = partition.lookup(&req).expect("entry should be present");
        assert_eq!(hit.status, 200);
        assert_eq!(hit.header("content-type"), Some("text/css"));
        assert_eq!(hit.body_text(), "body { margin: 0 }");
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        let tmp = TempDir::new().unwrap();
        let store = PartitionStore::new(tmp.path().to_path_buf()).unwrap();
        let partition = store.open("v1").unwrap();

        assert!(partition.lookup(&request("https://wiki.example/missing.png")).is_none());
    }

    #[test]
    fn test_put_overwrites_prior_entry() {
        let tmp = TempDir::new().unwrap();
        let store = PartitionStore::new(tmp.path().to_path_buf()).unwrap();
        let partition = store.open("v1").unwrap();
        let req = request("https://wiki.example/");

        partition.put(&req, &response("old")).unwrap();
        partition.put(&req, &response("new")).unwrap();

        assert_eq!(partition.entry_count().unwrap(), 1);
        assert_eq!(partition.lookup(&req).unwrap().body_text(), "new");
    }

    #[test]
    fn test_method_is_part_of_identity() {
        let tmp = TempDir::new().unwrap();
        let store = PartitionStore::new(tmp.path().to_path_buf()).unwrap();
        let partition = store.open("v1").unwrap();

        let get = request("https://wiki.example/form");
        let mut head = get.clone();
        head.method = "HEAD".to_string();

        partition.put(&get, &response("page")).unwrap();
        assert!(partition.lookup(&head).is_none());
    }

    #[test]
    fn test_corrupt_entry_degrades_to_miss() {
        let tmp = TempDir::new().unwrap();
        let store = PartitionStore::new(tmp.path().to_path_buf()).unwrap();
        let partition = store.open("v1").unwrap();
        let req = request("https://wiki.example/static/style.css");

        partition.put(&req, &response("ok")).unwrap();
        std::fs::write(partition.entry_path(&req), "not json").unwrap();

        assert!(partition.lookup(&req).is_none());
    }

    #[test]
    fn test_list_and_remove_partitions() {
        let tmp = TempDir::new().unwrap();
        let store = PartitionStore::new(tmp.path().to_path_buf()).unwrap();
        store.open("v0").unwrap();
        store.open("v1").unwrap();

        assert_eq!(store.list().unwrap(), vec!["v0", "v1"]);

        store.remove("v0").unwrap();
        assert_eq!(store.list().unwrap(), vec!["v1"]);

        // Removing an absent partition is not an error.
        store.remove("v0").unwrap();
    }

    #[test]
    fn test_open_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = PartitionStore::new(tmp.path().to_path_buf()).unwrap();
        let partition = store.open("v1").unwrap();
        partition.put(&request("https://wiki.example/"), &response("x")).unwrap();

        let reopened = store.open("v1").unwrap();
        assert_eq!(reopened.entry_count().unwrap(), 1);
    }
}
