//! Response representation and the synthesized offline fallback.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Only fully successful responses are stored.
const CACHEABLE_STATUS: u16 = 200;

/// Status of the synthesized fallback served when network and cache both fail.
const OFFLINE_STATUS: u16 = 503;

/// Body of the synthesized fallback.
pub const OFFLINE_BODY: &str = "Resource unavailable offline";

/// A materialized response.
///
/// The wire body is a single-read stream; it is read into `body` exactly
/// once, and `Bytes` shares the buffer on clone. When a response is both
/// stored and returned to the page, the two copies are forks of the same
/// allocation.
#[derive(Debug, Clone)]
pub struct AssetResponse {
    pub status: u16,
    pub status_text: String,
    /// Header names are kept lowercase.
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    /// When the body was captured off the wire.
    pub fetched_at: DateTime<Utc>,
}

impl AssetResponse {
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Bytes,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self {
            status,
            status_text: status_text.into(),
            headers,
            body,
            fetched_at: Utc::now(),
        }
    }

    /// The plaintext 503 served when neither the network nor the cache
    /// can produce the resource.
    pub fn offline_fallback() -> Self {
        Self::new(
            OFFLINE_STATUS,
            "Service Unavailable",
            vec![("content-type".to_string(), "text/plain".to_string())],
            Bytes::from_static(OFFLINE_BODY.as_bytes()),
        )
    }

    /// Whether this response may be written to a partition.
    pub fn is_cacheable(&self) -> bool {
        self.status == CACHEABLE_STATUS
    }

    /// First header with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(header, _)| *header == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_fallback_shape() {
        let response = AssetResponse::offline_fallback();
        assert_eq!(response.status, 503);
        assert_eq!(response.status_text, "Service Unavailable");
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.body_text(), OFFLINE_BODY);
        assert!(!response.is_cacheable());
    }

    #[test]
    fn test_only_200_is_cacheable() {
        let ok = AssetResponse::new(200, "OK", vec![], Bytes::from_static(b"x"));
        let missing = AssetResponse::new(404, "Not Found", vec![], Bytes::new());
        assert!(ok.is_cacheable());
        assert!(!missing.is_cacheable());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = AssetResponse::new(
            200,
            "OK",
            vec![("Content-Type".to_string(), "text/css".to_string())],
            Bytes::new(),
        );
        assert_eq!(response.header("content-type"), Some("text/css"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/css"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn test_clone_shares_body_buffer() {
        let body = Bytes::from(vec![0u8; 64]);
        let response = AssetResponse::new(200, "OK", vec![], body);
        let fork = response.clone();
        // Same allocation, not a deep copy.
        assert_eq!(response.body.as_ptr(), fork.body.as_ptr());
    }
}
