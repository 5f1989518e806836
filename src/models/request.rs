//! Request identity and classification.

use url::Url;

/// How the page asked for the resource.
///
/// Navigation requests are full-document loads; everything else (styles,
/// scripts, images, API calls) is a subresource fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Navigate,
    Subresource,
}

/// A request as seen by the fetch handler.
///
/// Cache identity is the method plus the absolute URL; in practice only
/// GET requests are ever stored.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub method: String,
    pub url: Url,
    pub mode: RequestMode,
}

impl AssetRequest {
    /// A GET subresource request.
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            mode: RequestMode::Subresource,
        }
    }

    /// A GET navigation (full-document) request.
    pub fn navigate(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            mode: RequestMode::Navigate,
        }
    }

    /// Key under which this request is stored in a partition.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Whether this request targets the given site origin.
    pub fn same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }
}
