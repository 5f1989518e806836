use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Connection could not be established. Used by `Fetch`
    /// implementations that are not backed by `reqwest`.
    #[error("network unreachable: {0}")]
    Unreachable(String),

    /// Pre-cache seeding got a response it is not allowed to store.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus { url: Url, status: u16 },

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
}
