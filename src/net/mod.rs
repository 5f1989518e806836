//! Network boundary for the cache worker.
//!
//! The manager talks to the wire through the [`Fetch`] trait; the
//! production implementation is [`HttpFetcher`] on top of `reqwest`.
//! Network failures are the only error category the worker handles.

pub mod error;
pub mod fetcher;

pub use error::FetchError;
pub use fetcher::{Fetch, HttpFetcher};
