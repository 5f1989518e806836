//! Offline asset cache for a static site.
//!
//! `sitecache` implements the three-phase lifecycle of an offline cache
//! worker as explicit operations:
//!
//! - **install**: open the versioned cache partition and eagerly seed it
//!   with every path in the pre-cache manifest (all-or-nothing)
//! - **activate**: delete every partition left behind by earlier versions
//! - **fetch**: serve each request cache-first or network-first depending
//!   on its classification, falling back to a synthesized 503 when both
//!   the network and the cache come up empty
//!
//! The whole policy is parameterized by [`WorkerConfig`]; there is no
//! module-level mutable state. The network sits behind the [`net::Fetch`]
//! trait so tests can run entirely offline.

pub mod config;
pub mod models;
pub mod net;
pub mod store;
pub mod worker;

pub use config::{FetchStrategy, WorkerConfig};
pub use models::{AssetRequest, AssetResponse, RequestMode};
pub use net::{Fetch, FetchError, HttpFetcher};
pub use store::{Partition, PartitionStore};
pub use worker::{FetchOutcome, OfflineCacheManager, WorkerPhase};
