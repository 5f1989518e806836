//! The offline cache manager.
//!
//! [`OfflineCacheManager`] binds the three lifecycle operations together:
//! `install` seeds the current partition from the pre-cache manifest,
//! `activate` evicts every superseded partition, and `handle_fetch`
//! serves requests by strategy.

pub mod manager;

pub use manager::{FetchOutcome, OfflineCacheManager, WorkerPhase};
