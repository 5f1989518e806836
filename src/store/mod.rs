//! Versioned partition store for cached responses.
//!
//! A [`PartitionStore`] owns the on-disk root; each [`Partition`] is a
//! named key-value store mapping request identity to a stored response.
//! Partitions are only ever deleted wholesale, when a newer worker
//! version activates. There is no per-entry expiry.

pub mod partition;

pub use partition::{Partition, PartitionStore};
