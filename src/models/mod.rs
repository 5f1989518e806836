//! Request and response models for the cache worker.
//!
//! - `AssetRequest`: request identity (method + URL) plus its
//!   classification mode
//! - `AssetResponse`: a materialized response with a shared-buffer body,
//!   including the synthesized offline fallback

pub mod request;
pub mod response;

pub use request::{AssetRequest, RequestMode};
pub use response::AssetResponse;
