//! Lifecycle handlers for the offline cache worker.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::config::{FetchStrategy, WorkerConfig};
use crate::models::{AssetRequest, AssetResponse, RequestMode};
use crate::net::{Fetch, FetchError};
use crate::store::{Partition, PartitionStore};

/// What the fetch handler decided to do with a request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Not intercepted; the caller talks to the network itself.
    Passthrough,
    /// Served by the worker: from cache, network, or the offline fallback.
    Response(AssetResponse),
}

/// Lifecycle phase of the worker.
///
/// `install` yields an `Installed` manager without waiting on anything
/// else; `activate` moves it to `Active` once superseded partitions are
/// gone. After that every lookup is served by the current partition only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Installed,
    Active,
}

pub struct OfflineCacheManager {
    config: WorkerConfig,
    store: PartitionStore,
    partition: Partition,
    net: Arc<dyn Fetch>,
    phase: WorkerPhase,
}

impl OfflineCacheManager {
    /// Install a new worker version: open the current partition and seed
    /// every manifest path over the network.
    ///
    /// Seeding is all-or-nothing: a transport failure or a non-200 status
    /// for any path fails the install and no manager is constructed, so
    /// the broken version never activates.
    pub async fn install(
        config: WorkerConfig,
        store: PartitionStore,
        net: Arc<dyn Fetch>,
    ) -> Result<Self> {
        info!(version = %config.cache_version, "Installing cache worker");
        let partition = store.open(&config.cache_version)?;

        let mut requests = Vec::with_capacity(config.precache_manifest.len());
        for path in &config.precache_manifest {
            let url = config
                .origin
                .join(path)
                .with_context(|| format!("Invalid manifest path: {}", path))?;
            requests.push(AssetRequest::get(url));
        }

        try_join_all(
            requests
                .iter()
                .map(|request| Self::seed(&partition, net.as_ref(), request)),
        )
        .await?;

        info!(
            version = %config.cache_version,
            count = requests.len(),
            "Pre-cache seeding complete"
        );

        Ok(Self {
            config,
            store,
            partition,
            net,
            phase: WorkerPhase::Installed,
        })
    }

    async fn seed(partition: &Partition, net: &dyn Fetch, request: &AssetRequest) -> Result<()> {
        let response = net
            .fetch(request)
            .await
            .with_context(|| format!("Pre-cache fetch failed: {}", request.url))?;

        if !response.is_cacheable() {
            return Err(FetchError::UnexpectedStatus {
                url: request.url.clone(),
                status: response.status,
            }
            .into());
        }

        partition.put(request, &response)?;
        Ok(())
    }

    /// Activate this worker version: delete every partition whose name is
    /// not the current version string. Once this returns, all lookups are
    /// served by the current partition.
    pub fn activate(&mut self) -> Result<()> {
        info!(version = %self.config.cache_version, "Activating cache worker");

        for name in self.store.list()? {
            if name != self.config.cache_version {
                info!(partition = %name, "Deleting superseded partition");
                self.store.remove(&name)?;
            }
        }

        self.phase = WorkerPhase::Active;
        Ok(())
    }

    /// Serve one request.
    ///
    /// Never fails: network errors end in a cache fallback or the
    /// synthesized 503, and store errors degrade to miss (reads) or a
    /// logged skip (writes).
    pub async fn handle_fetch(&self, request: &AssetRequest) -> FetchOutcome {
        if self.config.cross_origin_passthrough && !request.same_origin(&self.config.origin) {
            debug!(url = %request.url, "Cross-origin request passed through");
            return FetchOutcome::Passthrough;
        }

        let strategy = match request.mode {
            RequestMode::Navigate => self.config.navigation_strategy,
            RequestMode::Subresource => FetchStrategy::CacheFirst,
        };

        let response = match strategy {
            FetchStrategy::NetworkFirst => self.network_first(request).await,
            FetchStrategy::CacheFirst => self.cache_first(request).await,
        };
        FetchOutcome::Response(response)
    }

    async fn network_first(&self, request: &AssetRequest) -> AssetResponse {
        match self.net.fetch(request).await {
            Ok(response) => {
                self.store_copy(request, &response);
                response
            }
            Err(error) => {
                debug!(url = %request.url, error = %error, "Network failed, trying cache");
                match self.partition.lookup(request) {
                    Some(cached) => {
                        warn!(url = %request.url, "Serving cached copy offline");
                        cached
                    }
                    None => AssetResponse::offline_fallback(),
                }
            }
        }
    }

    async fn cache_first(&self, request: &AssetRequest) -> AssetResponse {
        if let Some(cached) = self.partition.lookup(request) {
            debug!(url = %request.url, "Cache hit");
            return cached;
        }

        match self.net.fetch(request).await {
            Ok(response) => {
                self.store_copy(request, &response);
                response
            }
            Err(error) => {
                warn!(url = %request.url, error = %error, "Network failed with no cached copy");
                AssetResponse::offline_fallback()
            }
        }
    }

    /// Write one copy of a cacheable response, leaving the argument for
    /// the caller. The body is a shared buffer, so the stored copy is a
    /// fork of the same bytes. A write failure never fails the fetch.
    fn store_copy(&self, request: &AssetRequest, response: &AssetResponse) {
        if !request.is_get() || !response.is_cacheable() {
            return;
        }
        if let Err(error) = self.partition.put(request, response) {
            warn!(url = %request.url, error = %error, "Failed to write cache entry");
        }
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }
}
