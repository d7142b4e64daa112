// Install and activate transitions

use crate::cache::CacheStore;
use crate::error::{ProxyError, Result};
use crate::net::{FetchRequest, Transport};
use crate::worker::host::HostRuntime;
use futures::future;
use std::sync::Arc;
use tracing::{info, warn};

/// Resources guaranteed to be in the cache immediately after install: the
/// application shell entry points and the manifest descriptor. Ordered, and
/// seeded as a unit.
pub const BOOTSTRAP_SET: [&str; 3] = ["./", "./index.html", "./manifest.json"];

/// Handles the install and activate transitions for one cache generation.
pub struct LifecycleManager {
    store: Arc<dyn CacheStore>,
    transport: Arc<dyn Transport>,
    host: Arc<dyn HostRuntime>,
    namespace: String,
    origin: String,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<dyn CacheStore>,
        transport: Arc<dyn Transport>,
        host: Arc<dyn HostRuntime>,
        namespace: String,
        origin: String,
    ) -> Self {
        Self {
            store,
            transport,
            host,
            namespace,
            origin,
        }
    }

    /// Install: open the versioned namespace and seed it with the bootstrap
    /// set. Any single bootstrap fetch failing (or coming back non-2xx)
    /// fails the whole transition, so the host can mark the installation
    /// unsuccessful. On success the host is told to start serving this
    /// version immediately.
    pub async fn install(&self) -> Result<()> {
        info!("Installing cache generation: {}", self.namespace);
        self.store.open(&self.namespace).await?;

        let fetches = BOOTSTRAP_SET.iter().map(|path| {
            let request = FetchRequest::get(resolve_bootstrap_url(&self.origin, path));
            let transport = Arc::clone(&self.transport);
            async move {
                let snapshot = transport.fetch(&request).await?;
                if !snapshot.is_success() {
                    return Err(ProxyError::Install(format!(
                        "bootstrap fetch {} returned {}",
                        request.url, snapshot.status
                    )));
                }
                Ok((request.identity(), snapshot))
            }
        });

        let entries = future::try_join_all(fetches).await.map_err(|e| match e {
            install @ ProxyError::Install(_) => install,
            other => ProxyError::Install(other.to_string()),
        })?;

        self.store.seed(&self.namespace, entries).await?;
        info!(
            "Seeded {} bootstrap resources into {}",
            BOOTSTRAP_SET.len(),
            self.namespace
        );

        self.host.skip_waiting();
        Ok(())
    }

    /// Activate: sweep every cache generation except the current one, then
    /// take control of open clients. Eviction is unconditional; a failed
    /// delete is logged and left behind as best-effort cleanup.
    pub async fn activate(&self) -> Result<()> {
        let keys = self.store.namespaces().await?;
        for key in keys.into_iter().filter(|k| k != &self.namespace) {
            match self.store.delete(&key).await {
                Ok(_) => info!("Evicted stale cache generation: {}", key),
                Err(e) => warn!("Failed to evict cache generation {}: {}", key, e),
            }
        }

        self.host.claim_clients().await;
        info!("Cache generation {} is now current", self.namespace);
        Ok(())
    }
}

/// Join a relative bootstrap path onto the upstream origin.
fn resolve_bootstrap_url(origin: &str, path: &str) -> String {
    let base = origin.trim_end_matches('/');
    let relative = path.trim_start_matches("./");
    format!("{}/{}", base, relative)
}
