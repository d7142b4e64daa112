//! Event-driven proxy worker.
//!
//! The browser-style callback registration (install/activate/fetch) is made
//! explicit here: the host dispatches typed events into [`ProxyWorker`],
//! which routes them to the lifecycle manager or the fetch interceptor. All
//! collaborators (cache store, transport, host runtime) are injected, so the
//! whole worker runs against in-memory fakes in tests.
//!
//! # Submodules
//!
//! - `host`: the host-runtime collaborator trait.
//! - `lifecycle`: install seeding and stale-generation eviction.
//! - `interceptor`: the network-first-with-fallback fetch policy.

pub mod host;
pub mod interceptor;
pub mod lifecycle;

pub use host::{HostRuntime, StandaloneHost};
pub use interceptor::{Handled, Interceptor};
pub use lifecycle::{LifecycleManager, BOOTSTRAP_SET};

use crate::cache::{CacheStats, CacheStore};
use crate::config::AppConfig;
use crate::error::Result;
use crate::net::{FetchRequest, Transport};
use crate::policy::{self, Route};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Typed transition inputs dispatched by the host.
#[derive(Debug)]
pub enum Event {
    InstallRequested,
    ActivateRequested,
    RequestReceived(FetchRequest),
}

/// Where the worker is in its lifecycle. Ordering of transitions is the
/// host's responsibility; the phase is tracked for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Installed,
    Active,
}

/// Result of dispatching one event.
#[derive(Debug)]
pub enum Outcome {
    Installed,
    Activated,
    Response(Handled),
}

/// The proxy worker: one cache generation, one interceptor, one lifecycle.
pub struct ProxyWorker {
    lifecycle: LifecycleManager,
    interceptor: Interceptor,
    transport: Arc<dyn Transport>,
    stats: Arc<RwLock<CacheStats>>,
    phase: RwLock<Phase>,
    namespace: String,
}

impl ProxyWorker {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn CacheStore>,
        transport: Arc<dyn Transport>,
        host: Arc<dyn HostRuntime>,
    ) -> Self {
        let namespace = config.cache.namespace.clone();
        let stats = Arc::new(RwLock::new(CacheStats::default()));

        let lifecycle = LifecycleManager::new(
            Arc::clone(&store),
            Arc::clone(&transport),
            host,
            namespace.clone(),
            config.upstream.origin.clone(),
        );
        let interceptor = Interceptor::new(
            store,
            Arc::clone(&transport),
            namespace.clone(),
            Arc::clone(&stats),
        );

        Self {
            lifecycle,
            interceptor,
            transport,
            stats,
            phase: RwLock::new(Phase::Idle),
            namespace,
        }
    }

    /// Route one event. Requests are classified before anything else touches
    /// them: allowlisted URLs go straight to the transport with zero cache
    /// reads or writes.
    pub async fn dispatch(&self, event: Event) -> Result<Outcome> {
        match event {
            Event::InstallRequested => {
                self.lifecycle.install().await?;
                *self.phase.write().await = Phase::Installed;
                Ok(Outcome::Installed)
            }
            Event::ActivateRequested => {
                self.lifecycle.activate().await?;
                *self.phase.write().await = Phase::Active;
                Ok(Outcome::Activated)
            }
            Event::RequestReceived(request) => match policy::classify(&request.url) {
                Route::Bypass => {
                    debug!("Bypassing allowlisted request: {}", request.url);
                    self.stats.write().await.bypassed += 1;
                    let response = self.transport.fetch(&request).await?;
                    Ok(Outcome::Response(Handled::passthrough(response)))
                }
                Route::Intercept => {
                    Ok(Outcome::Response(self.interceptor.handle(request).await?))
                }
            },
        }
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.read().await
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}
