// Network-first fetch interception

use crate::cache::{CacheStats, CacheStore, ResponseSnapshot};
use crate::error::Result;
use crate::net::{FetchRequest, Transport};
use hyper::Method;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

/// A response on its way back to the caller, plus the opportunistic cache
/// write when one was scheduled. The write runs off the critical path;
/// dropping the handle detaches it, tests can await it instead.
#[derive(Debug)]
pub struct Handled {
    pub response: ResponseSnapshot,
    pub cache_write: Option<JoinHandle<()>>,
}

impl Handled {
    pub fn passthrough(response: ResponseSnapshot) -> Self {
        Self {
            response,
            cache_write: None,
        }
    }
}

/// Applies network-first-with-fallback to every intercepted request.
pub struct Interceptor {
    store: Arc<dyn CacheStore>,
    transport: Arc<dyn Transport>,
    namespace: String,
    stats: Arc<RwLock<CacheStats>>,
}

impl Interceptor {
    pub fn new(
        store: Arc<dyn CacheStore>,
        transport: Arc<dyn Transport>,
        namespace: String,
        stats: Arc<RwLock<CacheStats>>,
    ) -> Self {
        Self {
            store,
            transport,
            namespace,
            stats,
        }
    }

    /// Try the live network first. A successful 2xx GET is returned to the
    /// caller and a second handle over the same body is written into the
    /// current namespace asynchronously; write failures cost nothing but a
    /// missed offline opportunity. On a fetch-level failure, GETs fall back
    /// to the cache; anything else propagates the failure, since no stored
    /// representation can exist.
    pub async fn handle(&self, request: FetchRequest) -> Result<Handled> {
        match self.transport.fetch(&request).await {
            Ok(response) => {
                let cache_write = if response.is_success() && request.method == Method::GET {
                    Some(self.schedule_write(&request, response.clone()))
                } else {
                    None
                };
                Ok(Handled {
                    response,
                    cache_write,
                })
            }
            Err(net_err) => {
                if request.method != Method::GET {
                    return Err(net_err);
                }

                let identity = request.identity();
                match self.store.lookup(&self.namespace, &identity).await {
                    Ok(Some(snapshot)) => {
                        self.stats.write().await.hits += 1;
                        debug!("Serving {} from cache after network failure", identity);
                        Ok(Handled::passthrough(snapshot))
                    }
                    Ok(None) => {
                        self.stats.write().await.misses += 1;
                        Err(net_err)
                    }
                    Err(lookup_err) => {
                        debug!("Cache lookup failed (treated as miss): {}", lookup_err);
                        Err(net_err)
                    }
                }
            }
        }
    }

    fn schedule_write(&self, request: &FetchRequest, copy: ResponseSnapshot) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let stats = Arc::clone(&self.stats);
        let namespace = self.namespace.clone();
        let identity = request.identity();

        tokio::spawn(async move {
            match store.put(&namespace, identity, copy).await {
                Ok(()) => stats.write().await.writes += 1,
                Err(e) => debug!("Cache write failed (ignored): {}", e),
            }
        })
    }
}
