// In-memory cache store

use crate::cache::models::{RequestIdentity, ResponseSnapshot};
use crate::cache::store::CacheStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type Namespace = HashMap<RequestIdentity, ResponseSnapshot>;

/// Cache store backed by process memory. The store used by the standalone
/// binary and by the test suite; entries do not outlive the process.
#[derive(Default)]
pub struct MemoryStore {
    namespaces: Arc<RwLock<HashMap<String, Namespace>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a namespace, if it exists.
    pub async fn len(&self, namespace: &str) -> Option<usize> {
        self.namespaces.read().await.get(namespace).map(|ns| ns.len())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn open(&self, namespace: &str) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        if !namespaces.contains_key(namespace) {
            debug!("Creating cache namespace: {}", namespace);
            namespaces.insert(namespace.to_string(), Namespace::new());
        }
        Ok(())
    }

    async fn seed(
        &self,
        namespace: &str,
        entries: Vec<(RequestIdentity, ResponseSnapshot)>,
    ) -> Result<()> {
        // Single write-lock hold makes the batch atomic with respect to
        // concurrent readers.
        let mut namespaces = self.namespaces.write().await;
        let ns = namespaces.entry(namespace.to_string()).or_default();
        for (identity, snapshot) in entries {
            ns.insert(identity, snapshot);
        }
        Ok(())
    }

    async fn put(
        &self,
        namespace: &str,
        identity: RequestIdentity,
        snapshot: ResponseSnapshot,
    ) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(identity, snapshot);
        Ok(())
    }

    async fn lookup(
        &self,
        namespace: &str,
        identity: &RequestIdentity,
    ) -> Result<Option<ResponseSnapshot>> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces
            .get(namespace)
            .and_then(|ns| ns.get(identity))
            .cloned())
    }

    async fn namespaces(&self) -> Result<Vec<String>> {
        Ok(self.namespaces.read().await.keys().cloned().collect())
    }

    async fn delete(&self, namespace: &str) -> Result<bool> {
        let existed = self.namespaces.write().await.remove(namespace).is_some();
        if existed {
            debug!("Deleted cache namespace: {}", namespace);
        }
        Ok(existed)
    }
}
