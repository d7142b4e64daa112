//! The cache-service abstraction shared by the lifecycle and fetch handlers.
//!
//! Entries live inside named, versioned namespaces; exactly one namespace is
//! "current" at any time and every write targets it. Older namespaces are
//! swept wholesale on activation. The store is expected to serialize
//! individual key writes atomically, but imposes no cross-request ordering:
//! two concurrent writes to the same identity race with last-write-wins.

use crate::cache::models::{RequestIdentity, ResponseSnapshot};
use crate::error::Result;
use async_trait::async_trait;

/// Key-value persistent store addressed by namespace, then request identity.
///
/// Injected into the handlers rather than referenced as a hidden global so an
/// in-memory fake can stand in during tests.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Open the namespace, creating it if absent. Idempotent.
    async fn open(&self, namespace: &str) -> Result<()>;

    /// Atomically insert a batch of entries. All-or-nothing: on error the
    /// namespace gains none of the batch.
    async fn seed(
        &self,
        namespace: &str,
        entries: Vec<(RequestIdentity, ResponseSnapshot)>,
    ) -> Result<()>;

    /// Insert or overwrite a single entry. Last write wins.
    async fn put(
        &self,
        namespace: &str,
        identity: RequestIdentity,
        snapshot: ResponseSnapshot,
    ) -> Result<()>;

    /// Look up an entry by identity.
    async fn lookup(
        &self,
        namespace: &str,
        identity: &RequestIdentity,
    ) -> Result<Option<ResponseSnapshot>>;

    /// Names of every namespace currently present.
    async fn namespaces(&self) -> Result<Vec<String>>;

    /// Delete a whole namespace. Returns whether it existed.
    async fn delete(&self, namespace: &str) -> Result<bool>;
}
