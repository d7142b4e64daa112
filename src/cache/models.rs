//! Cache key, snapshot, and statistics models.

use bytes::Bytes;
use hyper::{HeaderMap, Method, StatusCode};

/// The (method, URL) pair a cached entry is keyed by. Only GET identities
/// are ever written, but the method is part of the key so a POST to the same
/// URL can never alias a cached GET.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestIdentity {
    pub method: Method,
    pub url: String,
}

impl RequestIdentity {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
        }
    }
}

impl std::fmt::Display for RequestIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// A buffered response: status, headers, and a fully-read body.
///
/// The body is an immutable shared buffer, so cloning a snapshot produces an
/// independent owning handle over the same bytes. One handle can be handed to
/// the caller while the other is persisted, without either side being able to
/// consume the payload out from under the other.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ResponseSnapshot {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Whether the response is "ok" (2xx). Only ok responses are cached.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Statistics for cache operations.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Fallback lookups that found a cached snapshot.
    pub hits: u64,
    /// Fallback lookups that found nothing.
    pub misses: u64,
    /// Opportunistic writes completed after successful fetches.
    pub writes: u64,
    /// Requests passed through untouched via the allowlist.
    pub bypassed: u64,
}
